//! Experiment log
//!
//! Append-only record of a session: the metadata block first, then free-text
//! lines and per-frame snapshots. [`JsonLinesLog`] writes one JSON object per
//! line so a session can be replayed or analysed offline.

use crate::config::Metadata;
use crate::error::LogError;
use crate::surface::FrameView;
use arena_core::{ArenaFrame, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One object's world transform in a frame record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: String,
    pub position: Vec3,
    pub rot_y: f32,
    pub scale: f32,
    pub active: bool,
}

/// Snapshot of one rendered frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub phase: u32,
    pub frame: u64,
    /// Seconds since the session started
    pub time: f64,
    pub subject: Vec3,
    pub arena: ArenaFrame,
    /// Names of objects triggered this frame
    pub triggered: SmallVec<[String; 2]>,
    pub objects: SmallVec<[ObjectRecord; 4]>,
}

impl FrameRecord {
    pub fn from_view(view: &FrameView<'_>, time: f64, triggered: SmallVec<[String; 2]>) -> Self {
        Self {
            phase: view.phase,
            frame: view.frame,
            time,
            subject: view.camera.position,
            arena: view.arena,
            triggered,
            objects: view
                .objects
                .iter()
                .map(|item| ObjectRecord {
                    name: item.name.to_string(),
                    position: item.position,
                    rot_y: item.rot_y,
                    scale: item.scale,
                    active: item.active,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Metadata(Metadata),
    Line { time: f64, text: String },
    Frame(FrameRecord),
}

/// Sink for experiment records
pub trait ExperimentLog {
    fn write(&mut self, record: &LogRecord) -> Result<(), LogError>;

    fn flush(&mut self) -> Result<(), LogError> {
        Ok(())
    }

    /// Write the session metadata block
    fn metadata(&mut self, metadata: &Metadata) -> Result<(), LogError> {
        self.write(&LogRecord::Metadata(metadata.clone()))
    }

    /// Write a free-text line
    fn line(&mut self, time: f64, text: &str) -> Result<(), LogError> {
        self.write(&LogRecord::Line {
            time,
            text: text.to_string(),
        })
    }

    /// Write one per-frame record
    fn frame(&mut self, record: FrameRecord) -> Result<(), LogError> {
        self.write(&LogRecord::Frame(record))
    }
}

/// JSON-lines file log
pub struct JsonLinesLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesLog {
    /// Create `<directory>/<experiment>_<YYYYmmdd_HHMMSS>.jsonl`
    pub fn create(directory: &Path, experiment: &str) -> Result<Self, LogError> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        Self::create_at(directory.join(format!("{experiment}_{stamp}.jsonl")))
    }

    /// Create (or truncate) a log at an exact path
    pub fn create_at(path: PathBuf) -> Result<Self, LogError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        tracing::info!("Logging session to {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExperimentLog for JsonLinesLog {
    fn write(&mut self, record: &LogRecord) -> Result<(), LogError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory log
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    records: Vec<LogRecord>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|r| match r {
            LogRecord::Line { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = &FrameRecord> {
        self.records.iter().filter_map(|r| match r {
            LogRecord::Frame(frame) => Some(frame),
            _ => None,
        })
    }
}

impl ExperimentLog for MemoryLog {
    fn write(&mut self, record: &LogRecord) -> Result<(), LogError> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use std::io::{BufRead, BufReader};

    #[test]
    fn test_json_lines_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = JsonLinesLog::create(dir.path(), "VR_Engagement").unwrap();
        let config = SessionConfig::default();

        log.metadata(&config.metadata()).unwrap();
        log.line(0.0, "Start of Phase 0").unwrap();
        log.flush().unwrap();

        let name = log.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("VR_Engagement_"));
        assert!(name.ends_with(".jsonl"));

        let reader = BufReader::new(File::open(log.path()).unwrap());
        let records: Vec<LogRecord> = reader
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], LogRecord::Metadata(config.metadata()));
        assert_eq!(
            records[1],
            LogRecord::Line {
                time: 0.0,
                text: "Start of Phase 0".into()
            }
        );
    }

    #[test]
    fn test_frame_record_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = JsonLinesLog::create_at(dir.path().join("frames.jsonl")).unwrap();

        let objects: SmallVec<[ObjectRecord; 4]> = ["center", "side", "corner", "extra", "fifth"]
            .iter()
            .enumerate()
            .map(|(i, name)| ObjectRecord {
                name: name.to_string(),
                position: Vec3::new(i as f32 * 0.1, 0.03, -0.25),
                rot_y: 45.0 * i as f32,
                scale: 0.5,
                active: i % 2 == 0,
            })
            .collect();
        assert!(objects.spilled());

        let record = FrameRecord {
            phase: 1,
            frame: 42,
            time: 300.7,
            subject: Vec3::new(0.2, 0.03, 0.1),
            arena: ArenaFrame::new(Vec3::new(0.3, 0.0, -0.2), 20.0),
            triggered: SmallVec::from_vec(vec!["side".to_string(), "center".to_string()]),
            objects,
        };
        log.frame(record.clone()).unwrap();
        log.flush().unwrap();

        let reader = BufReader::new(File::open(log.path()).unwrap());
        let records: Vec<LogRecord> = reader
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect();
        assert_eq!(records, vec![LogRecord::Frame(record)]);
    }

    #[test]
    fn test_record_tagging() {
        let json = serde_json::to_string(&LogRecord::Line {
            time: 1.5,
            text: "hello".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"line","time":1.5,"text":"hello"}"#);
    }

    #[test]
    fn test_create_makes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("rat07");
        let log = JsonLinesLog::create(&nested, "VR").unwrap();
        assert!(log.path().starts_with(&nested));
        assert!(nested.is_dir());
    }

    #[test]
    fn test_memory_log_lines() {
        let mut log = MemoryLog::new();
        log.line(0.0, "a").unwrap();
        log.metadata(&SessionConfig::default().metadata()).unwrap();
        log.line(1.0, "b").unwrap();
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(log.records().len(), 3);
    }
}
