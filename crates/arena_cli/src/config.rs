//! Config file resolution
//!
//! Sessions read `arena.toml` from the working directory unless a path is
//! given. Without either, the standard protocol defaults apply.

use anyhow::{Context, Result};
use arena_session::SessionConfig;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "arena.toml";

/// Load the session config from `path`, or from `arena.toml` in `dir`
pub fn resolve(path: Option<&Path>, dir: &Path) -> Result<SessionConfig> {
    if let Some(path) = path {
        return SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let local = dir.join(DEFAULT_CONFIG_FILE);
    if local.exists() {
        info!("Using {}", local.display());
        return SessionConfig::load(&local)
            .with_context(|| format!("Failed to load config {}", local.display()));
    }

    info!("No {} found; using defaults", DEFAULT_CONFIG_FILE);
    Ok(SessionConfig::default())
}

/// Write the default config to `path`, refusing to overwrite
pub fn write_default(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let content = toml::to_string_pretty(&SessionConfig::default())
        .context("Failed to serialize default config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve(None, dir.path()).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        write_default(&path).unwrap();

        let config = resolve(None, dir.path()).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert!(write_default(&path).is_err());
    }

    #[test]
    fn test_explicit_path_errors_carry_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[experiment]\ncorner = 9\n").unwrap();

        let err = resolve(Some(&path), dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
