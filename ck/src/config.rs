//! Configuration for cwkeyer

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where keyed output goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Draw the signal on the terminal
    #[default]
    Console,
    /// Report key transitions through the log
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Initial sending speed in words per minute
    #[serde(default = "default_wpm")]
    pub wpm: u32,

    /// Send queue capacity in events
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Key sink used by the command line
    #[serde(default)]
    pub sink: SinkKind,
}

fn default_wpm() -> u32 {
    crate::DEFAULT_WPM
}

fn default_queue_capacity() -> usize {
    crate::DEFAULT_QUEUE_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wpm: default_wpm(),
            queue_capacity: default_queue_capacity(),
            sink: SinkKind::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the first default location that exists
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_paths().into_iter().find(|p| p.exists()) {
                Some(found) => Self::read(&found),
                None => {
                    debug!("Config::load: no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Candidate config files, most preferred first
    pub fn default_paths() -> Vec<PathBuf> {
        let user = dirs::config_dir().map(|dir| dir.join("cwkeyer").join("config.yml"));
        user.into_iter().chain([PathBuf::from("cwkeyer.yml")]).collect()
    }

    fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Config::read: called");
        let content =
            std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).wrap_err_with(|| format!("Invalid config in {}", path.display()))
    }

    /// Write this config as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Config::save: called");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wpm, 18);
        assert_eq!(config.queue_capacity, 2048);
        assert_eq!(config.sink, SinkKind::Console);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "wpm: 25\nsink: log\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.wpm, 25);
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.queue_capacity, 2048);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let config = Config {
            wpm: 30,
            queue_capacity: 64,
            sink: SinkKind::Log,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.wpm, 30);
        assert_eq!(loaded.queue_capacity, 64);
        assert_eq!(loaded.sink, SinkKind::Log);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cwkeyer").join("config.yml");
        Config::default().save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.wpm, crate::DEFAULT_WPM);
    }

    #[test]
    fn test_default_paths_end_with_local_file() {
        let paths = Config::default_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from("cwkeyer.yml")));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "sink: speaker\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
