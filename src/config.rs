use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::challenge::ChallengeMode;
use crate::session::SessionConfig;

/// Preferences remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ChallengeMode,
    pub feedback_pause_ms: u64,
    pub finish_pause_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ChallengeMode::NumberOnly,
            feedback_pause_ms: 300,
            finish_pause_ms: 500,
        }
    }
}

impl Config {
    pub fn session_config(&self, mode: ChallengeMode, required_digit: Option<u8>) -> SessionConfig {
        SessionConfig {
            feedback_pause: Duration::from_millis(self.feedback_pause_ms),
            finish_pause: Duration::from_millis(self.finish_pause_ms),
            ..SessionConfig::new(mode, required_digit)
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("numdrill_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable config {}: {}", self.path.display(), err);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_jump_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            mode: ChallengeMode::NumberWithDirection,
            feedback_pause_ms: 0,
            finish_pause_ms: 100,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"jump\""));
    }

    #[test]
    fn missing_or_corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        std::fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, br#"{"mode":"jump"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.mode, ChallengeMode::NumberWithDirection);
        assert_eq!(cfg.feedback_pause_ms, 300);
    }

    #[test]
    fn session_config_uses_pauses() {
        let cfg = Config {
            feedback_pause_ms: 0,
            finish_pause_ms: 0,
            ..Config::default()
        };
        let session = cfg.session_config(ChallengeMode::NumberWithDirection, Some(4));
        assert!(session.feedback_pause.is_zero());
        assert_eq!(session.required_digit, Some(4));
        assert_eq!(session.mode, ChallengeMode::NumberWithDirection);
    }
}
