// Settings live next to the sounds: <asset_dir>/.drumpad/settings.json
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::AudioMode;

const DRUMPAD_DIR: &str = ".drumpad";
const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "drumpad.log";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio_mode: AudioMode,
    pub frame_ms: u64, // UI tick
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_mode: AudioMode::default(),
            frame_ms: 16, // ~60fps
        }
    }
}

impl Settings {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

pub fn state_dir(asset_dir: &Path) -> PathBuf {
    asset_dir.join(DRUMPAD_DIR)
}

pub fn default_log_path(asset_dir: &Path) -> PathBuf {
    state_dir(asset_dir).join(LOG_FILE)
}

fn settings_path(asset_dir: &Path) -> PathBuf {
    state_dir(asset_dir).join(SETTINGS_FILE)
}

pub fn has_settings(asset_dir: &Path) -> bool {
    settings_path(asset_dir).exists()
}

// None when the file is missing or doesn't parse; callers fall back to defaults
pub fn load_settings(asset_dir: &Path) -> Option<Settings> {
    let data = std::fs::read_to_string(settings_path(asset_dir)).ok()?;
    serde_json::from_str(&data).ok()
}

// Save the settings, making .drumpad/ if it doesn't exist already
pub fn save_settings(asset_dir: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let path = settings_path(asset_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(dir.path()).is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { frame_ms: 33, ..Settings::default() };
        assert!(!has_settings(dir.path()));
        save_settings(dir.path(), &settings).unwrap();
        assert!(has_settings(dir.path()));
        assert_eq!(load_settings(dir.path()), Some(settings));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(state_dir(dir.path())).unwrap();
        std::fs::write(settings_path(dir.path()), r#"{ "audio_mode": { "ducks_others": false } }"#).unwrap();

        let settings = load_settings(dir.path()).unwrap();
        assert!(!settings.audio_mode.ducks_others);
        assert!(settings.audio_mode.plays_in_silent_mode);
        assert_eq!(settings.frame_ms, 16);
    }

    #[test]
    fn garbage_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(state_dir(dir.path())).unwrap();
        std::fs::write(settings_path(dir.path()), "{ nope").unwrap();
        assert!(load_settings(dir.path()).is_none());
    }

    #[test]
    fn frame_is_never_zero() {
        let settings = Settings { frame_ms: 0, ..Settings::default() };
        assert_eq!(settings.frame(), Duration::from_millis(1));
    }
}
