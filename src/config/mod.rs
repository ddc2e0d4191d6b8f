//! Configuration and settings management.
//!
//! Provides the settings types and their JSON persistence in the user's
//! config directory.

mod settings;

use std::path::PathBuf;

pub use settings::{BatchSettings, SearchSettings, Settings, StorageSettings};

/// Resolves the settings file path in the platform config directory.
pub fn settings_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "mailsweep")
        .map(|dirs| dirs.config_dir().join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

/// Loads settings from disk, falling back to defaults when the file is
/// missing or unreadable.
pub fn load() -> Settings {
    let path = settings_path();

    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Saves settings to disk, creating the config directory if needed.
pub fn save(settings: &Settings) -> std::io::Result<()> {
    let path = settings_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, json)
}
