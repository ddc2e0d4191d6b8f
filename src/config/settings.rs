//! Application settings types.
//!
//! Settings are persisted to `~/.config/mailsweep/settings.json` (or the
//! XDG equivalent) and loaded at startup; every section defaults sensibly
//! when the file is absent.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::{DEFAULT_PROCESSED_LABEL, DEFAULT_SEARCH_QUERY};

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mailbox search configuration.
    pub search: SearchSettings,
    /// Batch run behavior.
    pub batch: BatchSettings,
    /// Persistence configuration.
    pub storage: StorageSettings,
}

/// Mailbox search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Free-text query identifying subscription email.
    pub query: String,
    /// Maximum messages per batch run.
    pub max_results: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            query: DEFAULT_SEARCH_QUERY.to_string(),
            max_results: 50,
        }
    }
}

/// Batch run behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Seconds to pause after each processed message.
    pub message_delay_secs: u64,
    /// Per-request timeout for unsubscribe attempts, in seconds.
    pub request_timeout_secs: u64,
    /// Mailbox label applied to processed messages.
    pub processed_label: String,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            message_delay_secs: 2,
            request_timeout_secs: 10,
            processed_label: DEFAULT_PROCESSED_LABEL.to_string(),
        }
    }
}

impl BatchSettings {
    /// Inter-message delay as a [`Duration`].
    pub fn message_delay(&self) -> Duration {
        Duration::from_secs(self.message_delay_secs)
    }

    /// Unsubscribe request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file path. When unset, the platform data directory is
    /// used.
    pub database_path: Option<PathBuf>,
}

impl StorageSettings {
    /// Resolves the database path, defaulting to the platform data dir.
    pub fn resolved_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        directories::ProjectDirs::from("", "", "mailsweep")
            .map(|dirs| dirs.data_dir().join("mailsweep.db"))
            .unwrap_or_else(|| PathBuf::from("mailsweep.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_constants() {
        let settings = Settings::default();
        assert_eq!(settings.search.max_results, 50);
        assert!(settings.search.query.contains("unsubscribe"));
        assert_eq!(settings.batch.message_delay(), Duration::from_secs(2));
        assert_eq!(settings.batch.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.batch.processed_label, "UNSUBSCRIBED");
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"search": {"max_results": 10}}"#).unwrap();
        assert_eq!(settings.search.max_results, 10);
        assert!(settings.search.query.contains("unsubscribe"));
        assert_eq!(settings.batch.message_delay_secs, 2);
    }

    #[test]
    fn explicit_database_path_wins() {
        let storage = StorageSettings {
            database_path: Some(PathBuf::from("/tmp/custom.db")),
        };
        assert_eq!(
            storage.resolved_database_path(),
            PathBuf::from("/tmp/custom.db")
        );
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.search.query, settings.search.query);
    }
}
