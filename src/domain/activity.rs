//! User-visible activity records.
//!
//! Activities are the only channel through which per-message outcomes reach
//! the user. Each user keeps a bounded, newest-first window of records; the
//! stores enforce the bound after every insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum activity records retained per user. Older entries are discarded,
/// not archived.
pub const ACTIVITY_WINDOW: usize = 50;

/// Severity classification of an activity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Progress and informational messages.
    Info,
    /// Recoverable conditions (no links found, empty search).
    Warning,
    /// Successful unsubscribes and run summaries.
    Success,
    /// Per-message failures.
    Error,
}

/// One entry in a user's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Severity of the record.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Human-readable description.
    pub message: String,
    /// When the record was emitted.
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    /// Optional structured payload (sender metadata, counts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Activity {
    /// Creates a record with the given kind, stamped now.
    pub fn new(kind: ActivityKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Info-level record.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ActivityKind::Info, message)
    }

    /// Warning-level record.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ActivityKind::Warning, message)
    }

    /// Success-level record.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ActivityKind::Success, message)
    }

    /// Error-level record.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ActivityKind::Error, message)
    }

    /// Attaches a structured payload to the record.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        assert_eq!(Activity::info("a").kind, ActivityKind::Info);
        assert_eq!(Activity::warning("b").kind, ActivityKind::Warning);
        assert_eq!(Activity::success("c").kind, ActivityKind::Success);
        assert_eq!(Activity::error("d").kind, ActivityKind::Error);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let activity = Activity::success("Unsubscribed from Shop");
        let json = serde_json::to_value(&activity).unwrap();

        assert_eq!(json["type"], "success");
        assert_eq!(json["message"], "Unsubscribed from Shop");
        assert!(json["time"].is_string());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn metadata_round_trips() {
        let activity = Activity::error("failed")
            .with_metadata(serde_json::json!({"message_id": "msg-3"}));

        let json = serde_json::to_string(&activity).unwrap();
        let back: Activity = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metadata.unwrap()["message_id"], "msg-3");
    }
}
