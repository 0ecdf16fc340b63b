//! Structured event definitions for logging.
//!
//! Events follow a consistent schema for machine-parseable output. Every
//! event carries the caller-supplied correlation identifiers
//! (user/project/session) as opaque pass-through values.

use chrono::{DateTime, Utc};
use rt_common::RunIds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Debug => write!(f, "debug"),
            Level::Info => write!(f, "info"),
            Level::Warn => write!(f, "warn"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// Standard event names used by the interpretation layer.
pub mod event_names {
    // Parsing fallbacks
    pub const DECISION_FALLBACK: &str = "parse.decision_fallback";
    pub const ANALYSIS_STRUCTURAL_FALLBACK: &str = "parse.analysis_structural_fallback";
    pub const ANALYSIS_TEXT_FALLBACK: &str = "parse.analysis_text_fallback";

    // Detections
    pub const SESSION_DETECTED: &str = "detect.session_opened";
    pub const STAGE_TRANSFER_DETECTED: &str = "detect.stage_transfer";
    pub const CREDENTIAL_DETECTED: &str = "detect.credential";
}

/// A structured log event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// Log level.
    pub level: Level,

    /// Event name (e.g., "detect.session_opened").
    pub event: String,

    /// Caller-supplied user identifier.
    pub user_id: String,

    /// Caller-supplied project identifier.
    pub project_id: String,

    /// Caller-supplied orchestration session identifier.
    pub session_id: String,

    /// Human-readable message.
    pub message: String,

    /// Additional structured fields (stable keys).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogEvent {
    /// Create a new log event with required fields.
    pub fn new(
        level: Level,
        event: impl Into<String>,
        ids: &RunIds,
        message: impl Into<String>,
    ) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            user_id: ids.user_id.clone(),
            project_id: ids.project_id.clone(),
            session_id: ids.session_id.clone(),
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Shortcut for an info-level event.
    pub fn info(event: impl Into<String>, ids: &RunIds, message: impl Into<String>) -> Self {
        Self::new(Level::Info, event, ids, message)
    }

    /// Shortcut for a warn-level event.
    pub fn warn(event: impl Into<String>, ids: &RunIds, message: impl Into<String>) -> Self {
        Self::new(Level::Warn, event, ids, message)
    }

    /// Add a structured field to the event.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> RunIds {
        RunIds::new("user-1", "proj-9", "sess-abc123def456")
    }

    #[test]
    fn test_log_event_serialization() {
        let event = LogEvent::info(
            event_names::SESSION_DETECTED,
            &ids(),
            "Detected session 3 from exploit output",
        )
        .with_field("session", 3);

        let json = event.to_jsonl();
        assert!(json.contains(r#""event":"detect.session_opened""#));
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""user_id":"user-1""#));
        assert!(json.contains(r#""project_id":"proj-9""#));
        assert!(json.contains(r#""session_id":"sess-abc123def456""#));
        assert!(json.contains(r#""session":3"#));
    }

    #[test]
    fn test_warn_shortcut() {
        let event = LogEvent::warn(event_names::DECISION_FALLBACK, &ids(), "parse failed");
        assert_eq!(event.level, Level::Warn);
        assert_eq!(event.event, event_names::DECISION_FALLBACK);
    }

    #[test]
    fn test_empty_fields_not_serialized() {
        let event = LogEvent::info("x", &ids(), "y");
        assert!(!event.to_jsonl().contains("fields"));
    }
}
