//! Error types for the parsing pipeline.
//!
//! These errors are internal to the interpretation layer: every public
//! parsing entry point recovers from them by degrading to a fallback value,
//! so nothing here ever reaches the orchestration controller as an error.
//! Stable codes and categories are kept for structured log output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Response Triage operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error categories for grouping related failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No JSON-shaped substring found in the response.
    Extraction,
    /// Substring was not valid JSON.
    Structure,
    /// Valid JSON that does not match the expected model.
    Schema,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Extraction => write!(f, "extraction"),
            ErrorCategory::Structure => write!(f, "structure"),
            ErrorCategory::Schema => write!(f, "schema"),
        }
    }
}

/// Failure modes of the response parsing pipeline.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    ExtractionMiss,

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema validation failed: {0}")]
    Schema(String),
}

impl ParseError {
    /// Returns the stable error code for this failure.
    ///
    /// Codes are grouped by category:
    /// - 10: extraction miss
    /// - 20: structural parse failure
    /// - 30: schema validation failure
    pub fn code(&self) -> u32 {
        match self {
            ParseError::ExtractionMiss => 10,
            ParseError::Json(_) => 20,
            ParseError::Schema(_) => 30,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::ExtractionMiss => ErrorCategory::Extraction,
            ParseError::Json(_) => ErrorCategory::Structure,
            ParseError::Schema(_) => ErrorCategory::Schema,
        }
    }

    /// Whether the failure is recovered by a fallback value.
    ///
    /// All parse failures are: the fallback path is total, and the caller
    /// may choose to re-query the model on a fallback decision.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
