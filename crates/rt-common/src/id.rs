//! Caller-supplied correlation identifiers.
//!
//! The interpretation layer does not interpret these values; they tag every
//! structured log event so the controller can correlate detections and
//! fallbacks with the run that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifiers supplied by the orchestration controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIds {
    /// Identifies the user on whose behalf the workflow runs.
    pub user_id: String,
    /// Identifies the project the workflow belongs to.
    pub project_id: String,
    /// Identifies the orchestration session (not a target session).
    pub session_id: String,
}

impl RunIds {
    /// Create a new identifier set.
    pub fn new(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        RunIds {
            user_id: user_id.into(),
            project_id: project_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Create an identifier set with a freshly generated session id.
    pub fn with_generated_session(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self::new(user_id, project_id, generate_session_id())
    }
}

impl fmt::Display for RunIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.project_id, self.session_id)
    }
}

/// Generate a unique orchestration session id.
pub fn generate_session_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // Shorten to first 12 hex chars for readability
    format!("sess-{}", &uuid.to_string()[..12])
}
