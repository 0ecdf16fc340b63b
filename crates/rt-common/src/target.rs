//! Target-state records.
//!
//! `TargetInfo` is owned by the orchestration controller and mutated only
//! through the rt-core state merger. Every change produces a new revision
//! (copy-on-write); the controller detects "did anything change" by value
//! comparison against the snapshot it passed in.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A discovered username/password pair plus the service it was valid
/// against.
///
/// Equality is full structural equality over all fields; the detection
/// engine de-duplicates by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Credential {
    pub username: String,
    pub password: String,
    /// Service endpoint as `<host>:<port>`.
    pub service: String,
    /// How the credential was discovered, e.g. `brute_force`.
    pub source: String,
}

impl Credential {
    /// Build a credential discovered by brute forcing `host:port`.
    pub fn brute_force(
        username: impl Into<String>,
        password: impl Into<String>,
        host: &str,
        port: &str,
    ) -> Self {
        Credential {
            username: username.into(),
            password: password.into(),
            service: format!("{}:{}", host, port),
            source: "brute_force".to_string(),
        }
    }
}

/// Accumulated knowledge about the current target.
///
/// Sessions are unique with first-appearance order preserved; credentials
/// are de-duplicated by full value equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetInfo {
    /// Interactive session IDs assigned by the external tool.
    #[serde(default)]
    pub sessions: Vec<i64>,

    /// Credentials discovered so far.
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

impl TargetInfo {
    /// New revision with a replaced session list. Does not mutate `self`.
    pub fn with_sessions(&self, sessions: Vec<i64>) -> Self {
        TargetInfo {
            sessions,
            credentials: self.credentials.clone(),
        }
    }

    /// New revision with a replaced credential list. Does not mutate `self`.
    pub fn with_credentials(&self, credentials: Vec<Credential>) -> Self {
        TargetInfo {
            sessions: self.sessions.clone(),
            credentials,
        }
    }
}
