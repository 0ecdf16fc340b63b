//! Workflow phase and attack-path classifications.
//!
//! These gate whether detector results are allowed to modify target state,
//! and classify a free-text objective into the attack path the controller
//! should drive.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Execution phase of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Reconnaissance,
    Exploitation,
    PostExploitation,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Reconnaissance => write!(f, "reconnaissance"),
            Phase::Exploitation => write!(f, "exploitation"),
            Phase::PostExploitation => write!(f, "post_exploitation"),
        }
    }
}

/// Classification of the attack path for the current objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttackPathKind {
    CveExploit,
    BruteForceCredentialGuess,
}

impl std::fmt::Display for AttackPathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackPathKind::CveExploit => write!(f, "cve_exploit"),
            AttackPathKind::BruteForceCredentialGuess => {
                write!(f, "brute_force_credential_guess")
            }
        }
    }
}

/// Whether the exploitation path is expected to yield an interactive
/// session (stateful) or only one-shot results (stateless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostExploitMode {
    // "statefull" is accepted for compatibility with state written by the
    // original controller.
    #[serde(alias = "statefull")]
    Stateful,
    Stateless,
}

impl std::fmt::Display for PostExploitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostExploitMode::Stateful => write!(f, "stateful"),
            PostExploitMode::Stateless => write!(f, "stateless"),
        }
    }
}

/// Keywords that mark an objective as credential guessing rather than
/// CVE-driven exploitation.
const BRUTE_FORCE_MARKERS: &[&str] = &[
    "brute force",
    "brute-force",
    "bruteforce",
    "credential guess",
    "password guess",
    "password spray",
    "dictionary attack",
    "wordlist",
    "_login",
];

/// Classify a free-text objective into an attack path.
///
/// Matching is lowercase substring search over a fixed marker list;
/// anything that does not read as credential guessing defaults to
/// `CveExploit`.
pub fn classify_attack_path(objective: &str) -> AttackPathKind {
    let lower = objective.to_lowercase();
    if BRUTE_FORCE_MARKERS.iter().any(|m| lower.contains(m)) {
        AttackPathKind::BruteForceCredentialGuess
    } else {
        AttackPathKind::CveExploit
    }
}

/// Determine the starting phase for a newly classified objective.
///
/// Brute-force objectives skip reconnaissance and start directly in
/// exploitation; CVE objectives start with reconnaissance.
pub fn determine_phase_for_new_objective(objective: &str) -> Phase {
    match classify_attack_path(objective) {
        AttackPathKind::BruteForceCredentialGuess => Phase::Exploitation,
        AttackPathKind::CveExploit => Phase::Reconnaissance,
    }
}
