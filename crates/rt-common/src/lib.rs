//! Response Triage common types, identifiers, and errors.
//!
//! This crate provides foundational types shared across rt-core modules:
//! - Caller-supplied correlation identifiers (opaque pass-through)
//! - Workflow phase and attack-path classifications
//! - The target-state record mutated only through the rt-core merger
//! - Common error types for the parsing pipeline

pub mod error;
pub mod id;
pub mod phase;
pub mod target;

pub use error::{ErrorCategory, ParseError, Result};
pub use id::{generate_session_id, RunIds};
pub use phase::{
    classify_attack_path, determine_phase_for_new_objective, AttackPathKind, Phase,
    PostExploitMode,
};
pub use target::{Credential, TargetInfo};
