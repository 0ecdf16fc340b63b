//! Response Triage core: the resilient interpretation layer between an
//! unreliable free-text producer (a language model and the raw console
//! output of the tools it drives) and a strictly-typed orchestration state
//! machine.
//!
//! Two independent pipelines:
//!
//! - **Response parsing**: raw LLM text → [`extract::extract_json`] →
//!   [`decision::parse_llm_decision`] or [`analysis::parse_analysis_response`]
//!   → a tagged [`outcome::ParseOutcome`]. Malformed model output degrades
//!   into a safe fallback value; nothing on this path ever returns an error
//!   to the caller.
//! - **Output detection**: raw tool output → [`detect`] scanners →
//!   [`merge::merge_detections`] → a new [`rt_common::TargetInfo`] revision
//!   (copy-on-write) when, and only when, something actually changed.
//!
//! All operations are pure and synchronous apart from diagnostic events
//! emitted through the caller-supplied [`rt_telemetry::EventSink`]. Callers
//! may invoke them concurrently as long as each call gets its own snapshot
//! of the mutable inputs.

pub mod analysis;
pub mod decision;
pub mod detect;
pub mod extract;
pub mod merge;
pub mod outcome;

pub use analysis::{parse_analysis_response, ExtractedTargetInfo, OutputAnalysis};
pub use decision::{parse_llm_decision, Action, LlmDecision, PhaseTransition, UserQuestion};
pub use detect::{detect_credentials, detect_sessions, SessionDetection};
pub use extract::extract_json;
pub use merge::merge_detections;
pub use outcome::ParseOutcome;
