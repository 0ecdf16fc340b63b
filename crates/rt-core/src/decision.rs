//! LLM decision parsing.
//!
//! Converts a model's natural-language-plus-JSON response into a validated
//! [`LlmDecision`]. The model regularly emits malformed, prose-wrapped, or
//! partially-empty JSON; every failure mode degrades into a terminal
//! "complete with error context" decision so the controller always receives
//! a well-formed value it can act on deterministically.

use rt_common::{ParseError, Phase, RunIds};
use rt_telemetry::{event_names, EventSink, LogEvent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::extract_json;
use crate::outcome::ParseOutcome;

/// The next action the controller should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Execute the next tool command.
    ExecuteTool,
    /// Pause the workflow and put a question to the user.
    AskUser,
    /// Request a workflow phase transition.
    TransitionPhase,
    /// The objective is finished (successfully or not).
    Complete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::ExecuteTool => write!(f, "execute_tool"),
            Action::AskUser => write!(f, "ask_user"),
            Action::TransitionPhase => write!(f, "transition_phase"),
            Action::Complete => write!(f, "complete"),
        }
    }
}

/// A question the model wants to put to the user.
///
/// All fields are required: a present-but-empty object is normalized to
/// absent before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserQuestion {
    pub question: String,
    pub context: String,
}

/// A requested workflow phase transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseTransition {
    pub target_phase: Phase,
    pub reason: String,
}

/// The structured outcome of asking the model what to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LlmDecision {
    pub thought: String,
    pub reasoning: String,
    pub action: Action,
    #[serde(default)]
    pub completion_reason: Option<String>,
    #[serde(default)]
    pub updated_todo_list: Vec<String>,
    #[serde(default)]
    pub user_question: Option<UserQuestion>,
    #[serde(default)]
    pub phase_transition: Option<PhaseTransition>,
}

impl LlmDecision {
    /// Terminal safety net for the parsing path: a completion decision
    /// carrying the unparseable response as its thought.
    pub fn parse_failure(raw: &str) -> Self {
        LlmDecision {
            thought: raw.to_string(),
            reasoning: "Failed to parse structured response".to_string(),
            action: Action::Complete,
            completion_reason: Some(
                "Unable to continue due to response parsing error".to_string(),
            ),
            updated_todo_list: Vec::new(),
            user_question: None,
            phase_transition: None,
        }
    }
}

/// True for values the model uses as "nothing here": null, empty object,
/// empty string, empty array.
fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Replace null-like nested objects with explicit nulls.
///
/// The schema requires all fields of a present nested object to be
/// populated, so `"user_question": {}` would fail validation even though
/// the model means "no question".
fn normalize_nested_objects(value: &mut Value) {
    if let Value::Object(map) = value {
        for key in ["user_question", "phase_transition"] {
            if map.get(key).is_some_and(is_null_like) {
                map.insert(key.to_string(), Value::Null);
            }
        }
    }
}

fn try_parse(raw: &str) -> Result<LlmDecision, ParseError> {
    let json = extract_json(raw).ok_or(ParseError::ExtractionMiss)?;
    let mut value: Value = serde_json::from_str(json)?;
    normalize_nested_objects(&mut value);
    serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))
}

/// Parse an LLM decision from a raw response.
///
/// Returns [`ParseOutcome::Valid`] on schema success, otherwise
/// [`ParseOutcome::TerminalFallback`] with a completion decision. The
/// fallback path never fails and is reported through `sink` at warn level.
pub fn parse_llm_decision(
    raw: &str,
    ids: &RunIds,
    sink: &dyn EventSink,
) -> ParseOutcome<LlmDecision> {
    match try_parse(raw) {
        Ok(decision) => ParseOutcome::Valid(decision),
        Err(err) => {
            sink.emit(
                LogEvent::warn(
                    event_names::DECISION_FALLBACK,
                    ids,
                    format!("Failed to parse LLM decision: {}", err),
                )
                .with_field("error_code", err.code())
                .with_field("error_category", err.category()),
            );
            ParseOutcome::TerminalFallback(LlmDecision::parse_failure(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_telemetry::CaptureSink;

    fn ids() -> RunIds {
        RunIds::new("u1", "p1", "s1")
    }

    fn valid_json() -> &'static str {
        r#"{
            "thought": "Credentials found",
            "reasoning": "ssh_login reported success",
            "action": "complete",
            "completion_reason": "Discovered root:toor",
            "updated_todo_list": ["report credentials"]
        }"#
    }

    #[test]
    fn test_valid_decision() {
        let sink = CaptureSink::new();
        let outcome = parse_llm_decision(valid_json(), &ids(), &sink);

        assert!(outcome.is_valid());
        let decision = outcome.into_inner();
        assert_eq!(decision.action, Action::Complete);
        assert_eq!(decision.updated_todo_list, vec!["report credentials"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_prose_wrapped_decision() {
        let sink = CaptureSink::new();
        let raw = format!("Sure, here is the plan:\n```json\n{}\n```", valid_json());
        let outcome = parse_llm_decision(&raw, &ids(), &sink);
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_empty_user_question_normalized_to_absent() {
        let sink = CaptureSink::new();
        let raw = r#"{
            "thought": "t",
            "reasoning": "r",
            "action": "execute_tool",
            "user_question": {},
            "phase_transition": null
        }"#;
        let outcome = parse_llm_decision(raw, &ids(), &sink);

        assert!(outcome.is_valid());
        let decision = outcome.into_inner();
        assert!(decision.user_question.is_none());
        assert!(decision.phase_transition.is_none());
    }

    #[test]
    fn test_empty_string_phase_transition_normalized() {
        let sink = CaptureSink::new();
        let raw = r#"{"thought":"t","reasoning":"r","action":"execute_tool","phase_transition":""}"#;
        let outcome = parse_llm_decision(raw, &ids(), &sink);
        assert!(outcome.is_valid());
        assert!(outcome.inner().phase_transition.is_none());
    }

    #[test]
    fn test_populated_nested_objects_survive() {
        let sink = CaptureSink::new();
        let raw = r#"{
            "thought": "t",
            "reasoning": "r",
            "action": "transition_phase",
            "phase_transition": {"target_phase": "post_exploitation", "reason": "session open"}
        }"#;
        let outcome = parse_llm_decision(raw, &ids(), &sink);

        assert!(outcome.is_valid());
        let transition = outcome.into_inner().phase_transition.unwrap();
        assert_eq!(transition.target_phase, Phase::PostExploitation);
        assert_eq!(transition.reason, "session open");
    }

    #[test]
    fn test_partially_populated_nested_object_falls_back() {
        let sink = CaptureSink::new();
        // question present but context missing: required-field failure
        let raw = r#"{
            "thought": "t",
            "reasoning": "r",
            "action": "ask_user",
            "user_question": {"question": "which host?"}
        }"#;
        let outcome = parse_llm_decision(raw, &ids(), &sink);

        assert!(outcome.is_fallback());
        assert_eq!(sink.events_named(event_names::DECISION_FALLBACK).len(), 1);
    }

    #[test]
    fn test_no_json_falls_back() {
        let sink = CaptureSink::new();
        let raw = "I am not sure what to do next.";
        let outcome = parse_llm_decision(raw, &ids(), &sink);

        assert!(matches!(outcome, ParseOutcome::TerminalFallback(_)));
        let decision = outcome.into_inner();
        assert_eq!(decision.action, Action::Complete);
        assert_eq!(decision.thought, raw);
        assert_eq!(decision.reasoning, "Failed to parse structured response");
        assert_eq!(
            decision.completion_reason.as_deref(),
            Some("Unable to continue due to response parsing error")
        );
        assert!(decision.updated_todo_list.is_empty());

        let events = sink.events_named(event_names::DECISION_FALLBACK);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].fields.get("error_code"),
            Some(&serde_json::json!(10))
        );
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let sink = CaptureSink::new();
        let outcome = parse_llm_decision("{not json at all", &ids(), &sink);
        // "{not json at all" has no closing brace: extraction miss
        assert!(outcome.is_fallback());

        let sink = CaptureSink::new();
        let outcome = parse_llm_decision("{\"thought\": }", &ids(), &sink);
        assert!(outcome.is_fallback());
        let events = sink.events_named(event_names::DECISION_FALLBACK);
        assert_eq!(
            events[0].fields.get("error_code"),
            Some(&serde_json::json!(20))
        );
    }

    #[test]
    fn test_schema_failure_falls_back() {
        let sink = CaptureSink::new();
        let outcome = parse_llm_decision(r#"{"thought": "only a thought"}"#, &ids(), &sink);
        assert!(outcome.is_fallback());
        let events = sink.events_named(event_names::DECISION_FALLBACK);
        assert_eq!(
            events[0].fields.get("error_code"),
            Some(&serde_json::json!(30))
        );
    }

    #[test]
    fn test_round_trip_matches_direct_validation() {
        let direct: LlmDecision = serde_json::from_str(valid_json()).unwrap();
        let sink = CaptureSink::new();
        let parsed = parse_llm_decision(valid_json(), &ids(), &sink).into_inner();
        assert_eq!(parsed, direct);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Complete.to_string(), "complete");
        assert_eq!(Action::TransitionPhase.to_string(), "transition_phase");
    }
}
