//! Tool-output analysis parsing.
//!
//! Converts the model's interpretation of raw tool output into a validated
//! [`OutputAnalysis`]. Analysis failures must preserve as much signal as
//! possible, so this parser has two independent fallback layers on top of
//! the valid path: a structural fallback that salvages fields from the
//! parsed JSON, and a text-cleanup fallback that uses the fence-stripped
//! raw text as the interpretation.

use regex::Regex;
use rt_common::{ParseError, RunIds};
use rt_telemetry::{event_names, EventSink, LogEvent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::extract::extract_json;
use crate::outcome::ParseOutcome;

/// Structured facts the model extracted from tool output.
///
/// Structural correctness only: nothing here is validated against the
/// actual target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedTargetInfo {
    /// Session IDs. The model may emit descriptive strings instead of
    /// integers; those are coerced before validation.
    #[serde(default)]
    pub sessions: Vec<i64>,

    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub services: Vec<String>,

    #[serde(default)]
    pub vulnerabilities: Vec<String>,

    #[serde(default)]
    pub credentials: Vec<String>,
}

/// The structured outcome of asking the model to interpret tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputAnalysis {
    pub interpretation: String,
    #[serde(default)]
    pub extracted_info: ExtractedTargetInfo,
    #[serde(default)]
    pub actionable_findings: Vec<String>,
    #[serde(default)]
    pub recommended_next_steps: Vec<String>,
}

fn session_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[Ss]ession\s+(\d+)").expect("valid regex"))
}

/// Coerce a single session entry to an integer.
///
/// Integers pass through; strings are first scanned for an integer
/// following the token "session" ("Meterpreter session 7 opened..." → 7),
/// then parsed whole ("12" → 12). Anything else is dropped.
fn coerce_session_entry(entry: &Value) -> Option<i64> {
    match entry {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            if let Some(caps) = session_ref_regex().captures(s) {
                caps[1].parse().ok()
            } else {
                s.trim().parse().ok()
            }
        }
        _ => None,
    }
}

/// Rewrite `extracted_info.sessions` in place to a list of integers.
///
/// One bad entry never aborts the parse; it is dropped silently.
fn coerce_sessions(value: &mut Value) {
    let Some(sessions) = value
        .get_mut("extracted_info")
        .and_then(|info| info.get_mut("sessions"))
    else {
        return;
    };
    if let Value::Array(entries) = sessions {
        let coerced: Vec<Value> = entries
            .iter()
            .filter_map(coerce_session_entry)
            .map(Value::from)
            .collect();
        *sessions = Value::Array(coerced);
    }
}

/// A string list salvaged from an untyped JSON value: list-typed fields
/// keep their string elements (other elements are rendered compactly),
/// anything else becomes empty.
fn salvage_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Structural fallback: pull fields straight from the parsed JSON without
/// schema validation.
fn structural_fallback(raw: &str, value: &Value) -> OutputAnalysis {
    let interpretation = match value.get("interpretation") {
        Some(Value::String(s)) => s.clone(),
        _ => raw.to_string(),
    };
    OutputAnalysis {
        interpretation,
        extracted_info: ExtractedTargetInfo::default(),
        actionable_findings: salvage_string_list(value.get("actionable_findings")),
        recommended_next_steps: salvage_string_list(value.get("recommended_next_steps")),
    }
}

fn leading_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```(?:json)?\s*").expect("valid regex"))
}

fn trailing_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```$").expect("valid regex"))
}

/// Text-cleanup fallback: strip one leading and one trailing markdown code
/// fence and use the trimmed remainder as the interpretation.
fn text_cleanup_fallback(raw: &str) -> OutputAnalysis {
    let without_leading = leading_fence_regex().replace(raw, "");
    let without_fences = trailing_fence_regex().replace(&without_leading, "");
    OutputAnalysis {
        interpretation: without_fences.trim().to_string(),
        extracted_info: ExtractedTargetInfo::default(),
        actionable_findings: Vec::new(),
        recommended_next_steps: Vec::new(),
    }
}

fn extract_and_parse(raw: &str) -> Result<Value, ParseError> {
    let json = extract_json(raw).ok_or(ParseError::ExtractionMiss)?;
    Ok(serde_json::from_str(json)?)
}

/// Parse an analysis response from a raw model reply.
///
/// Returns [`ParseOutcome::Valid`] on schema success,
/// [`ParseOutcome::StructuralFallback`] when JSON parsed but validation
/// failed, and [`ParseOutcome::TerminalFallback`] when no JSON could be
/// extracted or parsed at all. Both fallback layers are reported through
/// `sink` at warn level and never fail.
pub fn parse_analysis_response(
    raw: &str,
    ids: &RunIds,
    sink: &dyn EventSink,
) -> ParseOutcome<OutputAnalysis> {
    let mut value = match extract_and_parse(raw) {
        Ok(value) => value,
        Err(err) => {
            sink.emit(
                LogEvent::warn(
                    event_names::ANALYSIS_TEXT_FALLBACK,
                    ids,
                    format!("Failed to parse analysis response: {}", err),
                )
                .with_field("error_code", err.code())
                .with_field("error_category", err.category()),
            );
            return ParseOutcome::TerminalFallback(text_cleanup_fallback(raw));
        }
    };

    coerce_sessions(&mut value);

    match serde_json::from_value::<OutputAnalysis>(value.clone()) {
        Ok(analysis) => ParseOutcome::Valid(analysis),
        Err(err) => {
            let err = ParseError::Schema(err.to_string());
            sink.emit(
                LogEvent::warn(
                    event_names::ANALYSIS_STRUCTURAL_FALLBACK,
                    ids,
                    format!("Failed to parse analysis response: {}", err),
                )
                .with_field("error_code", err.code())
                .with_field("error_category", err.category()),
            );
            ParseOutcome::StructuralFallback(structural_fallback(raw, &value))
        }
    }
}
