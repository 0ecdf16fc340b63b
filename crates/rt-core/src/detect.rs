//! Pattern scanners over raw tool output.
//!
//! Two independent, stateless detectors: session establishment and
//! credential-guessing success. Both are no-ops on empty input and report
//! what they saw through the caller-supplied sink; a non-match is a normal
//! outcome, never an error.

use regex::Regex;
use rt_common::{Credential, RunIds};
use rt_telemetry::{event_names, EventSink, LogEvent};
use std::sync::OnceLock;

/// Result of scanning tool output for session establishment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetection {
    /// Session list, with any newly detected ID appended.
    pub sessions: Vec<i64>,
    /// Whether a stage transfer was seen (a session is imminent but not
    /// yet confirmed). Only set when no session match was found.
    pub stage_transfer: bool,
}

fn session_opened_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:session|Session)\s+(\d+)\s+opened").expect("valid regex"))
}

fn credential_success_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern: [+] 10.0.0.5:22 - Success: 'root:toor'
    // Straight, curly, and typewriter quotes are all accepted.
    RE.get_or_init(|| {
        Regex::new(r#"\[\+\]\s+(\S+):(\d+)\s+-\s+Success:\s+['"‘’“”](\w+):(\S+)['"‘’“”]"#)
            .expect("valid regex")
    })
}

/// Scan tool output for session establishment.
///
/// Looks for "session <N> opened"; a newly seen ID is appended to a copy
/// of `current` (first-appearance order preserved). When no session
/// pattern matches at all, the literal phrase "sending stage" sets the
/// stage-transfer flag instead; the two signals are mutually exclusive
/// within one call, with the session match taking priority.
pub fn detect_sessions(
    tool_output: &str,
    current: &[i64],
    ids: &RunIds,
    sink: &dyn EventSink,
) -> SessionDetection {
    let mut detection = SessionDetection {
        sessions: current.to_vec(),
        stage_transfer: false,
    };
    if tool_output.is_empty() {
        return detection;
    }

    if let Some(caps) = session_opened_regex().captures(tool_output) {
        if let Ok(session) = caps[1].parse::<i64>() {
            if !detection.sessions.contains(&session) {
                detection.sessions.push(session);
                sink.emit(
                    LogEvent::info(
                        event_names::SESSION_DETECTED,
                        ids,
                        format!("Detected session {} from exploit output", session),
                    )
                    .with_field("session", session),
                );
            }
        }
    } else if tool_output.to_lowercase().contains("sending stage") {
        detection.stage_transfer = true;
        sink.emit(LogEvent::info(
            event_names::STAGE_TRANSFER_DETECTED,
            ids,
            "Stage transfer detected - a session may be imminent",
        ));
    }

    detection
}

/// Scan tool output for brute-force credential successes.
///
/// Every `[+] <host>:<port> - Success: '<user>:<pass>'` line yields a
/// [`Credential`]; a copy of `current` is returned with each new record
/// appended unless an identical record (full field equality) is already
/// present. First-appearance order is preserved.
pub fn detect_credentials(
    tool_output: &str,
    current: &[Credential],
    ids: &RunIds,
    sink: &dyn EventSink,
) -> Vec<Credential> {
    let mut credentials = current.to_vec();
    if tool_output.is_empty() {
        return credentials;
    }

    for caps in credential_success_regex().captures_iter(tool_output) {
        let credential = Credential::brute_force(&caps[3], &caps[4], &caps[1], &caps[2]);
        if !credentials.contains(&credential) {
            sink.emit(
                LogEvent::info(
                    event_names::CREDENTIAL_DETECTED,
                    ids,
                    format!("Detected credential: {}@{}", credential.username, credential.service),
                )
                .with_field("username", &credential.username)
                .with_field("service", &credential.service),
            );
            credentials.push(credential);
        }
    }

    credentials
}
