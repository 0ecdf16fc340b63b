//! Gated merging of detections into target state.
//!
//! The merger never mutates the record it is given: every change produces a
//! new revision, so the controller compares new vs. old by value to decide
//! whether anything happened.

use rt_common::{AttackPathKind, Phase, PostExploitMode, RunIds, TargetInfo};
use rt_telemetry::EventSink;

use crate::detect::{detect_credentials, detect_sessions};

/// Apply detector results to a target record under phase/attack-type
/// gating.
///
/// - The session detector runs only when the post-exploitation mode is
///   stateful and the phase is exploitation.
/// - The credential detector runs only for brute-force credential-guess
///   attack paths in the exploitation phase.
///
/// The gates are independent; both may fire on one call. When neither
/// fires, or the detectors report nothing new, the returned record is
/// equal by value to `target`.
pub fn merge_detections(
    target: &TargetInfo,
    tool_output: &str,
    phase: Phase,
    attack_path: AttackPathKind,
    post_mode: PostExploitMode,
    ids: &RunIds,
    sink: &dyn EventSink,
) -> TargetInfo {
    let mut merged = target.clone();

    if post_mode == PostExploitMode::Stateful && phase == Phase::Exploitation {
        let detection = detect_sessions(tool_output, &merged.sessions, ids, sink);
        if detection.sessions != merged.sessions {
            merged = merged.with_sessions(detection.sessions);
        }
    }

    if attack_path == AttackPathKind::BruteForceCredentialGuess && phase == Phase::Exploitation {
        let credentials = detect_credentials(tool_output, &merged.credentials, ids, sink);
        if credentials != merged.credentials {
            merged = merged.with_credentials(credentials);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_telemetry::CaptureSink;

    fn ids() -> RunIds {
        RunIds::new("u1", "p1", "s1")
    }

    const COMBINED_OUTPUT: &str = "\
        [+] 10.0.0.5:22 - Success: 'root:toor'\n\
        [*] Meterpreter session 3 opened (10.0.0.1:4444 -> 10.0.0.5:50123)";

    #[test]
    fn test_both_gates_fire() {
        let sink = CaptureSink::new();
        let target = TargetInfo::default();
        let merged = merge_detections(
            &target,
            COMBINED_OUTPUT,
            Phase::Exploitation,
            AttackPathKind::BruteForceCredentialGuess,
            PostExploitMode::Stateful,
            &ids(),
            &sink,
        );

        assert_eq!(merged.sessions, vec![3]);
        assert_eq!(merged.credentials.len(), 1);
        // Original snapshot is untouched
        assert!(target.sessions.is_empty());
        assert!(target.credentials.is_empty());
    }

    #[test]
    fn test_stateless_mode_blocks_sessions_but_not_credentials() {
        let sink = CaptureSink::new();
        let merged = merge_detections(
            &TargetInfo::default(),
            COMBINED_OUTPUT,
            Phase::Exploitation,
            AttackPathKind::BruteForceCredentialGuess,
            PostExploitMode::Stateless,
            &ids(),
            &sink,
        );

        assert!(merged.sessions.is_empty());
        assert_eq!(merged.credentials.len(), 1);
    }

    #[test]
    fn test_cve_path_blocks_credentials_but_not_sessions() {
        let sink = CaptureSink::new();
        let merged = merge_detections(
            &TargetInfo::default(),
            COMBINED_OUTPUT,
            Phase::Exploitation,
            AttackPathKind::CveExploit,
            PostExploitMode::Stateful,
            &ids(),
            &sink,
        );

        assert_eq!(merged.sessions, vec![3]);
        assert!(merged.credentials.is_empty());
    }

    #[test]
    fn test_wrong_phase_blocks_everything() {
        let sink = CaptureSink::new();
        let target = TargetInfo::default();
        let merged = merge_detections(
            &target,
            COMBINED_OUTPUT,
            Phase::PostExploitation,
            AttackPathKind::BruteForceCredentialGuess,
            PostExploitMode::Stateful,
            &ids(),
            &sink,
        );

        assert_eq!(merged, target);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_no_match_returns_equal_record() {
        let sink = CaptureSink::new();
        let target = TargetInfo {
            sessions: vec![1],
            credentials: vec![],
        };
        let merged = merge_detections(
            &target,
            "[*] Scanned 1 of 1 hosts (100% complete)",
            Phase::Exploitation,
            AttackPathKind::BruteForceCredentialGuess,
            PostExploitMode::Stateful,
            &ids(),
            &sink,
        );

        assert_eq!(merged, target);
    }
}
