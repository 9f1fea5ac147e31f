//! End-to-end pipeline test: a clean session and a suspicious session run
//! through the engine side by side, with decisions traced and the final
//! outcomes folded into the trend history.

use chrono::{DateTime, TimeZone, Utc};

use proctor_core::types::{
    AttackType, BehavioralMetrics, CodeEventKind, Move, PauseMetrics, ProbeStrategy, SessionId,
    SessionOutcome, SignalProgress, SignalState, SpeechMetrics,
};
use proctor_detect::suspicion::SuspicionAction;
use proctor_detect::MonitorEngine;
use proctor_trace::audit::AuditTrace;
use proctor_trace::trend::TrendTracker;

fn ts(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap()
}

#[test]
fn suspicious_and_clean_sessions_diverge() {
    let engine = MonitorEngine::new();
    let audit = AuditTrace::new();

    let clean = SessionId::new("clean");
    let cheat = SessionId::new("cheat");

    // The clean candidate types incrementally with human-irregular gaps.
    let clean_edits = [
        ("fn main() {", 0),
        ("fn main() {\n    let x = 1;", 7_400),
        ("fn main() {\n    let x = 1;\n    let y = x + 2;", 16_900),
        ("fn main() {\n    let x = 1;\n    let y = x + 2;\n    println!(\"{y}\");", 31_200),
    ];
    let mut clean_score = 0.0;
    for (code, at) in clean_edits {
        clean_score = engine
            .analyze_at(&clean, code, CodeEventKind::Snapshot, ts(at))
            .unwrap();
    }

    // The cheating candidate pastes large blocks at machine-regular
    // intervals and blurs the window twice.
    engine.record_integrity_violation(&cheat).unwrap();
    engine.record_integrity_violation(&cheat).unwrap();
    let mut cheat_score = 0.0;
    for (i, at) in [(1, 0), (2, 50), (3, 100), (4, 150)] {
        let code = "x".repeat(i * 100);
        cheat_score = engine
            .analyze_at(&cheat, &code, CodeEventKind::Snapshot, ts(at))
            .unwrap();
    }

    assert_eq!(engine.action_for(clean_score), SuspicionAction::None);
    // Every pair is a paste, gaps have zero variance, plus two violations:
    // 0.35 + 0.25 + 0.30·0.4 = 0.72 → deep probe.
    assert!((cheat_score - 0.72).abs() < 1e-9);
    assert_eq!(engine.action_for(cheat_score), SuspicionAction::DeepProbe);

    audit.log(&cheat, vec!["paste_pattern".into()], "deep_probe", cheat_score);

    // Reports stay stable across reads.
    let report = engine.session_report(&cheat).unwrap();
    assert_eq!(report.event_count, 4);
    assert_eq!(report.suspicion_score, cheat_score);
    assert_eq!(
        engine.session_report(&cheat).unwrap().suspicion_score,
        cheat_score
    );

    assert_eq!(audit.history(&cheat).len(), 1);
    assert!(audit.history(&clean).is_empty());
}

#[test]
fn side_channels_and_move_planning_compose() {
    let engine = MonitorEngine::new();
    let session = SessionId::new("s-77");

    // Proxy-coding behavioral profile: long silent gaps, near-zero churn.
    let metrics = BehavioralMetrics {
        typing_speed: 0.7,
        pause_frequency: 0.4,
        code_churn: 0.01,
        pause_metrics: PauseMetrics { long_pauses: 3 },
    };
    let attack = engine.detect_attack(&session, &metrics).unwrap().unwrap();
    assert_eq!(attack.attack_type, AttackType::ProxyCoding);

    // The advisory channel leaves the suspicion pipeline untouched.
    let report = engine.session_report(&session).unwrap();
    assert_eq!(report.suspicion_score, 0.0);

    // Speech has gone quiet past the threshold.
    let speech = SpeechMetrics {
        silence_ms: 13_000,
        time_spoken_secs: 0.0,
        mece_detected: false,
        signal_progress: SignalProgress::None,
    };
    let decision = engine.evaluate_interruption(&speech);
    assert!(decision.should_interrupt);

    // A confirmed signal escalates under a constraint frame.
    let next = engine.determine_move(SignalState::Confirmed);
    assert_eq!(next, Move::Escalate);
    assert_eq!(engine.strategy_hint(next), ProbeStrategy::Constraint);
}

#[test]
fn completed_sessions_roll_into_the_trend() {
    let trend = TrendTracker::new();

    trend.track_session(
        &SessionOutcome {
            loss_score: 0.8,
            metrics_used: false,
            ownership_observed: true,
        },
        "Initech",
    );
    trend.track_session(
        &SessionOutcome {
            loss_score: 0.3,
            metrics_used: true,
            ownership_observed: true,
        },
        "Initech",
    );

    assert!((trend.velocity() - 0.5).abs() < 1e-9);
    assert!(trend.master_verdict().starts_with("Exceptional"));
}
