//! proctor-detect: Real-time detection pipeline for live interview sessions.
//!
//! Fuses independent heuristic detectors — paste/typing-pattern analysis,
//! adversarial automation detection, near-duplicate solution detection,
//! speech-interruption rules, and a signal-state move planner — behind one
//! engine facade. Every detector is synchronous, total over its inputs, and
//! emits its verdict as a structured tracing event alongside the return
//! value.

pub mod adversarial;
pub mod duplicate;
pub mod error;
pub mod interrupt;
pub mod moves;
pub mod store;
pub mod suspicion;

pub use error::DetectError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use proctor_core::config::MonitorConfig;
use proctor_core::types::{
    AdversarialAttack, BehavioralMetrics, CodeEventKind, Move, ProbeStrategy, SessionId,
    SignalState, SpeechMetrics, SuspicionIndicators,
};

use crate::duplicate::{DuplicateVerdict, FingerprintCatalog};
use crate::interrupt::InterruptDecision;
use crate::store::EventStore;
use crate::suspicion::SuspicionAction;

/// Read-only per-session report: current window size, the suspicion score
/// it implies, and the underlying indicators (absent when the session has
/// no retained events).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub event_count: usize,
    pub suspicion_score: f64,
    pub indicators: Option<SuspicionIndicators>,
}

/// The main detection engine.
///
/// Owns the per-session event store and the detector configuration.
/// Constructed explicitly and shared by handle; there is no global state.
pub struct MonitorEngine {
    store: EventStore,
    config: MonitorConfig,
    catalog: FingerprintCatalog,
}

impl Default for MonitorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorEngine {
    /// Create an engine with the stock configuration and shipped catalog.
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: MonitorConfig) -> Self {
        Self {
            store: EventStore::new(config.suspicion.retention_ms),
            config,
            catalog: FingerprintCatalog::default(),
        }
    }

    /// Replace the boilerplate fingerprint catalog.
    pub fn with_catalog(mut self, catalog: FingerprintCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ── Suspicion pipeline ────────────────────────────────────────

    /// Record a code event at the current instant and return the session's
    /// suspicion score over the surviving window.
    pub fn analyze(&self, session: &SessionId, code: &str) -> error::Result<f64> {
        self.analyze_at(session, code, CodeEventKind::Snapshot, Utc::now())
    }

    /// Record a code event with an explicit timestamp (replay path) and
    /// return the suspicion score.
    pub fn analyze_at(
        &self,
        session: &SessionId,
        code: &str,
        kind: CodeEventKind,
        timestamp: DateTime<Utc>,
    ) -> error::Result<f64> {
        validate_session(session)?;

        let window = self
            .store
            .append(session, code.to_string(), kind, timestamp);
        let indicators = suspicion::compute_indicators(
            &window.events,
            window.integrity_violations,
            &self.config.suspicion,
        );
        let score = suspicion::weighted_score(&indicators, &self.config.suspicion);

        tracing::debug!(
            session_id = %session,
            score,
            paste_ratio = indicators.paste_ratio,
            typing_entropy = indicators.typing_entropy,
            solution_jump = indicators.solution_jump,
            integrity_violations = indicators.integrity_violations,
            "suspicion score computed"
        );

        Ok(score)
    }

    /// The action directive for a suspicion score.
    pub fn action_for(&self, score: f64) -> SuspicionAction {
        suspicion::action_for(score, &self.config.suspicion)
    }

    /// Log an externally observed tab-switch/blur event for the session.
    /// Returns the new violation count.
    pub fn record_integrity_violation(&self, session: &SessionId) -> error::Result<u32> {
        validate_session(session)?;
        let count = self.store.record_integrity_violation(session);
        tracing::info!(session_id = %session, count, "integrity violation recorded");
        Ok(count)
    }

    /// Read-only session report. Does not mutate any state: a subsequent
    /// `analyze` with no new events returns the same score.
    pub fn session_report(&self, session: &SessionId) -> error::Result<SessionReport> {
        validate_session(session)?;

        let window = self.store.snapshot(session);
        if window.events.is_empty() && window.integrity_violations == 0 {
            return Ok(SessionReport {
                session_id: session.clone(),
                event_count: 0,
                suspicion_score: 0.0,
                indicators: None,
            });
        }

        let indicators = suspicion::compute_indicators(
            &window.events,
            window.integrity_violations,
            &self.config.suspicion,
        );
        let score = suspicion::weighted_score(&indicators, &self.config.suspicion);

        Ok(SessionReport {
            session_id: session.clone(),
            event_count: window.events.len(),
            suspicion_score: score,
            indicators: Some(indicators),
        })
    }

    /// Purge all retained state for a session.
    pub fn clear_session(&self, session: &SessionId) -> error::Result<()> {
        validate_session(session)?;
        self.store.clear(session);
        Ok(())
    }

    // ── Side-channel detectors ────────────────────────────────────

    /// Classify aggregate behavioral metrics against known automation
    /// signatures. Advisory: logged and returned, never folded into the
    /// suspicion score.
    pub fn detect_attack(
        &self,
        session: &SessionId,
        metrics: &BehavioralMetrics,
    ) -> error::Result<Option<AdversarialAttack>> {
        validate_session(session)?;
        validate_metrics(metrics)?;

        let verdict = adversarial::detect_attack(metrics);
        if let Some(attack) = &verdict {
            tracing::warn!(
                session_id = %session,
                attack_type = ?attack.attack_type,
                confidence = attack.confidence,
                "adversarial pattern detected"
            );
        }
        Ok(verdict)
    }

    /// Check a submitted solution for herd/boilerplate character.
    pub fn analyze_solution(&self, code: &str, problem_id: &str) -> DuplicateVerdict {
        duplicate::analyze_solution(code, problem_id, &self.catalog, &self.config.duplicate)
    }

    /// Decide whether to interrupt the speaking candidate.
    pub fn evaluate_interruption(&self, metrics: &SpeechMetrics) -> InterruptDecision {
        interrupt::evaluate(metrics, &self.config.interrupt)
    }

    // ── Move planning ─────────────────────────────────────────────

    /// The interviewer's next tactical move for a resolved signal state.
    pub fn determine_move(&self, state: SignalState) -> Move {
        moves::determine_move(state)
    }

    /// Probe framing for a chosen move.
    pub fn strategy_hint(&self, chosen: Move) -> ProbeStrategy {
        moves::strategy_hint(chosen)
    }
}

fn validate_session(session: &SessionId) -> error::Result<()> {
    if session.is_empty() {
        return Err(DetectError::InvalidInput(
            "session id must be non-empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_metrics(metrics: &BehavioralMetrics) -> error::Result<()> {
    for (name, value) in [
        ("typing_speed", metrics.typing_speed),
        ("pause_frequency", metrics.pause_frequency),
        ("code_churn", metrics.code_churn),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DetectError::InvalidInput(format!(
                "{name} must be a finite value in [0, 1], got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proctor_core::types::PauseMetrics;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw)
    }

    #[test]
    fn empty_session_id_is_rejected() {
        let engine = MonitorEngine::new();
        let result = engine.analyze(&sid("  "), "code");
        assert!(matches!(result, Err(DetectError::InvalidInput(_))));
    }

    #[test]
    fn non_finite_metrics_are_rejected() {
        let engine = MonitorEngine::new();
        let metrics = BehavioralMetrics {
            typing_speed: f64::NAN,
            pause_frequency: 0.1,
            code_churn: 0.1,
            pause_metrics: PauseMetrics::default(),
        };
        let result = engine.detect_attack(&sid("s1"), &metrics);
        assert!(matches!(result, Err(DetectError::InvalidInput(_))));
    }

    #[test]
    fn paste_heavy_session_scores_high() {
        let engine = MonitorEngine::new();
        let id = sid("s1");

        // Three robotic events: every pair a paste, zero gap variance.
        engine
            .analyze_at(&id, &"a".repeat(10), CodeEventKind::Snapshot, ts(0))
            .unwrap();
        engine
            .analyze_at(&id, &"a".repeat(100), CodeEventKind::Snapshot, ts(50))
            .unwrap();
        let score = engine
            .analyze_at(&id, &"a".repeat(190), CodeEventKind::Snapshot, ts(100))
            .unwrap();

        // paste 0.35·1 + entropy 0.25·(1−0) = 0.60.
        assert!((score - 0.60).abs() < 1e-9);
        assert_eq!(engine.action_for(score), SuspicionAction::Probe);
    }

    #[test]
    fn report_is_idempotent_with_analyze() {
        let engine = MonitorEngine::new();
        let id = sid("s1");

        engine
            .analyze_at(&id, "fn a() {}", CodeEventKind::Snapshot, ts(0))
            .unwrap();
        let score = engine
            .analyze_at(&id, "fn a() { b(); }", CodeEventKind::Snapshot, ts(900))
            .unwrap();

        let first = engine.session_report(&id).unwrap();
        let second = engine.session_report(&id).unwrap();
        assert_eq!(first.suspicion_score, score);
        assert_eq!(first.suspicion_score, second.suspicion_score);
        assert_eq!(first.event_count, second.event_count);
    }

    #[test]
    fn report_for_untouched_session_has_no_indicators() {
        let engine = MonitorEngine::new();
        let report = engine.session_report(&sid("fresh")).unwrap();
        assert_eq!(report.event_count, 0);
        assert_eq!(report.suspicion_score, 0.0);
        assert!(report.indicators.is_none());
    }

    #[test]
    fn integrity_violations_raise_the_score() {
        let engine = MonitorEngine::new();
        let id = sid("s1");

        engine
            .analyze_at(&id, "x", CodeEventKind::Snapshot, ts(0))
            .unwrap();
        let baseline = engine.session_report(&id).unwrap().suspicion_score;

        engine.record_integrity_violation(&id).unwrap();
        engine.record_integrity_violation(&id).unwrap();
        let raised = engine.session_report(&id).unwrap().suspicion_score;

        // Two violations add 0.30 · min(2 × 0.2, 1) = 0.12.
        assert!((raised - baseline - 0.12).abs() < 1e-9);
    }

    #[test]
    fn clear_session_resets_the_report() {
        let engine = MonitorEngine::new();
        let id = sid("s1");
        engine
            .analyze_at(&id, "x", CodeEventKind::Snapshot, ts(0))
            .unwrap();
        engine.record_integrity_violation(&id).unwrap();

        engine.clear_session(&id).unwrap();

        let report = engine.session_report(&id).unwrap();
        assert_eq!(report.event_count, 0);
        assert!(report.indicators.is_none());
    }

    #[test]
    fn stale_events_fall_out_of_the_score() {
        let engine = MonitorEngine::new();
        let id = sid("s1");

        // A paste pair, then a lone event 300 001 ms later: the old pair is
        // evicted and the window is back to a single benign event.
        engine
            .analyze_at(&id, &"a".repeat(10), CodeEventKind::Snapshot, ts(0))
            .unwrap();
        engine
            .analyze_at(&id, &"a".repeat(100), CodeEventKind::Snapshot, ts(50))
            .unwrap();
        engine
            .analyze_at(&id, "fresh", CodeEventKind::Snapshot, ts(300_051))
            .unwrap();

        let report = engine.session_report(&id).unwrap();
        assert_eq!(report.event_count, 1);
        let indicators = report.indicators.unwrap();
        assert_eq!(indicators.paste_ratio, 0.0);
    }
}
