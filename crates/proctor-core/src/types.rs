//! Core domain types for the Proctor interview monitor.
//!
//! These types cross the library boundary in both directions: session and
//! code-event inputs from the signal/session collaborators, and scores,
//! verdicts, and tactical moves back to the orchestration layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Session identity ──────────────────────────────────────────────

/// Opaque session identifier supplied by the caller.
///
/// The core never infers identity from content; every per-session map is
/// keyed by this value. Must be non-empty at the engine boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Code events ───────────────────────────────────────────────────

/// What kind of code event was captured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodeEventKind {
    /// Full editor contents at a point in time.
    Snapshot,
    /// Incremental edit.
    Diff,
    /// Candidate-initiated submission.
    Submission,
}

/// A single captured code edit. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeEvent {
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub kind: CodeEventKind,
}

// ── Behavioral indicators ─────────────────────────────────────────

/// Behavioral indicators derived from a session's recent code-event history.
///
/// Recomputed from the current window on every analysis; never persisted
/// independently. All ratio fields are in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuspicionIndicators {
    /// Fraction of consecutive event pairs that look like large pastes.
    pub paste_ratio: f64,
    /// Normalized variance of inter-event gaps. Low values mean robotic
    /// regularity; inverted (`1 - entropy`) when weighted into the score.
    pub typing_entropy: f64,
    /// Mismatch between spoken explanation and written code. Reserved
    /// extension point: always 0 until an explanation-analysis collaborator
    /// populates it.
    pub explanation_mismatch: f64,
    /// Fraction of event triples showing a quiet plateau followed by a
    /// sudden doubling in solution length.
    pub solution_jump: f64,
    /// Externally logged tab-switch/blur count for the session.
    pub integrity_violations: u32,
}

/// Aggregate typing/pause behavior supplied by the session collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehavioralMetrics {
    /// Normalized typing speed in `[0, 1]`.
    pub typing_speed: f64,
    /// Normalized pause frequency in `[0, 1]`.
    pub pause_frequency: f64,
    /// Normalized code churn (rewrites/deletions) in `[0, 1]`.
    pub code_churn: f64,
    pub pause_metrics: PauseMetrics,
}

/// Pause statistics within [`BehavioralMetrics`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PauseMetrics {
    /// Number of long (multi-second) pauses observed.
    pub long_pauses: u32,
}

// ── Speech metrics ────────────────────────────────────────────────

/// How far along the current probe is toward a resolved signal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalProgress {
    #[default]
    None,
    Weak,
    Moderate,
    Strong,
}

/// Speech timing and structure metrics for the candidate's current answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechMetrics {
    /// Continuous silence so far, in milliseconds.
    pub silence_ms: u64,
    /// Total speaking time on the current answer, in seconds.
    pub time_spoken_secs: f64,
    /// Whether a structured (MECE) categorization was detected in the answer.
    pub mece_detected: bool,
    pub signal_progress: SignalProgress,
}

// ── Signal resolution ─────────────────────────────────────────────

/// Resolution state of a signal, produced by the external signal-extraction
/// collaborator. Terminal per probe, not per session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    Confirmed,
    Adequate,
    Weak,
    Disqualifying,
    Testing,
    /// Catch-all for states this core does not plan against.
    #[serde(other)]
    Unresolved,
}

/// A signal under evaluation, with its current resolution state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalNode {
    pub id: String,
    pub state: SignalState,
}

// ── Tactical moves ────────────────────────────────────────────────

/// The interviewer's next tactical move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Raise difficulty on a confirmed signal.
    Escalate,
    /// Shift to an unexplored signal.
    Pivot,
    /// Lay a contradiction trap on a weak signal.
    Trap,
    /// End the probe line on a disqualifying signal.
    Terminate,
    /// Hold position while a signal is still under test.
    Stay,
}

/// Follow-up probe framing for a chosen move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStrategy {
    /// Add a constraint to the current problem.
    Constraint,
    /// Surface an inconsistency in the candidate's account.
    Contradiction,
    /// Open-ended exploration.
    Open,
}

// ── Adversarial classification ────────────────────────────────────

/// Known automation/proxy-coding signatures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    BotEmulation,
    ProxyCoding,
    SystemGaming,
}

/// A classified adversarial pattern in the candidate's aggregate behavior.
///
/// Advisory side channel: callers log it and may raise a separate flag, but
/// it never feeds back into the suspicion score numerically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdversarialAttack {
    pub attack_type: AttackType,
    pub detected: bool,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f64,
}

// ── Session outcome ───────────────────────────────────────────────

/// Final outcome of a completed interview session, folded into the
/// longitudinal trend history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionOutcome {
    /// Inverse-quality score for the session; lower is better.
    pub loss_score: f64,
    /// Whether the candidate backed claims with quantified metrics.
    pub metrics_used: bool,
    /// Whether first-person agency ("I built", "I decided") was observed.
    pub ownership_observed: bool,
}
