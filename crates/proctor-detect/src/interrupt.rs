//! Speech-interruption rules.
//!
//! Stateless, first-match-wins evaluation over three ordered rules:
//! prolonged silence, unstructured rambling, and sufficient evidence on the
//! current signal. No match means the candidate keeps talking.

use proctor_core::config::InterruptConfig;
use proctor_core::types::{SignalProgress, SpeechMetrics};
use serde::Serialize;

/// Why the interviewer should interrupt.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterruptReason {
    /// The candidate has gone quiet for too long.
    Silence,
    /// Long unstructured answer with no MECE categorization.
    Rambling,
    /// The current signal already has strong evidence.
    EvidenceLimit,
}

impl InterruptReason {
    /// The fixed directive carried by this reason.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Silence => "Talk me through where you are right now, even if it's rough.",
            Self::Rambling => {
                "Let me stop you there. Give me your top three points, one category at a time."
            }
            Self::EvidenceLimit => "That answers it for me. Let's move to the next question.",
        }
    }
}

/// The interruption decision for the current speech sample.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterruptDecision {
    pub should_interrupt: bool,
    pub reason: Option<InterruptReason>,
    pub message: Option<&'static str>,
}

impl InterruptDecision {
    fn interrupt(reason: InterruptReason) -> Self {
        Self {
            should_interrupt: true,
            reason: Some(reason),
            message: Some(reason.message()),
        }
    }

    fn hold() -> Self {
        Self {
            should_interrupt: false,
            reason: None,
            message: None,
        }
    }
}

/// Evaluate the ordered interruption rules. Pure function of its inputs.
pub fn evaluate(metrics: &SpeechMetrics, config: &InterruptConfig) -> InterruptDecision {
    if metrics.silence_ms > config.silence_ms {
        return InterruptDecision::interrupt(InterruptReason::Silence);
    }

    if metrics.time_spoken_secs > config.rambling_secs && !metrics.mece_detected {
        return InterruptDecision::interrupt(InterruptReason::Rambling);
    }

    if metrics.signal_progress == SignalProgress::Strong {
        return InterruptDecision::interrupt(InterruptReason::EvidenceLimit);
    }

    InterruptDecision::hold()
}
