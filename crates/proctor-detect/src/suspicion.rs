//! Suspicion scoring over a session's recent code-event window.
//!
//! Formula: `score = 0.35·paste + 0.25·(1−entropy) + 0.20·mismatch
//! + 0.10·jump + 0.30·integrity`, where `integrity = min(violations × 0.2, 1)`.
//! The nominal weights sum to 1.35 and are deliberately not renormalized, so
//! the score range is `[0, 1.35]`; the action thresholds apply to the raw sum.

use proctor_core::config::SuspicionConfig;
use proctor_core::types::{CodeEvent, SuspicionIndicators};
use serde::{Deserialize, Serialize};

/// Escalating interviewer action chosen from the suspicion score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionAction {
    /// No intervention warranted.
    None,
    /// Ask for a walkthrough of the recent code.
    Probe,
    /// Demand a detailed line-by-line logic explanation.
    DeepProbe,
    /// Remove optimization credit pending integrity review.
    Penalty,
}

impl SuspicionAction {
    /// The fixed interviewer prompt carried by this action.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Probe => Some("Can you walk me through what you just wrote?"),
            Self::DeepProbe => Some(
                "Stop for a moment and explain the logic of your current \
                 approach in detail, line by line.",
            ),
            Self::Penalty => Some(
                "Optimization credit has been removed for this problem \
                 pending an integrity review.",
            ),
        }
    }
}

/// Map a raw suspicion score onto an action. All thresholds are strict.
pub fn action_for(score: f64, config: &SuspicionConfig) -> SuspicionAction {
    if score > config.penalty_threshold {
        SuspicionAction::Penalty
    } else if score > config.deep_probe_threshold {
        SuspicionAction::DeepProbe
    } else if score > config.probe_threshold {
        SuspicionAction::Probe
    } else {
        SuspicionAction::None
    }
}

/// Recompute all behavioral indicators from the current window.
pub fn compute_indicators(
    events: &[CodeEvent],
    integrity_violations: u32,
    config: &SuspicionConfig,
) -> SuspicionIndicators {
    SuspicionIndicators {
        paste_ratio: paste_ratio(events, config),
        typing_entropy: typing_entropy(events, config),
        // Reserved extension point: populated by an external
        // explanation-analysis collaborator.
        explanation_mismatch: 0.0,
        solution_jump: solution_jump(events),
        integrity_violations,
    }
}

/// Weighted suspicion score over the given indicators.
pub fn weighted_score(indicators: &SuspicionIndicators, config: &SuspicionConfig) -> f64 {
    let integrity_score =
        (f64::from(indicators.integrity_violations) * config.integrity_step).min(1.0);

    config.paste_weight * indicators.paste_ratio
        + config.entropy_weight * (1.0 - indicators.typing_entropy)
        + config.mismatch_weight * indicators.explanation_mismatch
        + config.jump_weight * indicators.solution_jump
        + config.integrity_weight * integrity_score
}

/// Fraction of consecutive event pairs that look like large pastes: the
/// code grew by more than `paste_delta_chars` in under `paste_window_ms`.
fn paste_ratio(events: &[CodeEvent], config: &SuspicionConfig) -> f64 {
    if events.len() < 2 {
        return 0.0;
    }

    let pastes = events
        .windows(2)
        .filter(|pair| {
            let delta = pair[1].code.chars().count() as i64 - pair[0].code.chars().count() as i64;
            let elapsed =
                pair[1].timestamp.timestamp_millis() - pair[0].timestamp.timestamp_millis();
            delta > config.paste_delta_chars as i64 && elapsed < config.paste_window_ms
        })
        .count();

    pastes as f64 / (events.len() - 1) as f64
}

/// Normalized population variance of inter-event gaps.
///
/// Fewer than 3 events is defined as 1 (maximally human, benefit of the
/// doubt). Low values mean robotic regularity; the caller inverts this
/// (`1 − entropy`) when weighting it into the score.
fn typing_entropy(events: &[CodeEvent], config: &SuspicionConfig) -> f64 {
    if events.len() < 3 {
        return 1.0;
    }

    let gaps: Vec<f64> = events
        .windows(2)
        .map(|pair| {
            (pair[1].timestamp.timestamp_millis() - pair[0].timestamp.timestamp_millis()) as f64
        })
        .collect();

    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;

    (variance / config.entropy_variance_scale).min(1.0)
}

/// Fraction of consecutive event triples showing a long quiet plateau
/// followed by a sudden leap: the latest length exceeds twice the previous,
/// and the previous is within 10% of the one before it.
fn solution_jump(events: &[CodeEvent]) -> f64 {
    if events.len() < 3 {
        return 0.0;
    }

    let jumps = events
        .windows(3)
        .filter(|triple| {
            let first = triple[0].code.chars().count() as f64;
            let middle = triple[1].code.chars().count() as f64;
            let latest = triple[2].code.chars().count() as f64;
            latest > 2.0 * middle && (middle - first).abs() <= 0.1 * first
        })
        .count();

    jumps as f64 / (events.len() - 2) as f64
}
