//! Adversarial automation detection over aggregate behavioral metrics.
//!
//! Classifies known automation/proxy-coding signatures. Checks run in
//! priority order and the first match wins. Detection is advisory: the
//! engine logs it as an observability event and returns it, but it never
//! feeds back into the suspicion score numerically.

use proctor_core::types::{AdversarialAttack, AttackType, BehavioralMetrics};

// Signature thresholds, in priority order.
const BOT_TYPING_SPEED: f64 = 0.8;
const BOT_PAUSE_FREQUENCY: f64 = 0.1;
const PROXY_LONG_PAUSES: u32 = 1;
const PROXY_CODE_CHURN: f64 = 0.05;
const PROXY_TYPING_SPEED: f64 = 0.6;

/// Classify the metrics against known attack signatures.
pub fn detect_attack(metrics: &BehavioralMetrics) -> Option<AdversarialAttack> {
    // Fast, mechanically uniform typing.
    if metrics.typing_speed > BOT_TYPING_SPEED && metrics.pause_frequency < BOT_PAUSE_FREQUENCY {
        return Some(AdversarialAttack {
            attack_type: AttackType::BotEmulation,
            detected: true,
            confidence: 0.9,
        });
    }

    // Bursts of near-perfect code separated by long silent gaps, consistent
    // with copying externally generated output.
    if metrics.pause_metrics.long_pauses > PROXY_LONG_PAUSES
        && metrics.code_churn < PROXY_CODE_CHURN
        && metrics.typing_speed > PROXY_TYPING_SPEED
    {
        return Some(AdversarialAttack {
            attack_type: AttackType::ProxyCoding,
            detected: true,
            confidence: 0.85,
        });
    }

    None
}
