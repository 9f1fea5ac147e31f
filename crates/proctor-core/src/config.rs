//! Configuration for the Proctor detection pipeline.
//!
//! Loaded from `proctor.toml` or `PROCTOR__`-prefixed environment
//! variables. Every threshold and weight has a serde default matching the
//! shipped tuning, so a missing file yields the stock behavior.

use serde::Deserialize;

use crate::error::ProctorError;

/// Top-level monitor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub suspicion: SuspicionConfig,

    #[serde(default)]
    pub duplicate: DuplicateConfig,

    #[serde(default)]
    pub interrupt: InterruptConfig,
}

impl MonitorConfig {
    /// Load configuration from `{prefix}.toml` (optional) and
    /// `PROCTOR__`-prefixed environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, ProctorError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("PROCTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ProctorError::Config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| ProctorError::Config(e.to_string()))
    }
}

/// Weights and thresholds for the suspicion scorer.
///
/// The five nominal weights sum to 1.35 by construction (paste + entropy +
/// mismatch + jump = 0.90, plus integrity 0.30). This matches the deployed
/// tuning and is deliberately not renormalized, so the raw score range is
/// `[0, 1.35]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuspicionConfig {
    /// Event retention window in milliseconds.
    #[serde(default = "default_retention_ms")]
    pub retention_ms: i64,

    /// Character-length delta above which a pair of edits counts as a paste.
    #[serde(default = "default_paste_delta_chars")]
    pub paste_delta_chars: usize,

    /// Maximum elapsed time between a paste pair, in milliseconds.
    #[serde(default = "default_paste_window_ms")]
    pub paste_window_ms: i64,

    /// Divisor normalizing gap variance into the `[0, 1]` entropy value.
    #[serde(default = "default_entropy_variance_scale")]
    pub entropy_variance_scale: f64,

    /// Score added per logged integrity violation, capped at 1.
    #[serde(default = "default_integrity_step")]
    pub integrity_step: f64,

    #[serde(default = "default_paste_weight")]
    pub paste_weight: f64,

    #[serde(default = "default_entropy_weight")]
    pub entropy_weight: f64,

    #[serde(default = "default_mismatch_weight")]
    pub mismatch_weight: f64,

    #[serde(default = "default_jump_weight")]
    pub jump_weight: f64,

    #[serde(default = "default_integrity_weight")]
    pub integrity_weight: f64,

    /// Strictly-greater-than threshold for the penalty action.
    #[serde(default = "default_penalty_threshold")]
    pub penalty_threshold: f64,

    /// Strictly-greater-than threshold for the deep-probe action.
    #[serde(default = "default_deep_probe_threshold")]
    pub deep_probe_threshold: f64,

    /// Strictly-greater-than threshold for the probe action.
    #[serde(default = "default_probe_threshold")]
    pub probe_threshold: f64,
}

/// Thresholds for the near-duplicate (herd solution) detector.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateConfig {
    /// Character-level Shannon entropy below which code looks scripted.
    #[serde(default = "default_entropy_threshold")]
    pub entropy_threshold: f64,

    /// Minimum line count before the low-entropy rule applies.
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,
}

/// Thresholds for the speech-interruption rule engine.
#[derive(Debug, Clone, Deserialize)]
pub struct InterruptConfig {
    /// Silence duration (ms) above which the candidate is re-engaged.
    #[serde(default = "default_silence_ms")]
    pub silence_ms: u64,

    /// Speaking time (seconds) above which unstructured answers are cut.
    #[serde(default = "default_rambling_secs")]
    pub rambling_secs: f64,
}

fn default_retention_ms() -> i64 {
    300_000
}

fn default_paste_delta_chars() -> usize {
    50
}

fn default_paste_window_ms() -> i64 {
    100
}

fn default_entropy_variance_scale() -> f64 {
    10_000.0
}

fn default_integrity_step() -> f64 {
    0.2
}

fn default_paste_weight() -> f64 {
    0.35
}

fn default_entropy_weight() -> f64 {
    0.25
}

fn default_mismatch_weight() -> f64 {
    0.20
}

fn default_jump_weight() -> f64 {
    0.10
}

fn default_integrity_weight() -> f64 {
    0.30
}

fn default_penalty_threshold() -> f64 {
    0.90
}

fn default_deep_probe_threshold() -> f64 {
    0.70
}

fn default_probe_threshold() -> f64 {
    0.45
}

fn default_entropy_threshold() -> f64 {
    3.5
}

fn default_min_lines() -> usize {
    20
}

fn default_silence_ms() -> u64 {
    12_000
}

fn default_rambling_secs() -> f64 {
    25.0
}

impl Default for SuspicionConfig {
    fn default() -> Self {
        Self {
            retention_ms: default_retention_ms(),
            paste_delta_chars: default_paste_delta_chars(),
            paste_window_ms: default_paste_window_ms(),
            entropy_variance_scale: default_entropy_variance_scale(),
            integrity_step: default_integrity_step(),
            paste_weight: default_paste_weight(),
            entropy_weight: default_entropy_weight(),
            mismatch_weight: default_mismatch_weight(),
            jump_weight: default_jump_weight(),
            integrity_weight: default_integrity_weight(),
            penalty_threshold: default_penalty_threshold(),
            deep_probe_threshold: default_deep_probe_threshold(),
            probe_threshold: default_probe_threshold(),
        }
    }
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: default_entropy_threshold(),
            min_lines: default_min_lines(),
        }
    }
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            silence_ms: default_silence_ms(),
            rambling_secs: default_rambling_secs(),
        }
    }
}
