//! Longitudinal performance trajectory across completed sessions.
//!
//! Each completed session is folded into a `PerformanceSnapshot`; velocity
//! is the first recorded loss minus the most recent (positive means
//! improvement, since the score is a loss).

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use proctor_core::types::SessionOutcome;

use crate::PerformanceSnapshot;

// Velocity buckets for the master verdict.
const EXCEPTIONAL_VELOCITY: f64 = 0.4;
const GROWTH_VELOCITY: f64 = 0.1;
const REGRESSION_VELOCITY: f64 = -0.1;

/// Process-wide trend history. Constructed empty, shared by handle.
#[derive(Debug, Default)]
pub struct TrendTracker {
    snapshots: Mutex<Vec<PerformanceSnapshot>>,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PerformanceSnapshot>> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold a completed session into the trajectory. Returns the derived
    /// snapshot.
    pub fn track_session(&self, outcome: &SessionOutcome, company: &str) -> PerformanceSnapshot {
        let mut top_strengths = Vec::new();
        let mut top_gaps = Vec::new();

        if outcome.metrics_used {
            top_strengths.push("Quantifiable Impact".to_string());
        } else {
            top_gaps.push("Metric-Driven Communication".to_string());
        }

        if outcome.ownership_observed {
            top_strengths.push("Technical Ownership".to_string());
        } else {
            top_gaps.push("Individual Agency".to_string());
        }

        let snapshot = PerformanceSnapshot {
            timestamp: Utc::now(),
            company: company.to_string(),
            loss_score: outcome.loss_score,
            top_strengths,
            top_gaps,
        };

        tracing::debug!(
            company,
            loss_score = outcome.loss_score,
            "session folded into trend history"
        );

        self.lock().push(snapshot.clone());
        snapshot
    }

    /// First recorded loss minus the most recent. Positive = improvement.
    /// Fewer than 2 snapshots → 0.
    pub fn velocity(&self) -> f64 {
        let snapshots = self.lock();
        match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) if snapshots.len() >= 2 => {
                first.loss_score - last.loss_score
            }
            _ => 0.0,
        }
    }

    /// Bucket the velocity into a trajectory verdict.
    pub fn master_verdict(&self) -> &'static str {
        let velocity = self.velocity();
        if velocity > EXCEPTIONAL_VELOCITY {
            "Exceptional trajectory: loss is dropping sharply across sessions."
        } else if velocity > GROWTH_VELOCITY {
            "Moderate growth: steady improvement across sessions."
        } else if velocity < REGRESSION_VELOCITY {
            "Regression: recent sessions are losing ground."
        } else {
            "Stability: performance is holding flat."
        }
    }

    /// All snapshots in recording order.
    pub fn snapshots(&self) -> Vec<PerformanceSnapshot> {
        self.lock().clone()
    }
}
