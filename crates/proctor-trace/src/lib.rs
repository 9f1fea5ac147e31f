//! proctor-trace: Decision tracing and longitudinal trend tracking.
//!
//! Audit-trace entries record every pipeline decision (signals considered,
//! verdict, loss score) and are BLAKE3 content-hashed on append for tamper
//! evidence. Performance snapshots fold completed sessions into a
//! cross-session trajectory. Both stores are explicitly constructed,
//! injected by handle, and cleared explicitly; neither is a global.

pub mod audit;
pub mod hash;
pub mod trend;

use chrono::{DateTime, Utc};
use proctor_core::types::SessionId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a trace entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TraceId(pub Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded pipeline decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEntry {
    pub id: TraceId,
    pub timestamp: DateTime<Utc>,
    pub session_id: SessionId,
    /// Signals considered, in evaluation order.
    pub signals: Vec<String>,
    /// The verdict reached.
    pub verdict: String,
    /// Loss score at decision time; lower is better.
    pub loss_score: f64,
    /// BLAKE3 content hash (hex) — set on append.
    pub content_hash: String,
}

impl TraceEntry {
    /// Compute the BLAKE3 hash of this entry's content.
    /// The hash covers all fields except `content_hash` itself.
    pub fn compute_hash(&self) -> String {
        hash::compute_entry_hash(self)
    }

    /// Verify that the stored hash matches a freshly computed one.
    pub fn verify_integrity(&self) -> bool {
        self.content_hash == self.compute_hash()
    }
}

/// A completed session folded into the longitudinal trajectory.
/// Appended once; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSnapshot {
    pub timestamp: DateTime<Utc>,
    pub company: String,
    /// Inverse-quality score; lower is better.
    pub loss_score: f64,
    pub top_strengths: Vec<String>,
    pub top_gaps: Vec<String>,
}
