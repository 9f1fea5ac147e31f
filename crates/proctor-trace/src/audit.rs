//! Append-only, session-filterable audit log of pipeline decisions.
//!
//! Constructed empty at process start and shared by `Arc` handle; entries
//! leave the log only through an explicit per-session clear. Appends from
//! different sessions may interleave, but the single internal mutex means
//! no entry is ever lost or reordered; filtering is a read-only projection
//! in insertion order.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use proctor_core::types::SessionId;

use crate::{TraceEntry, TraceId};

/// Process-wide append-mostly decision log.
#[derive(Debug, Default)]
pub struct AuditTrace {
    entries: Mutex<Vec<TraceEntry>>,
}

impl AuditTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TraceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one decision entry. Returns the id of the new entry.
    pub fn log(
        &self,
        session_id: &SessionId,
        signals: Vec<String>,
        verdict: &str,
        loss_score: f64,
    ) -> TraceId {
        let mut entry = TraceEntry {
            id: TraceId::new(),
            timestamp: Utc::now(),
            session_id: session_id.clone(),
            signals,
            verdict: verdict.to_string(),
            loss_score,
            content_hash: String::new(),
        };
        entry.content_hash = entry.compute_hash();

        tracing::debug!(
            trace_id = %entry.id,
            session_id = %session_id,
            verdict,
            loss_score,
            "decision traced"
        );

        let id = entry.id;
        self.lock().push(entry);
        id
    }

    /// All entries for a session, in insertion order.
    pub fn history(&self, session_id: &SessionId) -> Vec<TraceEntry> {
        self.lock()
            .iter()
            .filter(|e| &e.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Remove all entries for a session. Returns how many were removed.
    pub fn clear(&self, session_id: &SessionId) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| &e.session_id != session_id);
        before - entries.len()
    }

    /// Total number of entries across all sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
