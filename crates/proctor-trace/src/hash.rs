//! BLAKE3 content hashing for tamper evidence.
//!
//! Computes a deterministic hash of all trace-entry fields (excluding the
//! content_hash itself) so that any modification is detectable.

use serde::Serialize;

use crate::TraceEntry;

/// Hashable representation of a TraceEntry (excludes content_hash).
#[derive(Serialize)]
struct HashableEntry<'a> {
    id: &'a crate::TraceId,
    timestamp: &'a chrono::DateTime<chrono::Utc>,
    session_id: &'a proctor_core::types::SessionId,
    signals: &'a [String],
    verdict: &'a str,
    loss_score: f64,
}

/// Compute the BLAKE3 hash of a trace entry's content.
///
/// Serializes all fields except `content_hash` to canonical JSON, then
/// hashes the bytes with BLAKE3. Returns the hex-encoded hash.
pub fn compute_entry_hash(entry: &TraceEntry) -> String {
    let hashable = HashableEntry {
        id: &entry.id,
        timestamp: &entry.timestamp,
        session_id: &entry.session_id,
        signals: &entry.signals,
        verdict: &entry.verdict,
        loss_score: entry.loss_score,
    };

    let json = serde_json::to_vec(&hashable).expect("TraceEntry serialization should not fail");
    blake3::hash(&json).to_hex().to_string()
}
