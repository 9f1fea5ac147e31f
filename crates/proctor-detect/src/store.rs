//! Per-session bounded history of code-edit events.
//!
//! Histories are append-only with a sliding retention window: on every
//! append, events older than the window (relative to the latest event) are
//! evicted. Entries stay timestamp-monotonic per session; an append with an
//! earlier timestamp is clamped forward to the session's latest.
//!
//! Locking: an outer `RwLock` guards the session map, each session owns its
//! own `Mutex`. Appends within one session serialize; different sessions
//! proceed fully in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use proctor_core::types::{CodeEvent, CodeEventKind, SessionId};

/// Mutable per-session state: recent code events plus the externally logged
/// tab-switch/blur counter.
#[derive(Debug, Default)]
struct SessionHistory {
    events: Vec<CodeEvent>,
    integrity_violations: u32,
}

/// Read-only snapshot of one session's current window.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub events: Vec<CodeEvent>,
    pub integrity_violations: u32,
}

/// In-memory store of per-session code-event histories.
pub struct EventStore {
    retention_ms: i64,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionHistory>>>>,
}

impl EventStore {
    /// Create a store with the given retention window in milliseconds.
    pub fn new(retention_ms: i64) -> Self {
        Self {
            retention_ms,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn session(&self, id: &SessionId) -> Arc<Mutex<SessionHistory>> {
        if let Some(existing) = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Arc::clone(existing);
        }

        let mut map = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(id.clone()).or_default())
    }

    /// Append a code event and evict everything older than the retention
    /// window. Returns a snapshot of the surviving window.
    pub fn append(
        &self,
        id: &SessionId,
        code: String,
        kind: CodeEventKind,
        timestamp: DateTime<Utc>,
    ) -> HistorySnapshot {
        let session = self.session(id);
        let mut history = session.lock().unwrap_or_else(PoisonError::into_inner);

        // Clamp forward to keep the per-session monotonic invariant.
        let timestamp = match history.events.last() {
            Some(last) if timestamp < last.timestamp => last.timestamp,
            _ => timestamp,
        };

        history.events.push(CodeEvent {
            code,
            timestamp,
            kind,
        });

        let cutoff = timestamp - chrono::Duration::milliseconds(self.retention_ms);
        history.events.retain(|e| e.timestamp >= cutoff);

        HistorySnapshot {
            events: history.events.clone(),
            integrity_violations: history.integrity_violations,
        }
    }

    /// Read the session's current window without mutating anything.
    ///
    /// The retention window is applied as a filter relative to the latest
    /// recorded event, so repeated reads return identical snapshots.
    pub fn snapshot(&self, id: &SessionId) -> HistorySnapshot {
        let map = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let Some(session) = map.get(id) else {
            return HistorySnapshot {
                events: Vec::new(),
                integrity_violations: 0,
            };
        };

        let history = session.lock().unwrap_or_else(PoisonError::into_inner);
        let events = match history.events.last() {
            Some(last) => {
                let cutoff = last.timestamp - chrono::Duration::milliseconds(self.retention_ms);
                history
                    .events
                    .iter()
                    .filter(|e| e.timestamp >= cutoff)
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        };

        HistorySnapshot {
            events,
            integrity_violations: history.integrity_violations,
        }
    }

    /// Increment the integrity-violation counter. Returns the new count.
    pub fn record_integrity_violation(&self, id: &SessionId) -> u32 {
        let session = self.session(id);
        let mut history = session.lock().unwrap_or_else(PoisonError::into_inner);
        history.integrity_violations += 1;
        history.integrity_violations
    }

    /// Purge all state for a session.
    pub fn clear(&self, id: &SessionId) {
        let mut map = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        map.remove(id);
    }

    /// Number of events currently retained for a session.
    pub fn event_count(&self, id: &SessionId) -> usize {
        self.snapshot(id).events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    fn sid(raw: &str) -> SessionId {
        SessionId::new(raw)
    }

    #[test]
    fn append_returns_growing_window() {
        let store = EventStore::new(300_000);
        let id = sid("s1");

        store.append(&id, "a".into(), CodeEventKind::Snapshot, ts(0));
        let snap = store.append(&id, "ab".into(), CodeEventKind::Snapshot, ts(500));

        assert_eq!(snap.events.len(), 2);
        assert_eq!(store.event_count(&id), 2);
    }

    #[test]
    fn events_outside_retention_window_are_evicted() {
        let store = EventStore::new(300_000);
        let id = sid("s1");

        store.append(&id, "old".into(), CodeEventKind::Snapshot, ts(0));
        let snap = store.append(&id, "new".into(), CodeEventKind::Snapshot, ts(300_001));

        assert_eq!(snap.events.len(), 1);
        assert_eq!(snap.events[0].code, "new");
    }

    #[test]
    fn event_at_window_edge_is_retained() {
        let store = EventStore::new(300_000);
        let id = sid("s1");

        store.append(&id, "edge".into(), CodeEventKind::Snapshot, ts(0));
        let snap = store.append(&id, "new".into(), CodeEventKind::Snapshot, ts(300_000));

        assert_eq!(snap.events.len(), 2);
    }

    #[test]
    fn out_of_order_timestamp_is_clamped_forward() {
        let store = EventStore::new(300_000);
        let id = sid("s1");

        store.append(&id, "a".into(), CodeEventKind::Snapshot, ts(1_000));
        let snap = store.append(&id, "b".into(), CodeEventKind::Snapshot, ts(400));

        assert_eq!(snap.events[1].timestamp, ts(1_000));
        assert!(snap.events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn snapshot_does_not_mutate_history() {
        let store = EventStore::new(300_000);
        let id = sid("s1");

        store.append(&id, "a".into(), CodeEventKind::Snapshot, ts(0));
        store.append(&id, "b".into(), CodeEventKind::Snapshot, ts(100));

        let first = store.snapshot(&id);
        let second = store.snapshot(&id);
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn sessions_are_isolated() {
        let store = EventStore::new(300_000);
        store.append(&sid("a"), "x".into(), CodeEventKind::Snapshot, ts(0));
        store.record_integrity_violation(&sid("b"));

        assert_eq!(store.event_count(&sid("a")), 1);
        assert_eq!(store.event_count(&sid("b")), 0);
        assert_eq!(store.snapshot(&sid("a")).integrity_violations, 0);
        assert_eq!(store.snapshot(&sid("b")).integrity_violations, 1);
    }

    #[test]
    fn clear_purges_events_and_violations() {
        let store = EventStore::new(300_000);
        let id = sid("s1");
        store.append(&id, "x".into(), CodeEventKind::Snapshot, ts(0));
        store.record_integrity_violation(&id);

        store.clear(&id);

        let snap = store.snapshot(&id);
        assert!(snap.events.is_empty());
        assert_eq!(snap.integrity_violations, 0);
    }
}
