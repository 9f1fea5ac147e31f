//! Session-event types ingested by the detection pipeline.
//!
//! Every payload kind is a closed tagged variant carrying only the fields
//! that kind requires; there is no untyped metadata anywhere on the wire.
//! The replay binary consumes a JSON array of these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{
    BehavioralMetrics, CodeEventKind, SessionId, SessionOutcome, SignalNode, SpeechMetrics,
};

/// Unique identifier for a session event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// A single event observed during a live interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: EventId,
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl SessionEvent {
    pub fn new(session_id: SessionId, payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            session_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// The event payload, tagged by type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum EventPayload {
    // ── Editor events ─────────────────────────────────────────
    /// A code edit was captured from the candidate's editor.
    CodeSnapshot { code: String, kind: CodeEventKind },

    // ── Speech events ─────────────────────────────────────────
    /// A speech-timing sample for the current answer.
    SpeechSample { metrics: SpeechMetrics },

    // ── Behavior events ───────────────────────────────────────
    /// Aggregate typing/pause behavior over the recent window.
    BehaviorSample { metrics: BehavioralMetrics },
    /// A tab-switch or window-blur was logged for the session.
    IntegrityViolation { kind: String },

    // ── Signal events ─────────────────────────────────────────
    /// The signal-extraction collaborator resolved a signal.
    SignalResolved { signal: SignalNode },

    // ── Lifecycle events ──────────────────────────────────────
    /// The session ended with a final outcome.
    SessionCompleted {
        outcome: SessionOutcome,
        company: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalState;

    #[test]
    fn event_serialization_roundtrip() {
        let event = SessionEvent::new(
            SessionId::new("sess-42"),
            EventPayload::CodeSnapshot {
                code: "fn main() {}".to_string(),
                kind: CodeEventKind::Snapshot,
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.id, deserialized.id);
        assert_eq!(event.session_id, deserialized.session_id);
    }

    #[test]
    fn event_payload_tags() {
        let payload = EventPayload::SignalResolved {
            signal: SignalNode {
                id: "sig-ownership".to_string(),
                state: SignalState::Confirmed,
            },
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"event_type\":\"SignalResolved\""));
    }
}
