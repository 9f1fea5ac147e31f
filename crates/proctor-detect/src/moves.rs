//! Tactical move selection from resolved signal states.
//!
//! Purely combinatorial state machine: states are per-probe resolution
//! outcomes, transitions are deterministic and memoryless. There is no
//! history dependency beyond the single most recent resolution.

use proctor_core::types::{Move, ProbeStrategy, SignalState};

/// Map a resolved signal state to the interviewer's next tactical move.
pub fn determine_move(state: SignalState) -> Move {
    match state {
        SignalState::Confirmed => Move::Escalate,
        SignalState::Adequate => Move::Pivot,
        SignalState::Weak => Move::Trap,
        SignalState::Disqualifying => Move::Terminate,
        SignalState::Testing => Move::Stay,
        // Safe default for states this core does not plan against.
        SignalState::Unresolved => Move::Pivot,
    }
}

/// Follow-up probe framing for a chosen move.
pub fn strategy_hint(chosen: Move) -> ProbeStrategy {
    match chosen {
        Move::Escalate => ProbeStrategy::Constraint,
        Move::Trap => ProbeStrategy::Contradiction,
        Move::Pivot => ProbeStrategy::Open,
        Move::Terminate | Move::Stay => ProbeStrategy::Open,
    }
}
