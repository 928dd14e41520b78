//! Rocket state machine.
//!
//! Maps `(current rocket, event kind, payload)` to the next rocket state.
//! Sequencing and persistence live in [`crate::sequencer`].

mod transitions;

pub use transitions::apply_event;
