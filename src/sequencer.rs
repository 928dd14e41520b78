//! Per-rocket event ordering.
//!
//! Decides whether an incoming event advances a rocket, is a re-delivery of
//! the last applied event, or is stale.

use crate::error::{Result, TelemetryError};
use crate::state::apply_event;
use crate::store::KeyedStore;
use crate::types::{Event, ProcessStatus, Rocket};
use std::cmp::Ordering;
use std::sync::Arc;

/// Applies events to rockets held in a keyed store.
///
/// The lookup and the write-back are separate store calls. Two workers
/// handling the same channel at the same time can lose one update; producers
/// are expected to keep each channel on a single stream.
pub struct Sequencer<S> {
    store: Arc<S>,
}

impl<S: KeyedStore<Rocket>> Sequencer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Process one event.
    ///
    /// - newer than the last applied sequence: apply and persist
    /// - equal: re-apply and persist again (producers resend identical payloads)
    /// - older: ignore without touching the store
    ///
    /// A failed transition leaves the stored rocket untouched.
    pub fn process(&self, event: &Event) -> Result<ProcessStatus> {
        let current = match self.store.get(&event.channel) {
            Ok(rocket) => rocket,
            Err(TelemetryError::NotFound(_)) => Rocket::new(event.channel.clone()),
            Err(e) => return Err(e),
        };

        let status = match event.sequence.cmp(&current.last_sequence) {
            Ordering::Greater => ProcessStatus::Processed,
            Ordering::Equal => ProcessStatus::ReprocessedDuplicate,
            Ordering::Less => {
                tracing::debug!(
                    channel = %event.channel,
                    sequence = %event.sequence,
                    last_sequence = %current.last_sequence,
                    "Ignoring old message"
                );
                return Ok(ProcessStatus::IgnoringOldMessage);
            }
        };

        let mut next = apply_event(current, &event.kind, &event.payload)?;
        next.last_sequence = event.sequence;
        next.last_event_time = event.time;
        self.store.put(next)?;

        Ok(status)
    }
}
