//! Worker loop draining the ingestion queue.

use crate::sequencer::Sequencer;
use crate::store::KeyedStore;
use crate::types::{Event, Rocket};
use crossbeam_channel::Receiver;
use std::sync::Arc;

use super::types::PipelineStats;

/// Pull events until the queue is closed and empty.
///
/// A failing event is logged and counted; the worker keeps going.
pub(crate) fn run_worker<S>(
    id: usize,
    receiver: Receiver<Event>,
    sequencer: Arc<Sequencer<S>>,
    stats: Arc<PipelineStats>,
) where
    S: KeyedStore<Rocket>,
{
    tracing::info!(worker = id, "Worker started");

    while let Ok(event) = receiver.recv() {
        handle_event(id, &event, &sequencer, &stats);
    }

    tracing::info!(worker = id, "Worker stopped");
}

/// Run one event through the sequencer, logging and counting the outcome.
///
/// Worker id 0 is the shutdown thread draining a pool that never started.
pub(crate) fn handle_event<S>(
    id: usize,
    event: &Event,
    sequencer: &Sequencer<S>,
    stats: &PipelineStats,
) where
    S: KeyedStore<Rocket>,
{
    tracing::debug!(
        worker = id,
        channel = %event.channel,
        sequence = %event.sequence,
        kind = %event.kind,
        "Worker received message"
    );

    match sequencer.process(event) {
        Ok(status) => {
            stats.record_status(status);
            tracing::debug!(
                worker = id,
                channel = %event.channel,
                sequence = %event.sequence,
                status = %status,
                "Message processed"
            );
        }
        Err(e) => {
            stats.record_failed();
            tracing::warn!(
                worker = id,
                channel = %event.channel,
                sequence = %event.sequence,
                kind = %event.kind,
                error = %e,
                "Error processing message"
            );
        }
    }
}
