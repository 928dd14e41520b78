//! Rocket service tying the store, sequencer and pipeline together.

use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineConfig, StatsSnapshot};
use crate::sequencer::Sequencer;
use crate::store::{KeyedStore, MemoryStore};
use crate::types::{Event, Rocket};
use crate::wire::decode_event;
use std::sync::Arc;
use std::time::Duration;

/// The rocket telemetry service.
///
/// Provides a unified interface for:
/// - Ingesting events (accepted or rejected synchronously, processed later)
/// - Querying one rocket by channel
/// - Listing all rockets ordered by channel
pub struct RocketService<S = MemoryStore<Rocket>>
where
    S: KeyedStore<Rocket> + 'static,
{
    store: Arc<S>,
    pipeline: Pipeline<S>,
}

impl RocketService<MemoryStore<Rocket>> {
    /// Start a service backed by an in-memory store.
    pub fn start(config: PipelineConfig) -> Result<Self> {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }
}

impl<S> RocketService<S>
where
    S: KeyedStore<Rocket> + 'static,
{
    /// Start a service over an existing store.
    pub fn with_store(store: Arc<S>, config: PipelineConfig) -> Result<Self> {
        let sequencer = Arc::new(Sequencer::new(Arc::clone(&store)));
        let pipeline = Pipeline::spawn(sequencer, config)?;
        Ok(Self { store, pipeline })
    }

    // --- Ingest ---

    /// Queue an event for processing. `QueueFull` means retry later.
    pub fn ingest(&self, event: Event) -> Result<()> {
        self.pipeline.submit(event)
    }

    /// Decode a JSON envelope and queue the resulting event.
    pub fn ingest_json(&self, bytes: &[u8]) -> Result<()> {
        self.ingest(decode_event(bytes)?)
    }

    // --- Queries ---

    /// Current state of one rocket.
    pub fn rocket(&self, channel: &str) -> Result<Rocket> {
        self.store.get(channel)
    }

    /// All rockets, ordered by channel.
    pub fn rockets(&self) -> Result<Vec<Rocket>> {
        self.store.get_all()
    }

    // --- Lifecycle ---

    pub fn stats(&self) -> StatsSnapshot {
        self.pipeline.stats()
    }

    /// Wait until every accepted event has been processed.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.pipeline.wait_idle(timeout)
    }

    /// Stop accepting events and drain the queue.
    pub fn shutdown(&self) {
        self.pipeline.shutdown();
    }
}
