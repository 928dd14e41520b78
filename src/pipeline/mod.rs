//! Ingestion pipeline: a bounded queue drained by a fixed worker pool.
//!
//! Producers hand events to [`Pipeline::submit`], which never blocks. A full
//! queue is reported back immediately as [`TelemetryError::QueueFull`].
//! Accepted events are processed asynchronously; their outcome is only
//! visible through the store, the logs and [`Pipeline::stats`].
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let sequencer = Arc::new(Sequencer::new(Arc::clone(&store)));
//! let pipeline = Pipeline::spawn(sequencer, PipelineConfig::default())?;
//!
//! pipeline.submit(event)?;
//!
//! // Close the queue and wait for workers to drain it
//! pipeline.shutdown();
//! ```
//!
//! [`TelemetryError::QueueFull`]: crate::error::TelemetryError::QueueFull

mod queue;
mod types;
mod worker;

pub use queue::Pipeline;
pub use types::{PipelineConfig, StatsSnapshot};
