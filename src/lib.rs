//! # Rocket Telemetry
//!
//! Reconstructs the current state of rockets from a stream of out-of-order,
//! possibly duplicated telemetry events.
//!
//! ## Core Concepts
//!
//! - **Store**: Thread-safe keyed snapshots, one per rocket channel
//! - **State machine**: Pure per-kind transitions (launch, speed, explosion, mission)
//! - **Sequencer**: Applies, re-applies or ignores an event by its sequence number
//! - **Pipeline**: Bounded queue drained by a fixed pool of worker threads
//!
//! ## Example
//!
//! ```ignore
//! use rocket_telemetry::{Event, EventKind, PipelineConfig, RocketService};
//!
//! let service = RocketService::start(PipelineConfig::default())?;
//!
//! service.ingest(Event::json("rocket-1", 1, EventKind::Launched, &json!({
//!     "type": "Falcon-9", "launchSpeed": 500, "mission": "ARTEMIS"
//! }))?)?;
//!
//! // Processing is asynchronous; results show up in the store
//! service.shutdown();
//! let rocket = service.rocket("rocket-1")?;
//! ```

pub mod error;
pub mod pipeline;
pub mod sequencer;
pub mod service;
pub mod state;
pub mod store;
pub mod types;
pub mod wire;

// Re-exports
pub use error::{Result, TelemetryError};
pub use pipeline::{Pipeline, PipelineConfig, StatsSnapshot};
pub use sequencer::Sequencer;
pub use service::RocketService;
pub use state::apply_event;
pub use store::{Keyed, KeyedStore, MemoryStore};
pub use types::*;
pub use wire::{decode_event, Envelope, Metadata};
