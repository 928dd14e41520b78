//! Pipeline configuration and counters.

use crate::error::{Result, TelemetryError};
use crate::types::ProcessStatus;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Environment variable overriding [`PipelineConfig::queue_capacity`].
pub const QUEUE_CAPACITY_ENV: &str = "ROCKET_QUEUE_CAPACITY";

/// Environment variable overriding [`PipelineConfig::workers`].
pub const WORKERS_ENV: &str = "ROCKET_WORKERS";

/// Sizing of the ingestion pipeline. Fixed for the pipeline's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Max queued events before submissions are rejected.
    /// Default: 1000
    pub queue_capacity: usize,

    /// Number of worker threads draining the queue.
    /// Default: 5
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1000,
            workers: 5,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `ROCKET_QUEUE_CAPACITY` and `ROCKET_WORKERS`.
    ///
    /// Unset or empty variables keep the default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            queue_capacity: parse_or(&lookup, QUEUE_CAPACITY_ENV, defaults.queue_capacity)?,
            workers: parse_or(&lookup, WORKERS_ENV, defaults.workers)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(TelemetryError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(TelemetryError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F>(lookup: &F, name: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value.trim().parse().map_err(|_| {
            TelemetryError::InvalidConfig(format!("{name} is not a number: {value:?}"))
        }),
        _ => Ok(default),
    }
}

/// Live counters shared between the pipeline and its workers.
#[derive(Debug, Default)]
pub(crate) struct PipelineStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
    processed: AtomicU64,
    duplicates: AtomicU64,
    ignored: AtomicU64,
    failed: AtomicU64,
}

impl PipelineStats {
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn revert_accepted(&self) {
        self.accepted.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_status(&self, status: ProcessStatus) {
        let counter = match status {
            ProcessStatus::Processed => &self.processed,
            ProcessStatus::ReprocessedDuplicate => &self.duplicates,
            ProcessStatus::IgnoringOldMessage => &self.ignored,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn snapshot(&self, queued: usize) -> StatsSnapshot {
        StatsSnapshot {
            queued,
            accepted: self.accepted.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
            processed: self.processed.load(Ordering::SeqCst),
            duplicates: self.duplicates.load(Ordering::SeqCst),
            ignored: self.ignored.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Events waiting in the queue when the snapshot was taken.
    pub queued: usize,
    /// Events taken onto the queue.
    pub accepted: u64,
    /// Events refused because the queue was full.
    pub rejected: u64,
    pub processed: u64,
    pub duplicates: u64,
    pub ignored: u64,
    /// Events whose processing returned an error.
    pub failed: u64,
}

impl StatsSnapshot {
    /// Accepted events that have finished processing, successfully or not.
    pub fn completed(&self) -> u64 {
        self.processed + self.duplicates + self.ignored + self.failed
    }

    /// Accepted events not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.completed())
    }
}
