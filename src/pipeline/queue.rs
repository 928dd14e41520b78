//! Bounded event queue and worker pool.

use crate::error::{Result, TelemetryError};
use crate::sequencer::Sequencer;
use crate::store::KeyedStore;
use crate::types::{Event, Rocket};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::types::{PipelineConfig, PipelineStats, StatsSnapshot};
use super::worker::{handle_event, run_worker};

/// Bounded queue in front of a fixed pool of sequencer workers.
pub struct Pipeline<S>
where
    S: KeyedStore<Rocket> + 'static,
{
    config: PipelineConfig,
    sequencer: Arc<Sequencer<S>>,
    /// `None` once the pipeline is shut down.
    sender: RwLock<Option<Sender<Event>>>,
    receiver: Receiver<Event>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stats: Arc<PipelineStats>,
}

impl<S> Pipeline<S>
where
    S: KeyedStore<Rocket> + 'static,
{
    /// Create a pipeline with an open queue and no running workers.
    ///
    /// Submissions are accepted up to capacity but nothing is processed until
    /// [`start_workers`](Self::start_workers) or [`shutdown`](Self::shutdown)
    /// is called.
    pub fn new(sequencer: Arc<Sequencer<S>>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let (sender, receiver) = bounded(config.queue_capacity);

        Ok(Self {
            config,
            sequencer,
            sender: RwLock::new(Some(sender)),
            receiver,
            workers: Mutex::new(Vec::new()),
            stats: Arc::new(PipelineStats::default()),
        })
    }

    /// Create a pipeline and start its workers.
    pub fn spawn(sequencer: Arc<Sequencer<S>>, config: PipelineConfig) -> Result<Self> {
        let pipeline = Self::new(sequencer, config)?;
        pipeline.start_workers()?;
        Ok(pipeline)
    }

    /// Start the worker pool. Calling this again is a no-op.
    pub fn start_workers(&self) -> Result<()> {
        // Lock order: workers, then sender.
        let mut workers = self.workers.lock();
        if self.sender.read().is_none() {
            return Err(TelemetryError::QueueClosed);
        }
        if !workers.is_empty() {
            return Ok(());
        }

        for id in 1..=self.config.workers {
            let receiver = self.receiver.clone();
            let sequencer = Arc::clone(&self.sequencer);
            let stats = Arc::clone(&self.stats);

            let handle = thread::Builder::new()
                .name(format!("rocket-worker-{id}"))
                .spawn(move || run_worker(id, receiver, sequencer, stats))?;
            workers.push(handle);
        }

        tracing::info!(
            workers = self.config.workers,
            queue_capacity = self.config.queue_capacity,
            "Started message processing workers"
        );
        Ok(())
    }

    /// Queue an event without blocking.
    ///
    /// Fails with `QueueFull` when the queue is at capacity, `QueueClosed`
    /// after shutdown, and `InvalidEvent` for an empty channel.
    pub fn submit(&self, event: Event) -> Result<()> {
        if event.channel.is_empty() {
            return Err(TelemetryError::InvalidEvent(
                "event channel must not be empty".to_string(),
            ));
        }

        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(TelemetryError::QueueClosed)?;

        // Counted before the handoff so a worker can never finish it uncounted.
        self.stats.record_accepted();
        match sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                self.stats.revert_accepted();
                self.stats.record_rejected();
                tracing::warn!(
                    channel = %event.channel,
                    sequence = %event.sequence,
                    capacity = self.config.queue_capacity,
                    "Queue full, rejecting message"
                );
                Err(TelemetryError::QueueFull {
                    capacity: self.config.queue_capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => {
                self.stats.revert_accepted();
                Err(TelemetryError::QueueClosed)
            }
        }
    }

    /// Close the queue and wait until everything already accepted is processed.
    ///
    /// If the workers were never started, the remaining events are processed
    /// on the calling thread.
    pub fn shutdown(&self) {
        let mut workers = self.workers.lock();
        let Some(sender) = self.sender.write().take() else {
            return;
        };
        drop(sender);
        let handles: Vec<JoinHandle<()>> = workers.drain(..).collect();
        drop(workers);

        if handles.is_empty() {
            let mut drained = 0usize;
            while let Ok(event) = self.receiver.try_recv() {
                handle_event(0, &event, &self.sequencer, &self.stats);
                drained += 1;
            }
            if drained > 0 {
                tracing::info!(drained, "Drained queue on shutdown without workers");
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                tracing::error!("Worker panicked during shutdown");
            }
        }

        tracing::info!(stats = ?self.stats(), "Pipeline shut down");
    }

    /// Block until every accepted event has been processed, or `timeout`
    /// elapses. Returns whether the pipeline went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.receiver.is_empty() && self.stats().in_flight() == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Counters plus current queue depth.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.receiver.len())
    }

    /// Events currently waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl<S> Drop for Pipeline<S>
where
    S: KeyedStore<Rocket> + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
