//! Batch shuttler: moves events from the queue to the sink.
//!
//! The shuttler is an explicit loop over [`ShuttlerPhase`]. Each turn it looks
//! at the queue depth and the source's exhausted flag, then either sleeps for
//! the poll interval, dispatches one batch, or finishes:
//!
//! ```text
//!                 queued ≥ low            source exhausted
//!   Idle ──▶ Accumulating ──────▶ Dispatching ─────────────▶ Draining
//!    ▲            │                    │                        │
//!    └────────────┴──── sleep ◀────────┘ (queue empty)          ▼
//!                                                            Complete
//! ```
//!
//! A dispatch awaits the sink before the loop continues, so at most one batch
//! is ever in flight. Failed batches are logged and counted, never retried.

use super::queue::BoundedQueue;
use super::rate::RateReporter;
use super::state::PipelineState;
use crate::error::Result;
use crate::sink::RemoteSink;
use openset_core::Batch;
use openset_core::metrics::increment;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the shuttler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuttlerPhase {
    /// Queue empty, source still producing.
    Idle,
    /// Queue below the low-batch threshold, source still producing.
    Accumulating,
    /// Enough queued to send a batch.
    Dispatching,
    /// Source exhausted, flushing what is left regardless of threshold.
    Draining,
    /// Source exhausted and queue empty.
    Complete,
}

impl ShuttlerPhase {
    /// Next phase given the queue depth and whether the source is exhausted.
    ///
    /// `exhausted` must be read before `queued` so a final push is never missed.
    pub fn decide(queued: usize, exhausted: bool, low_threshold: usize) -> Self {
        match (queued, exhausted) {
            (0, true) => Self::Complete,
            (0, false) => Self::Idle,
            (_, true) => Self::Draining,
            (n, false) if n < low_threshold => Self::Accumulating,
            _ => Self::Dispatching,
        }
    }

    pub fn sends_batch(&self) -> bool {
        matches!(self, Self::Dispatching | Self::Draining)
    }
}

/// Tuning for [`BatchShuttler`].
#[derive(Debug, Clone)]
pub struct ShuttlerConfig {
    pub table: String,
    pub max_batch_size: usize,
    pub low_batch_threshold: usize,
    pub poll_interval: Duration,
}

/// Single-flight dispatcher from a [`BoundedQueue`] to a [`RemoteSink`].
pub struct BatchShuttler<'a, S> {
    config: ShuttlerConfig,
    queue: Arc<BoundedQueue>,
    state: Arc<PipelineState>,
    sink: &'a S,
    reporter: RateReporter,
    phase: ShuttlerPhase,
}

impl<'a, S: RemoteSink> BatchShuttler<'a, S> {
    pub fn new(
        config: ShuttlerConfig,
        queue: Arc<BoundedQueue>,
        state: Arc<PipelineState>,
        sink: &'a S,
    ) -> Self {
        Self {
            config,
            queue,
            state,
            sink,
            reporter: RateReporter::new(),
            phase: ShuttlerPhase::Idle,
        }
    }

    /// Run until the source is exhausted and the queue is drained.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let exhausted = self.state.is_exhausted();
            let queued = self.queue.len();
            self.enter(ShuttlerPhase::decide(
                queued,
                exhausted,
                self.config.low_batch_threshold,
            ));

            if self.phase == ShuttlerPhase::Complete {
                break;
            }

            if self.phase.sends_batch() {
                self.dispatch().await?;
                // Give the source a turn between back-to-back batches.
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Ok(())
    }

    fn enter(&mut self, phase: ShuttlerPhase) {
        if phase != self.phase {
            tracing::debug!("Shuttler {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Send one batch of up to `max_batch_size` events and record the outcome.
    async fn dispatch(&mut self) -> Result<()> {
        let events = self.queue.drain(self.config.max_batch_size);
        if events.is_empty() {
            return Ok(());
        }

        let count = events.len();
        self.state.record_consumed(count);
        let batch = Batch::new(self.config.table.clone(), events)?;

        let started = Instant::now();
        let result = self.sink.send_batch(batch).await;
        metrics::histogram!("ingest_batch_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(response) => {
                self.state.record_batch_sent(count);
                increment("ingest_batches_sent_total", 1);
                increment("ingest_events_sent_total", count as u64);
                tracing::debug!("Batch of {} events acknowledged: {}", count, response);
            }
            Err(e) => {
                self.state.record_batch_failed(count);
                increment("ingest_batches_failed_total", 1);
                increment("ingest_events_failed_total", count as u64);
                tracing::error!("Batch of {} events failed: {}", count, e);
            }
        }

        self.reporter.report(&self.state);
        Ok(())
    }
}
