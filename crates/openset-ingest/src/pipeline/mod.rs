//! Flow-controlled ingestion pipeline.
//!
//! - [`BoundedQueue`] - FIFO of parsed events with pause/resume watermarks
//! - [`BatchShuttler`] - single-flight dispatcher from the queue to a sink
//! - [`PipelineState`] - counters shared by the source and the shuttler
//! - [`RateReporter`] - per-batch throughput logging
//!
//! # Architecture
//!
//! ```text
//!  LineSource ──▶ parse_line ──▶ BoundedQueue ──▶ BatchShuttler ──▶ RemoteSink
//!   (task)                        │      ▲          (caller)
//!      ▲                          │      │
//!      └──── pause / resume ◀─────┘      └── drain ≤ 1000
//! ```
//!
//! The source runs as its own task so it keeps filling the queue while the
//! shuttler waits on the sink.

mod queue;
mod rate;
mod shuttler;
mod state;

pub use queue::{BoundedQueue, FlowControl, QueueStats, Watermarks};
pub use rate::{MIN_ELAPSED_SECS, RateReporter, RateSnapshot, group_thousands};
pub use shuttler::{BatchShuttler, ShuttlerConfig, ShuttlerPhase};
pub use state::{PipelineState, ProgressSnapshot};

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::sink::RemoteSink;
use crate::source::{LineSource, ParseOutcome, SourceControl, SourceLine, SourceStats, parse_line};
use openset_core::metrics::increment;
use std::sync::Arc;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSummary {
    /// Files found in the input.
    pub files: usize,
    pub source: SourceStats,
    pub queue: QueueStats,
    pub progress: ProgressSnapshot,
    pub rate: RateSnapshot,
}

/// One ingestion run from an input path into a sink.
pub struct IngestPipeline<S> {
    config: IngestConfig,
    sink: S,
}

impl<S: RemoteSink> IngestPipeline<S> {
    pub fn new(config: IngestConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, sink })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Read the whole input and dispatch it.
    ///
    /// Only a failure to enumerate the input is returned as an error, and it
    /// happens before any batch is sent. Bad lines and failed batches are
    /// counted in the summary.
    pub async fn run(&self) -> Result<PipelineSummary> {
        let control = Arc::new(SourceControl::new());
        let source = LineSource::open(&self.config.input, control.clone()).await?;
        let files = source.files().len();

        let state = Arc::new(PipelineState::new());
        let queue = Arc::new(BoundedQueue::new(
            Watermarks {
                high: self.config.high_watermark,
                resume: self.config.resume_watermark,
            },
            control,
        ));

        tracing::info!(
            "Ingesting {} files into table '{}'",
            files,
            self.config.table
        );

        let source_task = tokio::spawn({
            let state = state.clone();
            let queue = queue.clone();
            async move {
                source
                    .run(&state, |line| enqueue_line(line, &state, &queue))
                    .await
            }
        });

        let shuttler = BatchShuttler::new(
            ShuttlerConfig {
                table: self.config.table.clone(),
                max_batch_size: self.config.max_batch_size,
                low_batch_threshold: self.config.low_batch_threshold,
                poll_interval: self.config.poll_interval,
            },
            queue.clone(),
            state.clone(),
            &self.sink,
        );

        if let Err(e) = shuttler.run().await {
            source_task.abort();
            return Err(e);
        }

        let source_stats = source_task
            .await
            .map_err(|e| Error::SourceTask(e.to_string()))?;

        let progress = state.snapshot();
        let rate = RateSnapshot::from_progress(&progress);

        let queue_stats = queue.stats();

        tracing::info!(
            "Ingestion complete: {} events delivered in {} batches, {} failed, {} malformed lines",
            progress.events_delivered,
            progress.batches_dispatched(),
            progress.events_failed,
            progress.lines_malformed
        );
        tracing::debug!(
            "Queue peaked at {} events, source paused {} times",
            queue_stats.max_depth,
            queue_stats.pauses
        );

        Ok(PipelineSummary {
            files,
            source: source_stats,
            queue: queue_stats,
            progress,
            rate,
        })
    }
}

/// Parse one line and queue it, or log why it was skipped.
fn enqueue_line(line: SourceLine<'_>, state: &PipelineState, queue: &BoundedQueue) {
    match parse_line(line.bytes) {
        ParseOutcome::Event(event) => {
            state.record_parsed();
            queue.push(event);
        }
        ParseOutcome::Blank => {}
        ParseOutcome::Malformed(e) => {
            state.record_malformed();
            increment("ingest_lines_malformed_total", 1);
            tracing::warn!(
                "{}:{}: skipping malformed line: {}",
                line.path.display(),
                line.number,
                e
            );
        }
    }
}
