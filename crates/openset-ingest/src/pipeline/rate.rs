//! Throughput reporting after each dispatched batch.
//!
//! Rates are cumulative averages since the run started, not windowed. They
//! are informational only and never feed back into flow control.

use super::state::{PipelineState, ProgressSnapshot};
use openset_core::metrics::set_gauge;
use std::time::Duration;

/// Lower bound on elapsed time used as a divisor.
pub const MIN_ELAPSED_SECS: f64 = 0.001;

/// Cumulative throughput at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateSnapshot {
    pub events_per_sec: f64,
    pub bytes_per_sec: f64,
    pub elapsed_secs: f64,
}

impl RateSnapshot {
    pub fn compute(events: u64, bytes: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64().max(MIN_ELAPSED_SECS);
        Self {
            events_per_sec: events as f64 / secs,
            bytes_per_sec: bytes as f64 / secs,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// Rates for a progress snapshot, counting events as they leave the queue.
    pub fn from_progress(progress: &ProgressSnapshot) -> Self {
        Self::compute(progress.events_consumed, progress.bytes_read, progress.elapsed)
    }
}

/// Logs progress and publishes rate gauges.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateReporter;

impl RateReporter {
    pub fn new() -> Self {
        Self
    }

    /// Log one progress line for the current state and return the rates.
    pub fn report(&self, state: &PipelineState) -> RateSnapshot {
        let progress = state.snapshot();
        let rate = RateSnapshot::from_progress(&progress);

        set_gauge("ingest_events_per_second", rate.events_per_sec);
        set_gauge("ingest_bytes_per_second", rate.bytes_per_sec);

        tracing::info!(
            "@ {}, {} lines/sec, {} bytes/sec (malformed: {}, failed batches: {})",
            group_thousands(progress.events_consumed),
            group_thousands(rate.events_per_sec.round() as u64),
            group_thousands(rate.bytes_per_sec.round() as u64),
            progress.lines_malformed,
            progress.batches_failed,
        );

        rate
    }
}

/// Format a count with `,` thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_compute() {
        let rate = RateSnapshot::compute(10_000, 2_000_000, Duration::from_secs(2));
        assert_eq!(rate.events_per_sec, 5_000.0);
        assert_eq!(rate.bytes_per_sec, 1_000_000.0);
        assert_eq!(rate.elapsed_secs, 2.0);
    }

    #[test]
    fn test_rate_zero_elapsed_is_finite() {
        let rate = RateSnapshot::compute(1_000, 50_000, Duration::ZERO);
        assert!(rate.events_per_sec.is_finite());
        assert_eq!(rate.events_per_sec, 1_000.0 / MIN_ELAPSED_SECS);
        assert_eq!(rate.elapsed_secs, 0.0);
    }

    #[test]
    fn test_rate_from_progress_uses_consumed_events() {
        let progress = ProgressSnapshot {
            events_parsed: 9_000,
            events_consumed: 4_000,
            bytes_read: 8_000,
            elapsed: Duration::from_secs(4),
            ..Default::default()
        };
        let rate = RateSnapshot::from_progress(&progress);
        assert_eq!(rate.events_per_sec, 1_000.0);
        assert_eq!(rate.bytes_per_sec, 2_000.0);
    }

    #[test]
    fn test_report_returns_rates() {
        let state = PipelineState::new();
        state.record_line(99);
        state.record_consumed(1);
        let rate = RateReporter::new().report(&state);
        assert!(rate.events_per_sec > 0.0);
        assert!(rate.bytes_per_sec >= rate.events_per_sec);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }
}
