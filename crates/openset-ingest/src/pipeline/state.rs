//! Shared progress counters for one ingestion run.
//!
//! The line source and the shuttler each own a reference to the same
//! [`PipelineState`]. Every counter only grows; a [`ProgressSnapshot`] is a
//! plain copy taken for reporting.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free counters plus the source completion flag.
#[derive(Debug)]
pub struct PipelineState {
    started: Instant,
    exhausted: AtomicBool,

    lines_read: AtomicU64,
    bytes_read: AtomicU64,
    events_parsed: AtomicU64,
    lines_malformed: AtomicU64,

    events_consumed: AtomicU64,
    events_delivered: AtomicU64,
    events_failed: AtomicU64,
    batches_sent: AtomicU64,
    batches_failed: AtomicU64,
}

/// Point-in-time copy of [`PipelineState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub lines_read: u64,
    /// Line length + 1 for every line read, parsed or not.
    pub bytes_read: u64,
    pub events_parsed: u64,
    pub lines_malformed: u64,
    /// Events taken off the queue into a batch.
    pub events_consumed: u64,
    pub events_delivered: u64,
    pub events_failed: u64,
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Batches dispatched, whatever their outcome.
    pub fn batches_dispatched(&self) -> u64 {
        self.batches_sent + self.batches_failed
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            exhausted: AtomicBool::new(false),
            lines_read: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            events_parsed: AtomicU64::new(0),
            lines_malformed: AtomicU64::new(0),
            events_consumed: AtomicU64::new(0),
            events_delivered: AtomicU64::new(0),
            events_failed: AtomicU64::new(0),
            batches_sent: AtomicU64::new(0),
            batches_failed: AtomicU64::new(0),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    // =========================================================================
    // Source side
    // =========================================================================

    /// Count one raw line of `len` bytes (terminator excluded).
    pub fn record_line(&self, len: usize) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(len as u64 + 1, Ordering::Relaxed);
    }

    pub fn record_parsed(&self) {
        self.events_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.lines_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark the source as finished. Returns true only for the first call.
    pub fn mark_exhausted(&self) -> bool {
        !self.exhausted.swap(true, Ordering::Release)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    // =========================================================================
    // Shuttler side
    // =========================================================================

    pub fn record_consumed(&self, events: usize) {
        self.events_consumed
            .fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn record_batch_sent(&self, events: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.events_delivered
            .fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn record_batch_failed(&self, events: usize) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        self.events_failed.fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            events_parsed: self.events_parsed.load(Ordering::Relaxed),
            lines_malformed: self.lines_malformed.load(Ordering::Relaxed),
            events_consumed: self.events_consumed.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bytes_include_terminator() {
        let state = PipelineState::new();
        state.record_line(10);
        state.record_line(0);

        let snap = state.snapshot();
        assert_eq!(snap.lines_read, 2);
        assert_eq!(snap.bytes_read, 12);
    }

    #[test]
    fn test_mark_exhausted_once() {
        let state = PipelineState::new();
        assert!(!state.is_exhausted());
        assert!(state.mark_exhausted());
        assert!(!state.mark_exhausted());
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_batch_outcomes() {
        let state = PipelineState::new();
        state.record_consumed(1000);
        state.record_batch_sent(1000);
        state.record_consumed(250);
        state.record_batch_failed(250);

        let snap = state.snapshot();
        assert_eq!(snap.events_consumed, 1250);
        assert_eq!(snap.events_delivered, 1000);
        assert_eq!(snap.events_failed, 250);
        assert_eq!(snap.batches_sent, 1);
        assert_eq!(snap.batches_failed, 1);
        assert_eq!(snap.batches_dispatched(), 2);
    }
}
