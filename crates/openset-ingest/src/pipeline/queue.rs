//! Bounded FIFO of parsed events with watermark flow control.
//!
//! The queue never blocks the producer. Instead it tells the line source to
//! pause when a push reaches the high watermark and to resume once a drain
//! takes the depth back under the resume watermark:
//!
//! ```text
//!            push ≥ high                 drain < resume
//!   running ─────────────▶ pause ─────────────────────▶ running
//! ```
//!
//! The producer checks for a pause before every line, so the push that
//! reaches the high watermark is the last one until a resume: depth never
//! goes above it.

use openset_core::Event;
use openset_core::metrics::set_gauge;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Pause/resume capability of the line source.
pub trait FlowControl: Send + Sync {
    /// Stop emitting lines until [`FlowControl::resume`] is called.
    fn pause(&self);

    /// Continue emitting lines.
    fn resume(&self);
}

/// Depth thresholds that drive [`FlowControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermarks {
    /// Pause the source once depth reaches this.
    pub high: usize,

    /// Resume a paused source once depth drops below this.
    pub resume: usize,
}

impl Default for Watermarks {
    fn default() -> Self {
        Self {
            high: 50_000,
            resume: 25_000,
        }
    }
}

/// Flow-control history of a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Deepest the queue has been.
    pub max_depth: usize,
    /// Pause requests sent to the source.
    pub pauses: u64,
    /// Resume requests sent to the source.
    pub resumes: u64,
}

struct Inner {
    events: VecDeque<Event>,
    pause_requested: bool,
    stats: QueueStats,
}

/// Single-producer, single-consumer event buffer.
pub struct BoundedQueue {
    inner: Mutex<Inner>,
    watermarks: Watermarks,
    control: Arc<dyn FlowControl>,
}

impl BoundedQueue {
    pub fn new(watermarks: Watermarks, control: Arc<dyn FlowControl>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                events: VecDeque::new(),
                pause_requested: false,
                stats: QueueStats::default(),
            }),
            watermarks,
            control,
        }
    }

    /// Append an event and return the new depth.
    ///
    /// Requests a pause when this push takes the depth to the high watermark.
    pub fn push(&self, event: Event) -> usize {
        let mut inner = self.inner.lock();
        inner.events.push_back(event);
        let len = inner.events.len();
        inner.stats.max_depth = inner.stats.max_depth.max(len);

        // Control calls stay under the lock so a pause can never land after
        // the resume that should have cancelled it.
        if len >= self.watermarks.high && !inner.pause_requested {
            inner.pause_requested = true;
            inner.stats.pauses += 1;
            self.control.pause();
            set_gauge("ingest_source_paused", 1.0);
            tracing::debug!("Queue at {} events, pausing source", len);
        }

        set_gauge("ingest_queue_depth", len as f64);
        len
    }

    /// Remove up to `max` events from the front, in FIFO order.
    ///
    /// Requests a resume when a paused source can refill the queue.
    pub fn drain(&self, max: usize) -> Vec<Event> {
        let mut inner = self.inner.lock();
        let take = max.min(inner.events.len());
        let drained: Vec<Event> = inner.events.drain(..take).collect();
        let len = inner.events.len();

        if inner.pause_requested && len < self.watermarks.resume {
            inner.pause_requested = false;
            inner.stats.resumes += 1;
            self.control.resume();
            set_gauge("ingest_source_paused", 0.0);
            tracing::debug!("Queue at {} events, resuming source", len);
        }

        set_gauge("ingest_queue_depth", len as f64);
        drained
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        self.inner.lock().stats
    }
}
