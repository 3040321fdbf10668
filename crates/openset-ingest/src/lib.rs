//! Flow-controlled ingestion of line-delimited JSON events into OpenSet.
//!
//! Reads every file of an input directory in name order, parses each line as
//! an event and ships the events to a cluster's insert endpoint in batches of
//! at most 1000.
//!
//! # Modules
//!
//! - [`source`] - Line source with pause/resume and the line parser
//! - [`pipeline`] - Bounded queue, batch shuttler, shared state and rate reporting
//! - [`sink`] - [`RemoteSink`] trait and the HTTP implementation
//! - [`config`] - [`IngestConfig`] tuning
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   LineSource    │  files sorted by name, read line by line
//! └────────┬────────┘
//!          │  parse_line (malformed lines logged and skipped)
//!          ▼
//! ┌─────────────────┐
//! │  BoundedQueue   │  pause at 50,000 queued, resume below 25,000
//! └────────┬────────┘
//!          │  drain ≤ 1000 once ≥ 5,000 queued (or source exhausted)
//!          ▼
//! ┌─────────────────┐
//! │  BatchShuttler  │  one batch in flight, failures logged not retried
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   RemoteSink    │  POST /v1/insert/{table}
//! └─────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use config::IngestConfig;
pub use error::{Error, Result, SinkError};
pub use pipeline::{
    IngestPipeline, PipelineState, PipelineSummary, ProgressSnapshot, QueueStats, RateSnapshot,
};
pub use sink::{HttpSink, RemoteSink};
pub use source::{LineSource, SourceControl, SourceStats};
