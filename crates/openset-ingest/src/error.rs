//! Error types for the ingestion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an ingestion run.
///
/// Per-line and per-batch failures never surface here; they are logged and
/// counted by the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path could not be listed. Fatal before any batch is sent.
    #[error("cannot enumerate source {}: {source}", .path.display())]
    SourceEnumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event or batch construction error.
    #[error(transparent)]
    Core(#[from] openset_core::Error),

    /// The line source task panicked or was cancelled.
    #[error("source task failed: {0}")]
    SourceTask(String),
}

/// Failure reported by a [`crate::RemoteSink`] for one batch.
#[derive(Error, Debug)]
pub enum SinkError {
    /// HTTP client failure (transport, rejection, bad status).
    #[error(transparent)]
    Client(#[from] openset_client::ClientError),

    /// The sink refused the batch for a reason of its own.
    ///
    /// Not produced by [`crate::HttpSink`], whose refusals arrive as
    /// [`openset_client::ClientError::Remote`]; available to other
    /// [`crate::RemoteSink`] implementations.
    #[error("batch rejected: {0}")]
    Rejected(String),
}
