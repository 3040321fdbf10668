//! Error types for the HTTP client.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias using the client's error type.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by [`crate::OpenSetClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The cluster rejected the request with an error envelope.
    #[error("{class} error ({status}): {message}")]
    Remote {
        status: StatusCode,
        class: String,
        message: String,
    },

    /// Non-success status without a recognizable error body.
    #[error("unexpected response ({status}): {body}")]
    Status { status: StatusCode, body: String },

    /// Invalid input caught before sending.
    #[error(transparent)]
    Core(#[from] openset_core::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
