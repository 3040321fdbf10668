//! Error types shared by the OpenSet tools.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building events and batches.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing error (also covers invalid UTF-8 input).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The line parsed as JSON, but not as an object.
    #[error("event must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A batch must carry at least one event.
    #[error("batch must contain at least one event")]
    EmptyBatch,

    /// A batch exceeds the insert endpoint limit.
    #[error("batch of {len} events exceeds maximum {max}")]
    BatchTooLarge {
        /// Number of events offered.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Table names end up in URL paths and must be plain identifiers.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_object_display() {
        let err = Error::NotAnObject("array");
        assert_eq!(err.to_string(), "event must be a JSON object, got array");
    }

    #[test]
    fn test_batch_too_large_display() {
        let err = Error::BatchTooLarge { len: 1001, max: 1000 };
        assert_eq!(err.to_string(), "batch of 1001 events exceeds maximum 1000");
    }

    #[test]
    fn test_invalid_table_name_display() {
        let err = Error::InvalidTableName {
            name: "my table".to_string(),
            reason: "only ASCII letters, digits and '_' are allowed",
        };
        let msg = err.to_string();
        assert!(msg.contains("my table"));
        assert!(msg.contains("only ASCII letters"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
