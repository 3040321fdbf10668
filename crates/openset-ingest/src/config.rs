//! Ingestion run configuration.

use crate::error::{Error, Result};
use openset_core::{MAX_BATCH_SIZE, validate_table_name};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Input directory (or single file) of line-delimited JSON.
    pub input: PathBuf,

    /// Target table.
    pub table: String,

    /// Events per insert request.
    /// Default: 1000 (the cluster maximum)
    pub max_batch_size: usize,

    /// Queue depth at which the line source is paused.
    /// Default: 50,000
    pub high_watermark: usize,

    /// Queue depth below which a paused source is resumed.
    /// Default: 25,000
    pub resume_watermark: usize,

    /// Queue depth required before dispatching while input remains.
    /// Default: 5,000
    pub low_batch_threshold: usize,

    /// Delay between queue polls when there is nothing to send.
    /// Default: 50ms
    pub poll_interval: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            table: String::new(),
            max_batch_size: MAX_BATCH_SIZE,
            high_watermark: 50_000,
            resume_watermark: 25_000,
            low_batch_threshold: 5_000,
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl IngestConfig {
    /// Default tuning for `input` into `table`.
    pub fn new(input: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            table: table.into(),
            ..Default::default()
        }
    }

    /// Check the tuning values against each other.
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table)?;

        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE {
            return Err(Error::Config(format!(
                "max_batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.max_batch_size
            )));
        }

        if self.resume_watermark >= self.high_watermark {
            return Err(Error::Config(format!(
                "resume_watermark ({}) must be below high_watermark ({})",
                self.resume_watermark, self.high_watermark
            )));
        }

        // A paused source never refills the queue past the high watermark.
        if self.low_batch_threshold > self.high_watermark {
            return Err(Error::Config(format!(
                "low_batch_threshold ({}) must not exceed high_watermark ({})",
                self.low_batch_threshold, self.high_watermark
            )));
        }

        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll_interval must be non-zero".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = IngestConfig::new("./events", "highstreet");
        assert_eq!(config.max_batch_size, 1000);
        assert_eq!(config.high_watermark, 50_000);
        assert_eq!(config.resume_watermark, 25_000);
        assert_eq!(config.low_batch_threshold, 5_000);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_table() {
        let config = IngestConfig::new("./events", "high street");
        assert!(matches!(config.validate(), Err(Error::Core(_))));
    }

    #[test]
    fn test_validate_batch_size_bounds() {
        let mut config = IngestConfig::new("./events", "t");
        config.max_batch_size = 0;
        assert!(config.validate().is_err());
        config.max_batch_size = 1001;
        assert!(config.validate().is_err());
        config.max_batch_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_watermark_ordering() {
        let config = IngestConfig {
            resume_watermark: 50_000,
            ..IngestConfig::new("./events", "t")
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = IngestConfig {
            low_batch_threshold: 60_000,
            ..IngestConfig::new("./events", "t")
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_zero_threshold_allowed() {
        let config = IngestConfig {
            low_batch_threshold: 0,
            ..IngestConfig::new("./events", "t")
        };
        assert!(config.validate().is_ok());
    }
}
