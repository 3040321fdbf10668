//! Client configuration.

use crate::error::{ClientError, Result};
use openset_core::{DEFAULT_HOST, DEFAULT_PORT};
use std::time::Duration;

/// Where and how to reach the cluster.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or IP address of any cluster node.
    pub host: String,

    /// HTTP port of that node.
    pub port: u16,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Config for `host:port` with the default timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Base URL of the node, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host.trim_end_matches('/'), self.port)
    }

    /// Reject configurations that cannot produce a usable URL.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::Config("port must be non-zero".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 2020);
        assert_eq!(config.base_url(), "http://127.0.0.1:2020");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_custom_host() {
        let config = ClientConfig::new("db-1.internal", 8080);
        assert_eq!(config.base_url(), "http://db-1.internal:8080");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("", 2020).validate().is_err());
        assert!(ClientConfig::new("localhost", 0).validate().is_err());

        let no_timeout = ClientConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(no_timeout.validate().is_err());
    }
}
