//! Pieces shared by the command-line tools.
//!
//! Every tool takes `-h/--host` and `-p/--port`, so the automatic `-h` help
//! flag is disabled on each command and help is reachable as `--help` only.

use crate::config::ClientConfig;
use clap::{ArgAction, Args};
use openset_core::{DEFAULT_HOST, DEFAULT_PORT};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Connection arguments accepted by every tool.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Cluster node address
    #[arg(short = 'h', long, env = "OPENSET_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Cluster node HTTP port
    #[arg(short, long, env = "OPENSET_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Request timeout in seconds
    #[arg(long, env = "OPENSET_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Load a `.env` file from the working directory (or a parent) if present.
///
/// Must run before argument parsing so `env` fallbacks can see the values.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => eprintln!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Ignoring unreadable .env file: {}", e),
    }
}

/// Load an explicitly named env file. Unlike [`load_dotenv`], a missing file is an error.
pub fn load_dotenv_from(path: &Path) -> dotenvy::Result<()> {
    dotenvy::from_path(path)?;
    eprintln!("Loaded environment from {}", path.display());
    Ok(())
}

/// Initialize the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

/// Pretty-print a response body to stdout.
pub fn print_json(value: &Value) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(disable_help_flag = true)]
    struct TestArgs {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    #[test]
    fn test_short_h_is_host() {
        let args = TestArgs::try_parse_from(["tool", "-h", "10.0.0.5", "-p", "3030"]).unwrap();
        let config = args.connection.to_config();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 3030);
        assert_eq!(config.base_url(), "http://10.0.0.5:3030");
    }

    #[test]
    fn test_load_dotenv_from_missing_file() {
        let dir = std::env::temp_dir().join("openset-no-such-dir");
        assert!(load_dotenv_from(&dir.join("missing.env")).is_err());
    }

    #[test]
    fn test_long_help_still_available() {
        let err = TestArgs::try_parse_from(["tool", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
