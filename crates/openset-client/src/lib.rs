//! HTTP client for an OpenSet cluster.
//!
//! This crate wraps the cluster's REST endpoints as plain request/response
//! calls and ships the thin admin command-line tools built on them.
//!
//! # Modules
//!
//! - [`client`] - [`OpenSetClient`] with one method per endpoint
//! - [`config`] - [`ClientConfig`] (host, port, timeout)
//! - [`cli`] - Connection arguments and startup helpers shared by the binaries

pub mod cli;
pub mod client;
pub mod config;
mod error;

pub use client::{OpenSetClient, QueryOptions, SortOrder};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
