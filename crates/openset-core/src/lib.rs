//! Core types and shared utilities for the OpenSet ingestion tools.
//!
//! This crate provides:
//! - The [`Event`] and [`Batch`] types that flow from JSONL files to the cluster
//! - Wire types for the cluster's admin and insert endpoints
//! - Prometheus metrics helpers
//! - Shared error types

mod error;
mod event;
pub mod metrics;
pub mod wire;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Maximum number of events accepted by one insert request.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Default cluster host used by the command-line tools.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default cluster HTTP port used by the command-line tools.
pub const DEFAULT_PORT: u16 = 2020;

pub use error::{Error, Result};
pub use event::{Batch, Event, parse_event, validate_table_name};
pub use wire::{ColumnDef, ColumnType, CreateTableRequest, ErrorEnvelope, RemoteError};
