//! Wire types for the cluster's admin endpoints.
//!
//! Success payloads are treated as opaque JSON by the client. Only the
//! request bodies we build and the error envelope we need to interpret are
//! modelled here.

use serde::{Deserialize, Serialize};

/// Storage type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Double,
    Text,
    Bool,
}

impl ColumnType {
    /// Name used on the wire and in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Text => "text",
            Self::Bool => "bool",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column in a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Column holds a set of values rather than a single value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_set: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_set: false,
        }
    }
}

/// Body of `POST /v1/table/{table}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub columns: Vec<ColumnDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_order: Option<Vec<String>>,
}

/// Error details returned by the cluster on a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Error class (e.g. `insert`, `query`, `config`).
    pub class: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

/// `{ "error": { ... } }` wrapper around [`RemoteError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: RemoteError,
}
