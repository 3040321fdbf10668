//! Events and insert batches.
//!
//! An [`Event`] is an opaque JSON object. The client enforces no schema on it;
//! the cluster validates columns when the batch arrives. A [`Batch`] groups up
//! to [`MAX_BATCH_SIZE`] events for one table and serializes exactly as the
//! body of an insert request:
//!
//! ```text
//! { "table": "highstreet", "events": [ {...}, {...} ] }
//! ```

use crate::MAX_BATCH_SIZE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One application event destined for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Map<String, Value>);

impl Event {
    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl TryFrom<Value> for Event {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(_) => Err(Error::NotAnObject("array")),
            Value::String(_) => Err(Error::NotAnObject("string")),
            Value::Number(_) => Err(Error::NotAnObject("number")),
            Value::Bool(_) => Err(Error::NotAnObject("bool")),
            Value::Null => Err(Error::NotAnObject("null")),
        }
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Self {
        Value::Object(event.0)
    }
}

/// Parse one raw line (without its terminator) into an [`Event`].
///
/// Invalid UTF-8 and invalid JSON surface as [`Error::Json`]; a valid JSON
/// value that is not an object is rejected with [`Error::NotAnObject`].
pub fn parse_event(line: &[u8]) -> Result<Event> {
    let value: Value = serde_json::from_slice(line)?;
    Event::try_from(value)
}

/// Check that a table name is usable as a URL path segment.
///
/// Accepts non-empty names made of ASCII letters, digits and `_`.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidTableName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidTableName {
            name: name.to_string(),
            reason: "only ASCII letters, digits and '_' are allowed",
        });
    }

    Ok(())
}

/// An immutable group of events for one table, sent in a single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    table: String,
    events: Vec<Event>,
}

impl Batch {
    /// Build a batch, enforcing `1..=MAX_BATCH_SIZE` events and a valid table name.
    pub fn new(table: impl Into<String>, events: Vec<Event>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;

        if events.is_empty() {
            return Err(Error::EmptyBatch);
        }

        if events.len() > MAX_BATCH_SIZE {
            return Err(Error::BatchTooLarge {
                len: events.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        Ok(Self { table, events })
    }

    /// Target table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Events in dispatch order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false for a constructed batch; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
