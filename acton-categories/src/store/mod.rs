//! Category persistence
//!
//! The views never talk to a database directly. They go through
//! [`CategoryStore`], which stores opaque [`CategoryRecord`]s scoped to one
//! [`TypeIdentifier`] at a time. Two implementations ship with the crate:
//!
//! - [`MemoryStore`] - process-local, used by tests and the demo host
//! - [`SqliteStore`] - sqlx-backed, writes each record atomically
//!
//! Store failures are not retried here; they propagate as
//! [`CategoryError`](crate::error::CategoryError) and end the request.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CategoryResult;
use crate::registry::TypeIdentifier;
use crate::schema::CATEGORY_NAME_FIELD;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A persisted category instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Primary key, `None` until first saved
    pub id: Option<i64>,
    /// Display label
    pub category_name: String,
    /// Type-specific field values keyed by field name
    pub values: BTreeMap<String, serde_json::Value>,
}

impl CategoryRecord {
    /// Create an unsaved record
    #[must_use]
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            id: None,
            category_name: category_name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a type-specific value
    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set_field(field, value);
        self
    }

    /// Read any field, including `category_name`
    #[must_use]
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        if name == CATEGORY_NAME_FIELD {
            return Some(serde_json::Value::String(self.category_name.clone()));
        }
        self.values.get(name).cloned()
    }

    /// Write any field, including `category_name`
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        let name = name.into();
        let value = value.into();
        if name == CATEGORY_NAME_FIELD {
            self.category_name = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
        } else {
            self.values.insert(name, value);
        }
    }

    /// Textual form of a field as it would appear in an HTML input
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.field(name).and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }
}

impl fmt::Display for CategoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category_name)
    }
}

/// Storage backend for category records
///
/// Every operation is scoped to one category type: an id that belongs to a
/// different type behaves exactly like an id that does not exist.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Number of records of a type
    async fn count(&self, category_type: &TypeIdentifier) -> CategoryResult<u64>;

    /// Records of a type ordered by id, windowed by `offset`/`limit`
    async fn list(
        &self,
        category_type: &TypeIdentifier,
        offset: u64,
        limit: u64,
    ) -> CategoryResult<Vec<CategoryRecord>>;

    /// Fetch one record
    async fn get(&self, category_type: &TypeIdentifier, id: i64)
        -> CategoryResult<Option<CategoryRecord>>;

    /// Insert (`id == None`) or update a record as a single atomic write
    ///
    /// Returns the stored record with its id set.
    async fn save(
        &self,
        category_type: &TypeIdentifier,
        record: CategoryRecord,
    ) -> CategoryResult<CategoryRecord>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, category_type: &TypeIdentifier, id: i64) -> CategoryResult<bool>;
}
