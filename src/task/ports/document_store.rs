//! Port for the managed document database with live queries.
//!
//! The store hands out complete snapshots of a query's result set rather
//! than change deltas. Writes may carry a server-timestamp sentinel that the
//! store replaces with its own clock value.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Field map of a stored document.
pub type DocumentData = Map<String, Value>;

/// Fields written by a create or update.
pub type WriteFields = BTreeMap<String, FieldValue>;

/// Stream of complete query results.
///
/// An `Err` item ends the listener; no further items follow it. Dropping the
/// stream cancels the listener.
pub type SnapshotStream = BoxStream<'static, StoreResult<Vec<Document>>>;

/// Store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identifier.
    pub id: DocumentId,
    /// Stored fields.
    pub data: DocumentData,
}

/// Value written to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Literal JSON value.
    Json(Value),
    /// Replaced by the store's clock at write time.
    ServerTimestamp,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Equality query over a single field of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldQuery {
    /// Collection name.
    pub collection: String,
    /// Field compared against `equals`.
    pub field: String,
    /// Value the field must equal.
    pub equals: Value,
}

impl FieldQuery {
    /// Returns whether the given document satisfies the query.
    #[must_use]
    pub fn matches(&self, data: &DocumentData) -> bool {
        data.get(&self.field) == Some(&self.equals)
    }
}

/// Live document store contract.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens a live query.
    ///
    /// The first item is the current result set; each later item is the
    /// complete result set after a change.
    fn listen(&self, query: FieldQuery) -> SnapshotStream;

    /// Adds a document with a store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects the write.
    async fn add(&self, collection: &str, fields: WriteFields) -> StoreResult<DocumentId>;

    /// Merges fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: WriteFields,
    ) -> StoreResult<()>;

    /// Deletes a document. Deleting a missing document succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects the write.
    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()>;
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("no document {id} in collection {collection}")]
    NotFound {
        /// Collection searched.
        collection: String,
        /// Missing identifier.
        id: String,
    },

    /// Security rules rejected the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The payload or query was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
