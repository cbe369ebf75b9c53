//! Service-level error taxonomy.

use thiserror::Error;

use crate::task::{domain::TaskId, ports::StoreError};

/// The live query failed to establish or was interrupted.
///
/// Subscription errors are terminal; recovery requires an explicit reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The store reported a failure on the live query.
    #[error("live task query failed: {0}")]
    Store(#[from] StoreError),

    /// The live query ended without reporting a failure.
    #[error("live task query ended unexpectedly")]
    Interrupted,
}

/// A create, update, or delete was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The task to update does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store rejected the write.
    #[error("task write rejected: {0}")]
    Rejected(#[source] StoreError),
}

/// Result type for gateway writes.
pub type WriteResult<T> = Result<T, WriteError>;
