//! Dashboard action errors.

use thiserror::Error;

use crate::form::FormError;
use crate::task::{domain::TaskId, services::WriteError};

/// Errors returned by dashboard actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The action needs an authenticated identity.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The task is not in the current list.
    #[error("task not in the current list: {0}")]
    UnknownTask(TaskId),

    /// The task has no further status along the offered path.
    #[error("task {0} is already completed")]
    StatusFinal(TaskId),

    /// The form rejected the request.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The gateway rejected a write.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for dashboard actions.
pub type DashboardResult<T> = Result<T, DashboardError>;
