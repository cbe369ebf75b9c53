//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwner,

    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,
}

/// Error returned while parsing task enumerations from their wire values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {kind}: {value}")]
pub struct ParseTaskFieldError {
    /// Name of the field being parsed (`status`, `category`, `priority`).
    pub kind: &'static str,
    /// Rejected input value.
    pub value: String,
}

impl ParseTaskFieldError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
