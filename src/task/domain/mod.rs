//! Domain model for the personal task list.
//!
//! Tasks arrive from the live subscription already normalized. Creation and
//! update payloads are separate types so owner and creation time cannot be
//! supplied by callers.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskFieldError, TaskDomainError};
pub use ids::{OwnerId, TaskId, TaskTitle};
pub use task::{
    NewTask, PersistedTaskData, Task, TaskCategory, TaskPatch, TaskPriority, TaskStatus,
};
