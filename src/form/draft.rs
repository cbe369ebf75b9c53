//! Field values entered in the task form.

use chrono::{DateTime, Utc};

use crate::task::domain::{
    NewTask, Task, TaskCategory, TaskDomainError, TaskPatch, TaskPriority, TaskStatus, TaskTitle,
};

/// Unvalidated form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
    /// Selected category.
    pub category: TaskCategory,
    /// Selected priority.
    pub priority: TaskPriority,
    /// Selected due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Selected status. Only honoured when editing.
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    /// Prefills a draft from an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            category: task.category(),
            priority: task.priority(),
            due_date: task.due_date(),
            status: Some(task.status()),
        }
    }

    /// Builds a creation payload. The status is always pending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title.
    pub fn to_new_task(&self) -> Result<NewTask, TaskDomainError> {
        let mut task = NewTask::new(TaskTitle::new(self.title.as_str())?)
            .with_description(self.description.as_str())
            .with_category(self.category)
            .with_priority(self.priority)
            .with_status(TaskStatus::Pending);
        if let Some(due_date) = self.due_date {
            task = task.with_due_date(due_date);
        }
        Ok(task)
    }

    /// Builds an update covering every field the form shows.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title.
    pub fn to_patch(&self) -> Result<TaskPatch, TaskDomainError> {
        let mut patch = TaskPatch::new()
            .with_title(TaskTitle::new(self.title.as_str())?)
            .with_description(self.description.as_str())
            .with_category(self.category)
            .with_priority(self.priority)
            .with_due_date(self.due_date);
        if let Some(status) = self.status {
            patch = patch.with_status(status);
        }
        Ok(patch)
    }
}
