//! Form session state machine.

use thiserror::Error;
use tracing::debug;

use super::TaskDraft;
use crate::task::{
    domain::{OwnerId, Task, TaskDomainError, TaskId},
    ports::DocumentStore,
    services::{TaskGateway, WriteError},
};

/// What submitting the open form will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Create a new task.
    Create,
    /// Update the given task.
    Edit(Task),
}

/// An open form: its mode and the entered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenForm {
    mode: FormMode,
    draft: TaskDraft,
}

impl OpenForm {
    /// Returns the form mode.
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Returns the entered fields.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A task was created with this identifier.
    Created(TaskId),
    /// The task with this identifier was updated.
    Updated(TaskId),
}

/// Form session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Submit or edit was requested with no form open.
    #[error("no task form is open")]
    NotOpen,

    /// A form is already open; close it first.
    #[error("a task form is already open")]
    AlreadyOpen,

    /// The entered fields are invalid.
    #[error(transparent)]
    Invalid(#[from] TaskDomainError),

    /// The gateway rejected the write.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Closed, or open in create or edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormSession {
    /// No form is shown.
    #[default]
    Closed,
    /// A form is shown.
    Open(OpenForm),
}

impl FormSession {
    /// Creates a closed session.
    #[must_use]
    pub const fn new() -> Self {
        Self::Closed
    }

    /// Returns `true` while a form is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Returns the mode of the open form.
    #[must_use]
    pub const fn mode(&self) -> Option<&FormMode> {
        match self {
            Self::Closed => None,
            Self::Open(open) => Some(&open.mode),
        }
    }

    /// Returns the entered fields of the open form.
    #[must_use]
    pub const fn draft(&self) -> Option<&TaskDraft> {
        match self {
            Self::Closed => None,
            Self::Open(open) => Some(&open.draft),
        }
    }

    /// Returns the entered fields for editing.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotOpen`] when the form is closed.
    pub fn draft_mut(&mut self) -> Result<&mut TaskDraft, FormError> {
        match self {
            Self::Closed => Err(FormError::NotOpen),
            Self::Open(open) => Ok(&mut open.draft),
        }
    }

    /// Opens an empty form for a new task.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadyOpen`] when a form is shown.
    pub fn open_create(&mut self) -> Result<(), FormError> {
        self.open(FormMode::Create, TaskDraft::default())
    }

    /// Opens a form prefilled from `task`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::AlreadyOpen`] when a form is shown.
    pub fn open_edit(&mut self, task: Task) -> Result<(), FormError> {
        let draft = TaskDraft::from_task(&task);
        self.open(FormMode::Edit(task), draft)
    }

    fn open(&mut self, mode: FormMode, draft: TaskDraft) -> Result<(), FormError> {
        if self.is_open() {
            return Err(FormError::AlreadyOpen);
        }
        *self = Self::Open(OpenForm { mode, draft });
        Ok(())
    }

    /// Closes the form, discarding entered fields.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Submits the open form through `gateway`.
    ///
    /// In create mode a task owned by `owner` is created with status
    /// pending. In edit mode the form's fields are written to the edited
    /// task. On success the form closes; on failure it stays open with its
    /// fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotOpen`] with no form shown,
    /// [`FormError::Invalid`] for invalid input, and [`FormError::Write`]
    /// when the gateway rejects the write.
    pub async fn submit<S>(
        &mut self,
        gateway: &TaskGateway<S>,
        owner: &OwnerId,
    ) -> Result<SubmitOutcome, FormError>
    where
        S: DocumentStore,
    {
        let Self::Open(open) = self else {
            return Err(FormError::NotOpen);
        };
        let outcome = match &open.mode {
            FormMode::Create => {
                let task = open.draft.to_new_task()?;
                SubmitOutcome::Created(gateway.create(owner, task).await?)
            }
            FormMode::Edit(task) => {
                let patch = open.draft.to_patch()?;
                gateway.update(task.id(), patch).await?;
                SubmitOutcome::Updated(task.id().clone())
            }
        };
        debug!(?outcome, "task form submitted");
        *self = Self::Closed;
        Ok(outcome)
    }
}
