//! Dashboard orchestration.

use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

use super::{DashboardError, DashboardResult};
use crate::form::{FormError, FormSession, SubmitOutcome};
use crate::task::{
    domain::{OwnerId, Task, TaskId, TaskPatch, TaskStatus},
    ports::{DocumentStore, Notification, Notifier},
    services::{TaskGateway, TaskListState, TaskSync, WriteResult},
};
use crate::view::{FilterState, TaskCard, derive_view, task_cards};

/// Notification texts shown after user actions.
pub mod messages {
    /// A task was created.
    pub const TASK_CREATED: &str = "Task created successfully!";
    /// A task was updated through the form.
    pub const TASK_UPDATED: &str = "Task updated successfully!";
    /// The form submit failed.
    pub const SAVE_FAILED: &str = "Error saving task";
    /// A task was deleted.
    pub const TASK_DELETED: &str = "Task deleted successfully!";
    /// A delete failed.
    pub const DELETE_FAILED: &str = "Error deleting task";
    /// A status change succeeded.
    pub const STATUS_UPDATED: &str = "Task status updated!";
    /// A status change failed.
    pub const STATUS_FAILED: &str = "Error updating task status";
}

/// The task dashboard for one signed-in user at a time.
pub struct Dashboard<S, N, C> {
    sync: TaskSync<S>,
    filters: FilterState,
    form: FormSession,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<S, N, C> Dashboard<S, N, C>
where
    S: DocumentStore + 'static,
    N: Notifier,
    C: Clock,
{
    /// Creates a dashboard with no identity bound.
    #[must_use]
    pub fn new(gateway: Arc<TaskGateway<S>>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            sync: TaskSync::new(gateway),
            filters: FilterState::default(),
            form: FormSession::new(),
            notifier,
            clock,
        }
    }

    /// Returns the live subscription.
    #[must_use]
    pub const fn sync(&self) -> &TaskSync<S> {
        &self.sync
    }

    /// Returns the live subscription for driving deliveries.
    pub const fn sync_mut(&mut self) -> &mut TaskSync<S> {
        &mut self.sync
    }

    /// Returns the list state.
    #[must_use]
    pub const fn state(&self) -> &TaskListState {
        self.sync.state()
    }

    /// Binds the dashboard to `identity`.
    ///
    /// Any change of identity, signing out included, closes the form so a
    /// draft or edit opened by one user is never submitted as another.
    pub fn set_identity(&mut self, identity: Option<OwnerId>) {
        if identity.as_ref() != self.sync.state().owner() {
            self.form.cancel();
        }
        self.sync.set_identity(identity);
    }

    /// Returns the filter state.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Returns the filter state for editing.
    pub const fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Resets filters and search.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Returns the form session.
    #[must_use]
    pub const fn form(&self) -> &FormSession {
        &self.form
    }

    /// Returns the form session for entering fields.
    pub const fn form_mut(&mut self) -> &mut FormSession {
        &mut self.form
    }

    /// Opens the form for a new task.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Form`] when a form is already open.
    pub fn open_create_form(&mut self) -> DashboardResult<()> {
        Ok(self.form.open_create()?)
    }

    /// Opens the form prefilled from the listed task `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownTask`] when the task is not listed
    /// and [`DashboardError::Form`] when a form is already open.
    pub fn open_edit_form(&mut self, id: &TaskId) -> DashboardResult<()> {
        let task = self.listed_task(id)?.clone();
        Ok(self.form.open_edit(task)?)
    }

    /// Closes the form without saving.
    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Submits the open form.
    ///
    /// Reports success or failure through the notifier. On failure the form
    /// stays open with its fields.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotSignedIn`] without an identity, and
    /// [`DashboardError::Form`] when the form is closed, invalid, or the
    /// write is rejected.
    pub async fn submit_form(&mut self) -> DashboardResult<SubmitOutcome> {
        let owner = self.owner()?;
        let gateway = Arc::clone(self.sync.gateway());
        match self.form.submit(&gateway, &owner).await {
            Ok(outcome) => {
                let message = match outcome {
                    SubmitOutcome::Created(_) => messages::TASK_CREATED,
                    SubmitOutcome::Updated(_) => messages::TASK_UPDATED,
                };
                self.notifier.notify(Notification::success(message));
                Ok(outcome)
            }
            Err(err) => {
                if matches!(err, FormError::Invalid(_) | FormError::Write(_)) {
                    warn!(error = %err, "saving task failed");
                    self.notifier.notify(Notification::error(messages::SAVE_FAILED));
                }
                Err(err.into())
            }
        }
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotSignedIn`] without an identity and
    /// [`DashboardError::Write`] when the delete is rejected.
    pub async fn delete_task(&self, id: &TaskId) -> DashboardResult<()> {
        self.owner()?;
        let result = self.sync.gateway().delete(id).await;
        self.report(
            result.map(|()| info!(task_id = %id, "task deleted")),
            messages::TASK_DELETED,
            messages::DELETE_FAILED,
        )
    }

    /// Writes `status` to a task.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotSignedIn`] without an identity and
    /// [`DashboardError::Write`] when the update is rejected.
    pub async fn change_status(&self, id: &TaskId, status: TaskStatus) -> DashboardResult<()> {
        self.owner()?;
        let result = self
            .sync
            .gateway()
            .update(id, TaskPatch::status_only(status))
            .await;
        self.report(
            result.map(|()| info!(task_id = %id, status = status.as_str(), "task status changed")),
            messages::STATUS_UPDATED,
            messages::STATUS_FAILED,
        )
    }

    /// Moves a listed task one step along pending → in-progress → completed.
    ///
    /// Returns the status written.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownTask`] when the task is not listed,
    /// [`DashboardError::StatusFinal`] when it is completed, and the errors
    /// of [`change_status`](Self::change_status).
    pub async fn advance_status(&self, id: &TaskId) -> DashboardResult<TaskStatus> {
        let current = self.listed_task(id)?.status();
        let next = current
            .next()
            .ok_or_else(|| DashboardError::StatusFinal(id.clone()))?;
        self.change_status(id, next).await?;
        Ok(next)
    }

    /// Derives the filtered, newest-first task list.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        derive_view(self.sync.state().tasks(), &self.filters)
    }

    /// Derives display cards for the visible tasks at the current instant.
    #[must_use]
    pub fn cards(&self) -> Vec<TaskCard<'_>> {
        task_cards(&self.visible_tasks(), self.clock.utc())
    }

    fn owner(&self) -> DashboardResult<OwnerId> {
        self.sync
            .state()
            .owner()
            .cloned()
            .ok_or(DashboardError::NotSignedIn)
    }

    fn listed_task(&self, id: &TaskId) -> DashboardResult<&Task> {
        self.sync
            .state()
            .task(id)
            .ok_or_else(|| DashboardError::UnknownTask(id.clone()))
    }

    fn report(
        &self,
        result: WriteResult<()>,
        success: &str,
        failure: &str,
    ) -> DashboardResult<()> {
        match result {
            Ok(()) => {
                self.notifier.notify(Notification::success(success));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "task action failed");
                self.notifier.notify(Notification::error(failure));
                Err(err.into())
            }
        }
    }
}
