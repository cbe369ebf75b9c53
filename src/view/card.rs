//! Per-task presentation facts: labels, overdue flag, offered action.

use chrono::{DateTime, Utc};

use crate::task::domain::{Task, TaskStatus};

/// The status change the dashboard offers for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    /// Button caption.
    pub label: &'static str,
    /// Status the action writes.
    pub target: TaskStatus,
}

impl StatusAction {
    /// Returns the offered action for a task in `status`.
    ///
    /// Completed tasks are offered nothing.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Pending => Some(Self {
                label: "Start",
                target: TaskStatus::InProgress,
            }),
            TaskStatus::InProgress => Some(Self {
                label: "Complete",
                target: TaskStatus::Completed,
            }),
            TaskStatus::Completed => None,
        }
    }
}

/// Display-ready view of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard<'a> {
    /// The task shown.
    pub task: &'a Task,
    /// Upper-case status badge text.
    pub status_label: &'static str,
    /// Formatted due date, if the task has one.
    pub due_label: Option<String>,
    /// Whether the due date has passed. Ignores status.
    pub overdue: bool,
    /// Offered status change.
    pub action: Option<StatusAction>,
}

/// Returns the badge text for a status.
#[must_use]
pub const fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PENDING",
        TaskStatus::InProgress => "IN PROGRESS",
        TaskStatus::Completed => "COMPLETED",
    }
}

/// Formats a due date as `Mon DD, YYYY` in UTC.
#[must_use]
pub fn due_label(due: DateTime<Utc>) -> String {
    due.format("%b %d, %Y").to_string()
}

/// Builds cards for an already derived view, evaluating overdue at `now`.
#[must_use]
pub fn task_cards<'a>(visible: &[&'a Task], now: DateTime<Utc>) -> Vec<TaskCard<'a>> {
    visible
        .iter()
        .copied()
        .map(|task| TaskCard {
            task,
            status_label: status_label(task.status()),
            due_label: task.due_date().map(due_label),
            overdue: task.is_overdue_at(now),
            action: StatusAction::for_status(task.status()),
        })
        .collect()
}
