//! Filtered, newest-first task ordering.

use std::cmp::Ordering;

use super::FilterState;
use crate::task::domain::Task;

/// Derives the visible task sequence.
///
/// Tasks failing `filters` are dropped; the rest are ordered newest first
/// by creation time. The sort is stable, so tasks with equal creation time
/// keep their order from `tasks`.
#[must_use]
pub fn derive_view<'a>(tasks: &'a [Task], filters: &FilterState) -> Vec<&'a Task> {
    let predicate = filters.predicate();
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| predicate.matches(task)).collect();
    visible.sort_by(|left, right| newest_first(left, right));
    visible
}

/// Orders by creation time, descending.
///
/// A task without a creation time is still waiting for its server stamp,
/// which makes it the newest; it sorts ahead of every stamped task.
#[must_use]
pub fn newest_first(left: &Task, right: &Task) -> Ordering {
    match (left.created_at(), right.created_at()) {
        (Some(left_at), Some(right_at)) => right_at.cmp(&left_at),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
