//! Filter and search state for the task list.

use crate::task::domain::{
    ParseTaskFieldError, Task, TaskCategory, TaskPriority, TaskStatus,
};

const ALL: &str = "all";

/// A filter dimension: either unrestricted or one required value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    /// Matches every value.
    All,
    /// Matches exactly this value.
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selector<T>
where
    T: PartialEq,
{
    /// Returns whether `value` passes this selector.
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(required) => required == value,
        }
    }
}

impl<'a, T> TryFrom<&'a str> for Selector<T>
where
    T: TryFrom<&'a str, Error = ParseTaskFieldError>,
{
    type Error = ParseTaskFieldError;

    /// Parses `all` or the wire value of `T`.
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        T::try_from(value).map(Self::Only)
    }
}

/// Transient filter state owned by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Status dimension.
    pub status: Selector<TaskStatus>,
    /// Category dimension.
    pub category: Selector<TaskCategory>,
    /// Priority dimension.
    pub priority: Selector<TaskPriority>,
    /// Free-text search over title and description.
    pub search: String,
}

impl FilterState {
    /// Creates an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status selector.
    #[must_use]
    pub const fn with_status(mut self, status: Selector<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    /// Sets the category selector.
    #[must_use]
    pub const fn with_category(mut self, category: Selector<TaskCategory>) -> Self {
        self.category = category;
        self
    }

    /// Sets the priority selector.
    #[must_use]
    pub const fn with_priority(mut self, priority: Selector<TaskPriority>) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Resets every selector to `all` and empties the search.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` when no dimension restricts the list.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    /// Returns whether `task` passes every dimension.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.predicate().matches(task)
    }

    pub(super) fn predicate(&self) -> Predicate<'_> {
        Predicate {
            filters: self,
            needle: self.search.to_lowercase(),
        }
    }
}

/// Filter with the search text lowered once for a whole pass.
pub(super) struct Predicate<'a> {
    filters: &'a FilterState,
    needle: String,
}

impl Predicate<'_> {
    pub(super) fn matches(&self, task: &Task) -> bool {
        self.filters.status.matches(&task.status())
            && self.filters.category.matches(&task.category())
            && self.filters.priority.matches(&task.priority())
            && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        self.needle.is_empty()
            || task.title().as_str().to_lowercase().contains(&self.needle)
            || task.description().to_lowercase().contains(&self.needle)
    }
}
