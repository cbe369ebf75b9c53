//! View-model derivation for the task dashboard.
//!
//! Everything here is a pure function of the raw task list, the filter
//! state, and (for cards) the current instant. Nothing is cached; callers
//! derive again whenever an input changes.

mod card;
mod derive;
mod filter;

pub use card::{StatusAction, TaskCard, due_label, status_label, task_cards};
pub use derive::{derive_view, newest_first};
pub use filter::{FilterState, Selector};
