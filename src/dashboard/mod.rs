//! Task dashboard: the live list, its filters, the form, and user actions.
//!
//! The dashboard composes [`TaskSync`](crate::task::services::TaskSync),
//! [`FilterState`](crate::view::FilterState) and
//! [`FormSession`](crate::form::FormSession), and reports the outcome of
//! every user action through a [`Notifier`](crate::task::ports::Notifier).
//! Mutations never touch the list directly; their effect shows up when the
//! next snapshot arrives.

mod error;
mod service;

pub use error::{DashboardError, DashboardResult};
pub use service::{Dashboard, messages};

#[cfg(test)]
mod tests;
