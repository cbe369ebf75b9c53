//! Taskdeck: live task list core for a personal task manager.
//!
//! The crate keeps a signed-in user's tasks in sync with a managed document
//! database and derives what the dashboard shows from them. Authentication,
//! the database itself, and rendering are external collaborators reached
//! through ports.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: task values with no infrastructure dependencies
//! - **Ports**: the live document store and the notification sink
//! - **Adapters**: in-memory implementations of the ports
//! - **Services**: the owner-scoped gateway and the identity-bound
//!   subscription
//!
//! # Modules
//!
//! - [`task`]: domain, ports, adapters, gateway and live subscription
//! - [`view`]: filtering, ordering and per-task display facts
//! - [`form`]: create/edit form session
//! - [`dashboard`]: user actions and notifications over all of the above
//! - [`config`]: gateway configuration

pub mod config;
pub mod dashboard;
pub mod form;
pub mod task;
pub mod view;

#[cfg(test)]
mod test_support;
