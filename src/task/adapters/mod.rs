//! Adapter implementations for the task list ports.

pub mod memory;
