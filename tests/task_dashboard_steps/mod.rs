//! Step definitions for task dashboard scenarios.

mod given;
mod then;
pub mod world;
