//! Unit tests for the live task list.
