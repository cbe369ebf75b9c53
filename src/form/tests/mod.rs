//! Unit tests for the task form.
