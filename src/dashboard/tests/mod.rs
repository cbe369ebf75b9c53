//! Unit tests for dashboard actions.
