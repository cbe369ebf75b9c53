//! Port contracts for the task list.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod document_store;
pub mod notifier;

pub use document_store::{
    Document, DocumentData, DocumentId, DocumentStore, FieldQuery, FieldValue, SnapshotStream,
    StoreError, StoreResult, WriteFields,
};
pub use notifier::{Notification, NotificationLevel, Notifier};
