//! In-memory adapters for tests and local development.

mod clock;
mod document_store;
mod notifier;

pub use clock::FixedClock;
pub use document_store::{InMemoryDocumentStore, document_data};
pub use notifier::RecordingNotifier;
