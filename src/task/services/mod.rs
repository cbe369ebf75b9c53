//! Application services for the live task list.

mod error;
mod gateway;
mod record;
mod sync;

pub use error::{SubscriptionError, WriteError, WriteResult};
pub use gateway::{TaskGateway, TaskSnapshotStream};
pub use sync::{Generation, SyncEvent, TaskListState, TaskSync};
