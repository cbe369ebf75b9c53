//! Shared fixtures for unit tests.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::task::{
    adapters::memory::{FixedClock, InMemoryDocumentStore},
    domain::{
        OwnerId, PersistedTaskData, Task, TaskCategory, TaskId, TaskPriority, TaskStatus,
        TaskTitle,
    },
    services::TaskGateway,
};

pub(crate) type MemoryGateway = TaskGateway<InMemoryDocumentStore<FixedClock>>;

/// Instant `seconds` after the epoch.
pub(crate) fn instant(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("test instant in range")
}

pub(crate) fn owner(name: &str) -> OwnerId {
    OwnerId::new(name).expect("valid owner")
}

/// Stored data for a pending, unstamped task owned by `alice`.
pub(crate) fn persisted(id: &str, title: &str) -> PersistedTaskData {
    PersistedTaskData {
        id: TaskId::new(id).expect("valid task id"),
        title: TaskTitle::new(title).expect("valid title"),
        description: String::new(),
        status: TaskStatus::Pending,
        category: TaskCategory::Personal,
        priority: TaskPriority::Medium,
        due_date: None,
        owner: owner("alice"),
        created_at: None,
        updated_at: None,
    }
}

/// Task created at `created_secs` with the given classification.
pub(crate) fn classified_task(
    id: &str,
    status: TaskStatus,
    category: TaskCategory,
    priority: TaskPriority,
    created_secs: i64,
) -> Task {
    Task::from_persisted(PersistedTaskData {
        status,
        category,
        priority,
        created_at: Some(instant(created_secs)),
        ..persisted(id, &format!("Task {id}"))
    })
}

pub(crate) fn memory_gateway(
    clock: &FixedClock,
) -> (Arc<InMemoryDocumentStore<FixedClock>>, MemoryGateway) {
    let store = Arc::new(InMemoryDocumentStore::new(clock.clone()));
    let gateway = TaskGateway::new(Arc::clone(&store), GatewayConfig::default());
    (store, gateway)
}
