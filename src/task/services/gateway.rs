//! Owner-scoped access to task documents.
//!
//! The gateway issues the live query for one owner, turns stored documents
//! into [`Task`] values, and performs the three mutations. It requests no
//! server-side ordering; ordering is a view concern.

use futures_util::{StreamExt, stream, stream::BoxStream};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{
    error::{SubscriptionError, WriteError, WriteResult},
    record::{decode_task, encode_new_task, encode_patch},
};
use crate::config::GatewayConfig;
use crate::task::{
    domain::{NewTask, OwnerId, Task, TaskId, TaskPatch},
    ports::{Document, DocumentId, DocumentStore, FieldQuery, StoreError},
};

/// Stream of complete task sets for one owner.
///
/// Each item replaces the previous one wholesale. An `Err` item is the last
/// item. Dropping the stream cancels the live query.
pub type TaskSnapshotStream = BoxStream<'static, Result<Vec<Task>, SubscriptionError>>;

/// Task store gateway over a live document store.
pub struct TaskGateway<S> {
    store: Arc<S>,
    config: GatewayConfig,
}

impl<S> Clone for TaskGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S> TaskGateway<S>
where
    S: DocumentStore,
{
    /// Creates a gateway over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>, config: GatewayConfig) -> Self {
        Self { store, config }
    }

    /// Opens the live query for tasks owned by `owner`.
    ///
    /// The stream is lazy: documents are decoded as snapshots are polled.
    /// Documents that do not decode are skipped and logged.
    #[must_use]
    pub fn subscribe(&self, owner: &OwnerId) -> TaskSnapshotStream {
        let query = FieldQuery {
            collection: self.config.collection.clone(),
            field: self.config.owner_field.clone(),
            equals: Value::String(owner.as_str().to_owned()),
        };
        debug!(owner = %owner, collection = %query.collection, "opening task listener");
        let documents = self.store.listen(query);
        let owner_field = self.config.owner_field.clone();

        stream::unfold(Some(documents), move |state| {
            let field = owner_field.clone();
            async move {
                let mut pending = state?;
                match pending.next().await? {
                    Ok(snapshot) => {
                        let tasks = decode_snapshot(snapshot, &field);
                        Some((Ok(tasks), Some(pending)))
                    }
                    Err(err) => Some((Err(SubscriptionError::from(err)), None)),
                }
            }
        })
        .boxed()
    }

    /// Creates a task owned by `owner`.
    ///
    /// The owner is stamped from `owner`; both timestamps are set by the
    /// store at write time.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Rejected`] when the store rejects the write.
    pub async fn create(&self, owner: &OwnerId, task: NewTask) -> WriteResult<TaskId> {
        let fields = encode_new_task(&task, &self.config.owner_field, owner);
        let document_id = self
            .store
            .add(&self.config.collection, fields)
            .await
            .map_err(|err| {
                error!(owner = %owner, error = %err, "task create rejected");
                WriteError::Rejected(err)
            })?;
        let id = TaskId::new(document_id.as_str()).map_err(|err| {
            WriteError::Rejected(StoreError::InvalidArgument(err.to_string()))
        })?;
        debug!(owner = %owner, task_id = %id, "task created");
        Ok(id)
    }

    /// Applies a partial update and refreshes the last-modified stamp.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NotFound`] when no task has the identifier and
    /// [`WriteError::Rejected`] when the store rejects the write.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> WriteResult<()> {
        let fields = encode_patch(&patch);
        self.store
            .update(&self.config.collection, &DocumentId::new(id.as_str()), fields)
            .await
            .map_err(|err| {
                error!(task_id = %id, error = %err, "task update rejected");
                match err {
                    StoreError::NotFound { .. } => WriteError::NotFound(id.clone()),
                    other => WriteError::Rejected(other),
                }
            })?;
        debug!(task_id = %id, "task updated");
        Ok(())
    }

    /// Deletes a task. Deleting a task that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Rejected`] when the store rejects the write.
    pub async fn delete(&self, id: &TaskId) -> WriteResult<()> {
        self.store
            .delete(&self.config.collection, &DocumentId::new(id.as_str()))
            .await
            .map_err(|err| {
                error!(task_id = %id, error = %err, "task delete rejected");
                WriteError::Rejected(err)
            })?;
        debug!(task_id = %id, "task deleted");
        Ok(())
    }
}

fn decode_snapshot(documents: Vec<Document>, owner_field: &str) -> Vec<Task> {
    documents
        .into_iter()
        .filter_map(|document| {
            let document_id = document.id.clone();
            decode_task(document, owner_field)
                .map_err(|err| {
                    warn!(document_id = %document_id, error = %err, "skipping undecodable task document");
                })
                .ok()
        })
        .collect()
}
