//! In-memory live document store.
//!
//! Keeps documents per collection in insertion order and pushes a full
//! snapshot to every matching listener after each change. Server timestamps
//! resolve from the injected clock and are stored in the structured
//! `{seconds, nanoseconds}` shape.

use async_trait::async_trait;
use futures_util::stream;
use mockable::Clock;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::task::ports::{
    Document, DocumentData, DocumentId, DocumentStore, FieldQuery, FieldValue, SnapshotStream,
    StoreError, StoreResult, WriteFields,
};

type Delivery = StoreResult<Vec<Document>>;

/// Thread-safe in-memory document store with live queries.
#[derive(Clone)]
pub struct InMemoryDocumentStore<C> {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<C>,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Vec<Document>>,
    listeners: Vec<Listener>,
    rejected_write: Option<StoreError>,
    holding: bool,
}

struct Listener {
    query: FieldQuery,
    sender: mpsc::UnboundedSender<Delivery>,
    backlog: Vec<Delivery>,
}

impl Listener {
    /// Sends or queues a delivery. Returns `false` once the consumer is gone.
    fn deliver(&mut self, delivery: Delivery, holding: bool) -> bool {
        if holding {
            self.backlog.push(delivery);
            return !self.sender.is_closed();
        }
        self.sender.send(delivery).is_ok()
    }

    fn flush(&mut self) -> bool {
        for delivery in self.backlog.drain(..) {
            if self.sender.send(delivery).is_err() {
                return false;
            }
        }
        true
    }
}

impl StoreState {
    fn snapshot(&self, query: &FieldQuery) -> Vec<Document> {
        self.collections
            .get(&query.collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| query.matches(&document.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pushes the current result set to every listener on `collection`.
    fn broadcast(&mut self, collection: &str) {
        let holding = self.holding;
        let mut listeners = std::mem::take(&mut self.listeners);
        listeners.retain_mut(|listener| {
            if listener.query.collection != collection {
                return !listener.sender.is_closed();
            }
            let snapshot = self.snapshot(&listener.query);
            listener.deliver(Ok(snapshot), holding)
        });
        self.listeners = listeners;
    }

    fn take_rejection(&mut self) -> StoreResult<()> {
        self.rejected_write.take().map_or(Ok(()), Err)
    }
}

impl<C> InMemoryDocumentStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping writes with `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock: Arc::new(clock),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn resolve(&self, fields: WriteFields) -> DocumentData {
        let now = self.clock.utc();
        fields
            .into_iter()
            .map(|(name, value)| {
                let resolved = match value {
                    FieldValue::Json(json) => json,
                    FieldValue::ServerTimestamp => json!({
                        "seconds": now.timestamp(),
                        "nanoseconds": now.timestamp_subsec_nanos(),
                    }),
                };
                (name, resolved)
            })
            .collect()
    }

    /// Inserts a document verbatim, bypassing timestamp resolution.
    ///
    /// Used to seed records in shapes other writers produce, such as raw
    /// numeric epochs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn seed(&self, collection: &str, id: DocumentId, data: DocumentData) -> StoreResult<()> {
        let mut state = self.lock()?;
        let documents = state.collections.entry(collection.to_owned()).or_default();
        documents.retain(|document| document.id != id);
        documents.push(Document { id, data });
        state.broadcast(collection);
        Ok(())
    }

    /// Returns the stored fields of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn document(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<DocumentData>> {
        let state = self.lock()?;
        Ok(state.collections.get(collection).and_then(|documents| {
            documents
                .iter()
                .find(|document| &document.id == id)
                .map(|document| document.data.clone())
        }))
    }

    /// Makes the next add, update, or delete fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn reject_next_write(&self, error: StoreError) -> StoreResult<()> {
        self.lock()?.rejected_write = Some(error);
        Ok(())
    }

    /// Terminates every open listener with `error`.
    ///
    /// Snapshots held back for those listeners are dropped, so the error is
    /// the next thing each listener sees.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn fail_listeners(&self, error: &StoreError) -> StoreResult<()> {
        let mut state = self.lock()?;
        for listener in state.listeners.drain(..) {
            let _closed = listener.sender.send(Err(error.clone()));
        }
        Ok(())
    }

    /// Queues snapshots instead of delivering them until
    /// [`release_deliveries`](Self::release_deliveries) is called.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn hold_deliveries(&self) -> StoreResult<()> {
        self.lock()?.holding = true;
        Ok(())
    }

    /// Delivers queued snapshots and resumes immediate delivery.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn release_deliveries(&self) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.holding = false;
        state.listeners.retain_mut(Listener::flush);
        Ok(())
    }

    /// Returns the number of listeners whose consumer is still attached.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store lock is poisoned.
    pub fn active_listeners(&self) -> StoreResult<usize> {
        let mut state = self.lock()?;
        state.listeners.retain(|listener| !listener.sender.is_closed());
        Ok(state.listeners.len())
    }
}

#[async_trait]
impl<C> DocumentStore for InMemoryDocumentStore<C>
where
    C: Clock + Send + Sync,
{
    fn listen(&self, query: FieldQuery) -> SnapshotStream {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(err) => return Box::pin(stream::once(async move { Err(err) })),
        };
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut listener = Listener {
            backlog: Vec::new(),
            sender,
            query,
        };
        let initial = state.snapshot(&listener.query);
        let holding = state.holding;
        listener.deliver(Ok(initial), holding);
        debug!(
            collection = %listener.query.collection,
            field = %listener.query.field,
            "listener registered"
        );
        state.listeners.push(listener);

        Box::pin(stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|delivery| (delivery, receiver))
        }))
    }

    async fn add(&self, collection: &str, fields: WriteFields) -> StoreResult<DocumentId> {
        let data = self.resolve(fields);
        let mut state = self.lock()?;
        state.take_rejection()?;
        let id = DocumentId::new(Uuid::new_v4().simple().to_string());
        state
            .collections
            .entry(collection.to_owned())
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
            });
        state.broadcast(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: WriteFields,
    ) -> StoreResult<()> {
        let data = self.resolve(fields);
        let mut state = self.lock()?;
        state.take_rejection()?;
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| &document.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_string(),
            })?;
        for (name, value) in data {
            document.data.insert(name, value);
        }
        state.broadcast(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.take_rejection()?;
        let removed = state
            .collections
            .get_mut(collection)
            .is_some_and(|documents| {
                let before = documents.len();
                documents.retain(|document| &document.id != id);
                documents.len() != before
            });
        if removed {
            state.broadcast(collection);
        }
        Ok(())
    }
}

/// Builds a document body from `(field, value)` pairs.
#[must_use]
pub fn document_data<I, K>(fields: I) -> DocumentData
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect()
}
