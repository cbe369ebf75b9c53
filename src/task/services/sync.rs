//! Identity-bound live task subscription.
//!
//! [`TaskSync`] is the single owner of the binding between the current
//! identity and its live query. Each subscription runs as a spawned pump
//! that forwards snapshots tagged with the generation that opened it.
//! Switching identity aborts the previous pump and bumps the generation, so
//! deliveries already in flight for an earlier identity are recognised by
//! their tag and discarded instead of overwriting current state.

use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    error::SubscriptionError,
    gateway::{TaskGateway, TaskSnapshotStream},
};
use crate::task::{
    domain::{OwnerId, Task, TaskId},
    ports::DocumentStore,
};

/// Monotonic tag of a subscription within one [`TaskSync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Returns the numeric tag.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Observable state of the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    owner: Option<OwnerId>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<SubscriptionError>,
}

impl TaskListState {
    /// Returns the identity the list is bound to.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    /// Returns the latest snapshot, in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task in the latest snapshot.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns `true` until the current subscription's first outcome.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the subscription failure, if the live query has failed.
    #[must_use]
    pub const fn error(&self) -> Option<&SubscriptionError> {
        self.error.as_ref()
    }
}

/// What a single call to [`TaskSync::next_event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The identity changed and the subscription was rebound.
    IdentityChanged(Option<OwnerId>),
    /// A snapshot replaced the task list.
    SnapshotApplied {
        /// Subscription the snapshot came from.
        generation: Generation,
        /// Number of tasks in the snapshot.
        count: usize,
    },
    /// The live query failed; the previous list was kept.
    SubscriptionFailed(SubscriptionError),
    /// A delivery from a torn-down subscription was dropped.
    StaleDiscarded {
        /// Subscription the delivery came from.
        generation: Generation,
        /// Identity that subscription was opened for.
        owner: OwnerId,
    },
    /// The identity source has shut down.
    IdentityClosed,
}

#[derive(Debug)]
struct Delivery {
    generation: Generation,
    owner: OwnerId,
    outcome: Result<Vec<Task>, SubscriptionError>,
}

/// A running pump; aborting it drops the live query.
struct ActiveSubscription {
    generation: Generation,
    owner: OwnerId,
    settled: bool,
    pump: JoinHandle<()>,
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Owns the identity-to-subscription binding and the resulting list state.
///
/// Must be driven from within a Tokio runtime, since subscriptions run as
/// spawned tasks.
pub struct TaskSync<S> {
    gateway: Arc<TaskGateway<S>>,
    sender: mpsc::UnboundedSender<Delivery>,
    receiver: mpsc::UnboundedReceiver<Delivery>,
    active: Option<ActiveSubscription>,
    last_generation: u64,
    state: TaskListState,
}

enum Step {
    Identity(bool),
    Delivery(Option<Delivery>),
}

impl<S> TaskSync<S>
where
    S: DocumentStore + 'static,
{
    /// Creates an unbound sync with an empty, not-loading list.
    #[must_use]
    pub fn new(gateway: Arc<TaskGateway<S>>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            gateway,
            sender,
            receiver,
            active: None,
            last_generation: 0,
            state: TaskListState::default(),
        }
    }

    /// Returns the gateway used for subscriptions.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<TaskGateway<S>> {
        &self.gateway
    }

    /// Returns the current list state.
    #[must_use]
    pub const fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Returns the generation of the running subscription.
    #[must_use]
    pub fn active_generation(&self) -> Option<Generation> {
        self.active.as_ref().map(|active| active.generation)
    }

    /// Binds the list to `identity`.
    ///
    /// Any running subscription is cancelled first. With no identity the list
    /// becomes empty and not loading. With an identity a fresh subscription
    /// opens and the list starts loading. Re-binding the identity that is
    /// already bound is a no-op.
    pub fn set_identity(&mut self, identity: Option<OwnerId>) {
        let rebinding_active =
            self.active.is_some() && identity.is_some() && identity == self.state.owner;
        if rebinding_active {
            return;
        }
        self.teardown();
        match identity {
            None => {
                self.state = TaskListState::default();
                debug!("task list unbound");
            }
            Some(owner) => self.open(owner),
        }
    }

    /// Reopens the live query for the current identity.
    ///
    /// This is the recovery path after a [`SubscriptionError`]; the list is
    /// reset and loads again. Does nothing when no identity is bound.
    pub fn reload(&mut self) {
        let Some(owner) = self.state.owner.clone() else {
            return;
        };
        info!(owner = %owner, "reloading task list");
        self.teardown();
        self.open(owner);
    }

    /// Waits for the next delivery and applies it.
    ///
    /// Returns `None` only if the delivery channel has closed, which cannot
    /// happen while `self` is alive.
    pub async fn next_delivery(&mut self) -> Option<SyncEvent> {
        let delivery = self.receiver.recv().await?;
        Some(self.apply(delivery))
    }

    /// Applies every delivery already queued without waiting.
    pub fn drain_pending(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(delivery) = self.receiver.try_recv() {
            events.push(self.apply(delivery));
        }
        events
    }

    /// Waits for either an identity change or a delivery, and handles it.
    pub async fn next_event(
        &mut self,
        identity: &mut watch::Receiver<Option<OwnerId>>,
    ) -> SyncEvent {
        let step = tokio::select! {
            changed = identity.changed() => Step::Identity(changed.is_ok()),
            delivery = self.receiver.recv() => Step::Delivery(delivery),
        };
        match step {
            Step::Identity(true) => {
                let next = identity.borrow_and_update().clone();
                self.set_identity(next.clone());
                SyncEvent::IdentityChanged(next)
            }
            Step::Identity(false) | Step::Delivery(None) => SyncEvent::IdentityClosed,
            Step::Delivery(Some(delivery)) => self.apply(delivery),
        }
    }

    /// Runs until the identity source closes, keeping the list bound to it.
    ///
    /// The initial identity is bound before waiting.
    pub async fn follow(&mut self, mut identity: watch::Receiver<Option<OwnerId>>) {
        let initial = identity.borrow_and_update().clone();
        self.set_identity(initial);
        loop {
            if self.next_event(&mut identity).await == SyncEvent::IdentityClosed {
                break;
            }
        }
        self.set_identity(None);
    }

    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(
                owner = %active.owner,
                generation = active.generation.value(),
                "cancelling task subscription"
            );
        }
    }

    fn open(&mut self, owner: OwnerId) {
        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        let snapshots = self.gateway.subscribe(&owner);
        let pump = tokio::spawn(pump(
            snapshots,
            generation,
            owner.clone(),
            self.sender.clone(),
        ));
        info!(owner = %owner, generation = generation.value(), "task subscription opened");
        self.state = TaskListState {
            owner: Some(owner.clone()),
            tasks: Vec::new(),
            loading: true,
            error: None,
        };
        self.active = Some(ActiveSubscription {
            generation,
            owner,
            settled: false,
            pump,
        });
    }

    fn apply(&mut self, delivery: Delivery) -> SyncEvent {
        let Delivery {
            generation,
            owner,
            outcome,
        } = delivery;
        let Some(active) = self
            .active
            .as_mut()
            .filter(|active| active.generation == generation && active.owner == owner)
        else {
            debug!(owner = %owner, generation = generation.value(), "discarding stale task snapshot");
            return SyncEvent::StaleDiscarded { generation, owner };
        };

        if !active.settled {
            active.settled = true;
            self.state.loading = false;
        }

        match outcome {
            Ok(tasks) => {
                let count = tasks.len();
                debug!(owner = %owner, count, "task snapshot applied");
                self.state.tasks = tasks;
                self.state.error = None;
                SyncEvent::SnapshotApplied { generation, count }
            }
            Err(err) => {
                warn!(owner = %owner, error = %err, "task subscription failed");
                self.state.error = Some(err.clone());
                SyncEvent::SubscriptionFailed(err)
            }
        }
    }
}

async fn pump(
    mut snapshots: TaskSnapshotStream,
    generation: Generation,
    owner: OwnerId,
    sender: mpsc::UnboundedSender<Delivery>,
) {
    loop {
        let (outcome, terminal) = match snapshots.next().await {
            Some(Ok(tasks)) => (Ok(tasks), false),
            Some(Err(err)) => (Err(err), true),
            None => (Err(SubscriptionError::Interrupted), true),
        };
        let delivery = Delivery {
            generation,
            owner: owner.clone(),
            outcome,
        };
        if sender.send(delivery).is_err() || terminal {
            break;
        }
    }
}
