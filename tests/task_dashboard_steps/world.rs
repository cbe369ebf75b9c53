//! Shared world state for task dashboard BDD scenarios.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use serde_json::json;
use taskdeck::{
    config::GatewayConfig,
    dashboard::{Dashboard, DashboardError},
    task::{
        adapters::memory::{FixedClock, InMemoryDocumentStore, RecordingNotifier, document_data},
        ports::DocumentId,
        services::{TaskGateway, TaskListState},
    },
};
use rstest::fixture;

/// Store type used by the BDD world.
pub type TestStore = InMemoryDocumentStore<FixedClock>;

/// Dashboard type used by the BDD world.
pub type TestDashboard = Dashboard<TestStore, RecordingNotifier, FixedClock>;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Scenario world for dashboard behaviour tests.
pub struct DashboardWorld {
    pub clock: FixedClock,
    pub store: Arc<TestStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub dashboard: TestDashboard,
    pub last_error: Option<DashboardError>,
    seeded: usize,
}

impl DashboardWorld {
    /// Creates a world with an empty store and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let clock = FixedClock::new(DateTime::UNIX_EPOCH);
        let store = Arc::new(InMemoryDocumentStore::new(clock.clone()));
        let notifier = Arc::new(RecordingNotifier::new());
        let gateway = TaskGateway::new(Arc::clone(&store), GatewayConfig::default());
        let dashboard = Dashboard::new(
            Arc::new(gateway),
            Arc::clone(&notifier),
            Arc::new(clock.clone()),
        );

        Self {
            clock,
            store,
            notifier,
            dashboard,
            last_error: None,
            seeded: 0,
        }
    }

    /// Stores a task document directly, as another client would.
    pub fn seed_task(
        &mut self,
        owner: &str,
        title: &str,
        status: &str,
        extra: &[(&str, serde_json::Value)],
    ) -> Result<(), eyre::Report> {
        self.seeded += 1;
        let mut data = document_data([
            ("title", json!(title)),
            ("status", json!(status)),
            ("userId", json!(owner)),
        ]);
        for (name, value) in extra {
            data.insert((*name).to_owned(), value.clone());
        }
        self.store
            .seed("tasks", DocumentId::new(format!("seed-{}", self.seeded)), data)
            .map_err(|err| eyre::eyre!("seeding task failed: {err}"))
    }

    /// Applies deliveries until `done` holds for the list state.
    pub fn settle_until(
        &mut self,
        done: impl Fn(&TaskListState) -> bool,
    ) -> Result<(), eyre::Report> {
        let sync = self.dashboard.sync_mut();
        let outcome = run_async(tokio::time::timeout(SETTLE_TIMEOUT, async move {
            while !done(sync.state()) {
                if sync.next_delivery().await.is_none() {
                    return false;
                }
            }
            true
        }));
        match outcome {
            Ok(true) => Ok(()),
            Ok(false) => Err(eyre::eyre!("task delivery channel closed")),
            Err(_) => Err(eyre::eyre!("timed out waiting for the task list")),
        }
    }

    /// Titles of the visible tasks, in display order.
    #[must_use]
    pub fn visible_titles(&self) -> Vec<String> {
        self.dashboard
            .visible_tasks()
            .iter()
            .map(|task| task.title().as_str().to_owned())
            .collect()
    }
}

impl Default for DashboardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DashboardWorld {
    DashboardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
