//! Shared fixtures for in-memory dashboard integration tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use rstest::fixture;
use taskdeck::{
    config::GatewayConfig,
    dashboard::Dashboard,
    task::{
        adapters::memory::{FixedClock, InMemoryDocumentStore, RecordingNotifier},
        domain::OwnerId,
        services::{TaskGateway, TaskListState, TaskSync},
    },
};

/// Store type shared by the integration tests.
pub type TestStore = InMemoryDocumentStore<FixedClock>;

/// Dashboard type shared by the integration tests.
pub type TestDashboard = Dashboard<TestStore, RecordingNotifier, FixedClock>;

/// Everything a test needs to drive and observe a dashboard.
pub struct Rig {
    pub clock: FixedClock,
    pub store: Arc<TestStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub dashboard: TestDashboard,
}

/// Provides a dashboard over an empty store at a fixed instant.
#[fixture]
pub fn rig() -> Rig {
    let clock = FixedClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or(DateTime::UNIX_EPOCH),
    );
    let store = Arc::new(InMemoryDocumentStore::new(clock.clone()));
    let notifier = Arc::new(RecordingNotifier::new());
    let gateway = TaskGateway::new(Arc::clone(&store), GatewayConfig::default());
    let dashboard = Dashboard::new(
        Arc::new(gateway),
        Arc::clone(&notifier),
        Arc::new(clock.clone()),
    );
    Rig {
        clock,
        store,
        notifier,
        dashboard,
    }
}

/// Builds an owner identifier for tests.
pub fn owner(name: &str) -> OwnerId {
    OwnerId::new(name).expect("valid owner")
}

/// Applies deliveries until `done` holds, failing the test after a timeout.
pub async fn settle_until(
    sync: &mut TaskSync<TestStore>,
    done: impl Fn(&TaskListState) -> bool,
) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(sync.state()) {
            sync.next_delivery()
                .await
                .expect("delivery channel stays open");
        }
    })
    .await
    .expect("task list settles in time");
}
