//! Rebinding the live list between identities.

use std::sync::Arc;
use std::time::Duration;

use crate::in_memory::helpers::{Rig, owner, rig, settle_until};
use rstest::rstest;
use taskdeck::task::{
    domain::{NewTask, TaskTitle},
    services::{SyncEvent, TaskSync},
};
use tokio::sync::watch;

fn titled(title: &str) -> NewTask {
    NewTask::new(TaskTitle::new(title).expect("valid title"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_user_sees_only_their_tasks(mut rig: Rig) {
    let gateway = Arc::clone(rig.dashboard.sync().gateway());
    gateway
        .create(&owner("alice"), titled("Alice one"))
        .await
        .expect("create");
    gateway
        .create(&owner("bob"), titled("Bob one"))
        .await
        .expect("create");

    rig.dashboard.set_identity(Some(owner("alice")));
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;
    assert!(
        rig.dashboard
            .visible_tasks()
            .iter()
            .all(|task| task.owner().as_str() == "alice")
    );

    rig.dashboard.set_identity(Some(owner("bob")));
    assert!(rig.dashboard.state().tasks().is_empty());
    assert!(rig.dashboard.state().is_loading());
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;

    let titles: Vec<&str> = rig
        .dashboard
        .visible_tasks()
        .iter()
        .map(|task| task.title().as_str())
        .collect();
    assert_eq!(titles, vec!["Bob one"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writes_for_the_previous_user_never_reach_the_new_list(mut rig: Rig) {
    let gateway = Arc::clone(rig.dashboard.sync().gateway());
    rig.dashboard.set_identity(Some(owner("alice")));
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;

    rig.store.hold_deliveries().expect("hold");
    gateway
        .create(&owner("alice"), titled("In flight"))
        .await
        .expect("create");
    rig.dashboard.set_identity(Some(owner("bob")));
    rig.store.release_deliveries().expect("release");

    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;
    assert!(rig.dashboard.state().tasks().is_empty());
    assert_eq!(
        rig.dashboard.state().owner().map(|owner| owner.as_str()),
        Some("bob")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signing_out_releases_the_live_query(mut rig: Rig) {
    rig.dashboard.set_identity(Some(owner("alice")));
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;

    rig.dashboard.set_identity(None);

    tokio::time::timeout(Duration::from_secs(5), async {
        while rig.store.active_listeners().expect("store available") > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("listener released in time");
    assert!(rig.dashboard.state().owner().is_none());
    assert!(!rig.dashboard.state().is_loading());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn following_an_identity_channel_rebinds_the_list(rig: Rig) {
    let gateway = Arc::clone(rig.dashboard.sync().gateway());
    gateway
        .create(&owner("carol"), titled("Carol task"))
        .await
        .expect("create");

    let (sender, mut identity) = watch::channel(None);
    let mut sync = TaskSync::new(gateway);

    let first = sync.next_event(&mut identity);
    sender.send(Some(owner("carol"))).expect("receiver alive");
    assert_eq!(first.await, SyncEvent::IdentityChanged(Some(owner("carol"))));

    let applied = sync.next_event(&mut identity).await;
    assert!(matches!(applied, SyncEvent::SnapshotApplied { count: 1, .. }));

    drop(sender);
    assert_eq!(sync.next_event(&mut identity).await, SyncEvent::IdentityClosed);
}
