//! End-to-end dashboard flows over the in-memory store.

use crate::in_memory::helpers::{Rig, owner, rig, settle_until};
use chrono::TimeDelta;
use rstest::rstest;
use taskdeck::{
    dashboard::messages,
    form::SubmitOutcome,
    task::{
        domain::{TaskPriority, TaskStatus},
        ports::{DocumentId, NotificationLevel},
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_edit_advance_delete(mut rig: Rig) {
    rig.dashboard.set_identity(Some(owner("alice")));
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;

    rig.dashboard.open_create_form().expect("open form");
    rig.dashboard.form_mut().draft_mut().expect("draft").title = "Plan trip".to_owned();
    let SubmitOutcome::Created(id) = rig.dashboard.submit_form().await.expect("create") else {
        panic!("expected a created outcome");
    };
    settle_until(rig.dashboard.sync_mut(), |state| state.task(&id).is_some()).await;
    let created_at = rig
        .dashboard
        .state()
        .task(&id)
        .and_then(|task| task.created_at());
    assert!(created_at.is_some());

    rig.clock.advance(TimeDelta::minutes(5));
    rig.dashboard.open_edit_form(&id).expect("open edit");
    rig.dashboard.form_mut().draft_mut().expect("draft").priority = TaskPriority::High;
    rig.dashboard.submit_form().await.expect("update");
    settle_until(rig.dashboard.sync_mut(), |state| {
        state.task(&id).map(|task| task.priority()) == Some(TaskPriority::High)
    })
    .await;
    let task = rig.dashboard.state().task(&id).expect("listed");
    assert_eq!(task.created_at(), created_at);
    assert!(task.updated_at() > created_at);

    assert_eq!(
        rig.dashboard.advance_status(&id).await,
        Ok(TaskStatus::InProgress)
    );
    settle_until(rig.dashboard.sync_mut(), |state| {
        state.task(&id).map(|task| task.status()) == Some(TaskStatus::InProgress)
    })
    .await;

    rig.dashboard.delete_task(&id).await.expect("delete");
    settle_until(rig.dashboard.sync_mut(), |state| state.task(&id).is_none()).await;
    assert_eq!(
        rig.store
            .document("tasks", &DocumentId::new(id.as_str()))
            .expect("store available"),
        None
    );

    let shown: Vec<String> = rig
        .notifier
        .notifications()
        .into_iter()
        .inspect(|notification| assert_eq!(notification.level, NotificationLevel::Success))
        .map(|notification| notification.message)
        .collect();
    assert_eq!(
        shown,
        vec![
            messages::TASK_CREATED,
            messages::TASK_UPDATED,
            messages::STATUS_UPDATED,
            messages::TASK_DELETED,
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_status_update_leaves_the_list_unchanged(mut rig: Rig) {
    rig.dashboard.set_identity(Some(owner("alice")));
    settle_until(rig.dashboard.sync_mut(), |state| !state.is_loading()).await;
    let before = rig.dashboard.state().clone();

    let ghost = taskdeck::task::domain::TaskId::new("ghost").expect("valid id");
    let result = rig
        .dashboard
        .change_status(&ghost, TaskStatus::Completed)
        .await;

    assert!(result.is_err());
    assert_eq!(rig.dashboard.state(), &before);
    assert_eq!(
        rig.notifier.last().map(|notification| notification.message),
        Some(messages::STATUS_FAILED.to_owned())
    );
}
