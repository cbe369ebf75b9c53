//! Given steps for task dashboard BDD scenarios.

use super::world::DashboardWorld;
use chrono::DateTime;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use taskdeck::task::{domain::OwnerId, ports::StoreError};

#[given("the clock reads {seconds:i64}")]
fn clock_reads(world: &mut DashboardWorld, seconds: i64) -> Result<(), eyre::Report> {
    let now = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| eyre::eyre!("clock instant out of range: {seconds}"))?;
    world.clock.set(now);
    Ok(())
}

#[given(r#""{owner}" has a "{status}" task "{title}" created at {seconds:i64}"#)]
fn stored_task_created_at(
    world: &mut DashboardWorld,
    owner: String,
    status: String,
    title: String,
    seconds: i64,
) -> Result<(), eyre::Report> {
    world.seed_task(
        &owner,
        &title,
        &status,
        &[("createdAt", json!({ "seconds": seconds, "nanoseconds": 0 }))],
    )
}

#[given(r#""{owner}" has a "{status}" task "{title}" due at {seconds:i64}"#)]
fn stored_task_due_at(
    world: &mut DashboardWorld,
    owner: String,
    status: String,
    title: String,
    seconds: i64,
) -> Result<(), eyre::Report> {
    world.seed_task(
        &owner,
        &title,
        &status,
        &[("dueDate", json!({ "seconds": seconds, "nanoseconds": 0 }))],
    )
}

#[given(r#""{owner}" is signed in"#)]
fn signed_in(world: &mut DashboardWorld, owner: String) -> Result<(), eyre::Report> {
    let owner = OwnerId::new(owner).wrap_err("scenario owner")?;
    world.dashboard.set_identity(Some(owner));
    world.settle_until(|state| !state.is_loading())
}

#[given("store deliveries are held")]
fn deliveries_held(world: &mut DashboardWorld) -> Result<(), eyre::Report> {
    world
        .store
        .hold_deliveries()
        .map_err(|err| eyre::eyre!("holding deliveries failed: {err}"))
}

#[given("the store rejects the next write")]
fn store_rejects_next_write(world: &mut DashboardWorld) -> Result<(), eyre::Report> {
    world
        .store
        .reject_next_write(StoreError::Unavailable("connection lost".to_owned()))
        .map_err(|err| eyre::eyre!("arming rejection failed: {err}"))
}
