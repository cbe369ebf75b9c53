//! Then steps for task dashboard BDD scenarios.

use super::world::DashboardWorld;
use rstest_bdd_macros::then;
use taskdeck::task::domain::TaskStatus;

#[then(r#"the visible titles are "{titles}""#)]
fn visible_titles(world: &DashboardWorld, titles: String) -> Result<(), eyre::Report> {
    let expected: Vec<String> = titles.split(", ").map(str::to_owned).collect();
    let actual = world.visible_titles();
    if actual != expected {
        return Err(eyre::eyre!("expected titles {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the task "{title}" has status "{status}""#)]
fn task_has_status(world: &DashboardWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let task = world
        .dashboard
        .state()
        .tasks()
        .iter()
        .find(|task| task.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("no task titled {title}"))?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the last notification says "{message}""#)]
fn last_notification(world: &DashboardWorld, message: String) -> Result<(), eyre::Report> {
    let last = world
        .notifier
        .last()
        .ok_or_else(|| eyre::eyre!("no notification was shown"))?;
    if last.message != message {
        return Err(eyre::eyre!("expected notification {message:?}, found {last}"));
    }
    Ok(())
}

#[then(r#"no visible task belongs to "{owner}""#)]
fn no_task_of(world: &DashboardWorld, owner: String) -> Result<(), eyre::Report> {
    let leaked: Vec<String> = world
        .dashboard
        .visible_tasks()
        .iter()
        .filter(|task| task.owner().as_str() == owner)
        .map(|task| task.title().as_str().to_owned())
        .collect();
    if !leaked.is_empty() {
        return Err(eyre::eyre!("tasks of {owner} are visible: {leaked:?}"));
    }
    Ok(())
}

#[then(r#"the card for "{title}" is overdue"#)]
fn card_overdue(world: &DashboardWorld, title: String) -> Result<(), eyre::Report> {
    let cards = world.dashboard.cards();
    let card = cards
        .iter()
        .find(|card| card.task.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("no card titled {title}"))?;
    if !card.overdue {
        return Err(eyre::eyre!("card {title} is not overdue"));
    }
    Ok(())
}

#[then(r#"the card for "{title}" offers no action"#)]
fn card_without_action(world: &DashboardWorld, title: String) -> Result<(), eyre::Report> {
    let cards = world.dashboard.cards();
    let card = cards
        .iter()
        .find(|card| card.task.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("no card titled {title}"))?;
    if let Some(action) = card.action {
        return Err(eyre::eyre!("card {title} offers {}", action.label));
    }
    Ok(())
}

#[then(r#"the form is still open with title "{title}""#)]
fn form_still_open(world: &DashboardWorld, title: String) -> Result<(), eyre::Report> {
    let draft = world
        .dashboard
        .form()
        .draft()
        .ok_or_else(|| eyre::eyre!("the form was closed"))?;
    if draft.title != title {
        return Err(eyre::eyre!("expected draft title {title}, found {}", draft.title));
    }
    if world.last_error.is_none() {
        return Err(eyre::eyre!("the submit did not report an error"));
    }
    Ok(())
}
