//! Conversion between stored task documents and domain tasks.
//!
//! Stored timestamps come in more than one shape depending on the writer.
//! They are normalized here and never leave this module in raw form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::task::{
    domain::{
        NewTask, OwnerId, PersistedTaskData, Task, TaskCategory, TaskDomainError, TaskId,
        TaskPatch, TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{Document, FieldValue, WriteFields},
};

pub(crate) const FIELD_TITLE: &str = "title";
pub(crate) const FIELD_DESCRIPTION: &str = "description";
pub(crate) const FIELD_STATUS: &str = "status";
pub(crate) const FIELD_CATEGORY: &str = "category";
pub(crate) const FIELD_PRIORITY: &str = "priority";
pub(crate) const FIELD_DUE_DATE: &str = "dueDate";
pub(crate) const FIELD_CREATED_AT: &str = "createdAt";
pub(crate) const FIELD_UPDATED_AT: &str = "updatedAt";

/// A timestamp as found in a stored document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredTimestamp {
    /// Structured point in time written by the store's own clock.
    Structured {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    /// Raw numeric epoch in milliseconds.
    EpochMillis(i64),
    /// Raw numeric epoch in milliseconds written as a float.
    FractionalEpochMillis(f64),
    /// RFC 3339 instant or bare `YYYY-MM-DD` calendar date.
    Text(String),
}

impl StoredTimestamp {
    /// Normalizes to a single comparable instant.
    ///
    /// Returns `None` for values outside the representable range and text
    /// that is neither RFC 3339 nor a calendar date.
    pub(crate) fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Structured {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            Self::EpochMillis(millis) => DateTime::from_timestamp_millis(*millis),
            Self::FractionalEpochMillis(millis) => whole_millis(*millis)
                .and_then(DateTime::from_timestamp_millis),
            Self::Text(text) => parse_text_timestamp(text),
        }
    }
}

/// Drops the fraction of a float epoch. Non-finite and out-of-range values
/// have no instant.
#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast and the fraction is discarded on purpose"
)]
fn whole_millis(millis: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let whole = millis.trunc();
    (whole.is_finite() && whole.abs() < LIMIT).then_some(whole as i64)
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Stored task body, minus the owner field whose name is configurable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDocument {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    category: TaskCategory,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(default)]
    due_date: Option<StoredTimestamp>,
    #[serde(default)]
    created_at: Option<StoredTimestamp>,
    #[serde(default)]
    updated_at: Option<StoredTimestamp>,
}

/// Reasons a stored document cannot become a task.
#[derive(Debug, Error)]
pub(crate) enum RecordError {
    #[error("document fields do not describe a task: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document has no string owner field `{0}`")]
    MissingOwner(String),

    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Decodes one stored document into a task.
pub(crate) fn decode_task(document: Document, owner_field: &str) -> Result<Task, RecordError> {
    let Document { id, mut data } = document;
    let owner = match data.remove(owner_field) {
        Some(Value::String(owner)) => OwnerId::new(owner)?,
        _ => return Err(RecordError::MissingOwner(owner_field.to_owned())),
    };
    let body: TaskDocument = serde_json::from_value(Value::Object(data))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id.as_str())?,
        title: TaskTitle::new(body.title)?,
        description: body.description,
        status: body.status,
        category: body.category,
        priority: body.priority,
        due_date: body.due_date.as_ref().and_then(StoredTimestamp::normalize),
        owner,
        created_at: body.created_at.as_ref().and_then(StoredTimestamp::normalize),
        updated_at: body.updated_at.as_ref().and_then(StoredTimestamp::normalize),
    }))
}

fn encode_instant(instant: Option<DateTime<Utc>>) -> Value {
    instant.map_or(Value::Null, |at| {
        json!({
            "seconds": at.timestamp(),
            "nanoseconds": at.timestamp_subsec_nanos(),
        })
    })
}

fn json_field(value: impl Into<Value>) -> FieldValue {
    FieldValue::Json(value.into())
}

/// Builds the fields written when creating a task.
pub(crate) fn encode_new_task(task: &NewTask, owner_field: &str, owner: &OwnerId) -> WriteFields {
    let mut fields = WriteFields::new();
    fields.insert(FIELD_TITLE.to_owned(), json_field(task.title().as_str()));
    fields.insert(FIELD_DESCRIPTION.to_owned(), json_field(task.description()));
    fields.insert(FIELD_STATUS.to_owned(), json_field(task.status().as_str()));
    fields.insert(FIELD_CATEGORY.to_owned(), json_field(task.category().as_str()));
    fields.insert(FIELD_PRIORITY.to_owned(), json_field(task.priority().as_str()));
    fields.insert(
        FIELD_DUE_DATE.to_owned(),
        FieldValue::Json(encode_instant(task.due_date())),
    );
    fields.insert(owner_field.to_owned(), json_field(owner.as_str()));
    fields.insert(FIELD_CREATED_AT.to_owned(), FieldValue::ServerTimestamp);
    fields.insert(FIELD_UPDATED_AT.to_owned(), FieldValue::ServerTimestamp);
    fields
}

/// Builds the fields written by a partial update.
///
/// The last-modified stamp is always refreshed, even for an empty patch.
pub(crate) fn encode_patch(patch: &TaskPatch) -> WriteFields {
    let mut fields = WriteFields::new();
    if let Some(title) = &patch.title {
        fields.insert(FIELD_TITLE.to_owned(), json_field(title.as_str()));
    }
    if let Some(description) = &patch.description {
        fields.insert(FIELD_DESCRIPTION.to_owned(), json_field(description.as_str()));
    }
    if let Some(status) = patch.status {
        fields.insert(FIELD_STATUS.to_owned(), json_field(status.as_str()));
    }
    if let Some(category) = patch.category {
        fields.insert(FIELD_CATEGORY.to_owned(), json_field(category.as_str()));
    }
    if let Some(priority) = patch.priority {
        fields.insert(FIELD_PRIORITY.to_owned(), json_field(priority.as_str()));
    }
    if let Some(due_date) = patch.due_date {
        fields.insert(
            FIELD_DUE_DATE.to_owned(),
            FieldValue::Json(encode_instant(due_date)),
        );
    }
    fields.insert(FIELD_UPDATED_AT.to_owned(), FieldValue::ServerTimestamp);
    fields
}
