//! Intake: turn a submitted JSON task list into [`Task`] records.
//!
//! Defaults applied per entry:
//! - `id` missing or null: 1-based position in the submitted list
//! - `title` missing or null: `"Task {id}"`
//! - `dependencies`: falsy values become `[]`, a scalar becomes `[scalar]`
//!
//! Entries that are not JSON objects are skipped. Scalar fields are not
//! validated here; the scorer applies its own fallbacks.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::task::{FieldValue, Task, TaskId};

/// Keys the analysis output writes next to the task's own fields.
const RESERVED_KEYS: [&str; 4] = ["priority_score", "score_components", "explanation", "score_error"];

const KNOWN_KEYS: [&str; 6] = [
    "id",
    "title",
    "due_date",
    "estimated_hours",
    "importance",
    "dependencies",
];

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("No tasks provided")]
    NoTasks,

    #[error("Invalid tasks format - expected a list of tasks.")]
    NotAList,

    #[error("Invalid tasks JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Normalize a submitted task list.
///
/// Errors with [`IntakeError::NoTasks`] for null or an empty array and
/// [`IntakeError::NotAList`] for any other non-array value.
pub fn normalize_tasks(raw: &Value) -> Result<Vec<Task>, IntakeError> {
    let items = match raw {
        Value::Array(items) if !items.is_empty() => items,
        Value::Array(_) | Value::Null => return Err(IntakeError::NoTasks),
        _ => return Err(IntakeError::NotAList),
    };

    let tasks: Vec<Task> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Object(fields) => Some(normalize_task(idx + 1, fields)),
            _ => {
                debug!(position = idx + 1, "skipping task entry that is not an object");
                None
            }
        })
        .collect();

    Ok(tasks)
}

/// Parse a JSON document holding a task list, then normalize it.
pub fn normalize_tasks_str(raw: &str) -> Result<Vec<Task>, IntakeError> {
    let value: Value = serde_json::from_str(raw)?;
    normalize_tasks(&value)
}

/// Build one task from its submitted fields. `position` is 1-based.
pub fn normalize_task(position: usize, fields: &Map<String, Value>) -> Task {
    let id = match fields.get("id") {
        None | Some(Value::Null) => TaskId::Int(position as i64),
        Some(v) => TaskId::from_value(v),
    };

    let title = match fields.get("title") {
        None | Some(Value::Null) => format!("Task {id}"),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let field = |key: &str| fields.get(key).and_then(FieldValue::from_value);

    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()) && !RESERVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Task {
        due_date: field("due_date"),
        estimated_hours: field("estimated_hours"),
        importance: field("importance"),
        dependencies: normalize_dependencies(fields.get("dependencies")),
        title,
        id,
        extra,
    }
}

/// Coerce a submitted `dependencies` value into a list of ids.
pub fn normalize_dependencies(raw: Option<&Value>) -> Vec<TaskId> {
    match raw {
        None => Vec::new(),
        Some(v) if is_falsy(v) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(TaskId::from_value).collect(),
        Some(scalar) => vec![TaskId::from_value(scalar)],
    }
}

/// Empty, zero, false and null values count as "not provided".
pub fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
