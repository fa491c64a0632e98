//! Task files for the `analyze` and `suggest` commands.
//!
//! A file holds either a bare task array or the API payload shape
//! `{"tasks": [...], "strategy": "..."}`.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use taskrank_core::{normalize_tasks, IntakeError, Strategy, Task};

#[derive(Debug, Clone)]
pub struct TaskFile {
    pub tasks: Vec<Task>,
    /// Strategy given inside the file, resolved leniently: any value that is not
    /// a known name scores as `smart_balance`.
    pub strategy: Option<Strategy>,
}

pub fn parse_task_document(doc: &Value) -> Result<TaskFile, IntakeError> {
    match doc {
        Value::Object(fields) => Ok(TaskFile {
            tasks: normalize_tasks(fields.get("tasks").unwrap_or(&Value::Null))?,
            strategy: fields
                .get("strategy")
                .map(|v| Strategy::resolve(v.as_str())),
        }),
        other => Ok(TaskFile {
            tasks: normalize_tasks(other)?,
            strategy: None,
        }),
    }
}

pub fn read_task_file(path: &Path) -> Result<TaskFile> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let doc: Value =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    parse_task_document(&doc).with_context(|| format!("load tasks from {}", path.display()))
}
