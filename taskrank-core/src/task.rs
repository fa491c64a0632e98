//! Task model for the scoring engine.
//!
//! Tasks arrive as loosely typed JSON, so the scalar fields the scorer reads are
//! kept as [`FieldValue`]s and validated at the point of use. Each factor
//! function documents which inputs it accepts and what it falls back to.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Largest float that still maps exactly onto an integer id.
const MAX_INTEGRAL_ID: f64 = 9.0e15;

/// Stable identifier of a task.
///
/// Integral floats (`1.0`) are the same id as the integer. Anything else that is
/// neither a number nor a string is kept as opaque JSON text so that malformed
/// dependency entries still compare by equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    Int(i64),
    Text(String),
    Opaque(String),
}

impl TaskId {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => TaskId::Text(s.clone()),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => TaskId::Int(i),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_ID => {
                    TaskId::Int(f as i64)
                }
                _ => TaskId::Opaque(n.to_string()),
            },
            other => TaskId::Opaque(other.to_string()),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Text(s) | TaskId::Opaque(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Int(n)
    }
}

impl From<i32> for TaskId {
    fn from(n: i32) -> Self {
        TaskId::Int(i64::from(n))
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Text(s)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaskId::Int(n) => serializer.serialize_i64(*n),
            TaskId::Text(s) => serializer.serialize_str(s),
            TaskId::Opaque(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => value.serialize(serializer),
                Err(_) => serializer.serialize_str(raw),
            },
        }
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(TaskId::from_value(&value))
    }
}

/// A scalar exactly as the caller submitted it.
///
/// Numbers keep their JSON form, so `2` is echoed back as `2` and not `2.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
    Other(Value),
}

impl FieldValue {
    /// `None` for JSON null, so absent and null fields look the same to the scorer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            other => Some(FieldValue::Other(other.clone())),
        }
    }

    /// Numeric reading of the field.
    ///
    /// Numbers and numeric text (surrounding whitespace ignored) convert directly,
    /// booleans read as 1 and 0. Text such as `"inf"` or `"1e400"` reads as
    /// infinity and is left for the factor functions to clamp; NaN is rejected.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Other(_) => None,
        };
        n.filter(|n| !n.is_nan())
    }

    /// Calendar date reading of the field; only `YYYY-MM-DD` text qualifies.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Text(s) => crate::time::parse_due_date(s),
            _ => None,
        }
    }
}

/// Non-finite floats have no JSON number form and are kept as their text.
impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(num) => FieldValue::Number(num),
            None => FieldValue::Text(n.to_string()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(Number::from(n))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(date: NaiveDate) -> Self {
        FieldValue::Text(date.format(crate::time::DUE_DATE_FORMAT).to_string())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Core task type.
///
/// Fields the scorer does not read are carried in `extra` and echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    #[serde(default)]
    pub due_date: Option<FieldValue>,

    /// Hours.
    #[serde(default)]
    pub estimated_hours: Option<FieldValue>,

    /// Conventionally 1-10.
    #[serde(default)]
    pub importance: Option<FieldValue>,

    /// Ids of the tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_due_date(mut self, due: impl Into<FieldValue>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_hours(mut self, hours: impl Into<FieldValue>) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<FieldValue>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_float_ids_match_integers() {
        assert_eq!(TaskId::from_value(&json!(3.0)), TaskId::Int(3));
        assert_eq!(TaskId::from_value(&json!(3)), TaskId::Int(3));
        assert_eq!(TaskId::from_value(&json!("3")), TaskId::Text("3".into()));
        assert!(matches!(TaskId::from_value(&json!(2.5)), TaskId::Opaque(_)));
    }

    #[test]
    fn opaque_ids_serialize_back_to_json() {
        let id = TaskId::from_value(&json!({"nested": true}));
        assert_eq!(serde_json::to_value(&id).unwrap(), json!({"nested": true}));
    }

    #[test]
    fn field_value_number_reading() {
        assert_eq!(FieldValue::from(7.0).as_number(), Some(7.0));
        assert_eq!(FieldValue::from(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(FieldValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(FieldValue::from("high").as_number(), None);
        assert_eq!(FieldValue::from("inf").as_number(), Some(f64::INFINITY));
        assert_eq!(FieldValue::from("1e400").as_number(), Some(f64::INFINITY));
        assert_eq!(FieldValue::from("NaN").as_number(), None);
        assert_eq!(FieldValue::from(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Other(json!([1])).as_number(), None);
    }

    #[test]
    fn field_value_from_null_is_absent() {
        assert_eq!(FieldValue::from_value(&Value::Null), None);
        assert_eq!(
            FieldValue::from_value(&json!(8)),
            Some(FieldValue::Number(8.into()))
        );
    }

    #[test]
    fn integer_fields_echo_without_a_fraction() {
        let value = FieldValue::from_value(&json!(2)).unwrap();
        assert_eq!(value.as_number(), Some(2.0));
        assert_eq!(serde_json::to_value(&value).unwrap().to_string(), "2");

        let task = Task::new(1, "Write report").with_hours(2_i64).with_importance(7.5);
        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(v["estimated_hours"].to_string(), "2");
        assert_eq!(v["importance"].to_string(), "7.5");
    }

    #[test]
    fn task_serializes_extra_fields_inline() {
        let mut task = Task::new(1, "Write report").with_importance(8.0);
        task.extra.insert("owner".into(), json!("sam"));
        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(v["id"], json!(1));
        assert_eq!(v["owner"], json!("sam"));
        assert_eq!(v["importance"], json!(8.0));
        assert_eq!(v["due_date"], Value::Null);
        assert_eq!(v["dependencies"], json!([]));
    }
}
