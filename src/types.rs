/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored list entry. The label is serialized under the field name of the
/// resource kind it belongs to (`name` for todos, `title` for tasks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub label: String,
}

impl Record {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Wire format: `{ "id": 1, "<label_field>": "..." }`
    pub fn to_api_value(&self, kind: &ResourceKind) -> Value {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::from(self.id));
        obj.insert(kind.label_field.to_string(), Value::String(self.label.clone()));
        Value::Object(obj)
    }

    pub fn to_api_array(records: &[Record], kind: &ResourceKind) -> Value {
        Value::Array(records.iter().map(|r| r.to_api_value(kind)).collect())
    }
}

/// How the store picks the id of a newly created record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdPolicy {
    /// `len + 1` of the current sequence; ids repeat after deletions
    LengthPlusOne,
    /// Strictly increasing counter, never reused
    Monotonic,
}

impl IdPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "length" | "length_plus_one" | "length-plus-one" => Some(IdPolicy::LengthPlusOne),
            "monotonic" | "counter" => Some(IdPolicy::Monotonic),
            _ => None,
        }
    }
}

/// Description of one mounted collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    /// Singular noun used in messages ("todo", "task")
    pub noun: &'static str,
    /// Collection path segment, mounted at `/{collection}`
    pub collection: &'static str,
    /// Body and wire field carrying the label
    pub label_field: &'static str,
    /// Minimum label length; 0 means presence only
    pub min_len: usize,
    /// Labels inserted once at startup
    pub seeds: &'static [&'static str],
}

impl ResourceKind {
    pub const fn todo() -> Self {
        Self {
            noun: "todo",
            collection: "todo",
            label_field: "name",
            min_len: 3,
            seeds: &["todO1", "todO2", "todO3"],
        }
    }

    pub const fn task() -> Self {
        Self {
            noun: "task",
            collection: "task",
            label_field: "title",
            min_len: 0,
            seeds: &["task1", "task2", "task3"],
        }
    }

    pub fn not_found_message(&self) -> String {
        format!("the {} with given ID was not found", self.noun)
    }
}
