use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deploy counts keyed by deployment name.
pub type RunningCount = HashMap<String, u64>;

/// One audit record from the director's `/events` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub object_type: String,
    #[serde(default)]
    pub object_name: String,
    #[serde(default)]
    pub task: String,
    #[serde(default, rename = "deployment")]
    pub deployment_name: String,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub error: String,
}

impl Event {
    /// The context payload as an object, or `None` when absent or not an object.
    pub fn context_map(&self) -> Option<&Map<String, Value>> {
        self.context.as_ref().and_then(Value::as_object)
    }

    /// The `releases` list under `context.<side>`, when every entry is a string.
    pub fn releases(&self, side: ContextSide) -> Option<Vec<&str>> {
        self.context_map()?
            .get(side.key())?
            .as_object()?
            .get("releases")?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSide {
    Before,
    After,
}

impl ContextSide {
    fn key(self) -> &'static str {
        match self {
            ContextSide::Before => "before",
            ContextSide::After => "after",
        }
    }
}

/// Query bounds for one page request. Times are Unix seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsFilter {
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub before_id: Option<String>,
}

impl EventsFilter {
    /// The same filter narrowed to events strictly older than `id`.
    pub fn with_before_id(&self, id: impl Into<String>) -> Self {
        Self {
            before_id: Some(id.into()),
            ..self.clone()
        }
    }

    /// Query parameters in the director's naming, only for bounds that are set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(before) = self.before {
            pairs.push(("before_time", before.to_string()));
        }
        if let Some(after) = self.after {
            pairs.push(("after_time", after.to_string()));
        }
        if let Some(before_id) = &self.before_id {
            pairs.push(("before_id", before_id.clone()));
        }
        pairs
    }
}
