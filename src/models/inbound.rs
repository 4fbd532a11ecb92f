#[cfg(test)]
#[path = "inbound_test.rs"]
mod tests;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// InboundEvent is the envelope the task server pushes on the update stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    NewTask,
    TaskCompleted,
    Other(String),
}

impl InboundEvent {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    pub fn parse(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from(self.event_type.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(Value::as_str)
    }

    /// task_id accepts the id as a number or a numeric string.
    pub fn task_id(&self) -> Option<u64> {
        match self.data.get("task_id").or_else(|| self.data.get("id"))? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl EventKind {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "new_task" => EventKind::NewTask,
            "task_completed" => EventKind::TaskCompleted,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::NewTask => write!(f, "new_task"),
            EventKind::TaskCompleted => write!(f, "task_completed"),
            EventKind::Other(name) => write!(f, "{name}"),
        }
    }
}
