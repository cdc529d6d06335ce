use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One observation recorded on a channel. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryEvent {
    pub id: Uuid,
    pub channel: String,
    pub source: String,
    pub event_type: String,
    pub data: Map<String, Value>,
    /// Server-assigned; strictly increasing within a channel.
    pub timestamp: DateTime<Utc>,
}

impl SensoryEvent {
    /// `data.agent_name`, when present and a string.
    pub fn agent_name(&self) -> Option<&str> {
        self.data.get("agent_name").and_then(Value::as_str)
    }
}
