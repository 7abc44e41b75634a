//! Event records exchanged between agents.
//!
//! An `Event` is built by the emitting agent and handed to listeners by
//! shared reference, so a listener can read but never rewrite who sent it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// Opaque key/value payload carried by an event.
pub type EventData = serde_json::Map<String, serde_json::Value>;

/// Build an `EventData` payload from a JSON value.
///
/// Objects are used as-is; any other value is wrapped as `{"value": ...}`.
pub fn event_data(value: serde_json::Value) -> EventData {
    match value {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = EventData::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Event types the engine emits on its own.
pub mod kind {
    /// Lifecycle transition; bypasses the suspension gate.
    pub const STATUS_CHANGED: &str = "status_changed";
    /// `adapt` wrote a state key.
    pub const STATE_CHANGED: &str = "state_changed";
    /// `update_needs` ran.
    pub const NEEDS_UPDATED: &str = "needs_updated";
    /// A need was satiated (or impacted).
    pub const NEED_SATISFIED: &str = "need_satisfied";
    /// Conversational message; conventional, not emitted by the engine.
    pub const MESSAGE_SENT: &str = "message_sent";
}

/// An immutable notification emitted by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    event_type: String,
    source: AgentId,
    timestamp: DateTime<Utc>,
    data: EventData,
}

impl Event {
    pub fn new(
        event_type: impl Into<String>,
        source: AgentId,
        timestamp: DateTime<Utc>,
        data: EventData,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            source,
            timestamp,
            data,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Id of the agent that emitted the event. Forwarding keeps it unchanged.
    pub fn source(&self) -> &AgentId {
        &self.source
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Convenience accessor for a single payload field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Whether this event may pass a suspended agent's gate.
    pub fn is_status_change(&self) -> bool {
        self.event_type == kind::STATUS_CHANGED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        let mut data = EventData::new();
        data.insert("content".into(), json!("hola"));
        Event::new(kind::MESSAGE_SENT, AgentId::from("clara"), Utc::now(), data)
    }

    #[test]
    fn event_serializes_type_field() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"type\":\"message_sent\""));
        assert!(json.contains("\"source\":\"clara\""));
    }

    #[test]
    fn accessors_expose_payload() {
        let event = sample();
        assert_eq!(event.event_type(), "message_sent");
        assert_eq!(event.source().as_str(), "clara");
        assert_eq!(event.get("content"), Some(&json!("hola")));
        assert!(event.get("missing").is_none());
        assert!(!event.is_status_change());
    }

    #[test]
    fn event_data_wraps_non_objects() {
        let data = event_data(json!({"a": 1}));
        assert_eq!(data.get("a"), Some(&json!(1)));
        let data = event_data(json!(42));
        assert_eq!(data.get("value"), Some(&json!(42)));
    }

    #[test]
    fn status_change_detection() {
        let event = Event::new(
            kind::STATUS_CHANGED,
            AgentId::from("a"),
            Utc::now(),
            EventData::new(),
        );
        assert!(event.is_status_change());
    }
}
