//! Agent-interoperability task types.
//!
//! A minimal subset of the A2A task model: a task carries an incoming
//! message, and the hosting agent fills in status and artifacts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Failed,
}

/// A single content part of a message or artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
}

/// A message exchanged within a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMessage {
    /// "user" or "agent".
    pub role: String,
    pub parts: Vec<Part>,
}

impl TaskMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    pub fn agent_text(text: impl Into<String>) -> Self {
        Self {
            role: "agent".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Concatenated text of all text parts, or `None` when there is none.
    pub fn text(&self) -> Option<String> {
        let text: Vec<&str> = self
            .parts
            .iter()
            .map(|p| match p {
                Part::Text { text } => text.as_str(),
            })
            .filter(|t| !t.trim().is_empty())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join("\n"))
        }
    }
}

/// Current status of a task, optionally with a message for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<TaskMessage>,
}

/// Output produced by the agent for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub parts: Vec<Part>,
}

/// A unit of work sent to an agent through the protocol server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    #[serde(default)]
    pub message: Option<TaskMessage>,
    #[serde(default = "submitted")]
    pub status: TaskStatus,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

fn submitted() -> TaskStatus {
    TaskStatus {
        state: TaskState::Submitted,
        message: None,
    }
}

impl Task {
    pub fn new(message: TaskMessage) -> Self {
        Self {
            id: Uuid::now_v7(),
            message: Some(message),
            status: submitted(),
            artifacts: Vec::new(),
        }
    }

    /// Text of the incoming message, if any.
    pub fn input_text(&self) -> Option<String> {
        self.message.as_ref().and_then(TaskMessage::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_deserializes_with_only_message() {
        let json = r#"{"message":{"role":"user","parts":[{"type":"text","text":"hi"}]}}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.input_text().as_deref(), Some("hi"));
        assert!(task.artifacts.is_empty());
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let task = Task::new(TaskMessage::user_text("   "));
        assert!(task.input_text().is_none());
    }

    #[test]
    fn task_state_uses_kebab_case() {
        let json = serde_json::to_string(&TaskState::InputRequired).unwrap();
        assert_eq!(json, "\"input-required\"");
    }
}
