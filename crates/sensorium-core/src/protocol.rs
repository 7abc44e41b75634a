//! Agent-interoperability adapter.
//!
//! `TaskHandler` is what a protocol server calls: it publishes the agent's
//! card and turns an incoming task into a `communicate` call.

use std::sync::Arc;

use sensorium_types::agent::AgentCard;
use sensorium_types::task::{Artifact, Part, Task, TaskMessage, TaskState, TaskStatus};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::communicate::Communicator;

/// Prompt returned with `input-required` when a task carries no text.
pub const INPUT_REQUIRED_PROMPT: &str = "Please send a text message.";

pub struct TaskHandler<C> {
    communicator: Arc<C>,
}

impl<C> Clone for TaskHandler<C> {
    fn clone(&self) -> Self {
        Self {
            communicator: Arc::clone(&self.communicator),
        }
    }
}

impl<C: Communicator> TaskHandler<C> {
    pub fn new(communicator: Arc<C>) -> Self {
        Self { communicator }
    }

    pub fn agent(&self) -> &Agent {
        self.communicator.agent()
    }

    pub fn card(&self) -> AgentCard {
        self.agent().card()
    }

    /// Answer a task.
    ///
    /// - no text in the message: `input-required`, with a prompt for the caller
    /// - communicator reply: one text artifact, `completed`
    /// - communicator error: `failed`, with the error as the status message
    ///
    /// The agent's lifecycle status is not consulted.
    pub async fn handle_task(&self, mut task: Task) -> Task {
        let Some(text) = task.input_text() else {
            debug!(task_id = %task.id, "task has no text, requesting input");
            task.status = TaskStatus {
                state: TaskState::InputRequired,
                message: Some(TaskMessage::agent_text(INPUT_REQUIRED_PROMPT)),
            };
            return task;
        };

        task.status.state = TaskState::Working;
        match self.communicator.communicate(&text).await {
            Ok(reply) => {
                task.artifacts = vec![Artifact {
                    parts: vec![Part::Text { text: reply }],
                }];
                task.status = TaskStatus {
                    state: TaskState::Completed,
                    message: None,
                };
            }
            Err(err) => {
                warn!(task_id = %task.id, agent_id = %self.agent().id(), error = %err, "task failed");
                task.status = TaskStatus {
                    state: TaskState::Failed,
                    message: Some(TaskMessage::agent_text(err.to_string())),
                };
            }
        }
        task
    }
}

#[cfg(test)]
mod tests {
    use sensorium_types::agent::Role;
    use sensorium_types::error::CommError;
    use sensorium_types::task::Task;

    use super::*;

    struct Canned {
        agent: Agent,
        reply: Result<&'static str, ()>,
    }

    impl Communicator for Canned {
        fn agent(&self) -> &Agent {
            &self.agent
        }

        async fn communicate(&self, prompt: &str) -> Result<String, CommError> {
            match self.reply {
                Ok(reply) => Ok(format!("{reply} ({prompt})")),
                Err(()) => Err(CommError::Timeout(30)),
            }
        }
    }

    fn handler(reply: Result<&'static str, ()>) -> TaskHandler<Canned> {
        let agent = Agent::builder()
            .role(Role::new("Carla", "Analytical AI"))
            .build();
        TaskHandler::new(Arc::new(Canned { agent, reply }))
    }

    #[tokio::test]
    async fn completed_task_carries_reply_artifact() {
        let task = handler(Ok("Qualia are patterns"))
            .handle_task(Task::new(TaskMessage::user_text("Are qualia real?")))
            .await;

        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(
            task.artifacts[0].parts[0],
            Part::Text {
                text: "Qualia are patterns (Are qualia real?)".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_message_requires_input() {
        let task = handler(Ok("unused"))
            .handle_task(Task::new(TaskMessage::user_text("   ")))
            .await;

        assert_eq!(task.status.state, TaskState::InputRequired);
        let message = task.status.message.unwrap();
        assert_eq!(message.role, "agent");
        assert_eq!(message.text().as_deref(), Some(INPUT_REQUIRED_PROMPT));
        assert!(task.artifacts.is_empty());
    }

    #[tokio::test]
    async fn communicator_error_fails_task() {
        let task = handler(Err(()))
            .handle_task(Task::new(TaskMessage::user_text("hello")))
            .await;

        assert_eq!(task.status.state, TaskState::Failed);
        assert_eq!(
            task.status.message.unwrap().text().as_deref(),
            Some("request timed out after 30s")
        );
    }

    #[tokio::test]
    async fn suspended_agent_still_answers_tasks() {
        let handler = handler(Ok("ok"));
        handler.agent().suspend();
        let task = handler
            .handle_task(Task::new(TaskMessage::user_text("hi")))
            .await;
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[test]
    fn card_comes_from_agent() {
        assert_eq!(handler(Ok("")).card().name, "Carla");
    }
}
