//! Agent-interoperability endpoints.
//!
//! GET  /.well-known/agent.json - Agent card.
//! POST /tasks/send             - Submit a task, receive it back completed.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::json;

use sensorium_types::agent::AgentCard;
use sensorium_types::event::{event_data, kind};
use sensorium_types::task::{Part, Task, TaskState};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /.well-known/agent.json - Discovery descriptor.
pub async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.handler.card())
}

/// POST /tasks/send - Run one task through the agent's communicator.
///
/// A completed reply is also emitted as `message_sent` on the agent.
pub async fn send_task(
    State(state): State<AppState>,
    body: Result<Json<Task>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let Json(task) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let task = state.handler.handle_task(task).await;

    if task.status.state == TaskState::Completed {
        let reply: Vec<&str> = task
            .artifacts
            .iter()
            .flat_map(|a| a.parts.iter())
            .map(|p| match p {
                Part::Text { text } => text.as_str(),
            })
            .collect();
        state.agent().emit(
            kind::MESSAGE_SENT,
            Some(event_data(json!({
                "content": reply.join("\n"),
                "recipient": format!("task:{}", task.id),
            }))),
        );
    }

    tracing::info!(task_id = %task.id, state = ?task.status.state, "task handled");
    Ok(Json(task))
}
