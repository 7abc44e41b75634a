//! Hosted agent management.
//!
//! GET  /api/v1/agent        - Identity, status, needs and subscriptions.
//! POST /api/v1/agent/status - Suspend or resume the agent.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use sensorium_core::Agent;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn summary(agent: &Agent) -> Value {
    let needs: Vec<Value> = agent
        .needs()
        .iter()
        .map(|n| {
            json!({
                "name": n.name,
                "value": n.value,
                "urgency": n.urgency_level().to_string(),
            })
        })
        .collect();
    json!({
        "id": agent.id(),
        "name": agent.display_name(),
        "status": agent.status(),
        "needs": needs,
        "subscriptions": agent.subscriptions(),
        "state": agent.state_snapshot(),
    })
}

/// GET /api/v1/agent - Current agent snapshot. Needs are decayed first.
pub async fn get_agent(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent = state.agent();
    agent.update_needs();
    let mut data = summary(agent);
    data["uptime_secs"] = json!(state.started_at.elapsed().as_secs());

    let elapsed = start.elapsed().as_millis() as u64;
    Json(
        ApiResponse::success(data, request_id, elapsed)
            .with_link("self", "/api/v1/agent")
            .with_link("card", "/.well-known/agent.json"),
    )
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    /// "suspend" or "resume".
    pub action: String,
}

/// POST /api/v1/agent/status - Lifecycle control.
///
/// Resuming an agent that is neither suspended nor freshly created is a
/// conflict.
pub async fn change_status(
    State(state): State<AppState>,
    body: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Json(change) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let agent = state.agent();
    match change.action.as_str() {
        "suspend" => {
            agent.suspend();
        }
        "resume" => {
            if !agent.resume() {
                return Err(AppError::Conflict(format!(
                    "cannot resume an agent in status '{}'",
                    agent.status()
                )));
            }
        }
        other => {
            return Err(AppError::Validation(format!(
                "unknown action '{other}', expected 'suspend' or 'resume'"
            )));
        }
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(summary(agent), request_id, elapsed).with_link("self", "/api/v1/agent"),
    ))
}
