//! Application state shared by the HTTP handlers.
//!
//! The server hosts exactly one agent. Its communicator is type-erased so
//! the same router serves a live LLM-backed agent and test stubs.

use std::time::Instant;

use sensorium_core::protocol::TaskHandler;
use sensorium_core::{Agent, BoxCommunicator};

/// Handler pinned to the type-erased communicator.
pub type AgentTaskHandler = TaskHandler<BoxCommunicator>;

#[derive(Clone)]
pub struct AppState {
    pub handler: AgentTaskHandler,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(communicator: BoxCommunicator) -> Self {
        Self {
            handler: TaskHandler::new(std::sync::Arc::new(communicator)),
            started_at: Instant::now(),
        }
    }

    pub fn agent(&self) -> &Agent {
        self.handler.agent()
    }
}
