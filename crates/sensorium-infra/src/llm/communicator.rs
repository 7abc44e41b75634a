//! `Communicator` backed by an OpenAI-compatible chat model.

use std::time::Duration;

use sensorium_core::{Agent, Communicator};
use sensorium_observe::genai_attrs;
use sensorium_types::error::CommError;
use sensorium_types::response::AgentResponse;
use tracing::{info_span, warn, Instrument};

use super::openai::ChatClient;
use super::prompt::system_prompt;

/// User message sent when the caller's prompt is blank.
pub const BLANK_PROMPT_STAND_IN: &str = "Reflect on your purpose.";

/// Reply used when every attempt produced unparseable output.
pub const FALLBACK_REPLY: &str = "I'm still working through that question.";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Pairs an agent with a chat model. Each turn builds a needs-aware system
/// prompt and parses the model's JSON self-report.
pub struct LlmCommunicator {
    agent: Agent,
    client: ChatClient,
    max_attempts: u32,
    retry_delay: Duration,
}

impl LlmCommunicator {
    pub fn new(agent: Agent, client: ChatClient) -> Self {
        Self {
            agent,
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Retry policy for unparseable model output. Transport errors are
    /// never retried.
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// One agent turn with the full structured self-report.
    ///
    /// Falls back to [`AgentResponse::fallback`] once attempts run out.
    pub async fn respond(&self, prompt: &str) -> Result<AgentResponse, CommError> {
        let span = info_span!(
            "gen_ai.invoke_agent",
            gen_ai.operation.name = genai_attrs::OP_INVOKE_AGENT,
            gen_ai.agent.id = %self.agent.id(),
            gen_ai.agent.name = %self.agent.display_name(),
        );

        self.turn(prompt).instrument(span).await
    }

    async fn turn(&self, prompt: &str) -> Result<AgentResponse, CommError> {
        let system = system_prompt(&self.agent);
        let user = if prompt.trim().is_empty() {
            BLANK_PROMPT_STAND_IN
        } else {
            prompt
        };

        let mut attempt = 1;
        loop {
            let completion = self.client.complete(&system, user, true).await?;
            match AgentResponse::parse(&completion.content) {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_attempts => {
                    warn!(attempt, error = %err, "unparseable agent response, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, error = %err, "unparseable agent response, using fallback");
                    return Ok(AgentResponse::fallback(FALLBACK_REPLY));
                }
            }
        }
    }
}

impl Communicator for LlmCommunicator {
    fn agent(&self) -> &Agent {
        &self.agent
    }

    async fn communicate(&self, prompt: &str) -> Result<String, CommError> {
        Ok(self.respond(prompt).await?.response)
    }
}
