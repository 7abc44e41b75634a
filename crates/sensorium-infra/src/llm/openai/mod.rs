//! OpenAI-compatible chat client.
//!
//! Talks to any endpoint implementing `POST /chat/completions` (OpenAI,
//! Groq, local proxies) selected by `LlmSettings::base_url`.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sensorium_observe::genai_attrs;
use sensorium_types::config::LlmSettings;
use sensorium_types::error::CommError;
use tracing::{field, info_span, Instrument};

use self::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// Text and metadata of one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub id: String,
    pub content: String,
    pub finish_reason: Option<String>,
}

/// Chat completions client.
///
/// Does NOT derive Debug, so the key cannot leak through `{:?}`.
pub struct ChatClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f64,
    timeout_secs: u64,
}

impl ChatClient {
    pub fn new(settings: &LlmSettings, api_key: SecretString) -> Result<Self, CommError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CommError::Provider(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout_secs: settings.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, system: &str, user: &str, json_mode: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.temperature,
            response_format: json_mode.then(ResponseFormat::json_object),
        }
    }

    /// Send a system + user message pair and return the first choice.
    ///
    /// With `json_mode`, the request asks the model for a JSON object.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        json_mode: bool,
    ) -> Result<ChatCompletion, CommError> {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = genai_attrs::OP_CHAT,
            gen_ai.provider.name = genai_attrs::PROVIDER_OPENAI_COMPAT,
            gen_ai.request.model = %self.model,
            gen_ai.request.temperature = self.temperature,
            gen_ai.response.id = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        let body = self.build_request(system, user, json_mode);
        let response = self.send(&body).instrument(span.clone()).await?;

        span.record(genai_attrs::GEN_AI_RESPONSE_ID, response.id.as_str());
        if let Some(usage) = response.usage {
            span.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, usage.prompt_tokens);
            span.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, usage.completion_tokens);
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CommError::InvalidResponse("response has no choices".to_string()))?;
        if let Some(reason) = choice.finish_reason.as_deref() {
            span.record(genai_attrs::GEN_AI_RESPONSE_FINISH_REASONS, reason);
        }

        Ok(ChatCompletion {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    async fn send(&self, body: &ChatRequest) -> Result<ChatResponse, CommError> {
        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    CommError::Unavailable(format!("cannot reach {}: {e}", self.base_url))
                } else {
                    CommError::Provider(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CommError::AuthenticationFailed,
                429 => CommError::Unavailable(format!("rate limited: {error_body}")),
                500..=599 => CommError::Unavailable(format!("HTTP {status}: {error_body}")),
                _ => CommError::Provider(format!("HTTP {status}: {error_body}")),
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| CommError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}
