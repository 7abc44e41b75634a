//! Configuration types for Sensorium.
//!
//! `SensoriumConfig` represents the top-level `sensorium.toml`: engine
//! settings shared by every agent, the LLM endpoint the binary talks to, and
//! the declarative agent profiles. Every field has a default, so an empty
//! file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::agent::{Authorizations, Goal, Role, Safety};
use crate::need::Need;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensoriumConfig {
    pub settings: AgentSettings,
    pub llm: LlmSettings,
    #[serde(rename = "agent")]
    pub agents: Vec<AgentProfile>,
}

impl SensoriumConfig {
    /// Look up an agent profile by id, then by role name.
    pub fn profile(&self, key: &str) -> Option<&AgentProfile> {
        self.agents
            .iter()
            .find(|p| p.id.as_deref() == Some(key))
            .or_else(|| self.agents.iter().find(|p| p.role.name == key))
    }
}

/// Which `StateStore` strategy backs `adapt` / `sense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateFramework {
    /// Flat key/value map.
    #[default]
    KeyValue,
    /// Checkpointed state in the style of graph workflow frameworks.
    Graph,
}

/// Engine settings passed explicitly into every agent constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub framework: StateFramework,
    /// Version advertised on the agent card.
    pub card_version: String,
    /// Public URL advertised on the agent card (empty when not hosted).
    pub card_url: String,
    /// Capability tags advertised on the agent card.
    pub capabilities: Vec<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            framework: StateFramework::default(),
            card_version: default_card_version(),
            card_url: String::new(),
            capabilities: Vec::new(),
        }
    }
}

fn default_card_version() -> String {
    "0.1.0".to_string()
}

/// OpenAI-compatible chat endpoint used by the binary's communicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Declarative description of one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfile {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Free-form agent type tag (e.g. "intel", "strategy").
    pub kind: Option<String>,
    pub role: Role,
    pub goals: Vec<Goal>,
    pub needs: Vec<Need>,
    pub skills: Vec<String>,
    pub authorizations: Authorizations,
    pub safety: Safety,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: SensoriumConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings, AgentSettings::default());
        assert_eq!(config.settings.card_version, "0.1.0");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert!(config.agents.is_empty());
    }

    #[test]
    fn full_toml_parses_profiles_and_needs() {
        let toml_str = r#"
[settings]
framework = "graph"
card_url = "http://localhost:8000"
capabilities = ["streaming"]

[llm]
model = "llama-3.1-8b-instant"
base_url = "https://api.groq.com/openai/v1"
api_key_env = "GROQ_API_KEY"

[[agent]]
id = "carla-001"
kind = "intel"
role = { name = "Carla", content = "Analytical and skeptical." }
goals = [{ name = "Conceptual clarity", content = "Separate processing from experience" }]

[[agent.needs]]
name = "life_purpose"
value = 0.7
decay_rate = 0.015
satiation_rate = 0.35
satiation_event_type = "purpose_fulfillment"
description = "Sense of purpose"

[[agent]]
role = { name = "Roberto" }
"#;
        let config: SensoriumConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.settings.framework, StateFramework::Graph);
        assert_eq!(config.settings.card_version, "0.1.0");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.agents.len(), 2);

        let carla = config.profile("carla-001").unwrap();
        assert_eq!(carla.role.name, "Carla");
        assert_eq!(carla.needs.len(), 1);
        assert!((carla.needs[0].value - 0.7).abs() < f64::EPSILON);

        let roberto = config.profile("Roberto").unwrap();
        assert!(roberto.id.is_none());
        assert!(roberto.needs.is_empty());
        assert_eq!(roberto.safety.guardrails, "*");
    }

    #[test]
    fn framework_rejects_unknown_variant() {
        let result: Result<SensoriumConfig, _> = toml::from_str("[settings]\nframework = \"llamaindex\"");
        assert!(result.is_err());
    }
}
