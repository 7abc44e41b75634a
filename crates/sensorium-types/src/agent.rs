//! Agent identity, lifecycle status and discovery descriptor types.
//!
//! Roles and goals are the declarative part of an agent: they are injected
//! into prompts by whatever collaborator talks to the LLM. Status is the
//! only piece the engine itself acts on (see `AgentStatus::Suspended`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an agent.
///
/// Caller-supplied ids are kept verbatim; generated ids take the form
/// `agent_<uuid v7>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Generate a fresh, time-sortable agent id.
    pub fn generate() -> Self {
        Self(format!("agent_{}", Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Agent lifecycle states, modelled on the FIPA agent platform lifecycle.
///
/// Only `Suspended` changes engine behaviour (it gates event dispatch).
/// The remaining states are set by orchestration code and preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Created but not yet activated.
    Initiated,
    /// Participating normally.
    Active,
    /// Busy with a task (set by an orchestration loop).
    Working,
    /// Temporarily paused; only `status_changed` events are processed.
    Suspended,
    /// Waiting on an event or resource.
    Waiting,
    /// A collaborator reported a failure.
    Error,
    /// Terminated.
    Deleted,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Initiated => write!(f, "initiated"),
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Working => write!(f, "working"),
            AgentStatus::Suspended => write!(f, "suspended"),
            AgentStatus::Waiting => write!(f, "waiting"),
            AgentStatus::Error => write!(f, "error"),
            AgentStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "initiated" => Ok(AgentStatus::Initiated),
            "active" => Ok(AgentStatus::Active),
            "working" => Ok(AgentStatus::Working),
            "suspended" => Ok(AgentStatus::Suspended),
            "waiting" => Ok(AgentStatus::Waiting),
            "error" => Ok(AgentStatus::Error),
            "deleted" => Ok(AgentStatus::Deleted),
            other => Err(format!("invalid agent status: '{other}'")),
        }
    }
}

impl Default for AgentStatus {
    fn default() -> Self {
        AgentStatus::Initiated
    }
}

/// The persona an agent plays (injected into prompts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub name: String,
    pub content: String,
}

impl Role {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A named objective; an agent keeps an ordered list of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goal {
    pub name: String,
    pub content: String,
}

impl Goal {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Declarative access scope. Carried with the agent, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorizations {
    pub access_token: String,
    pub organizations: Vec<String>,
    pub applications: Vec<String>,
    pub projects: Vec<String>,
    pub roles: Vec<String>,
}

impl Default for Authorizations {
    fn default() -> Self {
        let any = || vec!["*".to_string()];
        Self {
            access_token: "*".to_string(),
            organizations: any(),
            applications: any(),
            projects: any(),
            roles: any(),
        }
    }
}

/// Guardrail prompt fragment handed to the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Safety {
    pub guardrails: String,
}

impl Default for Safety {
    fn default() -> Self {
        Self {
            guardrails: "*".to_string(),
        }
    }
}

/// Discovery descriptor a protocol server publishes for an agent.
///
/// Mirrors the A2A agent card: other systems read it to learn what the
/// agent is and what it can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub url: String,
    pub capabilities: Vec<String>,
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = AgentId::generate();
        let b = AgentId::generate();
        assert!(a.as_str().starts_with("agent_"));
        assert_ne!(a, b);
    }

    #[test]
    fn agent_id_serializes_as_plain_string() {
        let id = AgentId::from("carla-001");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"carla-001\"");
        assert_eq!(id.to_string(), "carla-001");
    }

    #[test]
    fn status_display_and_parse_agree() {
        for status in [
            AgentStatus::Initiated,
            AgentStatus::Active,
            AgentStatus::Working,
            AgentStatus::Suspended,
            AgentStatus::Waiting,
            AgentStatus::Error,
            AgentStatus::Deleted,
        ] {
            let parsed: AgentStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn status_parse_rejects_unknown() {
        let err = "paused".parse::<AgentStatus>().unwrap_err();
        assert!(err.contains("paused"));
    }

    #[test]
    fn status_defaults_to_initiated() {
        assert_eq!(AgentStatus::default(), AgentStatus::Initiated);
    }

    #[test]
    fn role_deserializes_with_missing_fields() {
        let role: Role = serde_json::from_str(r#"{"name":"Carla"}"#).unwrap();
        assert_eq!(role.name, "Carla");
        assert!(role.content.is_empty());
    }

    #[test]
    fn authorizations_default_to_wildcards() {
        let auth = Authorizations::default();
        assert_eq!(auth.access_token, "*");
        assert_eq!(auth.roles, vec!["*".to_string()]);
    }
}
