//! Structured self-report an agent's LLM is asked to produce.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ResponseParseError;

/// Reply plus introspection fields, as requested from a needs-aware prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// What the agent says.
    pub response: String,
    #[serde(default = "default_emotion")]
    pub emotional_introspection: String,
    /// How much the exchange served the agent's purpose, in `[-1, 1]`.
    pub purpose_introspection: f64,
    #[serde(default)]
    pub reasoning: String,
}

fn default_emotion() -> String {
    "pensive".to_string()
}

impl AgentResponse {
    /// Neutral stand-in used when the model output cannot be parsed.
    pub fn fallback(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            emotional_introspection: "confused".to_string(),
            purpose_introspection: 0.0,
            reasoning: "unparseable model output".to_string(),
        }
    }

    /// Extract a response from raw model output.
    ///
    /// Tolerates Markdown code fences and prose around the JSON object.
    /// `response` and `purpose_introspection` are required; the latter may
    /// be a number or a numeric string.
    pub fn parse(raw: &str) -> Result<Self, ResponseParseError> {
        let json = extract_json_object(raw).ok_or(ResponseParseError::NoJson)?;
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ResponseParseError::Malformed(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ResponseParseError::NoJson);
        };

        let response = required_str(&fields, "response")?;
        let purpose_introspection = match fields.get("purpose_introspection") {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                ResponseParseError::Malformed("purpose_introspection out of range".to_string())
            })?,
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                ResponseParseError::Malformed(format!("purpose_introspection '{s}' is not a number"))
            })?,
            Some(_) => {
                return Err(ResponseParseError::Malformed(
                    "purpose_introspection must be a number".to_string(),
                ));
            }
            None => return Err(ResponseParseError::MissingField("purpose_introspection")),
        };

        Ok(Self {
            response,
            emotional_introspection: optional_str(&fields, "emotional_introspection")
                .unwrap_or_else(default_emotion),
            purpose_introspection,
            reasoning: optional_str(&fields, "reasoning").unwrap_or_default(),
        })
    }
}

fn required_str(fields: &Map<String, Value>, key: &'static str) -> Result<String, ResponseParseError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ResponseParseError::Malformed(format!("{key} must be a string"))),
        None => Err(ResponseParseError::MissingField(key)),
    }
}

fn optional_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Slice from the first `{` to the last `}` after dropping code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```json").or_else(|| body.strip_prefix("```")) {
        body = rest.trim_start();
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest.trim_end();
    }
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}
