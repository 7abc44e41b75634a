use thiserror::Error;

/// Errors a `Communicator` (LLM collaborator) can report.
#[derive(Debug, Error)]
pub enum CommError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("agent unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a sensor (event listener).
#[derive(Debug, Error)]
#[error("sensor failed: {0}")]
pub struct SensorError(pub String);

impl SensorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors from the pluggable state store.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("checkpoint {0} not found")]
    CheckpointNotFound(u64),

    #[error("operation not supported by this state store: {0}")]
    Unsupported(&'static str),
}

/// Errors loading `sensorium.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("unknown agent profile '{0}'")]
    UnknownProfile(String),

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Errors extracting an `AgentResponse` from raw model output.
#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("no JSON object found in model output")]
    NoJson,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comm_error_display() {
        let err = CommError::Timeout(30);
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn sensor_error_display() {
        let err = SensorError::new("boom");
        assert_eq!(err.to_string(), "sensor failed: boom");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::UnknownProfile("carla".to_string());
        assert_eq!(err.to_string(), "unknown agent profile 'carla'");
    }
}
