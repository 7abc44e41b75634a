//! CLI command definitions and dispatch for the `snsr` binary.
//!
//! Uses clap derive macros for argument parsing. Agents are looked up in
//! the `[[agent]]` profiles of `sensorium.toml`, by id or by role name.

pub mod card;
pub mod debate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sensorium_core::Agent;
use sensorium_types::config::{AgentSettings, SensoriumConfig};
use sensorium_types::error::ConfigError;

/// Run needs-driven conversational agents.
#[derive(Parser)]
#[command(name = "snsr", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./sensorium.toml).
    #[arg(long, global = true, env = "SENSORIUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the agent profiles in the configuration.
    #[command(alias = "ls")]
    Agents,

    /// Print an agent's interoperability card.
    Card {
        /// Profile id or role name.
        agent: String,
    },

    /// Host one agent over HTTP.
    Serve {
        /// Profile id or role name.
        agent: String,

        /// Port to listen on.
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Let two agents debate a question, each driven by its needs.
    Debate(debate::DebateArgs),
}

/// Build an agent from the profile `key` (id or role name).
pub fn build_agent(
    config: &SensoriumConfig,
    key: &str,
    settings: AgentSettings,
) -> Result<Agent, ConfigError> {
    let profile = config
        .profile(key)
        .ok_or_else(|| ConfigError::UnknownProfile(key.to_string()))?;
    Ok(Agent::from_profile(profile, settings))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use sensorium_infra::config::parse_config;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn globals_parse_after_subcommand() {
        let cli = Cli::parse_from(["snsr", "card", "carla-001", "-vv", "--json"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Card { ref agent } if agent == "carla-001"));
    }

    #[test]
    fn debate_defaults() {
        let cli = Cli::parse_from(["snsr", "debate", "Carla", "Roberto"]);
        let Commands::Debate(args) = cli.command else {
            panic!("expected debate");
        };
        assert_eq!(args.rounds, 2);
        assert_eq!(args.need, "life_purpose");
    }

    #[test]
    fn build_agent_by_role_name() {
        let config = parse_config(
            r#"
[[agent]]
id = "roberto-001"
role = { name = "Roberto", content = "Phenomenologist." }
"#,
        )
        .unwrap();

        let agent = build_agent(&config, "Roberto", AgentSettings::default()).unwrap();
        assert_eq!(agent.id().as_str(), "roberto-001");

        let err = build_agent(&config, "Nadie", AgentSettings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(_)));
    }
}
