//! Sensorium CLI and agent protocol server entry point.
//!
//! Binary name: `snsr`
//!
//! Parses CLI arguments, sets up tracing, loads `sensorium.toml`, then
//! dispatches to the command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use std::path::Path;

use clap::Parser;

use sensorium_core::BoxCommunicator;
use sensorium_infra::config::{load_config, read_config, resolve_api_key, DEFAULT_CONFIG_FILE};
use sensorium_infra::llm::{ChatClient, LlmCommunicator};
use sensorium_observe::LogFormat;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,sensorium=debug",
        _ => "trace",
    };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    sensorium_observe::init_tracing(filter, format, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    // An explicit --config must exist; the default file is optional.
    let config = match &cli.config {
        Some(path) => read_config(path).await?,
        None => load_config(Path::new(DEFAULT_CONFIG_FILE)).await,
    };

    let result = match cli.command {
        Commands::Agents => cli::card::list_agents(&config, cli.json),

        Commands::Card { agent } => cli::card::show_card(&config, &agent, cli.json),

        Commands::Debate(args) => cli::debate::debate(&config, args, cli.json).await,

        Commands::Serve { agent, port, host } => {
            let mut settings = config.settings.clone();
            if settings.card_url.is_empty() {
                settings.card_url = format!("http://{host}:{port}");
            }
            let agent = cli::build_agent(&config, &agent, settings)?;
            agent.resume();

            let api_key = resolve_api_key(&config.llm)?;
            let client = ChatClient::new(&config.llm, api_key)?;
            let model = client.model().to_string();
            let state = AppState::new(BoxCommunicator::new(LlmCommunicator::new(agent, client)));

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} {} listening on {} ({})",
                console::style("⚡").bold(),
                console::style(state.agent().display_name()).cyan().bold(),
                console::style(format!("http://{addr}")).cyan(),
                model
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
            Ok(())
        }
    };

    sensorium_observe::shutdown_tracing();
    result
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
