//! Mimic CLI and HTTP server entry point.
//!
//! Binary name: `mimic`
//!
//! Parses CLI arguments, initializes tracing, the database and services,
//! then dispatches to the appropriate command handler or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;

use mimic_observe::tracing_setup::{
    TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};
use mimic_types::chat::ChatRequest;

use cli::{Cli, Commands, PersonaCommand, ProfileCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Initialize application state (config, DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            if state.orchestrator.is_none() {
                anyhow::bail!(
                    "no generation backend configured; set MIMIC_API_KEY or {}",
                    state.config.generation.api_key_env
                );
            }

            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, model = %state.config.generation.model, "Server listening");
            if !cli.quiet {
                println!(
                    "  {} Mimic listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat {
            message,
            user,
            channel,
            server,
        } => {
            let request = ChatRequest {
                user_id: user,
                server_id: server,
                channel_id: channel,
                content: message,
            };
            cli::chat::chat(&state, request, cli.json).await?;
        }

        Commands::Profile { action } => match action {
            ProfileCommand::Set {
                user_id,
                name,
                attributes,
                merge,
            } => {
                cli::profile::set_profile(&state, &user_id, name, &attributes, merge, cli.json)
                    .await?;
            }
            ProfileCommand::Get { user_id } => {
                cli::profile::get_profile(&state, &user_id, cli.json).await?;
            }
            ProfileCommand::List => {
                cli::profile::list_profiles(&state, cli.json).await?;
            }
            ProfileCommand::Delete { user_id } => {
                cli::profile::delete_profile(&state, &user_id, cli.json).await?;
            }
        },

        Commands::Persona { action } => match action {
            PersonaCommand::Set {
                id,
                attributes,
                merge,
            } => {
                cli::persona::set_persona(&state, id, &attributes, merge, cli.json).await?;
            }
            PersonaCommand::Get { id } => {
                cli::persona::get_persona(&state, id, cli.json).await?;
            }
        },

        Commands::History { user_id, limit } => {
            cli::history::show_history(&state, &user_id, limit, cli.json).await?;
        }

        Commands::Config => {
            cli::config::show_config(&state, cli.json)?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
