//! CLI command definitions and dispatch for the `mimic` binary.
//!
//! Uses clap derive macros for argument parsing. Resource commands follow a
//! noun-verb pattern (e.g., `mimic profile set`, `mimic persona get`).

pub mod chat;
pub mod config;
pub mod history;
pub mod persona;
pub mod profile;

use clap::{Parser, Subcommand};

/// Chat bot that replies in its owner's voice.
#[derive(Parser)]
#[command(name = "mimic", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
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

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (defaults to `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Run one message through the reply pipeline.
    Chat {
        /// The message text.
        message: String,

        /// User id the message comes from.
        #[arg(short, long)]
        user: String,

        /// Channel id.
        #[arg(long, default_value = "cli")]
        channel: String,

        /// Server (guild) id.
        #[arg(long, default_value = "cli")]
        server: String,
    },

    /// Manage per-user profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Manage the owner persona.
    Persona {
        #[command(subcommand)]
        action: PersonaCommand,
    },

    /// Show recent exchanges for a user, newest first.
    History {
        user_id: String,

        /// Maximum exchanges to show.
        #[arg(short, long, default_value = "5")]
        limit: u32,
    },

    /// Print the effective configuration.
    Config,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Create or replace a profile.
    Set {
        user_id: String,

        /// Display name.
        #[arg(long)]
        name: Option<String>,

        /// Attributes as a JSON object string.
        #[arg(short, long, default_value = "{}")]
        attributes: String,

        /// Merge into the existing attributes instead of replacing them.
        #[arg(long)]
        merge: bool,
    },

    /// Show one profile.
    Get { user_id: String },

    /// List all profiles.
    #[command(alias = "ls")]
    List,

    /// Delete a profile.
    #[command(alias = "rm")]
    Delete { user_id: String },
}

#[derive(Subcommand)]
pub enum PersonaCommand {
    /// Create or replace the persona.
    Set {
        /// Persona id (defaults to `[persona] persona_id`).
        #[arg(long)]
        id: Option<String>,

        /// Attributes as a JSON object string.
        #[arg(short, long)]
        attributes: String,

        /// Merge into the existing attributes instead of replacing them.
        #[arg(long)]
        merge: bool,
    },

    /// Show the persona.
    Get {
        /// Persona id (defaults to `[persona] persona_id`).
        #[arg(long)]
        id: Option<String>,
    },
}

/// Parse a `--attributes` argument.
pub(crate) fn parse_attributes(raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("--attributes must be valid JSON: {e}"))
}

/// Render an attribute map as indented JSON for terminal display.
pub(crate) fn format_attributes(attributes: &mimic_types::profile::AttributeMap) -> String {
    if attributes.is_empty() {
        return "{}".to_string();
    }
    serde_json::to_string_pretty(attributes).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_command() {
        let cli = Cli::try_parse_from(["mimic", "chat", "--user", "alice", "hello there"]).unwrap();
        match cli.command {
            Commands::Chat {
                message,
                user,
                channel,
                ..
            } => {
                assert_eq!(message, "hello there");
                assert_eq!(user, "alice");
                assert_eq!(channel, "cli");
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_verbosity_flags() {
        let cli = Cli::try_parse_from(["mimic", "-vv", "config"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_attributes() {
        let value = parse_attributes(r#"{"nickname": "ali"}"#).unwrap();
        assert_eq!(value["nickname"], "ali");
        assert!(parse_attributes("{not json").is_err());
    }
}
