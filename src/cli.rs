//! Command-line interface for modelgate
//!
//! Provides argument parsing and subcommand handling for the modelgate binary.

use clap::{Parser, Subcommand};

/// Model registry and chat completion relay
#[derive(Parser)]
#[command(name = "modelgate")]
#[command(version)]
#[command(about = "Model registry and chat completion relay")]
#[command(
    long_about = "modelgate keeps a registry of model ids with active flags and relays \
    OpenAI-style chat completion requests for active models to one upstream API."
)]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "modelgate.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# modelgate configuration
#
# Every setting is optional. Environment variables override the file:
#   OPENROUTER_API_KEY  -> upstream.api_key
#   OPENROUTER_URL      -> upstream.url
#   PORT                -> server.port

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"
port = 5000

[registry]
# JSON document holding {"<model id>": {"active": true|false}}
path = "api_config.json"

[upstream]
# OpenAI-compatible chat completions endpoint
url = "https://openrouter.ai/api/v1/chat/completions"

# Bearer token. Prefer OPENROUTER_API_KEY over storing it here.
# api_key = "sk-or-..."

# Sent as HTTP-Referer when the caller sends no Referer header
referer = "http://localhost:5000"

# Sent as X-Title
title = "modelgate"

# Seconds before an upstream call fails (1-300)
probe_timeout_seconds = 20
completion_timeout_seconds = 30

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path() {
        let cli = Cli::parse_from(["modelgate"]);
        assert_eq!(cli.config, "modelgate.toml");
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["modelgate", "--config", "custom.toml"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::parse_from(["modelgate", "config"]);
        assert!(matches!(cli.command, Some(Command::Config { output: None })));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["modelgate", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn template_is_valid_toml() {
        let result: Result<toml::Value, _> = toml::from_str(generate_config_template());
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[server]"));
        assert!(template.contains("[registry]"));
        assert!(template.contains("[upstream]"));
        assert!(template.contains("[observability]"));
    }
}
