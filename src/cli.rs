//! Command-line interface for chatrelay
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Parser, Subcommand};

/// Minimal HTTP relay for chat completions with a base64 file echo
#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Minimal HTTP relay for chat completions with a base64 file echo")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
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
    r#"# Chatrelay Configuration

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 3000

[upstream]
# Base URL of the OpenAI-compatible completion API (no trailing slash)
base_url = "https://api.groq.com/openai/v1"

# Model identifier sent with every completion request
model = "llama3-70b-8192"

# The API key itself is NEVER stored here. Set the environment variable
# named below before starting the server.
api_key_env = "GROQ_API_KEY"

[observability]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides this)
log_level = "info"
"#
}
