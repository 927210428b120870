//! Chatrelay HTTP server
//!
//! Starts an Axum web server exposing the chat relay and file echo endpoints.

use chatrelay::{
    cli::{Cli, Command},
    config::Config,
    handlers::{self, AppState},
    telemetry,
    upstream::CompletionClient,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Handle subcommands before touching config or the environment
    if let Some(Command::Config { output }) = cli.command {
        let template = chatrelay::cli::generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                println!("Wrote template configuration to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::from_file(&cli.config)?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    // Resolve the upstream credential from the environment and build the
    // single client shared by all requests
    let api_key = config.api_key()?;
    let client = CompletionClient::new(&config.upstream, api_key)?;
    let state = AppState::new(Arc::new(config), client);

    tracing::info!(
        model = %state.config().upstream.model(),
        upstream = %state.config().upstream.base_url(),
        "Starting chatrelay server on {}:{}",
        state.config().server.host,
        state.config().server.port
    );

    // Create socket address
    let addr = SocketAddr::from((
        state
            .config()
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        state.config().server.port,
    ));

    // Build router
    let app = handlers::create_router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check available at http://{}/health", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
