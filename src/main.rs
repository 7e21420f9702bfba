//! modelgate HTTP server
//!
//! Serves the model registry and relays chat completions upstream.

use clap::Parser;
use modelgate::cli::{Cli, Command, generate_config_template};
use modelgate::{config::Config, handlers, telemetry};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    let mut config = Config::from_file_or_default(&cli.config)?;
    config.apply_env()?;

    telemetry::init(&config.observability.log_level);

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        registry = %config.registry.path.display(),
        upstream = %config.upstream.url,
        api_key_set = config.upstream.api_key().is_some(),
        "Starting modelgate"
    );
    if config.upstream.api_key().is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; completions and probes will fail");
    }

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = handlers::AppState::new(Arc::new(config))?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
