/// src/main.rs - Application entry point for the Ollama-OpenAI gateway server.

// Core modules
mod config;
mod constants;
mod error;
mod handlers;
mod logging;
mod openai;
mod registry;
mod server;
mod streaming;

// Bring into scope for main
use clap::Parser;
use config::{Config, validate_config};
use server::GatewayServer;

/// Version information for the application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::parse();
    config.normalize();

    if let Err(message) = validate_config(&config) {
        eprintln!("configuration error: {}", message);
        std::process::exit(1);
    }

    env_logger::Builder::new()
        .filter_level(config.level_filter())
        .init();

    let server = GatewayServer::new(config)?;
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests;
