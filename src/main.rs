//! Polled Broadcast Chat Server - Entry Point
//!
//! Starts the ChatServer actor and the WebSocket accept loop.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use poll_chat::{serve, ChatService, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=poll_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("poll_chat=info")),
        )
        .init();

    let config = ServerConfig::parse();

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Chat server listening on {}", config.addr);

    let service = ChatService::spawn(&config.service, config.command_buffer);
    info!(
        "ChatServer actor started (mailbox capacity {}, overflow {:?}, strict sender {})",
        config.service.mailbox_capacity, config.service.overflow, config.service.strict_sender
    );

    serve(listener, service).await?;

    Ok(())
}
