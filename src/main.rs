//! Broadcast TCP Chat Relay - Server Entry Point
//!
//! Parses the port arguments, starts the RelayServer actor, and accepts
//! connections.

use std::env;
use std::process;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{serve, RelayServer};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let ports: Vec<String> = env::args().skip(1).collect();
    if ports.is_empty() {
        eprintln!("Usage: chat-relay-server <port> [<port> ...]");
        process::exit(1);
    }

    // Additional ports are accepted but only the first is used.
    let port: u16 = match ports[0].parse() {
        Ok(port) => port,
        Err(e) => {
            error!("invalid port '{}': {}", ports[0], e);
            return;
        }
    };

    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind port {}: {}", port, e);
            return;
        }
    };
    info!("chat relay listening on port {}", port);

    // Create RelayServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    tokio::spawn(RelayServer::new(cmd_rx).run());

    // Connection accept loop
    serve(listener, cmd_tx).await;
}
