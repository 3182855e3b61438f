//! Broadcast TCP Chat Relay - Client Entry Point
//!
//! Connects to a relay on 127.0.0.1, forwards stdin lines to the server,
//! and prints every header-framed message the relay fans out to us.

use std::env;
use std::process;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{decode_header, HEADER_LEN};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let Some(port) = env::args().nth(1) else {
        eprintln!("Usage: chat-relay-client <port>");
        process::exit(1);
    };
    let port: u16 = port.parse()?;

    let stream = TcpStream::connect(("127.0.0.1", port)).await?;
    info!("connected to relay on port {}", port);

    let (read_half, mut write_half) = stream.into_split();

    // Print relayed frames until the server goes away.
    tokio::spawn(print_incoming(read_half));

    // Forward stdin to the relay, one newline-terminated line at a time.
    let mut input = BufReader::new(tokio::io::stdin());
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break;
        }
        write_half.write_all(line.as_bytes()).await?;
    }

    Ok(())
}

/// Read header-framed messages from the relay and print their bodies
async fn print_incoming(mut read_half: OwnedReadHalf) {
    let mut header = [0u8; HEADER_LEN];
    loop {
        if read_half.read_exact(&mut header).await.is_err() {
            info!("server closed the connection");
            break;
        }
        let body_len = match decode_header(&header) {
            Ok(len) => len,
            Err(e) => {
                error!("invalid frame from server: {}", e);
                break;
            }
        };
        let mut body = vec![0u8; body_len];
        if read_half.read_exact(&mut body).await.is_err() {
            error!("connection lost mid-frame");
            break;
        }
        println!("Server: {}", String::from_utf8_lossy(&body));
    }
}
