//! TCP connection handler
//!
//! Drives one client connection: registers the session with the relay
//! actor, relays inbound newline-framed lines as broadcast commands, and
//! drains the session's outbound queue onto the socket.
//!
//! Inbound and outbound framing deliberately differ: clients send plain
//! newline-terminated text, while everything the relay writes back is
//! header-framed. The handler is where lines become frames.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::message::Message;
use crate::server::ServerCommand;
use crate::session::Session;
use crate::types::SessionId;

/// Handle a new TCP connection
///
/// Joins the room first, then reads until the connection dies. Removal
/// from the room happens exactly once, when the read path terminates;
/// the write task ends on its own once the room drops the session handle
/// and the outbound queue closes.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), RelayError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let session_id = SessionId::new();
    info!("session {} connected from {}", session_id, peer_addr);

    let (read_half, write_half) = stream.into_split();

    // The unbounded channel is the session's outbound FIFO queue: the
    // room writes into it, the write task drains it.
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Message>();
    let session = Arc::new(Session::new(session_id, outbound_tx));

    // Register with the room before the first read; membership is
    // visible to every broadcast from here on.
    cmd_tx
        .send(ServerCommand::Join { participant: session })
        .await
        .map_err(|_| RelayError::ChannelSend)?;

    let write_task = tokio::spawn(write_outbound(session_id, write_half, outbound_rx));

    read_inbound(session_id, read_half, &cmd_tx).await;

    // The read path terminated; leave the room exactly once. The room
    // drops our handle, the outbound queue closes, and the write task
    // drains out.
    let _ = cmd_tx.send(ServerCommand::Leave { session_id }).await;
    let _ = write_task.await;

    info!("session {} disconnected", session_id);

    Ok(())
}

/// Read newline-framed lines until the connection ends
///
/// An infinite, re-arming sequence of frames: each complete line is
/// stripped of its delimiter, encoded as a header-framed message, and
/// handed to the relay actor. The first EOF or read error is terminal.
async fn read_inbound(
    session_id: SessionId,
    read_half: OwnedReadHalf,
    cmd_tx: &mpsc::Sender<ServerCommand>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                info!("session {}: connection closed by peer", session_id);
                break;
            }
            Ok(_) => {
                if !line.ends_with(b"\n") {
                    // Partial line cut off by EOF; the stream is done and
                    // the fragment is discarded like the close itself.
                    debug!("session {}: discarding partial line at EOF", session_id);
                    break;
                }
                while line.last().is_some_and(|b| *b == b'\n' || *b == b'\r') {
                    line.pop();
                }

                let message = Message::new(&line);
                if cmd_tx
                    .send(ServerCommand::Deliver {
                        sender: session_id,
                        message,
                    })
                    .await
                    .is_err()
                {
                    debug!("session {}: server closed, ending read loop", session_id);
                    break;
                }
            }
            Err(e) => {
                error!("session {}: read error: {}", session_id, e);
                break;
            }
        }
    }
}

/// Drain the session's outbound queue onto the socket
///
/// Every queued message has its header validated before any bytes reach
/// the wire; a message with an invalid header is dropped with a
/// diagnostic. A transport write error is logged but does not end the
/// session here; eviction belongs to the read path.
async fn write_outbound(
    session_id: SessionId,
    mut write_half: OwnedWriteHalf,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(mut message) = outbound_rx.recv().await {
        match message.decode_header() {
            Ok(_) => {
                if let Err(e) = write_half.write_all(message.as_bytes()).await {
                    error!("session {}: write error: {}", session_id, e);
                }
            }
            Err(e) => {
                warn!("session {}: dropping undeliverable message: {}", session_id, e);
            }
        }
    }

    debug!("session {}: write task ended", session_id);
}
