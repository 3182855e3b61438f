//! RelayServer Actor implementation
//!
//! The central actor that owns the room. All membership changes and
//! broadcasts arrive as commands over one mpsc channel and are processed
//! one at a time, so no locks are needed: joins and leaves can never
//! interleave with a broadcast fan-out.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::handler::handle_connection;
use crate::message::Message;
use crate::room::{Participant, Room};
use crate::types::SessionId;

/// Commands sent from connection handlers to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// A new session registers with the room
    Join { participant: Arc<dyn Participant> },
    /// A session's read path terminated; remove it from the room
    Leave { session_id: SessionId },
    /// Broadcast a message to every member except the sender
    Deliver { sender: SessionId, message: Message },
}

/// The main RelayServer actor
///
/// Owns the room and processes commands from connection handlers.
pub struct RelayServer {
    /// The single broadcast domain
    room: Room,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a new RelayServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            room: Room::new(),
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Join { participant } => {
                info!("session {} joined the room", participant.id());
                self.room.join(participant);
                debug!("room now holds {} participants", self.room.len());
            }
            ServerCommand::Leave { session_id } => {
                info!("session {} left the room", session_id);
                self.room.leave(session_id);
                debug!("room now holds {} participants", self.room.len());
            }
            ServerCommand::Deliver { sender, message } => {
                debug!(
                    "session {} broadcasts {} body bytes",
                    sender,
                    message.body_len()
                );
                self.room.deliver(sender, message);
            }
        }
    }
}

/// Accept connections forever, spawning a handler task per connection
///
/// Accepting is a restartable infinite sequence: a failed accept is
/// logged and the loop re-arms.
pub async fn serve(listener: TcpListener, cmd_tx: mpsc::Sender<ServerCommand>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("new connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
                        error!("connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
            }
        }
    }
}
