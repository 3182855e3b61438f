//! Broadcast TCP Chat Relay Library
//!
//! A chat relay built on tokio: clients send newline-terminated text
//! lines, and the server rebroadcasts each line to every other connected
//! client as a header-framed message.
//!
//! # Wire format
//! Server-to-client frames are `[4-byte ASCII decimal header][body]` with
//! bodies capped at 512 bytes. Client-to-server traffic is plain
//! newline-terminated text; the two directions intentionally do not share
//! a framing scheme.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the `Room`
//! - Each connection has a handler task communicating with the actor
//! - No locks needed - membership changes and broadcast fan-out are
//!   serialized by the actor's command loop
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{serve, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:9000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx).run());
//!     serve(listener, cmd_tx).await;
//! }
//! ```

pub mod error;
pub mod handler;
pub mod message;
pub mod room;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use error::{FramingError, RelayError};
pub use handler::handle_connection;
pub use message::{decode_header, Message, HEADER_LEN, MAX_BODY_BYTES};
pub use room::{Participant, Room, MAX_PARTICIPANTS};
pub use server::{serve, RelayServer, ServerCommand};
pub use session::Session;
pub use types::SessionId;
