//! Session struct definition
//!
//! The server-side representative of one connected client, as the room
//! sees it: an identity plus the sending end of the connection's outbound
//! message queue.

use tokio::sync::mpsc;
use tracing::debug;

use crate::message::Message;
use crate::room::Participant;
use crate::types::SessionId;

/// One connected client's membership handle
///
/// The connection handler keeps the socket halves and the queue receiver;
/// the room keeps this handle. Dropping the handle (on leave) closes the
/// outbound queue, which ends the connection's write task.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    id: SessionId,
    /// Sending end of the session's outbound message queue (FIFO)
    outbound: mpsc::UnboundedSender<Message>,
}

impl Session {
    /// Create a session handle over the given outbound queue
    pub fn new(id: SessionId, outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self { id, outbound }
    }
}

impl Participant for Session {
    fn id(&self) -> SessionId {
        self.id
    }

    /// Append a message to this session's outbound queue
    ///
    /// Fire-and-forget: the write task drains the queue on its own. The
    /// send only fails once the write task is gone, which happens after
    /// the session already left the room.
    fn write(&self, message: Message) {
        if self.outbound.send(message).is_err() {
            debug!("session {}: outbound queue closed, dropping message", self.id);
        }
    }
}
