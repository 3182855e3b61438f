//! Room struct definition
//!
//! The broadcast domain: holds the live participant set and fans each
//! message out to every participant except its sender.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use tracing::warn;

use crate::message::Message;
use crate::types::SessionId;

/// Documented maximum participant count
///
/// The bound is not enforced as a hard error path; crossing it only logs
/// a warning and the join still succeeds.
pub const MAX_PARTICIPANTS: usize = 100;

/// Capability a room member must provide
///
/// The room never sees a concrete session type, only something it can
/// identify and push messages into. `Session` is the sole implementation
/// today; a future variant (e.g. a logging participant) would slot in
/// without touching the room.
pub trait Participant: std::fmt::Debug + Send + Sync {
    /// Identity used for membership and sender exclusion
    fn id(&self) -> SessionId;

    /// Enqueue one private copy of a message for this member
    ///
    /// Fire-and-forget: delivery to the wire happens on the member's own
    /// write path, and a failure there never propagates back here.
    fn write(&self, message: Message);
}

/// The broadcast domain containing all current participants
///
/// Membership has set semantics: uniqueness by session identity, no
/// duplicates. All mutation and fan-out runs on the relay actor's task,
/// so joins and leaves never interleave with a broadcast mid-iteration.
#[derive(Debug, Default)]
pub struct Room {
    /// Active members, keyed by session identity
    participants: HashMap<SessionId, Arc<dyn Participant>>,
    /// Messages accepted for broadcast but not yet fanned out
    pending: VecDeque<Message>,
}

impl Room {
    /// Create an empty room
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant; idempotent if already a member
    pub fn join(&mut self, participant: Arc<dyn Participant>) {
        self.participants.insert(participant.id(), participant);
        if self.participants.len() > MAX_PARTICIPANTS {
            warn!(
                "room holds {} participants, above the documented bound of {}",
                self.participants.len(),
                MAX_PARTICIPANTS
            );
        }
    }

    /// Remove a participant; no-op if absent
    pub fn leave(&mut self, id: SessionId) {
        self.participants.remove(&id);
    }

    /// Broadcast a message to every member except the sender
    ///
    /// The message is queued, then the queue is drained FIFO; each member
    /// other than `sender` receives its own copy. Sequential delivers are
    /// therefore fanned out in invocation order.
    pub fn deliver(&mut self, sender: SessionId, message: Message) {
        self.pending.push_back(message);
        while let Some(current) = self.pending.pop_front() {
            for (id, participant) in &self.participants {
                if *id != sender {
                    participant.write(current.clone());
                }
            }
        }
    }

    /// Whether the given session is currently a member
    pub fn contains(&self, id: SessionId) -> bool {
        self.participants.contains_key(&id)
    }

    /// Number of current members
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True when the room has no members
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
