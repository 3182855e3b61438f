//! Error types for the chat relay
//!
//! Defines framing errors (recoverable, message-level) and connection
//! errors (terminal for a session). Uses thiserror for ergonomic error
//! definitions.

use thiserror::Error;

use crate::message::MAX_BODY_BYTES;

/// Frame header validation errors
///
/// A framing error only ever costs the offending message: the write path
/// drops the message with a diagnostic and keeps the session alive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Header bytes are not ASCII decimal text
    #[error("malformed length header: {0:?}")]
    Malformed(String),

    /// Header parsed, but the declared length is outside `0..=512`
    #[error("declared body length {0} is outside 0..={MAX_BODY_BYTES}")]
    LengthOutOfRange(i64),
}

/// Connection-level errors
///
/// Terminal for the affected connection handler; the process and the
/// remaining sessions are unaffected.
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO error on the transport (fatal for the session)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame header failed validation
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// The relay actor's command channel is closed (server shut down)
    #[error("server command channel closed")]
    ChannelSend,
}
