//! Message framing codec
//!
//! One frame on the wire is `[4-byte ASCII decimal header][body bytes]`:
//! the header carries the body length as right-justified decimal text and
//! the body is at most [`MAX_BODY_BYTES`] raw bytes.
//!
//! Only the server-to-client direction is header-framed. Client-to-server
//! traffic is newline-delimited free text; the relay re-encodes each line
//! with a header before fanning it out.

use crate::error::FramingError;

/// Maximum number of body bytes in a single frame
pub const MAX_BODY_BYTES: usize = 512;

/// Length of the frame header in bytes
pub const HEADER_LEN: usize = 4;

/// Parse a frame header: 4 bytes of decimal text, space- or zero-padded.
///
/// Returns the declared body length, or a [`FramingError`] when the bytes
/// are not decimal text or the value falls outside `0..=512`.
pub fn decode_header(raw: &[u8]) -> Result<usize, FramingError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| FramingError::Malformed(String::from_utf8_lossy(raw).into_owned()))?;
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| FramingError::Malformed(text.to_string()))?;
    if value < 0 || value > MAX_BODY_BYTES as i64 {
        return Err(FramingError::LengthOutOfRange(value));
    }
    Ok(value as usize)
}

/// One logical chat payload, stored as contiguous frame bytes
///
/// `body_len` is only trustworthy after the header has been validated:
/// [`Message::new`] validates by construction, and the write path calls
/// [`Message::decode_header`] again before any bytes reach the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Header followed by body, `HEADER_LEN + body_len` bytes
    data: Vec<u8>,
    /// Validated body length in `0..=MAX_BODY_BYTES`
    body_len: usize,
}

impl Message {
    /// Build a frame from received text
    ///
    /// A body longer than [`MAX_BODY_BYTES`] is silently truncated to the
    /// limit; truncation is documented lossy behavior, not an error.
    pub fn new(body: &[u8]) -> Self {
        let body_len = body.len().min(MAX_BODY_BYTES);
        let mut data = Vec::with_capacity(HEADER_LEN + body_len);
        data.extend_from_slice(format!("{:>width$}", body_len, width = HEADER_LEN).as_bytes());
        data.extend_from_slice(&body[..body_len]);
        Self { data, body_len }
    }

    /// Re-validate this frame's own header
    ///
    /// On success `body_len` is set from the header; on failure it is
    /// reset to 0 and the message must be discarded, not forwarded.
    pub fn decode_header(&mut self) -> Result<usize, FramingError> {
        match decode_header(&self.data[..HEADER_LEN]) {
            Ok(len) => {
                self.body_len = len;
                Ok(len)
            }
            Err(e) => {
                self.body_len = 0;
                Err(e)
            }
        }
    }

    /// Body bytes, without the header
    pub fn body(&self) -> &[u8] {
        &self.data[HEADER_LEN..HEADER_LEN + self.body_len]
    }

    /// The full frame: header and body, exactly `HEADER_LEN + body_len` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..HEADER_LEN + self.body_len]
    }

    /// Validated body length
    pub fn body_len(&self) -> usize {
        self.body_len
    }
}
