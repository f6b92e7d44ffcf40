//! Byte-stream framing for the push interface.
//!
//! [`LineCodec`] is a `tokio_util` decoder that turns newline-terminated
//! bytes into [`Message`]s. [`StreamDecoder`] wraps it behind the push
//! interface the tracker consumes: hand it whatever bytes arrived and get
//! back every message completed by them.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::error::{DisconnectReason, StateError};
use crate::message::Message;

/// Maximum tag section length allowed by IRCv3 message-tags.
pub const MAX_TAGS_LEN: usize = 8191;

/// Maximum line length excluding tags, per RFC 1459.
pub const MAX_LINE_LEN: usize = 512;

/// Line-based decoder producing tokenized messages.
///
/// Lines are decoded as UTF-8; malformed byte sequences become U+FFFD and
/// the rest of the line is kept. Blank and unparseable lines are skipped.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the IRCv3 line ceiling.
    pub fn new() -> Self {
        Self::with_max_len(MAX_TAGS_LEN + MAX_LINE_LEN)
    }

    /// Create a codec with a custom line ceiling.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    fn decode_text(line: &[u8]) -> String {
        let (text, _encoding, had_errors) = encoding_rs::UTF_8.decode(line);
        if had_errors {
            trace!("replaced malformed UTF-8 in line");
        }
        text.into_owned()
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Message;
    type Error = DisconnectReason;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, DisconnectReason> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                // No complete line yet - remember where we stopped
                self.next_index = src.len();

                if src.len() > self.max_len {
                    return Err(DisconnectReason::LineTooLong {
                        actual: src.len(),
                        limit: self.max_len,
                    });
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(DisconnectReason::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let text = Self::decode_text(&line);
            match Message::parse(&text) {
                Some(msg) => return Ok(Some(msg)),
                None => {
                    let trimmed = text.trim_end();
                    if !trimmed.is_empty() {
                        debug!(line = %trimmed, "skipping unparseable line");
                    }
                }
            }
        }
    }
}

/// Push-style decoder over a growing byte buffer.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    codec: LineCodec,
    buffer: BytesMut,
}

impl StreamDecoder {
    /// Create a decoder with the default line ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder around a configured codec.
    pub fn with_codec(codec: LineCodec) -> Self {
        Self {
            codec,
            buffer: BytesMut::new(),
        }
    }

    /// Push received bytes, returning every message they complete.
    ///
    /// An empty push means the peer closed the stream and fails with
    /// [`StateError::Disconnected`], as does a line past the ceiling.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Message>, StateError> {
        if data.is_empty() {
            return Err(DisconnectReason::Eof.into());
        }

        self.buffer.extend_from_slice(data);

        let mut messages = Vec::new();
        while let Some(msg) = self.codec.decode(&mut self.buffer)? {
            messages.push(msg);
        }
        Ok(messages)
    }

    /// Bytes buffered without a line terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
