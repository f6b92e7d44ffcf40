//! Inbound IRC messages.
//!
//! [`Message`] is the shape the tracker consumes: a command (named or
//! numeric), its parameters, and the optional source with its parsed
//! `nick!user@host` form. Tags are carried along but the tracker does not
//! interpret them.

mod hostmask;
mod parse;

use std::collections::HashMap;

pub use hostmask::Hostmask;

use parse::{RawLine, split_tags};

/// An owned, tokenized IRC message.
///
/// # Example
///
/// ```
/// use slirc_state::Message;
///
/// let msg = Message::parse(":nick!user@host JOIN #channel").unwrap();
/// assert_eq!(msg.command, "JOIN");
/// assert_eq!(msg.source_nickname(), Some("nick"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// IRCv3 message tags, values unescaped.
    pub tags: HashMap<String, String>,
    /// The raw source, if any.
    pub source: Option<String>,
    /// The parsed source.
    pub hostmask: Option<Hostmask>,
    /// Upper-cased command name or three-digit numeric.
    pub command: String,
    /// Parameters, trailing included.
    pub params: Vec<String>,
}

impl Message {
    /// Create a source-less message.
    pub fn new<C, I, P>(command: C, params: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Message {
            tags: HashMap::new(),
            source: None,
            hostmask: None,
            command: command.into().to_ascii_uppercase(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a source, parsing its hostmask form.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.hostmask = Some(Hostmask::parse(&source));
        self.source = Some(source);
        self
    }

    /// Attach a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Tokenize a single line. Trailing `\r\n` is ignored.
    ///
    /// Returns `None` for blank or unparseable lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let raw = RawLine::parse(line)?;

        let mut msg = Message::new(raw.command, raw.params.iter().copied());
        if let Some(tags) = raw.tags {
            msg.tags = split_tags(tags).collect();
        }
        if let Some(source) = raw.source {
            msg = msg.with_source(source);
        }
        Some(msg)
    }

    /// Get a parameter by index.
    #[inline]
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// Get the nickname part of the source, if any.
    pub fn source_nickname(&self) -> Option<&str> {
        self.hostmask.as_ref().map(|hm| hm.nickname.as_str())
    }

    /// Get the value of a tag by key.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
