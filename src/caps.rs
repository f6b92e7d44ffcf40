//! IRCv3 capability negotiation state.
//!
//! Tracks what the server advertises (`CAP LS` / `CAP NEW` / `CAP DEL`) and
//! what has been agreed (`CAP ACK`). A multiline `CAP LS` reply is buffered
//! until its final page arrives and then published in one step.
//!
//! # Reference
//! - IRCv3 Capability Negotiation: <https://ircv3.net/specs/extensions/capability-negotiation>

use std::collections::{HashMap, HashSet};

use tracing::debug;

/// A `CAP` subcommand the tracker reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapSubCommand {
    /// Capability listing, possibly multiline.
    Ls,
    /// Newly available capabilities (cap-notify).
    New,
    /// Capabilities no longer available (cap-notify).
    Del,
    /// Capabilities enabled or disabled by a request.
    Ack,
}

impl CapSubCommand {
    /// Parse a subcommand name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LS" => Some(CapSubCommand::Ls),
            "NEW" => Some(CapSubCommand::New),
            "DEL" => Some(CapSubCommand::Del),
            "ACK" => Some(CapSubCommand::Ack),
            _ => None,
        }
    }
}

/// Parse a space-separated capability list into name/value pairs.
///
/// `sasl=PLAIN,EXTERNAL` yields `("sasl", Some("PLAIN,EXTERNAL"))`; a
/// capability without `=` has no value.
pub fn parse_cap_list(list: &str) -> Vec<(String, Option<String>)> {
    list.split(' ')
        .filter(|cap| !cap.is_empty())
        .map(|cap| match cap.split_once('=') {
            Some((name, value)) => (name.to_owned(), Some(value.to_owned())),
            None => (cap.to_owned(), None),
        })
        .collect()
}

/// Capability negotiation state for one connection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapState {
    /// Whether any `CAP` message has been seen.
    pub has_cap: bool,
    /// Capabilities the server advertises, with their values.
    pub available: HashMap<String, Option<String>>,
    /// Capabilities that are enabled.
    pub agreed: HashSet<String>,
    /// `CAP LS` pages received so far. `None` when no listing is in progress.
    pending_ls: Option<HashMap<String, Option<String>>>,
}

impl CapState {
    /// Create an empty negotiation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a multiline `CAP LS` is being accumulated.
    pub fn ls_in_progress(&self) -> bool {
        self.pending_ls.is_some()
    }

    /// Whether a capability has been agreed.
    pub fn is_agreed(&self, cap: &str) -> bool {
        self.agreed.contains(cap)
    }

    /// Apply one `CAP` message's worth of changes.
    ///
    /// `more` is true when the message carried the `*` continuation marker.
    pub fn apply(&mut self, sub: CapSubCommand, more: bool, list: &str) {
        self.has_cap = true;
        let caps = parse_cap_list(list);

        match sub {
            CapSubCommand::Ls => self.apply_ls(caps, more),
            CapSubCommand::New => self.available.extend(caps),
            CapSubCommand::Del => {
                for (name, _) in caps {
                    self.available.remove(&name);
                    self.agreed.remove(&name);
                }
            }
            CapSubCommand::Ack => self.apply_ack(caps),
        }
    }

    fn apply_ls(&mut self, caps: Vec<(String, Option<String>)>, more: bool) {
        let pending = self.pending_ls.get_or_insert_with(HashMap::new);
        pending.extend(caps);

        if !more {
            if let Some(listing) = self.pending_ls.take() {
                debug!(count = listing.len(), "capability listing complete");
                self.available = listing;
            }
        }
    }

    fn apply_ack(&mut self, caps: Vec<(String, Option<String>)>) {
        for (name, _) in caps {
            if let Some(disabled) = name.strip_prefix('-') {
                self.agreed.remove(disabled);
            } else if self.available.contains_key(&name) {
                self.agreed.insert(name);
            } else {
                debug!(cap = %name, "ignoring ACK for unadvertised capability");
            }
        }
    }
}
