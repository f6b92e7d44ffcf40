//! ISUPPORT (RPL_ISUPPORT / 005) negotiation.
//!
//! The server describes its limits and extensions as a sequence of `KEY` or
//! `KEY=VALUE` tokens, possibly spread over several 005 lines. [`ISupport`]
//! starts out with RFC 1459 defaults and each recognized token overwrites
//! its field as it arrives.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/isupport.html>

mod parser;
mod tokens;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::casemap::Casemapping;

pub use parser::{IsupportEntry, response_tokens, unescape_value};
pub use tokens::{ChanModes, Limit, ModeClass, PrefixTable};

/// Server capability configuration negotiated through ISUPPORT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ISupport {
    /// Every token seen, recognized or not, by key.
    pub raw: HashMap<String, Option<String>>,

    /// `NETWORK` name.
    pub network: Option<String>,
    /// `CHANMODES` classification.
    pub chanmodes: ChanModes,
    /// `PREFIX` status modes and their symbols.
    pub prefix: PrefixTable,

    /// `MODES`: mode changes allowed per command.
    pub modes: Limit,
    /// `CASEMAPPING`.
    pub casemapping: Casemapping,
    /// `CHANTYPES`: characters that begin a channel name.
    pub chantypes: Vec<char>,
    /// `STATUSMSG`: prefixes that scope a message to channel statuses.
    pub statusmsg: Vec<char>,

    /// `CALLERID` user mode letter.
    pub callerid: Option<char>,
    /// `EXCEPTS` ban-exception list mode letter.
    pub excepts: Option<char>,
    /// `INVEX` invite-exception list mode letter.
    pub invex: Option<char>,

    /// `MONITOR` list size.
    pub monitor: Option<Limit>,
    /// `WATCH` list size.
    pub watch: Option<Limit>,
    /// `WHOX` support.
    pub whox: bool,
    /// `NICKLEN`.
    pub nicklen: u32,
}

impl Default for ISupport {
    fn default() -> Self {
        ISupport {
            raw: HashMap::new(),
            network: None,
            chanmodes: ChanModes::default(),
            prefix: PrefixTable::default(),
            modes: Limit::Max(3),
            casemapping: Casemapping::Rfc1459,
            chantypes: vec!['#'],
            statusmsg: Vec::new(),
            callerid: None,
            excepts: None,
            invex: None,
            monitor: None,
            watch: None,
            whox: false,
            // RFC 1459
            nicklen: 9,
        }
    }
}

impl ISupport {
    /// Create a configuration with RFC 1459 defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply tokens strictly left to right.
    pub fn apply_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) {
        for token in tokens {
            self.apply_entry(IsupportEntry::parse(token.as_ref()));
        }
    }

    fn apply_entry(&mut self, entry: IsupportEntry) {
        let IsupportEntry { key, value } = entry;
        let v = value.as_deref();

        match key.as_str() {
            "NETWORK" => self.network = value.clone(),
            "CHANMODES" => self.chanmodes = ChanModes::parse(v.unwrap_or_default()),
            "PREFIX" => match PrefixTable::parse(v.unwrap_or_default()) {
                Some(prefix) => self.prefix = prefix,
                None => debug!(value = ?v, "ignoring malformed PREFIX"),
            },
            "STATUSMSG" => self.statusmsg = v.unwrap_or_default().chars().collect(),
            "MODES" => {
                if let Some(limit) = Limit::parse(v) {
                    self.modes = limit;
                }
            }
            "MONITOR" => {
                if let Some(limit) = Limit::parse(v) {
                    self.monitor = Some(limit);
                }
            }
            "WATCH" => {
                if let Some(limit) = Limit::parse(v) {
                    self.watch = Some(limit);
                }
            }
            "CASEMAPPING" => match v.map(str::parse::<Casemapping>) {
                Some(Ok(mapping)) => {
                    if mapping != self.casemapping {
                        debug!(from = %self.casemapping, to = %mapping, "casemapping changed");
                    }
                    self.casemapping = mapping;
                }
                _ => warn!(value = ?v, "ignoring unsupported CASEMAPPING"),
            },
            "CHANTYPES" => self.chantypes = v.unwrap_or_default().chars().collect(),
            "CALLERID" => self.callerid = Some(first_char_or(v, 'g')),
            "EXCEPTS" => self.excepts = Some(first_char_or(v, 'e')),
            "INVEX" => self.invex = Some(first_char_or(v, 'I')),
            "WHOX" => self.whox = true,
            "NICKLEN" => {
                if let Some(n) = v.and_then(|s| s.parse().ok()) {
                    self.nicklen = n;
                }
            }
            _ => {}
        }

        self.raw.insert(key, value);
    }

    /// Ban-exception list letter, `e` unless the server names another.
    pub fn excepts_mode(&self) -> char {
        self.excepts.unwrap_or('e')
    }

    /// Invite-exception list letter, `I` unless the server names another.
    pub fn invex_mode(&self) -> char {
        self.invex.unwrap_or('I')
    }
}

fn first_char_or(value: Option<&str>, default: char) -> char {
    value.and_then(|s| s.chars().next()).unwrap_or(default)
}
