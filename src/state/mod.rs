//! State management module.
//!
//! [`StateTracker`] owns everything learned from one server connection: the
//! negotiated ISUPPORT and capabilities, our own identity, and the user and
//! channel tables. It is mutated only by feeding it messages in the order
//! they arrived.

mod channel;
mod shared;
mod user;

pub use channel::{Channel, Membership};
pub use shared::SharedTracker;
pub use user::{LocalIdentity, User};

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::caps::CapState;
use crate::codec::StreamDecoder;
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::handlers::Registry;
use crate::identity::Identity;
use crate::isupport::ISupport;
use crate::message::{Hostmask, Message};

/// Client-side model of one IRC connection.
///
/// # Example
///
/// ```
/// use slirc_state::{Message, StateTracker};
///
/// let mut state = StateTracker::default();
/// state.feed(&Message::new("001", ["Nick", "Welcome"]));
/// state.feed(&Message::new("JOIN", ["#test"]).with_source("Nick!u@h"));
///
/// assert!(state.is_registered());
/// assert!(state.get_channel("#TEST").is_some());
/// ```
#[derive(Debug)]
pub struct StateTracker {
    pub(crate) config: TrackerConfig,
    pub(crate) me: LocalIdentity,
    pub(crate) registered: bool,
    pub(crate) modes: HashSet<char>,
    pub(crate) motd: Vec<String>,

    /// Users keyed by casefolded nickname.
    pub(crate) users: HashMap<String, User>,
    /// Channels keyed by casefolded name.
    pub(crate) channels: HashMap<String, Channel>,

    pub(crate) isupport: ISupport,
    pub(crate) caps: CapState,

    decoder: StreamDecoder,
    registry: Registry,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl StateTracker {
    /// Create an empty tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            me: LocalIdentity::default(),
            registered: false,
            modes: HashSet::new(),
            motd: Vec::new(),
            users: HashMap::new(),
            channels: HashMap::new(),
            isupport: ISupport::new(),
            caps: CapState::new(),
            decoder: StreamDecoder::new(),
            registry: Registry::new(),
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Push received bytes, returning the messages they complete.
    ///
    /// The messages are not applied; pass each to [`feed`](Self::feed).
    pub fn recv(&mut self, data: &[u8]) -> Result<Vec<Message>> {
        self.decoder.push(data)
    }

    /// Apply one message to the model.
    pub fn feed(&mut self, msg: &Message) {
        trace!(
            conn = %self.config.name,
            command = %msg.command,
            params = msg.params.len(),
            "dispatching"
        );
        let handler = self.registry.get(&msg.command);
        match handler {
            Some(handler) => handler(self, msg),
            None => trace!(command = %msg.command, "no handler"),
        }
    }

    /// Push received bytes and apply every message they complete.
    ///
    /// Returns the applied messages so callers can act on them.
    pub fn process(&mut self, data: &[u8]) -> Result<Vec<Message>> {
        let messages = self.recv(data)?;
        for msg in &messages {
            self.feed(msg);
        }
        Ok(messages)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Connection label from the config.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Casefold a name under the negotiated casemapping.
    pub fn casefold(&self, s: &str) -> String {
        self.isupport.casemapping.fold(s)
    }

    /// Compare two names under the negotiated casemapping.
    pub fn casefold_eq(&self, a: &str, b: &str) -> bool {
        self.isupport.casemapping.eq_folded(a, b)
    }

    /// Whether `nickname` is us.
    ///
    /// A later `CASEMAPPING` refolds our own nickname, so this keeps
    /// answering under the new mapping. The `users` and channel member
    /// tables are not rehashed: entries for us (and everyone else) stay
    /// under the mapping they were inserted with.
    pub fn is_me(&self, nickname: &str) -> bool {
        !self.me.nickname_folded.is_empty() && self.casefold(nickname) == self.me.nickname_folded
    }

    /// Whether `target` names a channel, judged by `CHANTYPES`.
    pub fn is_channel(&self, target: &str) -> bool {
        target
            .chars()
            .next()
            .is_some_and(|c| self.isupport.chantypes.contains(&c))
    }

    /// Split `STATUSMSG` prefixes off a message target.
    ///
    /// `@#chan` yields `(['@'], "#chan")`.
    pub fn split_statusmsg<'a>(&self, target: &'a str) -> (Vec<char>, &'a str) {
        let stripped = target.trim_start_matches(|c: char| self.isupport.statusmsg.contains(&c));
        let prefixes = target[..target.len() - stripped.len()].chars().collect();
        (prefixes, stripped)
    }

    /// Look up a user by nickname.
    pub fn get_user(&self, nickname: &str) -> Option<&User> {
        self.users.get(&self.casefold(nickname))
    }

    /// Whether a user is known.
    pub fn has_user(&self, nickname: &str) -> bool {
        self.users.contains_key(&self.casefold(nickname))
    }

    /// Look up a channel by name.
    pub fn get_channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&self.casefold(name))
    }

    /// Whether a channel is known.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(&self.casefold(name))
    }

    /// Look up a channel member by channel name and nickname.
    pub fn get_member(&self, channel: &str, nickname: &str) -> Option<&Membership> {
        self.get_channel(channel)?.member(&self.casefold(nickname))
    }

    /// All known users, keyed by casefolded nickname.
    pub fn users(&self) -> &HashMap<String, User> {
        &self.users
    }

    /// All known channels, keyed by casefolded name.
    pub fn channels(&self) -> &HashMap<String, Channel> {
        &self.channels
    }

    /// Our own identity.
    pub fn me(&self) -> &LocalIdentity {
        &self.me
    }

    /// Our nickname; empty before registration.
    pub fn nickname(&self) -> &str {
        &self.me.nickname
    }

    /// Whether `RPL_WELCOME` has been received.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Our user modes.
    pub fn modes(&self) -> &HashSet<char> {
        &self.modes
    }

    /// Message of the day, one entry per line.
    pub fn motd(&self) -> &[String] {
        &self.motd
    }

    /// Negotiated server features.
    pub fn isupport(&self) -> &ISupport {
        &self.isupport
    }

    /// Capability negotiation state.
    pub fn caps(&self) -> &CapState {
        &self.caps
    }

    /// Build a `WHO` request for the extended reply fields this tracker reads.
    pub fn prepare_whox(&self, target: &str) -> Message {
        Message::new(
            "WHO",
            [
                target.to_owned(),
                format!("n%afhinrstu,{}", self.config.whox_query_type),
            ],
        )
    }

    // ------------------------------------------------------------------
    // Internal helpers shared by handlers
    // ------------------------------------------------------------------

    /// Get or create the user record for `nickname`.
    pub(crate) fn ensure_user(&mut self, nickname: &str) -> &mut User {
        let folded = self.casefold(nickname);
        self.users
            .entry(folded.clone())
            .or_insert_with(|| User::new(Identity::new(nickname, folded)))
    }

    /// Link a known user and a known channel.
    ///
    /// An existing membership is kept as is, status modes included.
    pub(crate) fn user_join(
        &mut self,
        channel_folded: &str,
        nickname_folded: &str,
    ) -> Option<&mut Membership> {
        let channel = self.channels.get_mut(channel_folded)?;
        let user = self.users.get_mut(nickname_folded)?;

        user.channels.insert(channel_folded.to_owned());
        let (user_identity, channel_identity) = (user.identity.clone(), channel.identity.clone());
        Some(
            channel
                .members
                .entry(nickname_folded.to_owned())
                .or_insert_with(|| Membership::new(user_identity, channel_identity)),
        )
    }

    /// Remove `nickname` from `channel_name`.
    ///
    /// When we are the one leaving, the channel goes too, along with every
    /// user we no longer share a channel with.
    pub(crate) fn user_part(&mut self, nickname: &str, channel_name: &str) {
        let channel_folded = self.casefold(channel_name);
        let nickname_folded = self.casefold(nickname);

        let Some(channel) = self.channels.get_mut(&channel_folded) else {
            return;
        };
        channel.members.remove(&nickname_folded);
        self.forget_channel(&nickname_folded, &channel_folded);

        if self.is_me(nickname)
            && let Some(channel) = self.channels.remove(&channel_folded)
        {
            debug!(channel = %channel.name(), members = channel.members.len(), "left channel");
            for member in channel.members.keys() {
                self.forget_channel(member, &channel_folded);
            }
        }
    }

    /// Drop a channel from a user's set, and the user once the set is empty.
    fn forget_channel(&mut self, nickname_folded: &str, channel_folded: &str) {
        let Some(user) = self.users.get_mut(nickname_folded) else {
            return;
        };
        user.channels.remove(channel_folded);
        if user.channels.is_empty() {
            self.users.remove(nickname_folded);
        }
    }

    /// Remove another user from every channel and forget them.
    pub(crate) fn user_quit(&mut self, nickname: &str) {
        let folded = self.casefold(nickname);
        let Some(user) = self.users.remove(&folded) else {
            return;
        };
        for channel_folded in &user.channels {
            if let Some(channel) = self.channels.get_mut(channel_folded) {
                channel.members.remove(&folded);
            }
        }
    }

    /// Forget every user and channel.
    pub(crate) fn self_quit(&mut self) {
        debug!(
            conn = %self.config.name,
            users = self.users.len(),
            channels = self.channels.len(),
            "visibility reset"
        );
        self.users.clear();
        self.channels.clear();
    }

    /// Record our own hostmask.
    pub(crate) fn this_hostmask(&mut self, hostmask: &Hostmask) {
        self.me.nickname_folded = self.casefold(&hostmask.nickname);
        self.me.nickname = hostmask.nickname.clone();
        self.me
            .apply_hostmask(hostmask.username.as_deref(), hostmask.hostname.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casemap::Casemapping;

    fn registered() -> StateTracker {
        let mut state = StateTracker::default();
        state.feed(&Message::new("001", ["Me", "Welcome"]));
        state
    }

    #[test]
    fn test_get_member_folds_both_names() {
        let mut state = registered();
        state.feed(&Message::parse(":Me!u@h JOIN #Chan").unwrap());
        state.feed(&Message::parse(":Alice!a@h JOIN #Chan").unwrap());

        let member = state.get_member("#CHAN", "ALICE").unwrap();
        assert_eq!(member.nickname(), "Alice");
        assert!(state.get_member("#chan", "Alice").is_some());
        assert!(state.get_member("#chan", "bob").is_none());
        assert!(state.get_member("#other", "Alice").is_none());
        // the channel-level lookup takes a folded key
        assert!(state.get_channel("#chan").unwrap().member("Alice").is_none());
    }

    #[test]
    fn test_is_me_before_registration() {
        let state = StateTracker::default();
        assert!(!state.is_me(""));
        assert!(!state.is_me("anyone"));
    }

    #[test]
    fn test_casefold_follows_isupport() {
        let mut state = registered();
        assert_eq!(state.casefold("Nick[a]"), "nick{a}");
        assert!(state.casefold_eq("me", "ME"));

        state.feed(&Message::new("005", ["Me", "CASEMAPPING=ascii", "are supported"]));
        assert_eq!(state.isupport().casemapping, Casemapping::Ascii);
        assert_eq!(state.casefold("Nick[a]"), "nick[a]");
    }

    #[test]
    fn test_is_channel() {
        let mut state = registered();
        assert!(state.is_channel("#rust"));
        assert!(!state.is_channel("&local"));
        assert!(!state.is_channel(""));

        state.feed(&Message::new("005", ["Me", "CHANTYPES=#&", "are supported"]));
        assert!(state.is_channel("&local"));
    }

    #[test]
    fn test_split_statusmsg() {
        let mut state = registered();
        state.feed(&Message::new("005", ["Me", "STATUSMSG=@+", "are supported"]));

        assert_eq!(state.split_statusmsg("@+#chan"), (vec!['@', '+'], "#chan"));
        assert_eq!(state.split_statusmsg("#chan"), (vec![], "#chan"));
        assert_eq!(state.split_statusmsg("nick"), (vec![], "nick"));
    }

    #[test]
    fn test_prepare_whox() {
        let state = StateTracker::new(TrackerConfig {
            whox_query_type: "42".to_string(),
            ..TrackerConfig::default()
        });
        let who = state.prepare_whox("#chan");
        assert_eq!(who.command, "WHO");
        assert_eq!(who.params, vec!["#chan", "n%afhinrstu,42"]);
    }

    #[test]
    fn test_ensure_user_is_idempotent() {
        let mut state = registered();
        state.ensure_user("Alice").username = Some("a".to_string());
        state.ensure_user("ALICE");
        assert_eq!(state.users().len(), 1);
        assert_eq!(state.get_user("alice").unwrap().nickname(), "Alice");
        assert_eq!(
            state.get_user("alice").unwrap().username.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_user_join_requires_both_sides() {
        let mut state = registered();
        state.ensure_user("alice");
        assert!(state.user_join("#nowhere", "alice").is_none());
        assert!(state.get_user("alice").unwrap().channels.is_empty());
    }

    #[test]
    fn test_process_applies_messages() {
        let mut state = StateTracker::default();
        let msgs = state
            .process(b":srv 001 Me :Welcome\r\n:Me!u@h JOIN #a\r\n")
            .unwrap();
        assert_eq!(msgs.len(), 2);
        assert!(state.is_registered());
        assert!(state.has_channel("#A"));
    }

    #[test]
    fn test_recv_does_not_apply() {
        let mut state = StateTracker::default();
        let msgs = state.recv(b":srv 001 Me :Welcome\r\n").unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(!state.is_registered());
    }
}
