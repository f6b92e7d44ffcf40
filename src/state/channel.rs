//! Channel-related types and state.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::identity::Identity;

/// One user's presence in one channel.
///
/// Holds the same [`Identity`] records as the owning `Channel` and `User`,
/// so renames are visible here without re-insertion.
#[derive(Debug)]
pub struct Membership {
    channel: Identity,
    user: Identity,
    /// Status modes held in the channel (e.g., `o`, `v`).
    pub modes: BTreeSet<char>,
}

impl Membership {
    pub(crate) fn new(user: Identity, channel: Identity) -> Self {
        Self {
            channel,
            user,
            modes: BTreeSet::new(),
        }
    }

    /// Member's current nickname.
    pub fn nickname(&self) -> String {
        self.user.display()
    }

    /// Member's current nickname, casefolded.
    pub fn nickname_folded(&self) -> String {
        self.user.folded()
    }

    /// Channel's current name.
    pub fn channel(&self) -> String {
        self.channel.display()
    }

    /// The shared nickname record.
    pub fn user_identity(&self) -> &Identity {
        &self.user
    }

    /// The shared channel name record.
    pub fn channel_identity(&self) -> &Identity {
        &self.channel
    }
}

/// A channel we are in.
#[derive(Debug)]
pub struct Channel {
    pub(crate) identity: Identity,
    /// Members, keyed by casefolded nickname.
    pub(crate) members: HashMap<String, Membership>,

    /// Creation time (`RPL_CREATIONTIME`).
    pub created: Option<DateTime<Utc>>,
    /// Topic text.
    pub topic: Option<String>,
    /// Who set the topic, as a nickname or full source.
    pub topic_setter: Option<String>,
    /// When the topic was set.
    pub topic_time: Option<DateTime<Utc>>,

    /// Non-list modes, with their parameter if any.
    pub modes: HashMap<char, Option<String>>,
    /// List modes (bans, quiets, ...), by mode letter.
    pub list_modes: HashMap<char, HashSet<String>>,
    /// List replies still being received. A key is present only while its
    /// list is in flight.
    pub(crate) pending_lists: HashMap<char, HashSet<String>>,
}

impl Channel {
    pub(crate) fn new(identity: Identity) -> Self {
        Self {
            identity,
            members: HashMap::new(),
            created: None,
            topic: None,
            topic_setter: None,
            topic_time: None,
            modes: HashMap::new(),
            list_modes: HashMap::new(),
            pending_lists: HashMap::new(),
        }
    }

    /// The shared channel name record.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current channel name.
    pub fn name(&self) -> String {
        self.identity.display()
    }

    /// Current channel name, casefolded.
    pub fn name_folded(&self) -> String {
        self.identity.folded()
    }

    /// Members keyed by casefolded nickname.
    pub fn members(&self) -> &HashMap<String, Membership> {
        &self.members
    }

    /// Look up a member by casefolded nickname.
    ///
    /// The key must already be folded; [`StateTracker::get_member`] folds
    /// for you.
    ///
    /// [`StateTracker::get_member`]: crate::StateTracker::get_member
    pub fn member(&self, nickname_folded: &str) -> Option<&Membership> {
        self.members.get(nickname_folded)
    }

    /// Masks on a list mode, if that list is known.
    pub fn list(&self, mode: char) -> Option<&HashSet<String>> {
        self.list_modes.get(&mode)
    }

    /// Whether a list reply for `mode` is being accumulated.
    pub fn list_in_progress(&self, mode: char) -> bool {
        self.pending_lists.contains_key(&mode)
    }

    /// Set a mode. List modes gain a mask; other modes store their parameter.
    pub(crate) fn add_mode(&mut self, mode: char, is_list: bool, param: Option<String>) {
        if is_list {
            if let Some(mask) = param {
                self.list_modes.entry(mode).or_default().insert(mask);
            }
        } else {
            self.modes.insert(mode, param);
        }
    }

    /// Unset a mode. A known list mode with a mask loses that mask.
    pub(crate) fn remove_mode(&mut self, mode: char, param: Option<&str>) {
        match (self.list_modes.get_mut(&mode), param) {
            (Some(list), Some(mask)) => {
                list.remove(mask);
            }
            _ => {
                self.modes.remove(&mode);
            }
        }
    }

    /// Buffer one list reply entry.
    pub(crate) fn push_list_entry(&mut self, mode: char, mask: &str) {
        self.pending_lists
            .entry(mode)
            .or_default()
            .insert(mask.to_owned());
    }

    /// Publish the buffered list for `mode`, replacing the previous one.
    ///
    /// An end-of-list with nothing buffered publishes an empty list.
    pub(crate) fn finish_list(&mut self, mode: char) {
        let list = self.pending_lists.remove(&mode).unwrap_or_default();
        self.list_modes.insert(mode, list);
    }
}
