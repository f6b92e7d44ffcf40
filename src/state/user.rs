//! User-related types and state.

use std::collections::HashSet;

use crate::identity::Identity;

/// A user we share visibility with.
///
/// Created when a message first names the user and dropped once we no
/// longer share any channel with them.
#[derive(Debug)]
pub struct User {
    pub(crate) identity: Identity,
    /// Username (ident).
    pub username: Option<String>,
    /// Hostname as visible to us.
    pub hostname: Option<String>,
    /// Real name / GECOS.
    pub realname: Option<String>,
    /// Account name if logged in.
    pub account: Option<String>,
    /// Server the user is connected to.
    pub server: Option<String>,
    /// Away message if user is marked away; empty when the reason is unknown.
    pub away: Option<String>,
    /// IP address, when the server disclosed one.
    pub ip: Option<String>,
    /// Channels we share with this user (casefolded names).
    pub channels: HashSet<String>,
}

impl User {
    pub(crate) fn new(identity: Identity) -> Self {
        Self {
            identity,
            username: None,
            hostname: None,
            realname: None,
            account: None,
            server: None,
            away: None,
            ip: None,
            channels: HashSet::new(),
        }
    }

    /// The shared nickname record.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current nickname.
    pub fn nickname(&self) -> String {
        self.identity.display()
    }

    /// Current nickname, casefolded.
    pub fn nickname_folded(&self) -> String {
        self.identity.folded()
    }

    /// `nick[!user][@host]` from whatever parts are known.
    pub fn hostmask(&self) -> String {
        let mut hostmask = self.nickname();
        if let Some(user) = &self.username {
            hostmask.push('!');
            hostmask.push_str(user);
        }
        if let Some(host) = &self.hostname {
            hostmask.push('@');
            hostmask.push_str(host);
        }
        hostmask
    }

    /// `user@host`, when both parts are known.
    pub fn userhost(&self) -> Option<String> {
        match (&self.username, &self.hostname) {
            (Some(user), Some(host)) => Some(format!("{}@{}", user, host)),
            _ => None,
        }
    }

    /// Fill in whichever hostmask parts are present.
    pub(crate) fn apply_hostmask(&mut self, username: Option<&str>, hostname: Option<&str>) {
        if let Some(user) = username {
            self.username = Some(user.to_owned());
        }
        if let Some(host) = hostname {
            self.hostname = Some(host.to_owned());
        }
    }
}

/// What we know about ourselves.
///
/// Mirrors the metadata kept on [`User`], but lives outside the user table so
/// it survives leaving every channel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    /// Our nickname as the server last confirmed it.
    pub nickname: String,
    /// Casefolded nickname.
    pub nickname_folded: String,
    /// Username (ident).
    pub username: Option<String>,
    /// Hostname as others see it.
    pub hostname: Option<String>,
    /// Real name / GECOS.
    pub realname: Option<String>,
    /// Account we are logged in to.
    pub account: Option<String>,
    /// Server we are connected to.
    pub server: Option<String>,
    /// Away message, if marked away.
    pub away: Option<String>,
    /// Our address, when the server disclosed one.
    pub ip: Option<String>,
}

impl LocalIdentity {
    /// Fill in whichever hostmask parts are present.
    pub(crate) fn apply_hostmask(&mut self, username: Option<&str>, hostname: Option<&str>) {
        if let Some(user) = username {
            self.username = Some(user.to_owned());
        }
        if let Some(host) = hostname {
            self.hostname = Some(host.to_owned());
        }
    }
}
