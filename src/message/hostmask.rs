//! `nick!user@host` source parsing.

use std::fmt;

/// The `nick!user@host` form of a message source.
///
/// Server sources have no `!` or `@` and come out as a bare nickname, which
/// simply never matches a tracked user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hostmask {
    /// Nickname (or server name).
    pub nickname: String,
    /// Username (ident), if present.
    pub username: Option<String>,
    /// Hostname, if present.
    pub hostname: Option<String>,
}

impl Hostmask {
    /// Parse a source string leniently.
    ///
    /// Splits at the first `@` for the hostname, then at the first `!` for
    /// the username. Empty components are treated as absent.
    pub fn parse(s: &str) -> Self {
        let (userhost, hostname) = match s.split_once('@') {
            Some((uh, host)) => (uh, Some(host)),
            None => (s, None),
        };
        let (nickname, username) = match userhost.split_once('!') {
            Some((nick, user)) => (nick, Some(user)),
            None => (userhost, None),
        };

        Hostmask {
            nickname: nickname.to_owned(),
            username: username.filter(|u| !u.is_empty()).map(str::to_owned),
            hostname: hostname.filter(|h| !h.is_empty()).map(str::to_owned),
        }
    }
}

impl fmt::Display for Hostmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nickname)?;
        if let Some(user) = &self.username {
            write!(f, "!{}", user)?;
        }
        if let Some(host) = &self.hostname {
            write!(f, "@{}", host)?;
        }
        Ok(())
    }
}
