//! Message handlers.
//!
//! Each inbound command or numeric maps to exactly one handler in the
//! [`Registry`]. Handlers mutate the [`StateTracker`] directly and tolerate
//! anything malformed by returning without changes.

mod cap;
mod channel;
mod connection;
mod messaging;
mod mode;
mod user_query;
mod user_status;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::message::Message;
use crate::numeric::*;
use crate::state::StateTracker;

/// A handler entry point.
pub(crate) type HandlerFn = fn(&mut StateTracker, &Message);

/// Command-to-handler table, built once per tracker.
pub(crate) struct Registry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl Registry {
    /// Create a registry with all handlers registered.
    pub(crate) fn new() -> Self {
        let mut handlers: HashMap<&'static str, HandlerFn> = HashMap::new();

        // Connection lifecycle
        handlers.insert(RPL_WELCOME, connection::welcome);
        handlers.insert(RPL_ISUPPORT, connection::isupport);
        handlers.insert(RPL_MOTDSTART, connection::motd_start);
        handlers.insert(RPL_MOTD, connection::motd);
        handlers.insert("NICK", connection::nick);
        handlers.insert("QUIT", connection::quit);
        handlers.insert("ERROR", connection::error);
        handlers.insert("CAP", cap::cap);

        // Channel membership and metadata
        handlers.insert("JOIN", channel::join);
        handlers.insert("PART", channel::part);
        handlers.insert("KICK", channel::kick);
        handlers.insert("RENAME", channel::rename);
        handlers.insert(RPL_NAMREPLY, channel::names);
        handlers.insert(RPL_CREATIONTIME, channel::creation_time);
        handlers.insert("TOPIC", channel::topic);
        handlers.insert(RPL_TOPIC, channel::topic_num);
        handlers.insert(RPL_TOPICWHOTIME, channel::topic_who_time);

        // Modes and mode lists
        handlers.insert("MODE", mode::mode);
        handlers.insert(RPL_CHANNELMODEIS, mode::channel_mode_is);
        handlers.insert(RPL_UMODEIS, mode::umode_is);
        handlers.insert(RPL_BANLIST, mode::ban_list);
        handlers.insert(RPL_ENDOFBANLIST, mode::ban_list_end);
        handlers.insert(RPL_QUIETLIST, mode::quiet_list);
        handlers.insert(RPL_ENDOFQUIETLIST, mode::quiet_list_end);
        handlers.insert(RPL_EXCEPTLIST, mode::except_list);
        handlers.insert(RPL_ENDOFEXCEPTLIST, mode::except_list_end);
        handlers.insert(RPL_INVITELIST, mode::invite_list);
        handlers.insert(RPL_ENDOFINVITELIST, mode::invite_list_end);

        // Messaging
        handlers.insert("PRIVMSG", messaging::message);
        handlers.insert("NOTICE", messaging::message);
        handlers.insert("TAGMSG", messaging::message);

        // User queries
        handlers.insert(RPL_WHOREPLY, user_query::who);
        handlers.insert(RPL_WHOSPCRPL, user_query::whox);
        handlers.insert(RPL_WHOISUSER, user_query::whois_user);

        // User status
        handlers.insert(RPL_VISIBLEHOST, user_status::visible_host);
        handlers.insert("CHGHOST", user_status::chghost);
        handlers.insert("SETNAME", user_status::setname);
        handlers.insert(RPL_AWAY, user_status::away_num);
        handlers.insert("AWAY", user_status::away);
        handlers.insert("ACCOUNT", user_status::account);
        handlers.insert(RPL_LOGGEDIN, user_status::logged_in);
        handlers.insert(RPL_LOGGEDOUT, user_status::logged_out);

        Self { handlers }
    }

    /// Look up the handler for a command.
    #[inline]
    pub(crate) fn get(&self, command: &str) -> Option<HandlerFn> {
        self.handlers.get(command).copied()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Normalize an account field: `*` (or an empty value) means not logged in.
fn account_name(raw: &str) -> Option<String> {
    let account = raw.trim_matches('*');
    (!account.is_empty()).then(|| account.to_owned())
}

/// Parse a unix timestamp parameter.
fn unix_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(raw.parse().ok()?, 0)
}
