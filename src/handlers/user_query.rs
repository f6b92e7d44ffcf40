//! WHO, WHOX and WHOIS reply handlers.

use tracing::debug;

use crate::message::Message;
use crate::state::StateTracker;

/// Fields common to WHO and WHOX replies.
struct WhoReply<'a> {
    nickname: &'a str,
    username: &'a str,
    hostname: &'a str,
    realname: Option<&'a str>,
    server: Option<&'a str>,
    away: bool,
    /// WHOX only: `None` leaves the stored account untouched.
    account: Option<Option<&'a str>>,
    /// WHOX only: `None` leaves the stored address untouched.
    ip: Option<Option<&'a str>>,
}

/// Copy a reply onto a `User` or our `LocalIdentity`; both carry the same
/// metadata fields.
macro_rules! apply_who_reply {
    ($target:expr, $reply:expr) => {{
        let target = $target;
        let reply = $reply;
        target.username = Some(reply.username.to_owned());
        target.hostname = Some(reply.hostname.to_owned());
        target.realname = reply.realname.map(str::to_owned);
        target.server = reply.server.map(str::to_owned);
        // G(one) with no known reason becomes an empty reason
        target.away = if reply.away {
            Some(target.away.take().unwrap_or_default())
        } else {
            None
        };
        if let Some(account) = reply.account {
            target.account = account.map(str::to_owned);
        }
        if let Some(ip) = reply.ip {
            target.ip = ip.map(str::to_owned);
        }
    }};
}

fn apply(state: &mut StateTracker, reply: &WhoReply<'_>) {
    let folded = state.casefold(reply.nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        apply_who_reply!(user, reply);
    }
    if state.is_me(reply.nickname) {
        apply_who_reply!(&mut state.me, reply);
    }
}

/// `352 <target> <channel> <user> <host> <server> <nick> <flags> :<hops> <realname>`
pub(super) fn who(state: &mut StateTracker, msg: &Message) {
    let [_, _, username, hostname, server, nickname, flags, last, ..] = msg.params.as_slice()
    else {
        return;
    };
    let reply = WhoReply {
        nickname,
        username,
        hostname,
        realname: last.split_once(' ').map(|(_, realname)| realname),
        server: (server != "*").then_some(server.as_str()),
        away: flags.contains('G'),
        account: None,
        ip: None,
    };
    apply(state, &reply);
}

/// `354 <target> <type> <user> <ip> <host> <server> <nick> <flags> <account> :<realname>`
///
/// Only replies carrying our query type and the full field set are used.
pub(super) fn whox(state: &mut StateTracker, msg: &Message) {
    let [_, query_type, username, ip, hostname, server, nickname, flags, account, realname] =
        msg.params.as_slice()
    else {
        debug!(params = msg.params.len(), "ignoring WHOX reply with unexpected fields");
        return;
    };
    if *query_type != state.config.whox_query_type {
        debug!(%query_type, "ignoring WHOX reply for foreign query");
        return;
    }

    let reply = WhoReply {
        nickname,
        username,
        hostname,
        realname: Some(realname.as_str()),
        server: (server != "*").then_some(server.as_str()),
        away: flags.contains('G'),
        account: Some((account != "0").then_some(account.as_str())),
        ip: Some((ip != "255.255.255.255").then_some(ip.as_str())),
    };
    apply(state, &reply);
}

/// `311 <target> <nick> <user> <host> * :<realname>`
pub(super) fn whois_user(state: &mut StateTracker, msg: &Message) {
    let [_, nickname, username, hostname, _, realname, ..] = msg.params.as_slice() else {
        return;
    };

    let folded = state.casefold(nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.username = Some(username.clone());
        user.hostname = Some(hostname.clone());
        user.realname = Some(realname.clone());
    }
    if state.is_me(nickname) {
        state.me.username = Some(username.clone());
        state.me.hostname = Some(hostname.clone());
        state.me.realname = Some(realname.clone());
    }
}
