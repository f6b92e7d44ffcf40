//! User status handlers.
//!
//! Handles CHGHOST, SETNAME, AWAY, ACCOUNT and the visible-host, away and
//! SASL login numerics. Each touches only the fields it concerns.

use super::account_name;
use crate::message::{Hostmask, Message};
use crate::state::StateTracker;

/// `396 <target> <host|user@host> :is now your visible host`
pub(super) fn visible_host(state: &mut StateTracker, msg: &Message) {
    let Some(visible) = msg.param(1) else {
        return;
    };
    match visible.split_once('@') {
        Some((username, hostname)) => {
            state.me.username = Some(username.to_owned());
            state.me.hostname = Some(hostname.to_owned());
        }
        None => state.me.hostname = Some(visible.to_owned()),
    }
}

/// `:nick!old@old CHGHOST <user> <host>`
pub(super) fn chghost(state: &mut StateTracker, msg: &Message) {
    let (Some(nickname), Some(username), Some(hostname)) =
        (msg.source_nickname(), msg.param(0), msg.param(1))
    else {
        return;
    };

    let folded = state.casefold(nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.username = Some(username.to_owned());
        user.hostname = Some(hostname.to_owned());
    }
    if state.is_me(nickname) {
        state.me.username = Some(username.to_owned());
        state.me.hostname = Some(hostname.to_owned());
    }
}

/// `:nick SETNAME :<realname>`
pub(super) fn setname(state: &mut StateTracker, msg: &Message) {
    let (Some(nickname), Some(realname)) = (msg.source_nickname(), msg.param(0)) else {
        return;
    };

    let folded = state.casefold(nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.realname = Some(realname.to_owned());
    }
    if state.is_me(nickname) {
        state.me.realname = Some(realname.to_owned());
    }
}

fn set_away(state: &mut StateTracker, nickname: &str, reason: Option<&str>) {
    let folded = state.casefold(nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.away = reason.map(str::to_owned);
    }
    if state.is_me(nickname) {
        state.me.away = reason.map(str::to_owned);
    }
}

/// `301 <target> <nick> :<reason>`
pub(super) fn away_num(state: &mut StateTracker, msg: &Message) {
    if let (Some(nickname), Some(reason)) = (msg.param(1), msg.param(2)) {
        set_away(state, nickname, Some(reason));
    }
}

/// `:nick AWAY [:reason]`; no reason means back.
pub(super) fn away(state: &mut StateTracker, msg: &Message) {
    if let Some(nickname) = msg.source_nickname() {
        set_away(state, nickname, msg.param(0));
    }
}

/// `:nick ACCOUNT <account|*>`
pub(super) fn account(state: &mut StateTracker, msg: &Message) {
    let (Some(nickname), Some(account)) = (msg.source_nickname(), msg.param(0)) else {
        return;
    };
    let account = account_name(account);

    let folded = state.casefold(nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.account = account.clone();
    }
    if state.is_me(nickname) {
        state.me.account = account;
    }
}

fn login_changed(state: &mut StateTracker, hostmask: &str, account: Option<&str>) {
    let hostmask = Hostmask::parse(hostmask);
    state.me.account = account.map(str::to_owned);
    state.this_hostmask(&hostmask);

    let folded = state.me.nickname_folded.clone();
    if let Some(user) = state.users.get_mut(&folded) {
        user.account = account.map(str::to_owned);
        user.apply_hostmask(hostmask.username.as_deref(), hostmask.hostname.as_deref());
    }
}

/// `900 <target> <nick!user@host> <account> :You are now logged in as <account>`
pub(super) fn logged_in(state: &mut StateTracker, msg: &Message) {
    if let (Some(hostmask), Some(account)) = (msg.param(1), msg.param(2)) {
        login_changed(state, hostmask, Some(account));
    }
}

/// `901 <target> <nick!user@host> :You are now logged out`
pub(super) fn logged_out(state: &mut StateTracker, msg: &Message) {
    if let Some(hostmask) = msg.param(1) {
        login_changed(state, hostmask, None);
    }
}

#[cfg(test)]
mod tests {
    use crate::message::Message;
    use crate::state::StateTracker;

    fn feed(state: &mut StateTracker, line: &str) {
        state.feed(&Message::parse(line).unwrap());
    }

    fn with_alice() -> StateTracker {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 001 Me :Welcome");
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":alice!x@y JOIN #a");
        state
    }

    #[test]
    fn test_visible_host() {
        let mut state = with_alice();
        feed(&mut state, ":srv 396 Me cloak.example :is now your visible host");
        assert_eq!(state.me().username.as_deref(), Some("u"));
        assert_eq!(state.me().hostname.as_deref(), Some("cloak.example"));

        feed(&mut state, ":srv 396 Me ident@other.cloak :is now your visible host");
        assert_eq!(state.me().username.as_deref(), Some("ident"));
        assert_eq!(state.me().hostname.as_deref(), Some("other.cloak"));
    }

    #[test]
    fn test_chghost_and_setname() {
        let mut state = with_alice();
        feed(&mut state, ":alice!x@y CHGHOST newuser new.host");
        feed(&mut state, ":alice!newuser@new.host SETNAME :Alice L.");
        let alice = state.get_user("alice").unwrap();
        assert_eq!(alice.hostmask(), "alice!newuser@new.host");
        assert_eq!(alice.realname.as_deref(), Some("Alice L."));

        feed(&mut state, ":Me!u@h SETNAME :Me Myself");
        assert_eq!(state.me().realname.as_deref(), Some("Me Myself"));
        assert_eq!(
            state.get_user("me").unwrap().realname.as_deref(),
            Some("Me Myself")
        );
    }

    #[test]
    fn test_away() {
        let mut state = with_alice();
        feed(&mut state, ":alice!x@y AWAY :gone fishing");
        assert_eq!(
            state.get_user("alice").unwrap().away.as_deref(),
            Some("gone fishing")
        );

        feed(&mut state, ":alice!x@y AWAY");
        assert_eq!(state.get_user("alice").unwrap().away, None);

        feed(&mut state, ":srv 301 Me Me :brb");
        assert_eq!(state.me().away.as_deref(), Some("brb"));
    }

    #[test]
    fn test_account() {
        let mut state = with_alice();
        feed(&mut state, ":alice!x@y ACCOUNT alice_acct");
        assert_eq!(
            state.get_user("alice").unwrap().account.as_deref(),
            Some("alice_acct")
        );

        feed(&mut state, ":alice!x@y ACCOUNT *");
        assert_eq!(state.get_user("alice").unwrap().account, None);
    }

    #[test]
    fn test_sasl_login_and_logout() {
        let mut state = with_alice();
        feed(
            &mut state,
            ":srv 900 Me Me!ident@real.host myacct :You are now logged in as myacct",
        );
        assert_eq!(state.me().account.as_deref(), Some("myacct"));
        assert_eq!(state.me().username.as_deref(), Some("ident"));
        assert_eq!(state.me().hostname.as_deref(), Some("real.host"));
        assert_eq!(
            state.get_user("me").unwrap().account.as_deref(),
            Some("myacct")
        );

        feed(&mut state, ":srv 901 Me Me!ident@real.host :You are now logged out");
        assert_eq!(state.me().account, None);
        assert_eq!(state.get_user("me").unwrap().account, None);
    }
}
