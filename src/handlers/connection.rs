//! Connection lifecycle handlers.
//!
//! Handles RPL_WELCOME, RPL_ISUPPORT, the MOTD, NICK, QUIT and ERROR.

use tracing::debug;

use crate::isupport::response_tokens;
use crate::message::Message;
use crate::state::StateTracker;

/// `001`: the first reply sent once registration completes.
pub(super) fn welcome(state: &mut StateTracker, msg: &Message) {
    let Some(nickname) = msg.param(0) else {
        return;
    };
    state.me.nickname = nickname.to_owned();
    state.me.nickname_folded = state.casefold(nickname);
    if !state.registered {
        debug!(conn = %state.config.name, nickname, "registered");
    }
    state.registered = true;
}

/// `005`: `<target> <token>... :are supported by this server`.
pub(super) fn isupport(state: &mut StateTracker, msg: &Message) {
    let before = state.isupport.casemapping;
    state.isupport.apply_tokens(response_tokens(&msg.params));

    let after = state.isupport.casemapping;
    if after != before {
        // Only our own nickname is refolded; table keys keep the old mapping.
        state.me.nickname_folded = after.fold(&state.me.nickname);
    }
}

/// `375`: start of a fresh MOTD.
pub(super) fn motd_start(state: &mut StateTracker, msg: &Message) {
    state.motd.clear();
    motd(state, msg);
}

/// `372`: one MOTD line.
pub(super) fn motd(state: &mut StateTracker, msg: &Message) {
    if let Some(line) = msg.param(1) {
        state.motd.push(line.to_owned());
    }
}

pub(super) fn nick(state: &mut StateTracker, msg: &Message) {
    let (Some(hostmask), Some(new_nickname)) = (&msg.hostmask, msg.param(0)) else {
        return;
    };
    let old_folded = state.casefold(&hostmask.nickname);
    let new_folded = state.casefold(new_nickname);

    if let Some(user) = state.users.remove(&old_folded) {
        user.identity.rename(new_nickname, new_folded.clone());
        for channel_folded in &user.channels {
            let Some(channel) = state.channels.get_mut(channel_folded) else {
                continue;
            };
            if let Some(member) = channel.members.remove(&old_folded) {
                channel.members.insert(new_folded.clone(), member);
            }
        }
        state.users.insert(new_folded.clone(), user);
        debug!(from = %hostmask.nickname, to = new_nickname, "nick change");
    }

    if state.is_me(&hostmask.nickname) {
        state.me.nickname = new_nickname.to_owned();
        state.me.nickname_folded = new_folded;
    }
}

pub(super) fn quit(state: &mut StateTracker, msg: &Message) {
    let Some(nickname) = msg.source_nickname() else {
        return;
    };
    if state.is_me(nickname) {
        state.self_quit();
    } else {
        state.user_quit(nickname);
    }
}

/// A server `ERROR` ends the session.
pub(super) fn error(state: &mut StateTracker, msg: &Message) {
    debug!(reason = msg.param(0).unwrap_or_default(), "server error");
    state.self_quit();
}

#[cfg(test)]
mod tests {
    use crate::message::Message;
    use crate::state::StateTracker;

    fn feed(state: &mut StateTracker, line: &str) {
        state.feed(&Message::parse(line).unwrap());
    }

    fn joined() -> StateTracker {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 001 Me :Welcome");
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":Alice!a@h JOIN #a");
        state
    }

    #[test]
    fn test_welcome() {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 001 Nick :Welcome to the network");
        assert!(state.is_registered());
        assert_eq!(state.nickname(), "Nick");
        assert!(state.is_me("NICK"));
    }

    #[test]
    fn test_isupport_strips_target_and_trailing() {
        let mut state = StateTracker::default();
        feed(
            &mut state,
            ":srv 005 Me NETWORK=Libera NICKLEN=16 :are supported by this server",
        );
        assert_eq!(state.isupport().network.as_deref(), Some("Libera"));
        assert_eq!(state.isupport().nicklen, 16);
        assert!(!state.isupport().raw.contains_key("Me"));
        assert!(!state.isupport().raw.contains_key("are supported by this server"));
    }

    #[test]
    fn test_casemapping_change_refolds_own_nickname() {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 001 Me[1] :Welcome");
        assert!(state.is_me("me{1}"));

        feed(&mut state, ":srv 005 Me[1] CASEMAPPING=ascii :are supported");
        assert!(state.is_me("ME[1]"));
        assert!(!state.is_me("me{1}"));
    }

    #[test]
    fn test_motd() {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 375 Me :- srv Message of the day -");
        feed(&mut state, ":srv 372 Me :- hello");
        assert_eq!(state.motd().len(), 2);

        feed(&mut state, ":srv 375 Me :- again -");
        assert_eq!(state.motd(), ["- again -"]);
    }

    #[test]
    fn test_nick_change_rekeys_everything() {
        let mut state = joined();
        state.feed(&Message::new("MODE", ["#a", "+v", "alice"]));
        feed(&mut state, ":Alice!a@h NICK Alicia");

        assert!(!state.has_user("alice"));
        let user = state.get_user("ALICIA").unwrap();
        assert_eq!(user.nickname(), "Alicia");

        let channel = state.get_channel("#a").unwrap();
        assert!(channel.member("alice").is_none());
        let member = channel.member("alicia").unwrap();
        assert_eq!(member.nickname(), "Alicia");
        assert!(member.modes.contains(&'v'));
    }

    #[test]
    fn test_own_nick_change() {
        let mut state = joined();
        feed(&mut state, ":Me!u@h NICK Myself");
        assert_eq!(state.nickname(), "Myself");
        assert!(state.is_me("myself"));
        assert!(state.get_channel("#a").unwrap().member("myself").is_some());
    }

    #[test]
    fn test_other_quit() {
        let mut state = joined();
        feed(&mut state, ":Alice!a@h QUIT :bye");
        assert!(!state.has_user("alice"));
        assert!(state.get_channel("#a").unwrap().member("alice").is_none());
        assert!(state.has_user("me"));
    }

    #[test]
    fn test_self_quit_and_error_reset() {
        let mut state = joined();
        feed(&mut state, ":Me!u@h QUIT :bye");
        assert!(state.users().is_empty());
        assert!(state.channels().is_empty());

        let mut state = joined();
        feed(&mut state, "ERROR :Closing Link");
        assert!(state.users().is_empty());
        assert!(state.channels().is_empty());
        assert!(state.is_registered());
    }
}
