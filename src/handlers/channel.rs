//! Channel handlers.
//!
//! Handles JOIN, PART, KICK, RENAME, TOPIC and the NAMES/topic/creation
//! numerics.

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;

use super::{account_name, unix_time};
use crate::identity::Identity;
use crate::message::{Hostmask, Message};
use crate::state::{Channel, StateTracker};

/// `JOIN <channel>` or, with extended-join, `JOIN <channel> <account> :<realname>`.
pub(super) fn join(state: &mut StateTracker, msg: &Message) {
    let (Some(hostmask), Some(channel_name)) = (&msg.hostmask, msg.param(0)) else {
        return;
    };
    let extended = match msg.params.as_slice() {
        [_, account, realname] => Some((account_name(account), realname.clone())),
        _ => None,
    };

    let channel_folded = state.casefold(channel_name);
    let nickname_folded = state.casefold(&hostmask.nickname);

    if state.is_me(&hostmask.nickname) {
        if !state.channels.contains_key(&channel_folded) {
            let mut channel = Channel::new(Identity::new(channel_name, channel_folded.clone()));
            for &mode in &state.isupport.chanmodes.a {
                channel.list_modes.insert(mode, HashSet::new());
            }
            debug!(conn = %state.config.name, channel = channel_name, "joined channel");
            state.channels.insert(channel_folded.clone(), channel);
        }

        state.this_hostmask(hostmask);
        if let Some((account, realname)) = &extended {
            state.me.account = account.clone();
            state.me.realname = Some(realname.clone());
        }
    }

    if !state.channels.contains_key(&channel_folded) {
        return;
    }

    let user = state.ensure_user(&hostmask.nickname);
    user.apply_hostmask(hostmask.username.as_deref(), hostmask.hostname.as_deref());
    if let Some((account, realname)) = extended {
        user.account = account;
        user.realname = Some(realname);
    }
    state.user_join(&channel_folded, &nickname_folded);
}

pub(super) fn part(state: &mut StateTracker, msg: &Message) {
    if let (Some(nickname), Some(channel)) = (msg.source_nickname(), msg.param(0)) {
        state.user_part(nickname, channel);
    }
}

/// `KICK <channel> <nickname> [:reason]`
pub(super) fn kick(state: &mut StateTracker, msg: &Message) {
    if let (Some(channel), Some(nickname)) = (msg.param(0), msg.param(1)) {
        state.user_part(nickname, channel);
    }
}

/// `RENAME <old> <new> [:reason]`
pub(super) fn rename(state: &mut StateTracker, msg: &Message) {
    let (Some(old_name), Some(new_name)) = (msg.param(0), msg.param(1)) else {
        return;
    };
    let old_folded = state.casefold(old_name);
    let new_folded = state.casefold(new_name);

    let Some(channel) = state.channels.remove(&old_folded) else {
        return;
    };
    channel.identity.rename(new_name, new_folded.clone());
    for nickname_folded in channel.members.keys() {
        if let Some(user) = state.users.get_mut(nickname_folded) {
            user.channels.remove(&old_folded);
            user.channels.insert(new_folded.clone());
        }
    }
    debug!(from = old_name, to = new_name, "channel renamed");
    state.channels.insert(new_folded, channel);
}

/// `353 <target> <symbol> <channel> :[prefix]nick[!user@host] ...`
pub(super) fn names(state: &mut StateTracker, msg: &Message) {
    let (Some(channel_name), Some(names)) = (msg.param(2), msg.param(3)) else {
        return;
    };
    let channel_folded = state.casefold(channel_name);
    if !state.channels.contains_key(&channel_folded) {
        return;
    }

    for token in names.split(' ').filter(|name| !name.is_empty()) {
        let prefix = &state.isupport.prefix;
        let rest = token.trim_start_matches(|c: char| prefix.mode_for_prefix(c).is_some());
        let modes: Vec<char> = token[..token.len() - rest.len()]
            .chars()
            .filter_map(|c| prefix.mode_for_prefix(c))
            .collect();

        let hostmask = Hostmask::parse(rest);
        if hostmask.nickname.is_empty() {
            continue;
        }
        let nickname_folded = state.casefold(&hostmask.nickname);

        state
            .ensure_user(&hostmask.nickname)
            .apply_hostmask(hostmask.username.as_deref(), hostmask.hostname.as_deref());
        if state.is_me(&hostmask.nickname) {
            state.this_hostmask(&hostmask);
        }

        if let Some(member) = state.user_join(&channel_folded, &nickname_folded) {
            member.modes.extend(modes);
        }
    }
}

/// `329 <target> <channel> <timestamp>`
pub(super) fn creation_time(state: &mut StateTracker, msg: &Message) {
    let (Some(channel), Some(time)) = (msg.param(1), msg.param(2)) else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded)
        && let Some(created) = unix_time(time)
    {
        channel.created = Some(created);
    }
}

/// Live `TOPIC <channel> :<text>`; stamped with the time it was seen.
pub(super) fn topic(state: &mut StateTracker, msg: &Message) {
    let (Some(channel), Some(text)) = (msg.param(0), msg.param(1)) else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        channel.topic = Some(text.to_owned());
        channel.topic_setter = msg.source.clone();
        channel.topic_time = Some(Utc::now());
    }
}

/// `332 <target> <channel> :<text>`
pub(super) fn topic_num(state: &mut StateTracker, msg: &Message) {
    let (Some(channel), Some(text)) = (msg.param(1), msg.param(2)) else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        channel.topic = Some(text.to_owned());
    }
}

/// `333 <target> <channel> <setter> <timestamp>`
pub(super) fn topic_who_time(state: &mut StateTracker, msg: &Message) {
    let (Some(channel), Some(setter), Some(time)) = (msg.param(1), msg.param(2), msg.param(3))
    else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        channel.topic_setter = Some(setter.to_owned());
        channel.topic_time = unix_time(time);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::message::Message;
    use crate::state::StateTracker;

    fn feed(state: &mut StateTracker, line: &str) {
        state.feed(&Message::parse(line).unwrap());
    }

    fn registered() -> StateTracker {
        let mut state = StateTracker::default();
        feed(&mut state, ":srv 001 Me :Welcome");
        state
    }

    #[test]
    fn test_self_join_creates_channel_with_list_modes() {
        let mut state = registered();
        feed(&mut state, ":srv 005 Me CHANMODES=beI,k,l,imnpst :are supported");
        feed(&mut state, ":Me!ident@host.example JOIN #Test");

        let channel = state.get_channel("#test").unwrap();
        assert_eq!(channel.name(), "#Test");
        for mode in ['b', 'e', 'I'] {
            assert_eq!(channel.list(mode).map(|l| l.len()), Some(0));
        }
        assert!(channel.member("me").is_some());
        assert_eq!(state.me().username.as_deref(), Some("ident"));
        assert_eq!(state.me().hostname.as_deref(), Some("host.example"));
    }

    #[test]
    fn test_join_unknown_channel_by_other_is_ignored() {
        let mut state = registered();
        feed(&mut state, ":Alice!a@h JOIN #elsewhere");
        assert!(!state.has_channel("#elsewhere"));
        assert!(!state.has_user("alice"));
    }

    #[test]
    fn test_extended_join() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a myacct :My Name");
        feed(&mut state, ":Alice!a@h JOIN #a * :Alice Liddell");

        assert_eq!(state.me().account.as_deref(), Some("myacct"));
        assert_eq!(state.me().realname.as_deref(), Some("My Name"));

        let alice = state.get_user("alice").unwrap();
        assert_eq!(alice.account, None);
        assert_eq!(alice.realname.as_deref(), Some("Alice Liddell"));
        assert_eq!(alice.hostmask(), "Alice!a@h");
    }

    #[test]
    fn test_rejoin_keeps_status() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":srv MODE #a +o Me");
        feed(&mut state, ":Me!u@h JOIN #a");
        let member = state.get_channel("#a").unwrap().member("me").unwrap();
        assert!(member.modes.contains(&'o'));
    }

    #[test]
    fn test_part_other_keeps_shared_users() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":Me!u@h JOIN #b");
        feed(&mut state, ":Alice!a@h JOIN #a");
        feed(&mut state, ":Alice!a@h JOIN #b");

        feed(&mut state, ":Alice!a@h PART #a :later");
        assert!(state.get_channel("#a").unwrap().member("alice").is_none());
        let alice = state.get_user("alice").unwrap();
        assert_eq!(alice.channels.len(), 1);
        assert!(alice.channels.contains("#b"));

        feed(&mut state, ":Me!u@h KICK #b Alice :out");
        assert!(!state.has_user("alice"));
    }

    #[test]
    fn test_self_part_drops_channel_and_unshared_members() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #x");
        feed(&mut state, ":Me!u@h JOIN #y");
        feed(&mut state, ":srv 353 Me = #x :Me @alice bob");
        feed(&mut state, ":Bob!b@h JOIN #y");

        feed(&mut state, ":Me!u@h PART #x");
        assert!(!state.has_channel("#x"));
        assert!(!state.has_user("alice"));
        // still shares #y
        assert!(state.has_user("bob"));
        assert!(!state.get_user("bob").unwrap().channels.contains("#x"));
    }

    #[test]
    fn test_self_kicked() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #x");
        feed(&mut state, ":Alice!a@h JOIN #x");
        feed(&mut state, ":Alice!a@h KICK #x Me :bye");
        assert!(state.channels().is_empty());
        assert!(state.users().is_empty());
    }

    #[test]
    fn test_names_prefixes_and_hostmasks() {
        let mut state = registered();
        feed(&mut state, ":srv 005 Me PREFIX=(qov)~@+ :are supported");
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(
            &mut state,
            ":srv 353 Me = #a :~@alice!al@alice.host +bob carol @Me",
        );

        let channel = state.get_channel("#a").unwrap();
        let modes = |nick: &str| channel.member(nick).unwrap().modes.clone();
        assert_eq!(modes("alice"), BTreeSet::from(['q', 'o']));
        assert_eq!(modes("bob"), BTreeSet::from(['v']));
        assert!(modes("carol").is_empty());
        assert_eq!(modes("me"), BTreeSet::from(['o']));

        let alice = state.get_user("alice").unwrap();
        assert_eq!(alice.nickname(), "alice");
        assert_eq!(alice.username.as_deref(), Some("al"));
        assert_eq!(alice.hostname.as_deref(), Some("alice.host"));
        assert_eq!(state.users().len(), 4);
    }

    #[test]
    fn test_names_for_unknown_channel_ignored() {
        let mut state = registered();
        feed(&mut state, ":srv 353 Me = #nope :alice bob");
        assert!(state.users().is_empty());
    }

    #[test]
    fn test_rename_channel() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #old");
        feed(&mut state, ":srv 353 Me = #old :Me @alice");
        feed(&mut state, ":srv 332 Me #old :the topic");

        feed(&mut state, ":srv RENAME #old #New :moving");
        assert!(state.get_channel("#old").is_none());

        let channel = state.get_channel("#new").unwrap();
        assert_eq!(channel.name(), "#New");
        assert_eq!(channel.topic.as_deref(), Some("the topic"));
        let alice = channel.member("alice").unwrap();
        assert!(alice.modes.contains(&'o'));
        assert_eq!(alice.channel(), "#New");

        let user = state.get_user("alice").unwrap();
        assert!(user.channels.contains("#new"));
        assert!(!user.channels.contains("#old"));

        // parting by the new name still cleans up
        feed(&mut state, ":Me!u@h PART #New");
        assert!(state.channels().is_empty());
        assert!(state.users().is_empty());
    }

    #[test]
    fn test_topic_numerics() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":srv 332 Me #a :Welcome!");
        feed(&mut state, ":srv 333 Me #a alice!a@h 1700000000");
        feed(&mut state, ":srv 329 Me #a 1600000000");

        let channel = state.get_channel("#a").unwrap();
        assert_eq!(channel.topic.as_deref(), Some("Welcome!"));
        assert_eq!(channel.topic_setter.as_deref(), Some("alice!a@h"));
        assert_eq!(channel.topic_time.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(channel.created.unwrap().timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_bad_creation_time_keeps_previous() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a");
        feed(&mut state, ":srv 329 Me #a 1600000000");
        feed(&mut state, ":srv 329 Me #a yesterday");

        let created = state.get_channel("#a").unwrap().created.unwrap();
        assert_eq!(created.timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_live_topic() {
        let mut state = registered();
        feed(&mut state, ":Me!u@h JOIN #a");
        let before = chrono::Utc::now();
        feed(&mut state, ":alice!a@h TOPIC #a :new topic");

        let channel = state.get_channel("#a").unwrap();
        assert_eq!(channel.topic.as_deref(), Some("new topic"));
        assert_eq!(channel.topic_setter.as_deref(), Some("alice!a@h"));
        assert!(channel.topic_time.unwrap() >= before - chrono::Duration::seconds(1));
    }
}
