//! Mode handlers.
//!
//! Handles live MODE changes, the `324`/`221` mode replies, and the list
//! numerics for bans, quiets, exceptions and invite exceptions.

use tracing::trace;

use crate::isupport::{ISupport, ModeClass};
use crate::message::Message;
use crate::state::{Channel, StateTracker};

/// One signed mode letter from a mode string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ModeChange {
    pub adding: bool,
    pub mode: char,
}

/// Split a mode string into signed letters.
///
/// The sign carries over to following letters and defaults to `+`.
pub(crate) fn parse_mode_string(modes: &str) -> Vec<ModeChange> {
    let mut adding = true;
    modes
        .chars()
        .filter_map(|c| match c {
            '+' => {
                adding = true;
                None
            }
            '-' => {
                adding = false;
                None
            }
            mode => Some(ModeChange { adding, mode }),
        })
        .collect()
}

/// Apply mode changes to a channel, consuming parameters by mode class.
fn apply_channel_modes(
    isupport: &ISupport,
    channel: &mut Channel,
    changes: &[ModeChange],
    params: &[String],
) {
    let mut params = params.iter().map(String::as_str);

    for &ModeChange { adding, mode } in changes {
        if isupport.prefix.is_prefix_mode(mode) {
            let Some(nickname) = params.next() else {
                continue;
            };
            let folded = isupport.casemapping.fold(nickname);
            if let Some(member) = channel.members.get_mut(&folded) {
                if adding {
                    member.modes.insert(mode);
                } else {
                    member.modes.remove(&mode);
                }
            }
            continue;
        }

        let (takes_param, is_list) = match isupport.chanmodes.class_of(mode) {
            Some(ModeClass::A) => (true, true),
            Some(ModeClass::B) => (true, false),
            Some(ModeClass::C) => (adding, false),
            Some(ModeClass::D) | None => (false, false),
        };
        let param = if takes_param { params.next() } else { None };

        if adding {
            channel.add_mode(mode, is_list, param.map(str::to_owned));
        } else {
            channel.remove_mode(mode, param);
        }
    }
}

/// `MODE <target> <modes> [params...]`, for a channel or for us.
pub(super) fn mode(state: &mut StateTracker, msg: &Message) {
    let (Some(target), Some(modes)) = (msg.param(0), msg.param(1)) else {
        return;
    };
    let changes = parse_mode_string(modes);

    if state.is_me(target) {
        for ModeChange { adding, mode } in changes {
            if adding {
                state.modes.insert(mode);
            } else {
                state.modes.remove(&mode);
            }
        }
        return;
    }

    let folded = state.casefold(target);
    if let Some(channel) = state.channels.get_mut(&folded) {
        apply_channel_modes(&state.isupport, channel, &changes, &msg.params[2..]);
    } else {
        trace!(target, "MODE for unknown target");
    }
}

/// `324 <target> <channel> <modes> [params...]`
pub(super) fn channel_mode_is(state: &mut StateTracker, msg: &Message) {
    let (Some(channel), Some(modes)) = (msg.param(1), msg.param(2)) else {
        return;
    };
    let changes: Vec<ModeChange> = modes
        .chars()
        .filter(|&c| c != '+')
        .map(|mode| ModeChange { adding: true, mode })
        .collect();

    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        apply_channel_modes(&state.isupport, channel, &changes, &msg.params[3..]);
    }
}

/// `221 <target> <modes>`
pub(super) fn umode_is(state: &mut StateTracker, msg: &Message) {
    let Some(modes) = msg.params.last().filter(|_| msg.params.len() >= 2) else {
        return;
    };
    state.modes.extend(modes.chars().filter(|&c| c != '+'));
}

fn list_entry(state: &mut StateTracker, channel: Option<&str>, mode: char, mask: Option<&str>) {
    let (Some(channel), Some(mask)) = (channel, mask) else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        channel.push_list_entry(mode, mask);
    }
}

fn list_end(state: &mut StateTracker, channel: Option<&str>, mode: char) {
    let Some(channel) = channel else {
        return;
    };
    let folded = state.casefold(channel);
    if let Some(channel) = state.channels.get_mut(&folded) {
        channel.finish_list(mode);
    }
}

/// Mode letter carried as a parameter, as in the quiet list numerics.
fn mode_param(msg: &Message, idx: usize) -> Option<char> {
    msg.param(idx).and_then(|m| m.chars().next())
}

/// `367 <target> <channel> <mask> [setter] [time]`
pub(super) fn ban_list(state: &mut StateTracker, msg: &Message) {
    list_entry(state, msg.param(1), 'b', msg.param(2));
}

/// `368 <target> <channel> :End of channel ban list`
pub(super) fn ban_list_end(state: &mut StateTracker, msg: &Message) {
    list_end(state, msg.param(1), 'b');
}

/// `728 <target> <channel> <mode> <mask> [setter] [time]`
pub(super) fn quiet_list(state: &mut StateTracker, msg: &Message) {
    if let Some(mode) = mode_param(msg, 2) {
        list_entry(state, msg.param(1), mode, msg.param(3));
    }
}

/// `729 <target> <channel> <mode> :End of channel quiet list`
pub(super) fn quiet_list_end(state: &mut StateTracker, msg: &Message) {
    if let Some(mode) = mode_param(msg, 2) {
        list_end(state, msg.param(1), mode);
    }
}

/// `348 <target> <channel> <mask>`
pub(super) fn except_list(state: &mut StateTracker, msg: &Message) {
    let mode = state.isupport.excepts_mode();
    list_entry(state, msg.param(1), mode, msg.param(2));
}

pub(super) fn except_list_end(state: &mut StateTracker, msg: &Message) {
    let mode = state.isupport.excepts_mode();
    list_end(state, msg.param(1), mode);
}

/// `346 <target> <channel> <mask>`
pub(super) fn invite_list(state: &mut StateTracker, msg: &Message) {
    let mode = state.isupport.invex_mode();
    list_entry(state, msg.param(1), mode, msg.param(2));
}

pub(super) fn invite_list_end(state: &mut StateTracker, msg: &Message) {
    let mode = state.isupport.invex_mode();
    list_end(state, msg.param(1), mode);
}
