//! CAP handler.
//!
//! `CAP <target> <subcommand> [*] :<capabilities>`

use tracing::trace;

use crate::caps::CapSubCommand;
use crate::message::Message;
use crate::state::StateTracker;

pub(super) fn cap(state: &mut StateTracker, msg: &Message) {
    let Some(subcommand) = msg.param(1) else {
        return;
    };
    state.caps.has_cap = true;

    let more = msg.param(2) == Some("*");
    let list = msg.param(if more { 3 } else { 2 }).unwrap_or_default();

    match CapSubCommand::parse(subcommand) {
        Some(sub) => state.caps.apply(sub, more, list),
        None => trace!(subcommand, "ignoring CAP subcommand"),
    }
}
