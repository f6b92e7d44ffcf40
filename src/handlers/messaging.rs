//! PRIVMSG, NOTICE and TAGMSG handler.
//!
//! Message content is not interpreted; only the sender's hostmask is learned.

use tracing::trace;

use crate::message::Message;
use crate::state::StateTracker;

pub(super) fn message(state: &mut StateTracker, msg: &Message) {
    let Some(hostmask) = &msg.hostmask else {
        return;
    };

    if state.is_me(&hostmask.nickname) {
        state.this_hostmask(hostmask);
    }

    // Senders we share no channel with (services, server notices) stay transient.
    let folded = state.casefold(&hostmask.nickname);
    if let Some(user) = state.users.get_mut(&folded) {
        user.apply_hostmask(hostmask.username.as_deref(), hostmask.hostname.as_deref());
    }

    if let Some(target) = msg.param(0) {
        let (statusmsg, target) = state.split_statusmsg(target);
        if !statusmsg.is_empty() {
            trace!(target, ?statusmsg, "status message");
        }
    }
}
