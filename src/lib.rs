//! # slirc-state
//!
//! Client-side IRC state tracking: a queryable model of one server
//! connection, built purely from the messages the server sends.
//!
//! ## Features
//!
//! - Channels, users and per-channel status modes, kept consistent across
//!   nick changes, channel renames, parts, kicks and quits
//! - ISUPPORT (RPL_ISUPPORT) parsing with casemapping-aware name lookups
//! - IRCv3 capability negotiation state, including multiline `CAP LS`
//! - Two-phase ban/quiet/exception list accumulation
//! - A push interface over raw bytes, backed by a `tokio_util` line codec
//!
//! The tracker never writes to the wire. The one outbound helper,
//! [`StateTracker::prepare_whox`], builds a message for the caller to send.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_state::StateTracker;
//!
//! let mut state = StateTracker::default();
//! state
//!     .process(b":srv 001 Nick :Welcome\r\n:Nick!u@h JOIN #test\r\n")
//!     .unwrap();
//! state
//!     .process(b":srv 353 Nick = #test :Nick @alice +bob\r\n")
//!     .unwrap();
//!
//! let channel = state.get_channel("#TEST").unwrap();
//! assert_eq!(channel.members().len(), 3);
//! assert!(channel.member("alice").unwrap().modes.contains(&'o'));
//! ```
//!
//! For use from several threads, wrap the tracker in a [`SharedTracker`].

#![warn(missing_docs)]

pub mod caps;
pub mod casemap;
pub mod codec;
pub mod config;
pub mod error;
mod handlers;
pub mod identity;
pub mod isupport;
pub mod message;
pub mod numeric;
pub mod state;

pub use self::caps::{CapState, CapSubCommand};
pub use self::casemap::{Casemapping, fold};
pub use self::codec::{LineCodec, StreamDecoder};
pub use self::config::{ConfigError, TrackerConfig};
pub use self::error::{DisconnectReason, Result, StateError};
pub use self::identity::Identity;
pub use self::isupport::{ChanModes, ISupport, Limit, ModeClass, PrefixTable};
pub use self::message::{Hostmask, Message};
pub use self::state::{
    Channel, LocalIdentity, Membership, SharedTracker, StateTracker, User,
};
