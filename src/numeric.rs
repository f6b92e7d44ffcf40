//! Numeric replies the tracker consumes.
//!
//! Numerics arrive as three-digit command strings and are dispatched the same
//! way as named commands, so they are kept here as string constants.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>
//! - IRCv3 numerics registry: <https://defs.ircdocs.horse/defs/numerics.html>

/// 001 - Welcome to the IRC network
pub const RPL_WELCOME: &str = "001";
/// 005 - Server supported features (ISUPPORT)
pub const RPL_ISUPPORT: &str = "005";
/// 221 - User mode string
pub const RPL_UMODEIS: &str = "221";
/// 301 - Away message
pub const RPL_AWAY: &str = "301";
/// 311 - WHOIS user info
pub const RPL_WHOISUSER: &str = "311";
/// 324 - Channel mode string
pub const RPL_CHANNELMODEIS: &str = "324";
/// 329 - Channel creation time
pub const RPL_CREATIONTIME: &str = "329";
/// 332 - Channel topic
pub const RPL_TOPIC: &str = "332";
/// 333 - Topic set by/at
pub const RPL_TOPICWHOTIME: &str = "333";
/// 346 - Invite exception list entry
pub const RPL_INVITELIST: &str = "346";
/// 347 - End of invite exception list
pub const RPL_ENDOFINVITELIST: &str = "347";
/// 348 - Ban exception list entry
pub const RPL_EXCEPTLIST: &str = "348";
/// 349 - End of ban exception list
pub const RPL_ENDOFEXCEPTLIST: &str = "349";
/// 352 - WHO reply
pub const RPL_WHOREPLY: &str = "352";
/// 353 - NAMES reply
pub const RPL_NAMREPLY: &str = "353";
/// 354 - WHOX reply
pub const RPL_WHOSPCRPL: &str = "354";
/// 367 - Ban list entry
pub const RPL_BANLIST: &str = "367";
/// 368 - End of ban list
pub const RPL_ENDOFBANLIST: &str = "368";
/// 372 - MOTD line
pub const RPL_MOTD: &str = "372";
/// 375 - Start of MOTD
pub const RPL_MOTDSTART: &str = "375";
/// 396 - Visible host changed
pub const RPL_VISIBLEHOST: &str = "396";
/// 728 - Quiet list entry
pub const RPL_QUIETLIST: &str = "728";
/// 729 - End of quiet list
pub const RPL_ENDOFQUIETLIST: &str = "729";
/// 900 - Logged in as account
pub const RPL_LOGGEDIN: &str = "900";
/// 901 - Logged out
pub const RPL_LOGGEDOUT: &str = "901";
