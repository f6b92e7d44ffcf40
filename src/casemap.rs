//! IRC case-mapping functions.
//!
//! IRC compares nicknames and channel names case-insensitively, and which
//! characters count as "the same" is negotiated through the `CASEMAPPING`
//! ISUPPORT token. Two mappings are supported:
//!
//! - `ascii`: only `A`-`Z` fold to `a`-`z`.
//! - `rfc1459`: as `ascii`, and additionally `[`, `]`, `^`, `\` fold to
//!   `{`, `}`, `~`, `|`.
//!
//! Folding is 1:1 and position-preserving, so a folded string always has the
//! same length as its input.

use std::fmt;
use std::str::FromStr;

use crate::error::StateError;

/// A negotiated case-mapping scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Casemapping {
    /// Fold `A`-`Z` only.
    Ascii,
    /// Fold `A`-`Z` and `[]^\`. The RFC 1459 default.
    #[default]
    Rfc1459,
}

impl Casemapping {
    /// The token value naming this mapping.
    pub const fn as_str(self) -> &'static str {
        match self {
            Casemapping::Ascii => "ascii",
            Casemapping::Rfc1459 => "rfc1459",
        }
    }

    /// Fold a single character under this mapping.
    #[inline]
    pub const fn fold_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (Casemapping::Rfc1459, '[') => '{',
            (Casemapping::Rfc1459, ']') => '}',
            (Casemapping::Rfc1459, '^') => '~',
            (Casemapping::Rfc1459, '\\') => '|',
            _ => c,
        }
    }

    /// Fold a string under this mapping.
    pub fn fold(self, s: &str) -> String {
        s.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Compare two strings under this mapping.
    pub fn eq_folded(self, a: &str, b: &str) -> bool {
        if a.len() != b.len() {
            return false;
        }

        a.chars()
            .zip(b.chars())
            .all(|(ca, cb)| self.fold_char(ca) == self.fold_char(cb))
    }
}

impl FromStr for Casemapping {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Casemapping::Ascii),
            "rfc1459" => Ok(Casemapping::Rfc1459),
            other => Err(StateError::InvalidCasemapping(other.to_owned())),
        }
    }
}

impl fmt::Display for Casemapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold `s` under `mapping`.
pub fn fold(mapping: Casemapping, s: &str) -> String {
    mapping.fold(s)
}

/// Fold `s` under the mapping named `mapping`.
///
/// Fails with [`StateError::InvalidCasemapping`] when the name is not one of
/// the supported mappings.
pub fn fold_named(mapping: &str, s: &str) -> Result<String, StateError> {
    Ok(mapping.parse::<Casemapping>()?.fold(s))
}
