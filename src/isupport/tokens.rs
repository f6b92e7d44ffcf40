//! Typed values carried by individual ISUPPORT tokens.

/// Parsed `CHANMODES` ISUPPORT token.
///
/// Channel modes are divided into four classes:
/// - **A**: List modes, always take a parameter (e.g., `b` for ban)
/// - **B**: Always take a parameter, set or unset (e.g., `k` for key)
/// - **C**: Take a parameter only when set (e.g., `l` for limit)
/// - **D**: Never take a parameter (e.g., `n` for no external messages)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChanModes {
    /// Class A: list modes.
    pub a: Vec<char>,
    /// Class B: parameter on set and unset.
    pub b: Vec<char>,
    /// Class C: parameter on set only.
    pub c: Vec<char>,
    /// Class D: no parameter.
    pub d: Vec<char>,
}

/// The class a channel mode letter belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeClass {
    /// List mode.
    A,
    /// Parameter on set and unset.
    B,
    /// Parameter on set only.
    C,
    /// No parameter.
    D,
}

impl ChanModes {
    /// Parse a `CHANMODES` value like `b,k,l,imnpst`.
    ///
    /// Missing groups are treated as empty; groups past the fourth are
    /// ignored.
    pub fn parse(s: &str) -> Self {
        let mut groups = s.split(',').map(|g| g.chars().collect::<Vec<char>>());
        ChanModes {
            a: groups.next().unwrap_or_default(),
            b: groups.next().unwrap_or_default(),
            c: groups.next().unwrap_or_default(),
            d: groups.next().unwrap_or_default(),
        }
    }

    /// Classify a mode letter, if the server advertised it.
    pub fn class_of(&self, mode: char) -> Option<ModeClass> {
        if self.a.contains(&mode) {
            Some(ModeClass::A)
        } else if self.b.contains(&mode) {
            Some(ModeClass::B)
        } else if self.c.contains(&mode) {
            Some(ModeClass::C)
        } else if self.d.contains(&mode) {
            Some(ModeClass::D)
        } else {
            None
        }
    }
}

impl Default for ChanModes {
    /// RFC 1459 channel modes.
    fn default() -> Self {
        ChanModes {
            a: vec!['b'],
            b: vec!['k'],
            c: vec!['l'],
            d: vec!['i', 'm', 'n', 'p', 's', 't'],
        }
    }
}

/// Parsed `PREFIX` ISUPPORT token.
///
/// Parallel, ordered lists mapping channel status modes (like `o`, `v`) to
/// the prefix symbols shown before nicknames (`@`, `+`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixTable {
    /// Status mode letters, highest rank first.
    pub modes: Vec<char>,
    /// Prefix symbols, parallel to `modes`.
    pub prefixes: Vec<char>,
}

impl PrefixTable {
    /// Parse a `PREFIX` value like `(ov)@+`.
    ///
    /// An empty value means the server has no status modes.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(PrefixTable {
                modes: Vec::new(),
                prefixes: Vec::new(),
            });
        }

        let rest = s.strip_prefix('(')?;
        let (modes, prefixes) = rest.split_once(')')?;
        Some(PrefixTable {
            modes: modes.chars().collect(),
            prefixes: prefixes.chars().collect(),
        })
    }

    /// Returns true if the given letter is a status mode on this server.
    #[inline]
    pub fn is_prefix_mode(&self, mode: char) -> bool {
        self.modes.contains(&mode)
    }

    /// Returns the prefix symbol for a status mode letter.
    #[inline]
    pub fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.modes
            .iter()
            .position(|&c| c == mode)
            .and_then(|i| self.prefixes.get(i).copied())
    }

    /// Returns the status mode letter for a prefix symbol.
    #[inline]
    pub fn mode_for_prefix(&self, prefix: char) -> Option<char> {
        self.prefixes
            .iter()
            .position(|&c| c == prefix)
            .and_then(|i| self.modes.get(i).copied())
    }
}

impl Default for PrefixTable {
    /// `(ov)@+`.
    fn default() -> Self {
        PrefixTable {
            modes: vec!['o', 'v'],
            prefixes: vec!['@', '+'],
        }
    }
}

/// A numeric limit that a server may advertise as unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    /// Key given without a value.
    Unlimited,
    /// Explicit maximum.
    Max(u32),
}

impl Limit {
    /// Parse an optional token value; a bare key means no limit.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Limit::Unlimited),
            Some(v) => v.parse().ok().map(Limit::Max),
        }
    }

    /// Signed form, with `-1` standing for "no limit".
    pub fn as_i64(self) -> i64 {
        match self {
            Limit::Unlimited => -1,
            Limit::Max(n) => i64::from(n),
        }
    }
}
