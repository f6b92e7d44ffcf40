//! Shared name handles.
//!
//! A nickname or channel name is observed from several places at once: the
//! `User` or `Channel` that owns it and every `Membership` referring to it.
//! [`Identity`] is a cheap, cloneable handle to one shared name record, so a
//! rename is a single mutation that every holder observes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug)]
struct Name {
    display: String,
    folded: String,
}

/// Handle to a shared (display form, casefolded form) pair.
///
/// Cloning the handle shares the record; it never copies the name.
#[derive(Clone)]
pub struct Identity {
    inner: Arc<RwLock<Name>>,
}

impl Identity {
    /// Create a new identity record.
    pub fn new(display: impl Into<String>, folded: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Name {
                display: display.into(),
                folded: folded.into(),
            })),
        }
    }

    /// The name as the server last presented it.
    pub fn display(&self) -> String {
        self.inner.read().display.clone()
    }

    /// The name folded under the casemapping active when it was last set.
    pub fn folded(&self) -> String {
        self.inner.read().folded.clone()
    }

    /// Replace both forms at once.
    pub fn rename(&self, display: impl Into<String>, folded: impl Into<String>) {
        let mut name = self.inner.write();
        name.display = display.into();
        name.folded = folded.into();
    }

    /// Whether two handles point at the same record.
    pub fn same_as(&self, other: &Identity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.inner.read();
        f.debug_struct("Identity")
            .field("display", &name.display)
            .field("folded", &name.folded)
            .finish()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.read().display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_is_shared() {
        let a = Identity::new("Alice", "alice");
        let b = a.clone();

        b.rename("Alicia", "alicia");

        assert_eq!(a.display(), "Alicia");
        assert_eq!(a.folded(), "alicia");
        assert!(a.same_as(&b));
    }

    #[test]
    fn test_distinct_records() {
        let a = Identity::new("x", "x");
        let b = Identity::new("x", "x");
        assert!(!a.same_as(&b));
        assert_eq!(a.to_string(), "x");
    }
}
