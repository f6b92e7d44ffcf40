//! Thread-shareable tracker handle.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::StateTracker;
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::message::Message;

/// A [`StateTracker`] behind one lock.
///
/// Handlers touch several tables per message, so the whole tracker is a
/// single unit of exclusion: writers hold the lock for an entire message and
/// readers never observe a half-applied update.
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<RwLock<StateTracker>>,
}

impl SharedTracker {
    /// Create a shared tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self::from(StateTracker::new(config))
    }

    /// Apply one message.
    pub fn feed(&self, msg: &Message) {
        self.inner.write().feed(msg);
    }

    /// Push received bytes without applying them.
    pub fn recv(&self, data: &[u8]) -> Result<Vec<Message>> {
        self.inner.write().recv(data)
    }

    /// Push received bytes and apply the completed messages under one lock.
    pub fn process(&self, data: &[u8]) -> Result<Vec<Message>> {
        self.inner.write().process(data)
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, StateTracker> {
        self.inner.read()
    }
}

impl Default for SharedTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl From<StateTracker> for SharedTracker {
    fn from(tracker: StateTracker) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tracker)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_between_threads() {
        let shared = SharedTracker::default();
        shared.feed(&Message::new("001", ["Me", "Welcome"]));

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                shared
                    .process(b":Me!u@h JOIN #a\r\n:Me!u@h JOIN #b\r\n")
                    .unwrap();
            })
        };
        writer.join().unwrap();

        let state = shared.read();
        assert!(state.is_registered());
        assert_eq!(state.channels().len(), 2);
    }

    #[test]
    fn test_tracker_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateTracker>();
        assert_send_sync::<SharedTracker>();
    }
}
