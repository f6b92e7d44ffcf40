//! Integration test common infrastructure.
//!
//! Wraps a tracker and feeds it raw protocol lines, the way a transport
//! would after tokenizing.

use slirc_state::{Message, StateTracker, TrackerConfig};

/// A tracker driven by raw lines.
pub struct TestSession {
    pub state: StateTracker,
}

#[allow(dead_code)]
impl TestSession {
    /// Unregistered session with the default config.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        init_tracing();
        Self {
            state: StateTracker::new(config),
        }
    }

    /// Session that has seen `RPL_WELCOME` for `nickname`.
    pub fn registered(nickname: &str) -> Self {
        let mut session = Self::new();
        session.line(&format!(":irc.example 001 {} :Welcome", nickname));
        session
    }

    /// Feed a single line. Panics if it does not tokenize.
    pub fn line(&mut self, line: &str) -> &mut Self {
        let msg = Message::parse(line).unwrap_or_else(|| panic!("unparseable line: {:?}", line));
        self.state.feed(&msg);
        self
    }

    /// Feed several lines in order.
    pub fn lines(&mut self, lines: &[&str]) -> &mut Self {
        for line in lines {
            self.line(line);
        }
        self
    }
}

/// Route tracker logs to the test writer; set `RUST_LOG` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
