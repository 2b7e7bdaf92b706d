//! Host bridge: the two observable side-effect channels.
//!
//! The evaluator never talks to the outside world directly; `msg` goes
//! through [`Host::emit`] and `popup` through [`Host::notify`]. The driver
//! also reports script-unit failures on the emit channel with a fixed
//! `[LS ERROR]` prefix.

use std::cell::RefCell;

/// Output and notification capabilities provided by the embedding host.
pub trait Host {
    /// Line-oriented diagnostic output (`msg`).
    fn emit(&self, line: &str);

    /// Modal, dismiss-on-acknowledge notification surface (`popup`).
    ///
    /// The surface is created lazily on first use and reused; subsequent
    /// notifications replace its displayed text rather than creating a new
    /// surface instance.
    fn notify(&self, text: &str);
}

/// Console host: `emit` on stdout, `notify` on stderr.
///
/// A terminal has no modal surface, so the notification channel degrades to
/// a prefixed stderr line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn emit(&self, line: &str) {
        println!("{}", line);
    }

    fn notify(&self, text: &str) {
        eprintln!("[notice] {}", text);
    }
}

/// Recording host for tests: captures both channels in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    emitted: RefCell<Vec<String>>,
    notices: RefCell<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<String> {
        self.emitted.borrow().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn emit(&self, line: &str) {
        self.emitted.borrow_mut().push(line.to_string());
    }

    fn notify(&self, text: &str) {
        // Reused surface: only the latest text would be visible, but tests
        // want the full history.
        self.notices.borrow_mut().push(text.to_string());
    }
}
