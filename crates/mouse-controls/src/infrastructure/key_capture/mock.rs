//! Mock key source for unit testing.
//!
//! Allows tests to inject synthetic key presses without a running Win32
//! message loop or an X server.

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    mpsc::{self, Sender},
    Mutex,
};

use mouse_controls_core::Key;

use super::{CaptureError, KeySource};

/// A mock implementation of [`KeySource`] that lets tests inject presses.
#[derive(Default)]
pub struct MockKeySource {
    sender: Mutex<Option<Sender<Key>>>,
    stop_count: AtomicU32,
    fail_start: AtomicBool,
}

impl MockKeySource {
    /// Creates a new, unstarted mock key source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `start()` calls fail, as if no input backend existed.
    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Injects a key press, as if captured from hardware.
    ///
    /// Returns `false` if the source is not started (or already stopped) and
    /// the press was dropped.
    pub fn inject_key(&self, key: Key) -> bool {
        let guard = self.sender.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(sender) => sender.send(key).is_ok(),
            None => false,
        }
    }

    /// Returns `true` while a subscription is active.
    pub fn is_started(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }

    /// Closes the channel without going through `stop()`, as if the OS hook
    /// had died underneath the subscription.
    pub fn simulate_failure(&self) {
        *self.sender.lock().expect("lock poisoned") = None;
    }

    /// Returns the number of times [`KeySource::stop`] was called.
    pub fn stop_count(&self) -> u32 {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl KeySource for MockKeySource {
    fn start(&self) -> Result<mpsc::Receiver<Key>, CaptureError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(CaptureError::HookInstallFailed("mock failure".into()));
        }
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
