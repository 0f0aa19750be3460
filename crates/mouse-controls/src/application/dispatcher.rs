//! Hotkey dispatcher: connects the key source to the governor.
//!
//! [`Dispatcher::start`] is the blocking entry point of a session. It opens
//! the key subscription, starts the governor's clamp loop on its own thread,
//! then drains key presses on the calling thread until the session ends:
//!
//! - the exit key is pressed,
//! - [`Dispatcher::cancel`] is called (Ctrl-C in the binary), or
//! - the key source dies, which is reported as an error.
//!
//! The cursor is unlocked on every one of these paths before `start`
//! returns.
//!
//! # Cancellation ordering
//!
//! `cancel` stops the governor before it stops the source, and `start`
//! checks the governor after the source is live. Whichever side runs first,
//! the subscription ends and `start` returns promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use mouse_controls_core::Key;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::governor::{Governor, StopReason};
use crate::error::MouseControlError;

/// Error type for key capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to install keyboard hook: {0}")]
    HookInstallFailed(String),
    #[error("a key capture subscription is already active")]
    AlreadyRunning,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// A source of global key-press events.
///
/// The production implementations use OS hooks; tests use
/// [`crate::infrastructure::key_capture::mock::MockKeySource`].
pub trait KeySource: Send + Sync {
    /// Starts the subscription and returns a receiver of key presses.
    fn start(&self) -> Result<mpsc::Receiver<Key>, CaptureError>;

    /// Ends the subscription and releases all OS resources.
    ///
    /// Dropping the sending half closes the receiver. Safe to call from any
    /// thread, more than once, and before `start`.
    fn stop(&self);
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// `start` has not opened the subscription yet.
    Idle,
    /// Listening for hotkeys; the cursor moves freely.
    ListeningUnlocked,
    /// Listening for hotkeys; the cursor is being clamped.
    ListeningLocked,
    /// The session is over. Terminal.
    Stopped,
}

/// Forwards key presses to a [`Governor`] for the lifetime of one session.
pub struct Dispatcher {
    governor: Arc<Governor>,
    source: Arc<dyn KeySource>,
    started: AtomicBool,
    listening: AtomicBool,
}

impl Dispatcher {
    /// Creates an idle dispatcher; nothing is subscribed until [`start`](Self::start).
    pub fn new(governor: Arc<Governor>, source: Arc<dyn KeySource>) -> Self {
        Self {
            governor,
            source,
            started: AtomicBool::new(false),
            listening: AtomicBool::new(false),
        }
    }

    /// The governor this dispatcher drives.
    pub fn governor(&self) -> &Arc<Governor> {
        &self.governor
    }

    /// Derives the current session state from the governor's flags.
    pub fn state(&self) -> ControlState {
        if !self.governor.is_running() {
            ControlState::Stopped
        } else if !self.listening.load(Ordering::SeqCst) {
            ControlState::Idle
        } else if self.governor.is_locked() {
            ControlState::ListeningLocked
        } else {
            ControlState::ListeningUnlocked
        }
    }

    /// Runs the session on the calling thread and blocks until it ends.
    ///
    /// # Errors
    ///
    /// - [`MouseControlError::DeviceUnavailable`] if the key source cannot
    ///   be started, or ends while the governor is still running.
    /// - [`MouseControlError::Spawn`] if the governor thread cannot start.
    /// - [`MouseControlError::GovernorPanicked`] if the clamp loop panicked.
    ///
    /// Calling `start` a second time is a `DeviceUnavailable` error.
    pub fn start(&self) -> Result<StopReason, MouseControlError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRunning.into());
        }

        let rx = self.source.start()?;
        self.listening.store(true, Ordering::SeqCst);

        let keys = self.governor.keys();
        info!("Mouse listener started.");
        info!("Press {} to toggle lock, {} to exit.", keys.toggle, keys.exit);

        // cancel() may have run before the subscription existed.
        if !self.governor.is_running() {
            self.source.stop();
        }

        let handle = match self.governor.spawn() {
            Ok(handle) => handle,
            Err(e) => {
                self.governor.request_exit();
                self.source.stop();
                self.listening.store(false, Ordering::SeqCst);
                return Err(MouseControlError::Spawn(e));
            }
        };

        for key in rx.iter() {
            debug!(%key, "key press");
            self.governor.handle_key_event(key, self.source.as_ref());
            if !self.governor.is_running() {
                break;
            }
        }

        let source_died = self.governor.is_running();
        if source_died {
            warn!("key source ended unexpectedly; releasing the cursor");
            self.governor.request_exit();
        }
        self.source.stop();
        self.listening.store(false, Ordering::SeqCst);

        let reason = handle
            .join()
            .map_err(|_| MouseControlError::GovernorPanicked)?;

        if source_died {
            return Err(MouseControlError::DeviceUnavailable(
                "key source stopped delivering events".to_string(),
            ));
        }

        match reason {
            StopReason::Interrupted => info!("Mouse listener stopped by user."),
            StopReason::ExitRequested => info!("Mouse listener stopped."),
        }
        Ok(reason)
    }

    /// Ends the session from another thread, as on Ctrl-C.
    ///
    /// Unlocks the cursor, stops the governor and closes the subscription.
    /// A blocked [`start`](Self::start) then returns
    /// `Ok(StopReason::Interrupted)`.
    pub fn cancel(&self) {
        self.governor.interrupt();
        self.source.stop();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
