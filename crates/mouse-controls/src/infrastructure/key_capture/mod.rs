//! Global key-press capture.
//!
//! On Windows this installs a low-level keyboard hook (`WH_KEYBOARD_LL`) on a
//! dedicated Win32 message-loop thread. On Linux/X11 it grabs the two trigger
//! keys on the root window and services the grab from a polling thread.
//! Either way, presses are delivered through an `mpsc` channel and consumed
//! by the dispatcher.
//!
//! # Stopping
//!
//! [`KeySource::stop`] ends the subscription and drops the sending half of
//! the channel, so a consumer blocked in `recv()` wakes up with a
//! disconnection. `stop` may be called from any thread and more than once.
//!
//! # Testability
//!
//! [`KeySource`] is defined by the application layer; tests inject synthetic
//! presses through [`mock::MockKeySource`] without any OS hooks.

use std::sync::Arc;

pub use crate::application::dispatcher::{CaptureError, KeySource};
use crate::application::governor::TriggerKeys;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub mod x11;

/// Opens the key source for the current platform.
///
/// `keys` are the trigger keys. Sources that grab keys individually (X11)
/// only grab these; hook-based sources (Windows) see every key and leave the
/// filtering to the governor.
///
/// # Errors
///
/// Returns [`CaptureError::UnsupportedPlatform`] when this build has no key
/// capture backend.
#[allow(unused_variables)]
pub fn platform_key_source(keys: TriggerKeys) -> Result<Arc<dyn KeySource>, CaptureError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::WindowsKeySource::new()))
    }

    #[cfg(all(target_os = "linux", feature = "x11"))]
    {
        Ok(Arc::new(x11::X11KeySource::new(vec![keys.toggle, keys.exit])))
    }

    #[cfg(not(any(target_os = "windows", all(target_os = "linux", feature = "x11"))))]
    {
        let hint = if cfg!(target_os = "linux") {
            "this build has no X11 support; rebuild with `--features x11`"
        } else {
            "no global keyboard hook for this platform"
        };
        Err(CaptureError::UnsupportedPlatform(hint.to_string()))
    }
}
