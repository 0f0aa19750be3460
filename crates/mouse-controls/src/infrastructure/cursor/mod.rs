//! Platform cursor accessors.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`:
//!
//! - Windows: `GetCursorPos` / `SetCursorPos`.
//! - Linux: Xlib `XQueryPointer` / `XWarpPointer`, behind the `x11` cargo
//!   feature.
//!
//! A [`mock::MockCursor`] is always available for tests.

use std::sync::Arc;

use crate::application::governor::{CursorAccessor, CursorError};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub mod x11;

/// Opens the cursor accessor for the current platform.
///
/// # Errors
///
/// Returns [`CursorError::Unavailable`] when there is no display backend
/// (no X display, headless session, or a build without platform support).
pub fn platform_cursor() -> Result<Arc<dyn CursorAccessor>, CursorError> {
    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::WindowsCursor::new()?))
    }

    #[cfg(all(target_os = "linux", feature = "x11"))]
    {
        Ok(Arc::new(x11::X11Cursor::open()?))
    }

    #[cfg(not(any(target_os = "windows", all(target_os = "linux", feature = "x11"))))]
    {
        Err(CursorError::Unavailable(unsupported_platform_hint().to_string()))
    }
}

#[cfg(not(any(target_os = "windows", all(target_os = "linux", feature = "x11"))))]
fn unsupported_platform_hint() -> &'static str {
    if cfg!(target_os = "linux") {
        "this build has no X11 support; rebuild with `--features x11`"
    } else {
        "no cursor backend for this platform"
    }
}
