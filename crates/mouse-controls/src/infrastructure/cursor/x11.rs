//! X11 cursor accessor via Xlib.
//!
//! Reads the pointer with `XQueryPointer` on the default root window and
//! moves it with `XWarpPointer`. Coordinates are root-window pixels, which
//! span every monitor of the X screen.
//!
//! # Threading
//!
//! Xlib connections are not thread-safe unless `XInitThreads` was called.
//! This accessor opens its own connection and serialises every call through
//! a mutex, so it never shares a `Display` with another thread at the same
//! time.

#![cfg(all(target_os = "linux", feature = "x11"))]

use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::sync::Mutex;

use x11::xlib;

use crate::application::governor::{CursorAccessor, CursorError};

/// Owned Xlib connection.
struct DisplayHandle(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning mutex is
// held, so at most one thread uses the connection at a time.
unsafe impl Send for DisplayHandle {}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        // SAFETY: the pointer came from XOpenDisplay and is closed exactly once.
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// Xlib implementation of [`CursorAccessor`].
pub struct X11Cursor {
    display: Mutex<DisplayHandle>,
    root: xlib::Window,
}

impl X11Cursor {
    /// Connects to the display named by `$DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Unavailable`] if the X server cannot be reached.
    pub fn open() -> Result<Self, CursorError> {
        // SAFETY: a null name makes Xlib use $DISPLAY.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(CursorError::Unavailable(
                "cannot open X display (is $DISPLAY set?)".to_string(),
            ));
        }
        // SAFETY: display is a live connection.
        let root = unsafe { xlib::XDefaultRootWindow(display) };
        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
            root,
        })
    }
}

impl CursorAccessor for X11Cursor {
    fn position(&self) -> Result<(i32, i32), CursorError> {
        let display = self
            .display
            .lock()
            .map_err(|_| CursorError::Read("display lock poisoned".to_string()))?;

        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let (mut root_x, mut root_y): (c_int, c_int) = (0, 0);
        let (mut win_x, mut win_y): (c_int, c_int) = (0, 0);
        let mut mask: c_uint = 0;

        // SAFETY: all out-pointers refer to live stack locals.
        let same_screen = unsafe {
            xlib::XQueryPointer(
                display.0,
                self.root,
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };
        if same_screen == xlib::False {
            return Err(CursorError::Read(
                "pointer is on a different X screen".to_string(),
            ));
        }
        Ok((root_x, root_y))
    }

    fn set_position(&self, x: i32, y: i32) -> Result<(), CursorError> {
        let display = self
            .display
            .lock()
            .map_err(|_| CursorError::Write("display lock poisoned".to_string()))?;

        // SAFETY: display is a live connection; a zero source window means
        // "move unconditionally", and the destination is the root window.
        unsafe {
            xlib::XWarpPointer(display.0, 0, self.root, 0, 0, 0, 0, x, y);
            xlib::XFlush(display.0);
        }
        Ok(())
    }
}
