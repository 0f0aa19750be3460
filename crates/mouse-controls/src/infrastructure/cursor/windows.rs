//! Windows cursor accessor via `GetCursorPos` / `SetCursorPos`.
//!
//! Coordinates are virtual-screen pixels, so monitors left of or above the
//! primary one have negative coordinates. The bounding region in the config
//! uses the same space.
//!
//! # Safety
//!
//! `unsafe` is used only for the two Win32 calls, each on a stack `POINT`
//! or plain integers.

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::application::governor::{CursorAccessor, CursorError};

/// Windows implementation of [`CursorAccessor`].
pub struct WindowsCursor;

impl WindowsCursor {
    /// Creates the accessor after checking that the cursor can be read.
    ///
    /// `GetCursorPos` fails on a locked workstation or when the process runs
    /// without an interactive desktop (e.g. as a service).
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Unavailable`] if the probe read fails.
    pub fn new() -> Result<Self, CursorError> {
        let accessor = Self;
        accessor
            .position()
            .map_err(|e| CursorError::Unavailable(e.to_string()))?;
        Ok(accessor)
    }
}

impl CursorAccessor for WindowsCursor {
    fn position(&self) -> Result<(i32, i32), CursorError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT on the stack.
        unsafe { GetCursorPos(&mut point) }.map_err(|e| CursorError::Read(e.to_string()))?;
        Ok((point.x, point.y))
    }

    fn set_position(&self, x: i32, y: i32) -> Result<(), CursorError> {
        // SAFETY: SetCursorPos takes plain integers and has no pointer arguments.
        unsafe { SetCursorPos(x, y) }.map_err(|e| CursorError::Write(e.to_string()))
    }
}
