//! Infrastructure layer.
//!
//! Contains OS-facing adapters: cursor access, global key capture, and
//! file-system configuration storage.

pub mod cursor;
pub mod key_capture;
pub mod storage;
