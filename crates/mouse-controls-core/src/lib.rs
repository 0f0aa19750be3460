//! # mouse-controls-core
//!
//! Shared, OS-independent building blocks for the `mouse-controls` cursor
//! confinement tool.
//!
//! - **`domain`** – The bounding region the cursor is held inside, the
//!   buffer margin that shrinks it, and the clamp operation itself.
//!
//! - **`keymap`** – The [`Key`] identifiers used for the toggle and exit
//!   hotkeys, their user-facing names, and the translation tables from
//!   platform key codes (Windows virtual keys, X11 keysyms).
//!
//! Nothing in this crate talks to the OS, so every rule here can be tested
//! on any machine.

pub mod domain;
pub mod keymap;

pub use domain::region::{BoundingRegion, ClampRegion, Interval, RegionError};
pub use keymap::{Key, KeyParseError};
