//! Key identifiers for the toggle and exit hotkeys.
//!
//! [`Key`] is the platform-independent identifier the dispatcher compares
//! incoming key presses against. Platform adapters translate their native
//! codes into a `Key` at the capture boundary:
//!
//! - Windows low-level hooks report virtual-key codes ([`windows_vk`]).
//! - X11 reports keycodes that resolve to keysyms ([`linux_x11`]).
//!
//! # Key names
//!
//! Configuration files name keys in `snake_case` (`ctrl_r`, `end`,
//! `scroll_lock`, `f9`, `a`, `7`). Parsing is case-insensitive and accepts a
//! few common aliases (`escape`, `return`, `ctrl_right`). [`fmt::Display`]
//! always prints the canonical name, so a parsed key written back to a
//! config file reads the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod linux_x11;
pub mod windows_vk;

/// Error returned when a key name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name {0:?}")]
pub struct KeyParseError(pub String);

/// A keyboard key that can be bound to a control action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    // Modifiers
    /// Left Control.
    CtrlLeft,
    /// Right Control.
    CtrlRight,
    ShiftLeft,
    ShiftRight,
    AltLeft,
    /// Right Alt (AltGr on many layouts).
    AltRight,
    /// Left Windows / Super / Command key.
    CmdLeft,
    CmdRight,

    // Editing and navigation
    Esc,
    Tab,
    CapsLock,
    Space,
    Enter,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,

    // System and lock keys
    PrintScreen,
    ScrollLock,
    Pause,
    NumLock,
    /// Context menu key.
    Menu,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Digit row
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
}

/// Alternative spellings accepted by [`Key::from_str`].
const ALIASES: &[(&str, Key)] = &[
    ("escape", Key::Esc),
    ("return", Key::Enter),
    ("ctrl", Key::CtrlLeft),
    ("ctrl_left", Key::CtrlLeft),
    ("ctrl_right", Key::CtrlRight),
    ("shift", Key::ShiftLeft),
    ("alt", Key::AltLeft),
    ("alt_gr", Key::AltRight),
    ("cmd", Key::CmdLeft),
    ("super", Key::CmdLeft),
    ("win", Key::CmdLeft),
    ("del", Key::Delete),
    ("pgup", Key::PageUp),
    ("pgdn", Key::PageDown),
    ("scrlk", Key::ScrollLock),
];

impl Key {
    /// Every key, in declaration order.
    pub const ALL: &'static [Key] = &[
        Key::CtrlLeft,
        Key::CtrlRight,
        Key::ShiftLeft,
        Key::ShiftRight,
        Key::AltLeft,
        Key::AltRight,
        Key::CmdLeft,
        Key::CmdRight,
        Key::Esc,
        Key::Tab,
        Key::CapsLock,
        Key::Space,
        Key::Enter,
        Key::Backspace,
        Key::Insert,
        Key::Delete,
        Key::Home,
        Key::End,
        Key::PageUp,
        Key::PageDown,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::PrintScreen,
        Key::ScrollLock,
        Key::Pause,
        Key::NumLock,
        Key::Menu,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];

    /// Returns the canonical configuration name of the key.
    pub fn name(self) -> &'static str {
        match self {
            Key::CtrlLeft => "ctrl_l",
            Key::CtrlRight => "ctrl_r",
            Key::ShiftLeft => "shift_l",
            Key::ShiftRight => "shift_r",
            Key::AltLeft => "alt_l",
            Key::AltRight => "alt_r",
            Key::CmdLeft => "cmd_l",
            Key::CmdRight => "cmd_r",
            Key::Esc => "esc",
            Key::Tab => "tab",
            Key::CapsLock => "caps_lock",
            Key::Space => "space",
            Key::Enter => "enter",
            Key::Backspace => "backspace",
            Key::Insert => "insert",
            Key::Delete => "delete",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "page_up",
            Key::PageDown => "page_down",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::PrintScreen => "print_screen",
            Key::ScrollLock => "scroll_lock",
            Key::Pause => "pause",
            Key::NumLock => "num_lock",
            Key::Menu => "menu",
            Key::F1 => "f1",
            Key::F2 => "f2",
            Key::F3 => "f3",
            Key::F4 => "f4",
            Key::F5 => "f5",
            Key::F6 => "f6",
            Key::F7 => "f7",
            Key::F8 => "f8",
            Key::F9 => "f9",
            Key::F10 => "f10",
            Key::F11 => "f11",
            Key::F12 => "f12",
            Key::A => "a",
            Key::B => "b",
            Key::C => "c",
            Key::D => "d",
            Key::E => "e",
            Key::F => "f",
            Key::G => "g",
            Key::H => "h",
            Key::I => "i",
            Key::J => "j",
            Key::K => "k",
            Key::L => "l",
            Key::M => "m",
            Key::N => "n",
            Key::O => "o",
            Key::P => "p",
            Key::Q => "q",
            Key::R => "r",
            Key::S => "s",
            Key::T => "t",
            Key::U => "u",
            Key::V => "v",
            Key::W => "w",
            Key::X => "x",
            Key::Y => "y",
            Key::Z => "z",
            Key::Num0 => "0",
            Key::Num1 => "1",
            Key::Num2 => "2",
            Key::Num3 => "3",
            Key::Num4 => "4",
            Key::Num5 => "5",
            Key::Num6 => "6",
            Key::Num7 => "7",
            Key::Num8 => "8",
            Key::Num9 => "9",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if let Some(key) = Key::ALL.iter().copied().find(|k| k.name() == wanted) {
            return Ok(key);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, key)| *key)
            .ok_or_else(|| KeyParseError(s.to_string()))
    }
}

impl TryFrom<String> for Key {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name().to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
