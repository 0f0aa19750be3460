//! [`Key`] to X11 KeySym translation table.
//!
//! Reference: `X11/keysymdef.h`.
//!
//! X11 reports *keycodes* (server-specific hardware codes). The server maps
//! each keycode to one or more *KeySyms*. The capture adapter grabs keys by
//! asking the server for the keycode of a KeySym (`XKeysymToKeycode`) and,
//! when a press arrives, resolves the keycode back to its unshifted KeySym
//! before calling [`keysym_to_key`].

use super::Key;

/// Returns the X11 KeySym for `key`.
///
/// Every [`Key`] has a KeySym, so this never fails.
pub fn key_to_keysym(key: Key) -> u32 {
    match key {
        Key::CtrlLeft => 0xffe3, // XK_Control_L
        Key::CtrlRight => 0xffe4, // XK_Control_R
        Key::ShiftLeft => 0xffe1, // XK_Shift_L
        Key::ShiftRight => 0xffe2, // XK_Shift_R
        Key::AltLeft => 0xffe9, // XK_Alt_L
        Key::AltRight => 0xffea, // XK_Alt_R
        Key::CmdLeft => 0xffeb, // XK_Super_L
        Key::CmdRight => 0xffec, // XK_Super_R
        Key::Esc => 0xff1b, // XK_Escape
        Key::Tab => 0xff09, // XK_Tab
        Key::CapsLock => 0xffe5, // XK_Caps_Lock
        Key::Space => 0x0020, // XK_space
        Key::Enter => 0xff0d, // XK_Return
        Key::Backspace => 0xff08, // XK_BackSpace
        Key::Insert => 0xff63, // XK_Insert
        Key::Delete => 0xffff, // XK_Delete
        Key::Home => 0xff50, // XK_Home
        Key::End => 0xff57, // XK_End
        Key::PageUp => 0xff55, // XK_Prior
        Key::PageDown => 0xff56, // XK_Next
        Key::Left => 0xff51, // XK_Left
        Key::Up => 0xff52, // XK_Up
        Key::Right => 0xff53, // XK_Right
        Key::Down => 0xff54, // XK_Down
        Key::PrintScreen => 0xff61, // XK_Print
        Key::ScrollLock => 0xff14, // XK_Scroll_Lock
        Key::Pause => 0xff13, // XK_Pause
        Key::NumLock => 0xff7f, // XK_Num_Lock
        Key::Menu => 0xff67, // XK_Menu
        Key::F1 => 0xffbe, // XK_F1
        Key::F2 => 0xffbf, // XK_F2
        Key::F3 => 0xffc0, // XK_F3
        Key::F4 => 0xffc1, // XK_F4
        Key::F5 => 0xffc2, // XK_F5
        Key::F6 => 0xffc3, // XK_F6
        Key::F7 => 0xffc4, // XK_F7
        Key::F8 => 0xffc5, // XK_F8
        Key::F9 => 0xffc6, // XK_F9
        Key::F10 => 0xffc7, // XK_F10
        Key::F11 => 0xffc8, // XK_F11
        Key::F12 => 0xffc9, // XK_F12
        // Letters use the lowercase keysyms XK_a … XK_z.
        Key::A => 0x0061,
        Key::B => 0x0062,
        Key::C => 0x0063,
        Key::D => 0x0064,
        Key::E => 0x0065,
        Key::F => 0x0066,
        Key::G => 0x0067,
        Key::H => 0x0068,
        Key::I => 0x0069,
        Key::J => 0x006a,
        Key::K => 0x006b,
        Key::L => 0x006c,
        Key::M => 0x006d,
        Key::N => 0x006e,
        Key::O => 0x006f,
        Key::P => 0x0070,
        Key::Q => 0x0071,
        Key::R => 0x0072,
        Key::S => 0x0073,
        Key::T => 0x0074,
        Key::U => 0x0075,
        Key::V => 0x0076,
        Key::W => 0x0077,
        Key::X => 0x0078,
        Key::Y => 0x0079,
        Key::Z => 0x007a,
        // Digits share their ASCII values: XK_0 … XK_9.
        Key::Num0 => 0x0030,
        Key::Num1 => 0x0031,
        Key::Num2 => 0x0032,
        Key::Num3 => 0x0033,
        Key::Num4 => 0x0034,
        Key::Num5 => 0x0035,
        Key::Num6 => 0x0036,
        Key::Num7 => 0x0037,
        Key::Num8 => 0x0038,
        Key::Num9 => 0x0039,
    }
}

/// Translates an X11 KeySym to a [`Key`].
///
/// Uppercase letter KeySyms (`XK_A` … `XK_Z`) resolve to the same key as the
/// lowercase ones. Returns `None` for KeySyms with no binding.
pub fn keysym_to_key(keysym: u32) -> Option<Key> {
    let keysym = match keysym {
        // XK_A … XK_Z → XK_a … XK_z
        0x0041..=0x005a => keysym + 0x20,
        other => other,
    };
    Key::ALL
        .iter()
        .copied()
        .find(|&key| key_to_keysym(key) == keysym)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
