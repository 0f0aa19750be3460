//! Windows Virtual Key (VK) code to [`Key`] translation table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! Low-level keyboard hooks report side-specific modifier codes
//! (`VK_LCONTROL`/`VK_RCONTROL` rather than the generic `VK_CONTROL`), which
//! is what lets `ctrl_r` be bound without also firing on the left Control
//! key. The generic codes are mapped to the left-hand key so that
//! synthesised input still resolves.

use super::Key;

/// Translates a Windows Virtual Key code to a [`Key`].
///
/// Returns `None` for codes with no binding (mouse buttons, media keys, OEM
/// punctuation).
pub fn vk_to_key(vk: u8) -> Option<Key> {
    VK_TO_KEY_TABLE[vk as usize]
}

/// VK → Key mapping indexed by VK code (0x00–0xFF).
const VK_TO_KEY_TABLE: [Option<Key>; 256] = {
    use Key::*;
    let mut t: [Option<Key>; 256] = [None; 256];

    // ── Modifiers (left/right specific, as reported by WH_KEYBOARD_LL) ────────
    t[0xA2] = Some(CtrlLeft); // VK_LCONTROL
    t[0xA3] = Some(CtrlRight); // VK_RCONTROL
    t[0xA0] = Some(ShiftLeft); // VK_LSHIFT
    t[0xA1] = Some(ShiftRight); // VK_RSHIFT
    t[0xA4] = Some(AltLeft); // VK_LMENU
    t[0xA5] = Some(AltRight); // VK_RMENU
    t[0x5B] = Some(CmdLeft); // VK_LWIN
    t[0x5C] = Some(CmdRight); // VK_RWIN

    // ── Editing and navigation ────────────────────────────────────────────────
    t[0x1B] = Some(Esc); // VK_ESCAPE
    t[0x09] = Some(Tab); // VK_TAB
    t[0x14] = Some(CapsLock); // VK_CAPITAL
    t[0x20] = Some(Space); // VK_SPACE
    t[0x0D] = Some(Enter); // VK_RETURN
    t[0x08] = Some(Backspace); // VK_BACK
    t[0x2D] = Some(Insert); // VK_INSERT
    t[0x2E] = Some(Delete); // VK_DELETE
    t[0x24] = Some(Home); // VK_HOME
    t[0x23] = Some(End); // VK_END
    t[0x21] = Some(PageUp); // VK_PRIOR
    t[0x22] = Some(PageDown); // VK_NEXT
    t[0x25] = Some(Left); // VK_LEFT
    t[0x26] = Some(Up); // VK_UP
    t[0x27] = Some(Right); // VK_RIGHT
    t[0x28] = Some(Down); // VK_DOWN

    // ── System and lock keys ──────────────────────────────────────────────────
    t[0x2C] = Some(PrintScreen); // VK_SNAPSHOT
    t[0x91] = Some(ScrollLock); // VK_SCROLL
    t[0x13] = Some(Pause); // VK_PAUSE
    t[0x90] = Some(NumLock); // VK_NUMLOCK
    t[0x5D] = Some(Menu); // VK_APPS

    // ── Function keys (VK_F1=0x70 … VK_F12=0x7B) ──────────────────────────────
    t[0x70] = Some(F1); // VK_F1
    t[0x71] = Some(F2); // VK_F2
    t[0x72] = Some(F3); // VK_F3
    t[0x73] = Some(F4); // VK_F4
    t[0x74] = Some(F5); // VK_F5
    t[0x75] = Some(F6); // VK_F6
    t[0x76] = Some(F7); // VK_F7
    t[0x77] = Some(F8); // VK_F8
    t[0x78] = Some(F9); // VK_F9
    t[0x79] = Some(F10); // VK_F10
    t[0x7A] = Some(F11); // VK_F11
    t[0x7B] = Some(F12); // VK_F12

    // ── Letters (VK_A=0x41 … VK_Z=0x5A) ───────────────────────────────────────
    t[0x41] = Some(A);
    t[0x42] = Some(B);
    t[0x43] = Some(C);
    t[0x44] = Some(D);
    t[0x45] = Some(E);
    t[0x46] = Some(F);
    t[0x47] = Some(G);
    t[0x48] = Some(H);
    t[0x49] = Some(I);
    t[0x4A] = Some(J);
    t[0x4B] = Some(K);
    t[0x4C] = Some(L);
    t[0x4D] = Some(M);
    t[0x4E] = Some(N);
    t[0x4F] = Some(O);
    t[0x50] = Some(P);
    t[0x51] = Some(Q);
    t[0x52] = Some(R);
    t[0x53] = Some(S);
    t[0x54] = Some(T);
    t[0x55] = Some(U);
    t[0x56] = Some(V);
    t[0x57] = Some(W);
    t[0x58] = Some(X);
    t[0x59] = Some(Y);
    t[0x5A] = Some(Z);

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ─────────────────────────────────────
    t[0x30] = Some(Num0);
    t[0x31] = Some(Num1);
    t[0x32] = Some(Num2);
    t[0x33] = Some(Num3);
    t[0x34] = Some(Num4);
    t[0x35] = Some(Num5);
    t[0x36] = Some(Num6);
    t[0x37] = Some(Num7);
    t[0x38] = Some(Num8);
    t[0x39] = Some(Num9);

    // ── Generic modifier codes (synthesised input) ──────────────────────────
    t[0x10] = Some(ShiftLeft); // VK_SHIFT
    t[0x11] = Some(CtrlLeft); // VK_CONTROL
    t[0x12] = Some(AltLeft); // VK_MENU

    t
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_control_and_end_map_to_default_hotkeys() {
        assert_eq!(vk_to_key(0xA3), Some(Key::CtrlRight));
        assert_eq!(vk_to_key(0x23), Some(Key::End));
    }

    #[test]
    fn test_left_and_right_control_are_distinct() {
        assert_ne!(vk_to_key(0xA2), vk_to_key(0xA3));
    }

    #[test]
    fn test_generic_control_maps_to_left_control() {
        assert_eq!(vk_to_key(0x11), Some(Key::CtrlLeft));
    }

    #[test]
    fn test_every_key_is_reachable_from_some_vk_code() {
        for &key in Key::ALL {
            assert!(
                (0..=u8::MAX).any(|vk| vk_to_key(vk) == Some(key)),
                "{key} has no VK code"
            );
        }
    }

    #[test]
    fn test_letters_and_digits_follow_ascii_layout() {
        assert_eq!(vk_to_key(b'A'), Some(Key::A));
        assert_eq!(vk_to_key(b'Z'), Some(Key::Z));
        assert_eq!(vk_to_key(b'0'), Some(Key::Num0));
        assert_eq!(vk_to_key(b'9'), Some(Key::Num9));
    }

    #[test]
    fn test_mouse_button_codes_are_unmapped() {
        // VK_LBUTTON, VK_RBUTTON, VK_MBUTTON
        assert_eq!(vk_to_key(0x01), None);
        assert_eq!(vk_to_key(0x02), None);
        assert_eq!(vk_to_key(0x04), None);
    }
}
