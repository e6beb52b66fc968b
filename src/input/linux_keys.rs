//! Linux evdev key codes → PC virtual-key events.
//!
//! Reproduces what PC raw input reports for each physical key: the
//! virtual-key code, the set-1 make code, and the E0 flag for extended keys.
//! Modifiers use the generic Shift/Control/Alt codes; left and right differ
//! only by scan code (Shift) or E0 (Control, Alt). The numpad is reported
//! with Num Lock on, since evdev does not track lock state.

use evdev::Key;
use keystars_core::event::{flags, scan, vk};
use keystars_core::KeyEvent;

/// evdev key values
mod value {
    pub const RELEASE: i32 = 0;
    pub const PRESS: i32 = 1;
    pub const REPEAT: i32 = 2;
}

/// Translate one evdev key event. Autorepeat counts as a press.
///
/// Returns `None` for keys without a virtual-key equivalent and for
/// unknown event values.
pub fn key_event(key: Key, value: i32) -> Option<KeyEvent> {
    let transition = match value {
        value::RELEASE => flags::BREAK,
        value::PRESS | value::REPEAT => 0,
        _ => return None,
    };
    let (vk, scan_code, ext) = translate(key)?;
    Some(KeyEvent::new(vk, scan_code, ext | transition))
}

/// `(virtual key, make code, extended flags)` for a physical key.
pub fn translate(key: Key) -> Option<(u16, u16, u16)> {
    // Non-extended keys: the evdev code is the set-1 make code
    let plain = |vk: u16| Some((vk, key.code(), 0));
    let ext = |vk: u16, make: u16| Some((vk, make, flags::E0));

    match key {
        Key::KEY_ESC => plain(vk::ESCAPE),
        Key::KEY_1 => plain(vk::digit(1)),
        Key::KEY_2 => plain(vk::digit(2)),
        Key::KEY_3 => plain(vk::digit(3)),
        Key::KEY_4 => plain(vk::digit(4)),
        Key::KEY_5 => plain(vk::digit(5)),
        Key::KEY_6 => plain(vk::digit(6)),
        Key::KEY_7 => plain(vk::digit(7)),
        Key::KEY_8 => plain(vk::digit(8)),
        Key::KEY_9 => plain(vk::digit(9)),
        Key::KEY_0 => plain(vk::digit(0)),
        Key::KEY_MINUS => plain(vk::OEM_MINUS),
        Key::KEY_EQUAL => plain(vk::OEM_PLUS),
        Key::KEY_BACKSPACE => plain(vk::BACK),
        Key::KEY_TAB => plain(vk::TAB),
        Key::KEY_Q => plain(vk::letter(b'Q')),
        Key::KEY_W => plain(vk::letter(b'W')),
        Key::KEY_E => plain(vk::letter(b'E')),
        Key::KEY_R => plain(vk::letter(b'R')),
        Key::KEY_T => plain(vk::letter(b'T')),
        Key::KEY_Y => plain(vk::letter(b'Y')),
        Key::KEY_U => plain(vk::letter(b'U')),
        Key::KEY_I => plain(vk::letter(b'I')),
        Key::KEY_O => plain(vk::letter(b'O')),
        Key::KEY_P => plain(vk::letter(b'P')),
        Key::KEY_LEFTBRACE => plain(vk::OEM_4),
        Key::KEY_RIGHTBRACE => plain(vk::OEM_6),
        Key::KEY_ENTER => plain(vk::RETURN),
        Key::KEY_LEFTCTRL => plain(vk::CONTROL),
        Key::KEY_A => plain(vk::letter(b'A')),
        Key::KEY_S => plain(vk::letter(b'S')),
        Key::KEY_D => plain(vk::letter(b'D')),
        Key::KEY_F => plain(vk::letter(b'F')),
        Key::KEY_G => plain(vk::letter(b'G')),
        Key::KEY_H => plain(vk::letter(b'H')),
        Key::KEY_J => plain(vk::letter(b'J')),
        Key::KEY_K => plain(vk::letter(b'K')),
        Key::KEY_L => plain(vk::letter(b'L')),
        Key::KEY_SEMICOLON => plain(vk::OEM_1),
        Key::KEY_APOSTROPHE => plain(vk::OEM_7),
        Key::KEY_GRAVE => plain(vk::OEM_3),
        Key::KEY_LEFTSHIFT => Some((vk::SHIFT, scan::LSHIFT, 0)),
        Key::KEY_BACKSLASH => plain(vk::OEM_5),
        Key::KEY_Z => plain(vk::letter(b'Z')),
        Key::KEY_X => plain(vk::letter(b'X')),
        Key::KEY_C => plain(vk::letter(b'C')),
        Key::KEY_V => plain(vk::letter(b'V')),
        Key::KEY_B => plain(vk::letter(b'B')),
        Key::KEY_N => plain(vk::letter(b'N')),
        Key::KEY_M => plain(vk::letter(b'M')),
        Key::KEY_COMMA => plain(vk::OEM_COMMA),
        Key::KEY_DOT => plain(vk::OEM_PERIOD),
        Key::KEY_SLASH => plain(vk::OEM_2),
        Key::KEY_RIGHTSHIFT => Some((vk::SHIFT, scan::RSHIFT, 0)),
        Key::KEY_KPASTERISK => plain(vk::MULTIPLY),
        Key::KEY_LEFTALT => plain(vk::MENU),
        Key::KEY_SPACE => plain(vk::SPACE),
        Key::KEY_CAPSLOCK => plain(vk::CAPITAL),
        Key::KEY_F1 => plain(vk::function(1)),
        Key::KEY_F2 => plain(vk::function(2)),
        Key::KEY_F3 => plain(vk::function(3)),
        Key::KEY_F4 => plain(vk::function(4)),
        Key::KEY_F5 => plain(vk::function(5)),
        Key::KEY_F6 => plain(vk::function(6)),
        Key::KEY_F7 => plain(vk::function(7)),
        Key::KEY_F8 => plain(vk::function(8)),
        Key::KEY_F9 => plain(vk::function(9)),
        Key::KEY_F10 => plain(vk::function(10)),
        Key::KEY_NUMLOCK => plain(vk::NUMLOCK),
        Key::KEY_SCROLLLOCK => plain(vk::SCROLL),
        Key::KEY_KP7 => plain(vk::numpad(7)),
        Key::KEY_KP8 => plain(vk::numpad(8)),
        Key::KEY_KP9 => plain(vk::numpad(9)),
        Key::KEY_KPMINUS => plain(vk::SUBTRACT),
        Key::KEY_KP4 => plain(vk::numpad(4)),
        Key::KEY_KP5 => plain(vk::numpad(5)),
        Key::KEY_KP6 => plain(vk::numpad(6)),
        Key::KEY_KPPLUS => plain(vk::ADD),
        Key::KEY_KP1 => plain(vk::numpad(1)),
        Key::KEY_KP2 => plain(vk::numpad(2)),
        Key::KEY_KP3 => plain(vk::numpad(3)),
        Key::KEY_KP0 => plain(vk::numpad(0)),
        Key::KEY_KPDOT => plain(vk::DECIMAL),
        Key::KEY_F11 => plain(vk::function(11)),
        Key::KEY_F12 => plain(vk::function(12)),
        Key::KEY_PAUSE => Some((vk::PAUSE, 0x1D, flags::E1)),

        // E0-prefixed keys
        Key::KEY_KPENTER => ext(vk::RETURN, 0x1C),
        Key::KEY_RIGHTCTRL => ext(vk::CONTROL, 0x1D),
        Key::KEY_KPSLASH => ext(vk::DIVIDE, 0x35),
        Key::KEY_SYSRQ => ext(vk::SNAPSHOT, 0x37),
        Key::KEY_RIGHTALT => ext(vk::MENU, 0x38),
        Key::KEY_HOME => ext(vk::HOME, 0x47),
        Key::KEY_UP => ext(vk::UP, 0x48),
        Key::KEY_PAGEUP => ext(vk::PRIOR, 0x49),
        Key::KEY_LEFT => ext(vk::LEFT, 0x4B),
        Key::KEY_RIGHT => ext(vk::RIGHT, 0x4D),
        Key::KEY_END => ext(vk::END, 0x4F),
        Key::KEY_DOWN => ext(vk::DOWN, 0x50),
        Key::KEY_PAGEDOWN => ext(vk::NEXT, 0x51),
        Key::KEY_INSERT => ext(vk::INSERT, 0x52),
        Key::KEY_DELETE => ext(vk::DELETE, 0x53),
        Key::KEY_LEFTMETA => ext(vk::LWIN, 0x5B),
        Key::KEY_RIGHTMETA => ext(vk::RWIN, 0x5C),
        Key::KEY_COMPOSE => ext(vk::APPS, 0x5D),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys_use_evdev_code_as_make_code() {
        assert_eq!(
            translate(Key::KEY_A),
            Some((vk::letter(b'A'), 0x1E, 0))
        );
        assert_eq!(translate(Key::KEY_ESC), Some((vk::ESCAPE, 0x01, 0)));
        assert_eq!(translate(Key::KEY_F12), Some((vk::function(12), 0x58, 0)));
    }

    #[test]
    fn test_modifier_sides() {
        assert_eq!(translate(Key::KEY_LEFTCTRL), Some((vk::CONTROL, 0x1D, 0)));
        assert_eq!(
            translate(Key::KEY_RIGHTCTRL),
            Some((vk::CONTROL, 0x1D, flags::E0))
        );
        assert_eq!(translate(Key::KEY_LEFTSHIFT), Some((vk::SHIFT, 0x2A, 0)));
        assert_eq!(translate(Key::KEY_RIGHTSHIFT), Some((vk::SHIFT, 0x36, 0)));
    }

    #[test]
    fn test_transitions() {
        let press = key_event(Key::KEY_HOME, 1).unwrap();
        assert!(press.is_extended() && !press.is_break());
        let repeat = key_event(Key::KEY_HOME, 2).unwrap();
        assert_eq!(repeat, press);
        let release = key_event(Key::KEY_HOME, 0).unwrap();
        assert!(release.is_extended() && release.is_break());
        assert_eq!(key_event(Key::KEY_HOME, 7), None);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        assert_eq!(translate(Key::KEY_VOLUMEUP), None);
        assert_eq!(key_event(Key::BTN_LEFT, 1), None);
    }
}
