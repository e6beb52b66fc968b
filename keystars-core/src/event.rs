//! Key-transition events as delivered by the input source.
//!
//! Keys are identified by PC virtual-key codes. Two physical keys that share
//! one code (left/right Control, the navigation cluster vs. the numpad) are
//! told apart by the extended (`E0`) flag; the two Shift keys share the
//! generic `SHIFT` code and differ only in their scan code.

/// Virtual-key codes
pub mod vk {
    /// Sentinel: the event carries no usable key.
    pub const NONE: u16 = 0xFF;

    pub const BACK: u16 = 0x08;
    pub const TAB: u16 = 0x09;
    /// Numpad 5 with Num Lock off
    pub const CLEAR: u16 = 0x0C;
    pub const RETURN: u16 = 0x0D;
    /// Generic Shift, see [`super::scan`]
    pub const SHIFT: u16 = 0x10;
    pub const CONTROL: u16 = 0x11;
    /// Alt
    pub const MENU: u16 = 0x12;
    pub const PAUSE: u16 = 0x13;
    /// Caps Lock
    pub const CAPITAL: u16 = 0x14;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    /// Page Up
    pub const PRIOR: u16 = 0x21;
    /// Page Down
    pub const NEXT: u16 = 0x22;
    pub const END: u16 = 0x23;
    pub const HOME: u16 = 0x24;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
    /// Print Screen
    pub const SNAPSHOT: u16 = 0x2C;
    pub const INSERT: u16 = 0x2D;
    pub const DELETE: u16 = 0x2E;
    pub const LWIN: u16 = 0x5B;
    pub const RWIN: u16 = 0x5C;
    /// Context menu key
    pub const APPS: u16 = 0x5D;
    pub const NUMPAD0: u16 = 0x60;
    pub const MULTIPLY: u16 = 0x6A;
    pub const ADD: u16 = 0x6B;
    pub const SUBTRACT: u16 = 0x6D;
    pub const DECIMAL: u16 = 0x6E;
    pub const DIVIDE: u16 = 0x6F;
    pub const F1: u16 = 0x70;
    pub const NUMLOCK: u16 = 0x90;
    /// Scroll Lock
    pub const SCROLL: u16 = 0x91;
    pub const LSHIFT: u16 = 0xA0;
    pub const RSHIFT: u16 = 0xA1;
    /// `;:` on US layouts
    pub const OEM_1: u16 = 0xBA;
    pub const OEM_PLUS: u16 = 0xBB;
    pub const OEM_COMMA: u16 = 0xBC;
    pub const OEM_MINUS: u16 = 0xBD;
    pub const OEM_PERIOD: u16 = 0xBE;
    /// `/?` on US layouts
    pub const OEM_2: u16 = 0xBF;
    /// `` `~ `` on US layouts
    pub const OEM_3: u16 = 0xC0;
    /// `[{` on US layouts
    pub const OEM_4: u16 = 0xDB;
    /// `\|` on US layouts
    pub const OEM_5: u16 = 0xDC;
    /// `]}` on US layouts
    pub const OEM_6: u16 = 0xDD;
    /// `'"` on US layouts
    pub const OEM_7: u16 = 0xDE;

    /// Code of an ASCII letter key (`b'A'..=b'Z'`).
    pub const fn letter(c: u8) -> u16 {
        c.to_ascii_uppercase() as u16
    }

    /// Code of a top-row digit key (0-9).
    pub const fn digit(n: u8) -> u16 {
        0x30 + n as u16
    }

    /// Code of a numpad digit (0-9, Num Lock on).
    pub const fn numpad(n: u8) -> u16 {
        NUMPAD0 + n as u16
    }

    /// Code of a function key (1-24).
    pub const fn function(n: u8) -> u16 {
        F1 + n as u16 - 1
    }
}

/// Event flag bits
pub mod flags {
    /// Key released (break code)
    pub const BREAK: u16 = 0x01;
    /// Extended key (E0 prefix)
    pub const E0: u16 = 0x02;
    /// E1 prefix (Pause)
    pub const E1: u16 = 0x04;
}

/// Set-1 make codes needed to tell the Shift keys apart
pub mod scan {
    pub const LSHIFT: u16 = 0x2A;
    pub const RSHIFT: u16 = 0x36;
}

/// One key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Virtual-key code
    pub key: u16,
    /// Hardware make code
    pub scan_code: u16,
    /// Bits from [`flags`]
    pub flags: u16,
}

impl KeyEvent {
    pub fn new(key: u16, scan_code: u16, flags: u16) -> Self {
        Self {
            key,
            scan_code,
            flags,
        }
    }

    pub fn is_extended(&self) -> bool {
        self.flags & flags::E0 != 0
    }

    pub fn is_break(&self) -> bool {
        self.flags & flags::BREAK != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_helpers() {
        assert_eq!(vk::letter(b'A'), 0x41);
        assert_eq!(vk::letter(b'z'), 0x5A);
        assert_eq!(vk::digit(0), 0x30);
        assert_eq!(vk::numpad(9), 0x69);
        assert_eq!(vk::function(12), 0x7B);
    }

    #[test]
    fn test_flags() {
        let ev = KeyEvent::new(vk::CONTROL, 0x1D, flags::E0 | flags::BREAK);
        assert!(ev.is_extended());
        assert!(ev.is_break());
        assert!(!KeyEvent::new(vk::CONTROL, 0x1D, 0).is_extended());
    }
}
