//! Virtual-key → grid position table for the 21×6 per-key layout.
//!
//! The static [`BINDINGS`] table is turned into a [`Keymap`] once at startup,
//! resolving `(row, col)` against the actual grid.

use std::collections::HashMap;

use tracing::debug;

use crate::event::vk;
use crate::grid::KeyGrid;

/// Which extended-flag state a binding answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ext {
    /// Extended flag ignored
    Any,
    /// Only without the E0 flag
    Plain,
    /// Only with the E0 flag
    Extended,
}

/// One table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: u16,
    pub ext: Ext,
    pub row: u8,
    pub col: u8,
    /// Short key legend (3 chars max)
    pub label: &'static str,
}

const fn any(key: u16, row: u8, col: u8, label: &'static str) -> Binding {
    Binding {
        key,
        ext: Ext::Any,
        row,
        col,
        label,
    }
}

const fn plain(key: u16, row: u8, col: u8, label: &'static str) -> Binding {
    Binding {
        key,
        ext: Ext::Plain,
        row,
        col,
        label,
    }
}

const fn ext(key: u16, row: u8, col: u8, label: &'static str) -> Binding {
    Binding {
        key,
        ext: Ext::Extended,
        row,
        col,
        label,
    }
}

/// Every key the effect lights up.
///
/// Navigation keys without E0 come from the numpad with Num Lock off, so the
/// plain variant lands on the numpad position.
#[rustfmt::skip]
pub static BINDINGS: &[Binding] = &[
    // Row 0: Esc, F-keys, PrtSc, ScrLk, Pause
    any(vk::ESCAPE, 0, 0, "Esc"),
    any(vk::function(1), 0, 1, "F1"),
    any(vk::function(2), 0, 2, "F2"),
    any(vk::function(3), 0, 3, "F3"),
    any(vk::function(4), 0, 4, "F4"),
    any(vk::function(5), 0, 5, "F5"),
    any(vk::function(6), 0, 6, "F6"),
    any(vk::function(7), 0, 7, "F7"),
    any(vk::function(8), 0, 8, "F8"),
    any(vk::function(9), 0, 9, "F9"),
    any(vk::function(10), 0, 10, "F10"),
    any(vk::function(11), 0, 11, "F11"),
    any(vk::function(12), 0, 12, "F12"),
    any(vk::SNAPSHOT, 0, 13, "Prt"),
    any(vk::SCROLL, 0, 14, "Scr"),
    any(vk::PAUSE, 0, 15, "Pau"),

    // Row 1: number row
    any(vk::OEM_3, 1, 0, "`"),
    any(vk::digit(1), 1, 1, "1"),
    any(vk::digit(2), 1, 2, "2"),
    any(vk::digit(3), 1, 3, "3"),
    any(vk::digit(4), 1, 4, "4"),
    any(vk::digit(5), 1, 5, "5"),
    any(vk::digit(6), 1, 6, "6"),
    any(vk::digit(7), 1, 7, "7"),
    any(vk::digit(8), 1, 8, "8"),
    any(vk::digit(9), 1, 9, "9"),
    any(vk::digit(0), 1, 10, "0"),
    any(vk::OEM_MINUS, 1, 11, "-"),
    any(vk::OEM_PLUS, 1, 12, "="),
    any(vk::BACK, 1, 13, "Bks"),
    ext(vk::INSERT, 1, 14, "Ins"),
    ext(vk::HOME, 1, 15, "Hom"),
    ext(vk::PRIOR, 1, 16, "PgU"),
    any(vk::NUMLOCK, 1, 17, "Num"),
    any(vk::DIVIDE, 1, 18, "/"),
    any(vk::MULTIPLY, 1, 19, "*"),
    any(vk::SUBTRACT, 1, 20, "-"),

    // Row 2: Tab row
    any(vk::TAB, 2, 0, "Tab"),
    any(vk::letter(b'Q'), 2, 1, "Q"),
    any(vk::letter(b'W'), 2, 2, "W"),
    any(vk::letter(b'E'), 2, 3, "E"),
    any(vk::letter(b'R'), 2, 4, "R"),
    any(vk::letter(b'T'), 2, 5, "T"),
    any(vk::letter(b'Y'), 2, 6, "Y"),
    any(vk::letter(b'U'), 2, 7, "U"),
    any(vk::letter(b'I'), 2, 8, "I"),
    any(vk::letter(b'O'), 2, 9, "O"),
    any(vk::letter(b'P'), 2, 10, "P"),
    any(vk::OEM_4, 2, 11, "["),
    any(vk::OEM_6, 2, 12, "]"),
    any(vk::OEM_5, 2, 13, "\\"),
    ext(vk::DELETE, 2, 14, "Del"),
    ext(vk::END, 2, 15, "End"),
    ext(vk::NEXT, 2, 16, "PgD"),
    any(vk::numpad(7), 2, 17, "7"),
    plain(vk::HOME, 2, 17, "7"),
    any(vk::numpad(8), 2, 18, "8"),
    plain(vk::UP, 2, 18, "8"),
    any(vk::numpad(9), 2, 19, "9"),
    plain(vk::PRIOR, 2, 19, "9"),
    any(vk::ADD, 2, 20, "+"),

    // Row 3: Caps row
    any(vk::CAPITAL, 3, 0, "Cap"),
    any(vk::letter(b'A'), 3, 1, "A"),
    any(vk::letter(b'S'), 3, 2, "S"),
    any(vk::letter(b'D'), 3, 3, "D"),
    any(vk::letter(b'F'), 3, 4, "F"),
    any(vk::letter(b'G'), 3, 5, "G"),
    any(vk::letter(b'H'), 3, 6, "H"),
    any(vk::letter(b'J'), 3, 7, "J"),
    any(vk::letter(b'K'), 3, 8, "K"),
    any(vk::letter(b'L'), 3, 9, "L"),
    any(vk::OEM_1, 3, 10, ";"),
    any(vk::OEM_7, 3, 11, "'"),
    plain(vk::RETURN, 3, 13, "Ent"),
    any(vk::numpad(4), 3, 17, "4"),
    plain(vk::LEFT, 3, 17, "4"),
    any(vk::numpad(5), 3, 18, "5"),
    any(vk::CLEAR, 3, 18, "5"),
    any(vk::numpad(6), 3, 19, "6"),
    plain(vk::RIGHT, 3, 19, "6"),

    // Row 4: Shift row
    any(vk::LSHIFT, 4, 0, "Sft"),
    any(vk::letter(b'Z'), 4, 2, "Z"),
    any(vk::letter(b'X'), 4, 3, "X"),
    any(vk::letter(b'C'), 4, 4, "C"),
    any(vk::letter(b'V'), 4, 5, "V"),
    any(vk::letter(b'B'), 4, 6, "B"),
    any(vk::letter(b'N'), 4, 7, "N"),
    any(vk::letter(b'M'), 4, 8, "M"),
    any(vk::OEM_COMMA, 4, 9, ","),
    any(vk::OEM_PERIOD, 4, 10, "."),
    any(vk::OEM_2, 4, 11, "/"),
    any(vk::RSHIFT, 4, 13, "Sft"),
    ext(vk::UP, 4, 15, "Up"),
    any(vk::numpad(1), 4, 17, "1"),
    plain(vk::END, 4, 17, "1"),
    any(vk::numpad(2), 4, 18, "2"),
    plain(vk::DOWN, 4, 18, "2"),
    any(vk::numpad(3), 4, 19, "3"),
    plain(vk::NEXT, 4, 19, "3"),
    ext(vk::RETURN, 4, 20, "Ent"),

    // Row 5: bottom row
    plain(vk::CONTROL, 5, 0, "Ctl"),
    any(vk::LWIN, 5, 1, "Win"),
    plain(vk::MENU, 5, 2, "Alt"),
    any(vk::SPACE, 5, 5, "Spc"),
    ext(vk::MENU, 5, 11, "Alt"),
    any(vk::RWIN, 5, 12, "Win"),
    any(vk::APPS, 5, 13, "Mnu"),
    ext(vk::CONTROL, 5, 14, "Ctl"),
    ext(vk::LEFT, 5, 15, "Lft"),
    ext(vk::DOWN, 5, 16, "Dwn"),
    ext(vk::RIGHT, 5, 17, "Rgt"),
    any(vk::numpad(0), 5, 18, "0"),
    plain(vk::INSERT, 5, 18, "0"),
    any(vk::DECIMAL, 5, 19, "."),
    plain(vk::DELETE, 5, 19, "."),
];

/// Resolved lookup from `(virtual key, extended)` to grid slot.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    slots: HashMap<(u16, bool), usize>,
    labels: Vec<Option<&'static str>>,
}

impl Keymap {
    /// Build the map for `grid` from [`BINDINGS`].
    pub fn for_grid(grid: &KeyGrid) -> Self {
        Self::from_bindings(BINDINGS, grid)
    }

    /// Build from an arbitrary table. Entries outside the grid are skipped.
    pub fn from_bindings(bindings: &[Binding], grid: &KeyGrid) -> Self {
        let mut map = Self {
            slots: HashMap::with_capacity(bindings.len() * 2),
            labels: vec![None; grid.len()],
        };

        for binding in bindings {
            let Some(index) = grid.index(binding.row as usize, binding.col as usize) else {
                debug!(
                    "Dropping binding {} (0x{:02X}) at {},{}: outside {}x{} grid",
                    binding.label,
                    binding.key,
                    binding.row,
                    binding.col,
                    grid.width(),
                    grid.height()
                );
                continue;
            };

            match binding.ext {
                Ext::Any => {
                    map.slots.insert((binding.key, false), index);
                    map.slots.insert((binding.key, true), index);
                }
                Ext::Plain => {
                    map.slots.insert((binding.key, false), index);
                }
                Ext::Extended => {
                    map.slots.insert((binding.key, true), index);
                }
            }
            map.labels[index].get_or_insert(binding.label);
        }

        map
    }

    /// Slot for a virtual key, or `None` if the key is not mapped.
    pub fn lookup(&self, key: u16, extended: bool) -> Option<usize> {
        self.slots.get(&(key, extended)).copied()
    }

    /// Key legend per slot (for previews); `None` for slots without a key.
    pub fn labels(&self) -> &[Option<&'static str>] {
        &self.labels
    }

    /// Number of `(key, extended)` combinations that resolve to a slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BACKGROUND;
    use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use std::collections::HashSet;

    fn default_map() -> Keymap {
        let grid = KeyGrid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, BACKGROUND).unwrap();
        Keymap::for_grid(&grid)
    }

    #[test]
    fn test_no_conflicting_bindings() {
        let mut seen = HashSet::new();
        for b in BINDINGS {
            let variants: &[bool] = match b.ext {
                Ext::Any => &[false, true],
                Ext::Plain => &[false],
                Ext::Extended => &[true],
            };
            for &e in variants {
                assert!(seen.insert((b.key, e)), "duplicate binding for 0x{:02X}", b.key);
            }
        }
    }

    #[test]
    fn test_default_grid_resolves_every_binding() {
        let expected: usize = BINDINGS
            .iter()
            .map(|b| if b.ext == Ext::Any { 2 } else { 1 })
            .sum();
        let map = default_map();
        assert!(!map.is_empty());
        assert_eq!(map.len(), expected);
    }

    #[test]
    fn test_all_bindings_fit_default_grid() {
        for b in BINDINGS {
            assert!((b.row as usize) < DEFAULT_HEIGHT && (b.col as usize) < DEFAULT_WIDTH);
        }
    }

    #[test]
    fn test_letters_and_digits() {
        let map = default_map();
        assert_eq!(map.lookup(vk::letter(b'A'), false), Some(3 * 21 + 1));
        assert_eq!(map.lookup(vk::letter(b'A'), true), Some(3 * 21 + 1));
        assert_eq!(map.lookup(vk::letter(b'Z'), false), Some(4 * 21 + 2));
        assert_eq!(map.lookup(vk::digit(0), false), Some(21 + 10));
        for c in b'A'..=b'Z' {
            assert!(map.lookup(vk::letter(c), false).is_some(), "{}", c as char);
        }
    }

    #[test]
    fn test_extended_variants() {
        let map = default_map();
        // Control: left vs right
        assert_eq!(map.lookup(vk::CONTROL, false), Some(5 * 21));
        assert_eq!(map.lookup(vk::CONTROL, true), Some(5 * 21 + 14));
        // Enter: main vs numpad
        assert_eq!(map.lookup(vk::RETURN, false), Some(3 * 21 + 13));
        assert_eq!(map.lookup(vk::RETURN, true), Some(4 * 21 + 20));
        // Home: navigation cluster vs numpad 7
        assert_eq!(map.lookup(vk::HOME, true), Some(21 + 15));
        assert_eq!(map.lookup(vk::HOME, false), map.lookup(vk::numpad(7), false));
    }

    #[test]
    fn test_unmapped_keys() {
        let map = default_map();
        assert_eq!(map.lookup(vk::NONE, false), None);
        assert_eq!(map.lookup(vk::SHIFT, false), None);
        assert_eq!(map.lookup(vk::function(13), false), None);
    }

    #[test]
    fn test_small_grid_drops_bindings() {
        let grid = KeyGrid::new(3, 2, BACKGROUND).unwrap();
        let map = Keymap::for_grid(&grid);
        assert_eq!(map.lookup(vk::ESCAPE, false), Some(0));
        assert_eq!(map.lookup(vk::letter(b'A'), false), None);
        assert!(map.len() < default_map().len());
        assert_eq!(map.labels().len(), 6);
        assert_eq!(map.labels()[0], Some("Esc"));
    }
}
