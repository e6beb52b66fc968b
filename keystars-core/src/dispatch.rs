//! Keystroke dispatch: paint a fresh star on the key that was pressed.

use rand::Rng;

use crate::color::random_initial_color;
use crate::event::{scan, vk, KeyEvent};
use crate::grid::KeyGrid;
use crate::keymap::Keymap;

/// Map a generic Shift to the left/right code using its scan code.
///
/// Non-Shift keys pass through. Returns `None` for a Shift whose scan code
/// belongs to neither side.
fn disambiguate_shift(event: &KeyEvent) -> Option<u16> {
    if event.key != vk::SHIFT {
        return Some(event.key);
    }
    match event.scan_code {
        scan::LSHIFT => Some(vk::LSHIFT),
        scan::RSHIFT => Some(vk::RSHIFT),
        _ => None,
    }
}

/// Grid slot an event refers to, without touching the grid.
pub fn resolve(keymap: &Keymap, event: &KeyEvent) -> Option<usize> {
    if event.key == vk::NONE {
        return None;
    }
    let key = disambiguate_shift(event)?;
    keymap.lookup(key, event.is_extended())
}

/// Paint a new star on the slot for `event`.
///
/// Returns the painted slot; unmapped keys and the "no data" sentinel are
/// ignored and leave the grid untouched. Press and release both light the key.
pub fn dispatch<R: Rng + ?Sized>(
    keymap: &Keymap,
    grid: &mut KeyGrid,
    event: &KeyEvent,
    rng: &mut R,
) -> Option<usize> {
    let index = resolve(keymap, event)?;
    grid.paint(index, random_initial_color(rng)).ok()?;
    Some(index)
}
