//! Per-key star colors: classification, random star colors and the fade step.
//!
//! Colors are packed `0xAARRGGBB` values on the wire. The alpha byte is a
//! visibility flag for the lighting device; everything this crate produces
//! is fully visible.

use rand::Rng;

/// Background the whole keyboard fades back to: RGB(0, 15, 70).
pub const BACKGROUND: Color = Color::from_argb(0xFF00_0F46);

/// Green strictly above this marks a freshly spawned star.
pub const NEW_STAR_THRESHOLD: u8 = 0xBA;
/// Green range of a freshly spawned star (bright yellow-orange), max exclusive.
pub const NEW_STAR_MIN_GREEN: u8 = 0xBB;
pub const NEW_STAR_MAX_GREEN: u8 = 0xFF;
/// Green range a new star snaps to on its first fade pass (dim orange).
pub const AGED_STAR_MIN_GREEN: u8 = 0x77;
pub const AGED_STAR_MAX_GREEN: u8 = 0xAA;

/// Channels within this distance of the target no longer move.
pub const FADE_DEAD_ZONE: u8 = 3;

/// A per-key color with a visibility byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    /// Unpack from `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub const fn is_visible(self) -> bool {
        self.a != 0
    }

    /// Channel intensities as 0-100 percentages, rounded to nearest.
    ///
    /// This is the unit the auxiliary indicator lights are driven in.
    pub fn to_percent(self) -> (u8, u8, u8) {
        let pct = |c: u8| ((c as u16 * 100 + 127) / 255) as u8;
        (pct(self.r), pct(self.g), pct(self.b))
    }

    /// Full red star with the given green intensity.
    const fn star(green: u8) -> Self {
        Self::new(0xFF, green, 0)
    }
}

/// True for a star that has not been through a fade pass yet.
pub fn is_new_star(c: Color) -> bool {
    c.g > NEW_STAR_THRESHOLD
}

/// Exact match against [`BACKGROUND`], no tolerance.
pub fn is_background(c: Color) -> bool {
    c == BACKGROUND
}

/// A bright, freshly spawned star.
pub fn random_initial_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::star(rng.random_range(NEW_STAR_MIN_GREEN..NEW_STAR_MAX_GREEN))
}

/// The dimmer color a new star is demoted to on its first fade pass.
pub fn random_aged_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::star(rng.random_range(AGED_STAR_MIN_GREEN..AGED_STAR_MAX_GREEN))
}

/// One fade step from `current` toward `target`, per channel.
///
/// Step size grows with the logarithm of the remaining distance, so fades
/// start fast and slow down as they converge. Blue uses a double logarithm
/// and trails behind red and green. A channel within [`FADE_DEAD_ZONE`] of
/// its target stays where it is; such a color is a fixed point and never
/// lands exactly on the target.
pub fn step_toward(current: Color, target: Color) -> Color {
    Color {
        a: 0xFF,
        r: step_channel(current.r, target.r, log_step),
        g: step_channel(current.g, target.g, log_step),
        b: step_channel(current.b, target.b, double_log_step),
    }
}

fn step_channel(current: u8, target: u8, step_size: fn(u8) -> u8) -> u8 {
    let distance = current.abs_diff(target);
    if distance <= FADE_DEAD_ZONE {
        return current;
    }
    // step_size(d) <= d for every d > FADE_DEAD_ZONE, so this never overshoots
    let step = step_size(distance);
    if target > current {
        current + step
    } else {
        current - step
    }
}

fn log_step(distance: u8) -> u8 {
    f64::from(distance).log2().floor() as u8 + 1
}

fn double_log_step(distance: u8) -> u8 {
    f64::from(distance).log2().ln().floor() as u8 + 1
}
