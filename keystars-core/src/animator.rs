//! Starfield animation: random star spawning and periodic fade passes.

use rand::Rng;

use crate::color::{
    is_background, is_new_star, random_aged_color, random_initial_color, step_toward, BACKGROUND,
};
use crate::grid::KeyGrid;

/// Default tick period of the main loop.
pub const DEFAULT_TICK_MS: u32 = 50;
/// Default rate of randomly spawned stars.
pub const DEFAULT_STARS_PER_SECOND: u32 = 5;
/// Default rate of fade passes.
pub const DEFAULT_FADES_PER_SECOND: u32 = 10;

/// Per-tick spawn probability and fade cadence, derived from wall-clock rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarfieldTiming {
    /// Chance (percent, 0-100) of spawning one star on a tick.
    pub star_chance: u32,
    /// Ticks between fade passes (at least 1).
    pub fade_period: u32,
}

impl StarfieldTiming {
    /// Derive timing with integer arithmetic from the tick period and target rates.
    ///
    /// `tick_ms` is clamped to 1..=1000 and `fades_per_second` to at least 1.
    pub fn from_rates(tick_ms: u32, stars_per_second: u32, fades_per_second: u32) -> Self {
        let polls_per_second = 1000 / tick_ms.clamp(1, 1000);
        let star_chance = (100u32.saturating_mul(stars_per_second) / polls_per_second).min(100);
        let fade_period = (polls_per_second / fades_per_second.max(1)).max(1);
        Self {
            star_chance,
            fade_period,
        }
    }
}

impl Default for StarfieldTiming {
    fn default() -> Self {
        Self::from_rates(
            DEFAULT_TICK_MS,
            DEFAULT_STARS_PER_SECOND,
            DEFAULT_FADES_PER_SECOND,
        )
    }
}

/// What one animator step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// A fade pass ran on this tick.
    pub faded: bool,
    /// Slot that received a new random star, if any.
    pub spawned: Option<usize>,
}

/// Per-tick state transition of the starfield.
#[derive(Debug, Clone)]
pub struct Animator {
    timing: StarfieldTiming,
    fade_countdown: u32,
}

impl Animator {
    /// A zero `fade_period` is treated as 1 (fade on every tick).
    pub fn new(timing: StarfieldTiming) -> Self {
        let timing = StarfieldTiming {
            fade_period: timing.fade_period.max(1),
            ..timing
        };
        Self {
            timing,
            fade_countdown: timing.fade_period,
        }
    }

    pub fn timing(&self) -> StarfieldTiming {
        self.timing
    }

    pub fn fade_countdown(&self) -> u32 {
        self.fade_countdown
    }

    /// Make the next [`step`](Self::step) run a fade pass.
    pub fn force_fade(&mut self) {
        self.fade_countdown = 0;
    }

    /// Advance one tick.
    ///
    /// On a fade tick every new star is demoted to a random aged color and
    /// every other non-background slot takes one [`step_toward`] the
    /// background. Then, with `star_chance` percent probability, one uniformly
    /// chosen slot is overwritten with a new star.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &mut KeyGrid, rng: &mut R) -> StepReport {
        let mut report = StepReport::default();

        if self.fade_countdown == 0 {
            fade_pass(grid, rng);
            self.fade_countdown = self.timing.fade_period;
            report.faded = true;
        }
        self.fade_countdown -= 1;

        if rng.random_range(0..100) < self.timing.star_chance {
            let index = rng.random_range(0..grid.len());
            grid.slots_mut()[index] = random_initial_color(rng);
            report.spawned = Some(index);
        }

        report
    }
}

fn fade_pass<R: Rng + ?Sized>(grid: &mut KeyGrid, rng: &mut R) {
    for slot in grid.slots_mut() {
        if is_new_star(*slot) {
            *slot = random_aged_color(rng);
        } else if !is_background(*slot) {
            *slot = step_toward(*slot, BACKGROUND);
        }
    }
}
