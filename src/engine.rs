//! The tick loop: animate, light pressed keys, push the frame, wait.
//!
//! The engine is the only writer of the key grid. Input arrives through a
//! [`KeySource`] queue that is drained once per tick, so the animator and
//! the keymap dispatcher never touch the grid at the same time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use keystars_core::{
    dispatch, Animator, GridError, KeyGrid, Keymap, StepReport, BACKGROUND,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace, warn};

use crate::config::StarfieldConfig;
use crate::input::KeySource;
use crate::sink::{LightingSink, SinkError};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub step: StepReport,
    /// Events drained from the input queue
    pub events: usize,
    /// Events that lit a key
    pub painted: usize,
    /// The sink accepted the frame
    pub pushed: bool,
}

/// Starfield state: grid, animator, keymap and the process-wide RNG.
pub struct Engine {
    grid: KeyGrid,
    animator: Animator,
    keymap: Keymap,
    rng: StdRng,
}

impl Engine {
    pub fn new(config: &StarfieldConfig) -> Result<Self, GridError> {
        let grid = KeyGrid::new(config.grid_width, config.grid_height, BACKGROUND)?;
        let keymap = Keymap::for_grid(&grid);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            grid,
            animator: Animator::new(config.timing()),
            keymap,
            rng,
        })
    }

    pub fn grid(&self) -> &KeyGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut KeyGrid {
        &mut self.grid
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// Reset the grid to the background and bring up the device.
    ///
    /// Waits `init_delay` after `init()` before the first frame, then sets
    /// the auxiliary lights to the background color.
    pub async fn start(
        &mut self,
        sink: &mut dyn LightingSink,
        init_delay: Duration,
    ) -> Result<(), SinkError> {
        self.grid.fill(BACKGROUND);
        sink.init()?;
        if !init_delay.is_zero() {
            tokio::time::sleep(init_delay).await;
        }
        sink.push_frame(&self.grid.to_argb())?;
        let (r, g, b) = BACKGROUND.to_percent();
        sink.set_lighting_percent(r, g, b)?;
        Ok(())
    }

    /// Run one tick: animator step, drain and dispatch input, push the frame.
    ///
    /// A failed push is logged and otherwise ignored; the next tick sends a
    /// full frame again.
    pub fn tick<S: KeySource + ?Sized>(
        &mut self,
        source: &mut S,
        sink: &mut dyn LightingSink,
    ) -> TickReport {
        let mut report = TickReport {
            step: self.animator.step(&mut self.grid, &mut self.rng),
            ..Default::default()
        };

        while let Some(event) = source.try_next() {
            report.events += 1;
            if dispatch(&self.keymap, &mut self.grid, &event, &mut self.rng).is_some() {
                report.painted += 1;
            }
        }

        match sink.push_frame(&self.grid.to_argb()) {
            Ok(()) => report.pushed = true,
            Err(e) => warn!("LED write error: {e}"),
        }

        if report.events > 0 || report.step.spawned.is_some() {
            trace!(
                "tick: {} events ({} lit), spawned {:?}, faded {}",
                report.events,
                report.painted,
                report.step.spawned,
                report.step.faded
            );
        }
        report
    }
}

/// Drive the engine at a fixed period until `running` is cleared.
///
/// Returns the number of ticks run. The sink is shut down on exit.
pub async fn run<S: KeySource + ?Sized>(
    engine: &mut Engine,
    source: &mut S,
    sink: &mut dyn LightingSink,
    tick: Duration,
    init_delay: Duration,
    running: &AtomicBool,
) -> Result<u64, SinkError> {
    if let Err(e) = engine.start(sink, init_delay).await {
        sink.shutdown();
        return Err(e);
    }

    let timing = engine.animator.timing();
    info!(
        "Running: {}ms ticks, {}% star chance per tick, fade every {} ticks",
        tick.as_millis(),
        timing.star_chance,
        timing.fade_period
    );

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = 0u64;

    while running.load(Ordering::SeqCst) {
        interval.tick().await;
        engine.tick(source, sink);
        ticks += 1;
    }

    info!("Stopping after {ticks} ticks");
    sink.shutdown();
    Ok(ticks)
}
