//! Drives the engine the way the binary does, with a queued key source and
//! a sink that records what it was sent.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use keystars::engine::{self, Engine};
use keystars::sink::{LightingSink, SinkError};
use keystars::StarfieldConfig;
use keystars_core::color::{is_new_star, Color, BACKGROUND};
use keystars_core::event::{flags, vk};
use keystars_core::KeyEvent;

#[derive(Default)]
struct RecordingSink {
    initialized: bool,
    shut_down: bool,
    percent: Option<(u8, u8, u8)>,
    frames: Vec<Vec<u32>>,
    fail_pushes: bool,
}

impl LightingSink for RecordingSink {
    fn init(&mut self) -> Result<(), SinkError> {
        self.initialized = true;
        Ok(())
    }

    fn set_lighting_percent(&mut self, r: u8, g: u8, b: u8) -> Result<(), SinkError> {
        self.percent = Some((r, g, b));
        Ok(())
    }

    fn push_frame(&mut self, frame: &[u32]) -> Result<(), SinkError> {
        if self.fail_pushes {
            return Err(SinkError::NotInitialized);
        }
        self.frames.push(frame.to_vec());
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

fn config(stars_per_second: u32) -> StarfieldConfig {
    StarfieldConfig {
        stars_per_second,
        init_delay_ms: 0,
        seed: Some(1234),
        ..Default::default()
    }
}

fn no_input() -> VecDeque<KeyEvent> {
    VecDeque::new()
}

fn painted_slots(engine: &Engine) -> Vec<usize> {
    engine
        .grid()
        .slots()
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != BACKGROUND)
        .map(|(i, _)| i)
        .collect()
}

#[tokio::test]
async fn test_start_shows_background_and_indicators() {
    let mut engine = Engine::new(&config(0)).unwrap();
    let mut sink = RecordingSink::default();
    engine.start(&mut sink, Duration::ZERO).await.unwrap();

    assert!(sink.initialized);
    assert_eq!(sink.percent, Some((0, 6, 27)));
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].len(), 21 * 6);
    assert!(sink.frames[0].iter().all(|&c| c == 0xFF00_0F46));
}

#[test]
fn test_single_slot_fade_pass_demotes_new_star() {
    let cfg = StarfieldConfig {
        grid_width: 1,
        grid_height: 1,
        ..config(0)
    };
    let mut engine = Engine::new(&cfg).unwrap();
    let mut sink = RecordingSink::default();
    engine
        .grid_mut()
        .paint(0, Color::new(0xFF, 0xF0, 0x00))
        .unwrap();
    engine.animator_mut().force_fade();

    let report = engine.tick(&mut no_input(), &mut sink);
    assert!(report.step.faded);

    let slot = engine.grid().get(0).unwrap();
    assert!(!is_new_star(slot));
    assert!((0x77..0xAA).contains(&slot.g));
    assert_eq!(sink.frames, vec![vec![slot.to_argb()]]);
}

#[test]
fn test_left_and_right_control_light_different_keys() {
    let mut sink = RecordingSink::default();

    let mut left = Engine::new(&config(0)).unwrap();
    let mut queue = VecDeque::from(vec![KeyEvent::new(vk::CONTROL, 0x1D, 0)]);
    left.tick(&mut queue, &mut sink);

    let mut right = Engine::new(&config(0)).unwrap();
    let mut queue = VecDeque::from(vec![KeyEvent::new(vk::CONTROL, 0x1D, flags::E0)]);
    right.tick(&mut queue, &mut sink);

    let (l, r) = (painted_slots(&left), painted_slots(&right));
    assert_eq!(l.len(), 1);
    assert_eq!(r.len(), 1);
    assert_ne!(l, r);
}

#[test]
fn test_sentinel_leaves_grid_unchanged() {
    let mut engine = Engine::new(&config(0)).unwrap();
    let mut sink = RecordingSink::default();
    let before = engine.grid().clone();

    let mut queue = VecDeque::from(vec![KeyEvent::new(vk::NONE, 0, 0)]);
    let report = engine.tick(&mut queue, &mut sink);

    assert_eq!(report.events, 1);
    assert_eq!(report.painted, 0);
    assert_eq!(engine.grid(), &before);
}

#[test]
fn test_key_press_and_release_both_light() {
    let mut engine = Engine::new(&config(0)).unwrap();
    let mut sink = RecordingSink::default();
    let mut queue = VecDeque::from(vec![
        KeyEvent::new(vk::letter(b'Q'), 0x10, 0),
        KeyEvent::new(vk::letter(b'Q'), 0x10, flags::BREAK),
    ]);
    let report = engine.tick(&mut queue, &mut sink);
    assert_eq!(report.painted, 2);
    assert_eq!(painted_slots(&engine), vec![2 * 21 + 1]);
}

#[test]
fn test_frames_stay_visible() {
    let cfg = StarfieldConfig {
        stars_per_second: 20,
        ..config(0)
    };
    let mut engine = Engine::new(&cfg).unwrap();
    let mut sink = RecordingSink::default();
    let mut spawned = 0;

    for i in 0..400u16 {
        let mut queue = VecDeque::new();
        if i % 7 == 0 {
            queue.push_back(KeyEvent::new(vk::SPACE, 0x39, 0));
        }
        let report = engine.tick(&mut queue, &mut sink);
        spawned += usize::from(report.step.spawned.is_some());
    }

    assert_eq!(sink.frames.len(), 400);
    assert!(spawned > 0);
    for frame in &sink.frames {
        assert!(frame.iter().all(|&c| Color::from_argb(c).is_visible()));
    }
}

#[test]
fn test_failed_push_does_not_stop_ticking() {
    let mut engine = Engine::new(&config(0)).unwrap();
    let mut sink = RecordingSink {
        fail_pushes: true,
        ..Default::default()
    };
    let mut queue = VecDeque::from(vec![KeyEvent::new(vk::letter(b'Z'), 0x2C, 0)]);

    let report = engine.tick(&mut queue, &mut sink);
    assert!(!report.pushed);
    assert_eq!(report.painted, 1);

    sink.fail_pushes = false;
    assert!(engine.tick(&mut no_input(), &mut sink).pushed);
}

#[test]
fn test_same_seed_same_animation() {
    let run = || {
        let mut engine = Engine::new(&config(10)).unwrap();
        let mut sink = RecordingSink::default();
        for _ in 0..50 {
            engine.tick(&mut no_input(), &mut sink);
        }
        sink.frames
    };
    assert_eq!(run(), run());
}

#[tokio::test]
async fn test_run_stops_when_flag_cleared() {
    let mut engine = Engine::new(&config(5)).unwrap();
    let mut sink = RecordingSink::default();
    let running = AtomicBool::new(false);

    let ticks = engine::run(
        &mut engine,
        &mut no_input(),
        &mut sink,
        Duration::from_millis(1),
        Duration::ZERO,
        &running,
    )
    .await
    .unwrap();

    assert_eq!(ticks, 0);
    assert!(sink.initialized);
    assert!(sink.shut_down);
    assert_eq!(sink.frames.len(), 1);
}
