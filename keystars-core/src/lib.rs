//! Starfield lighting model for per-key RGB keyboards
//!
//! Pure state and rules, no I/O:
//!
//! - `color`: star color classification, random star colors, fade step
//! - `grid`: the fixed-size per-key color canvas
//! - `animator`: random spawning and periodic fade passes
//! - `event` / `keymap` / `dispatch`: lighting the key that was pressed

pub mod animator;
pub mod color;
pub mod dispatch;
pub mod event;
pub mod grid;
pub mod keymap;

pub use animator::{Animator, StarfieldTiming, StepReport};
pub use color::{Color, BACKGROUND};
pub use dispatch::{dispatch, resolve};
pub use event::KeyEvent;
pub use grid::{GridError, KeyGrid};
pub use keymap::Keymap;
