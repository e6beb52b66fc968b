//! Keystars: a starfield lighting effect for per-key RGB keyboards
//!
//! Random keys light up as bright stars and fade back to a dark blue
//! background; every key you press lights up as a new star.

pub mod cli;
pub mod config;
pub mod engine;
pub mod input;
pub mod sink;

pub use config::{ConfigError, SinkKind, StarfieldConfig};
pub use engine::{run, Engine, TickReport};
pub use input::{ChannelSource, InputError, KeySender, KeySource};
pub use sink::{LightingSink, NullSink, SinkError, TerminalSink};
