//! Lighting device sinks.
//!
//! A sink receives the whole key grid once per tick as packed `0xAARRGGBB`
//! values in row-major order, plus a one-off percentage color for the
//! auxiliary indicator lights.

pub mod terminal;

pub use terminal::TerminalSink;

use thiserror::Error;

/// Errors from a lighting sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame has {actual} slots, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("Sink not initialized")]
    NotInitialized,
}

/// Something that can display a key grid.
pub trait LightingSink {
    /// Prepare the device. Called once before any other method.
    fn init(&mut self) -> Result<(), SinkError>;

    /// Set the lights outside the per-key grid (0-100 per channel).
    fn set_lighting_percent(&mut self, r: u8, g: u8, b: u8) -> Result<(), SinkError>;

    /// Display one full frame.
    fn push_frame(&mut self, frame: &[u32]) -> Result<(), SinkError>;

    /// Release the device. Best effort.
    fn shutdown(&mut self) {}
}

/// Accepts and discards everything.
#[derive(Debug, Default)]
pub struct NullSink {
    frames: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl LightingSink for NullSink {
    fn init(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn set_lighting_percent(&mut self, _r: u8, _g: u8, _b: u8) -> Result<(), SinkError> {
        Ok(())
    }

    fn push_frame(&mut self, _frame: &[u32]) -> Result<(), SinkError> {
        self.frames += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        tracing::debug!("Null sink received {} frames", self.frames);
    }
}
