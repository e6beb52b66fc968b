//! Keystroke input sources.
//!
//! Events are produced asynchronously (one reader task per keyboard device)
//! and buffered in a bounded queue. The tick loop drains the queue without
//! blocking at the start of every tick.

pub mod devices;
pub mod linux_keys;

use std::collections::VecDeque;
use std::path::PathBuf;

use keystars_core::KeyEvent;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

/// Events buffered between two ticks before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 256;

/// Errors from opening input devices
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No keyboard input devices found (check read access to /dev/input/event*)")]
    NoKeyboards,

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not report keyboard keys")]
    NotAKeyboard { path: PathBuf },
}

/// Non-blocking supply of key events.
pub trait KeySource {
    /// Next pending event, or `None` when nothing is queued right now.
    fn try_next(&mut self) -> Option<KeyEvent>;
}

impl KeySource for VecDeque<KeyEvent> {
    fn try_next(&mut self) -> Option<KeyEvent> {
        self.pop_front()
    }
}

/// Producer half of the event queue; cheap to clone per device.
#[derive(Debug, Clone)]
pub struct KeySender {
    tx: mpsc::Sender<KeyEvent>,
}

impl KeySender {
    /// Queue an event without waiting. Returns false if it was dropped.
    pub fn send(&self, event: KeyEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Input queue full, dropping key event {:?}", event);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Consumer half of the event queue.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<KeyEvent>,
}

impl KeySource for ChannelSource {
    fn try_next(&mut self) -> Option<KeyEvent> {
        self.rx.try_recv().ok()
    }
}

/// Bounded event queue with [`QUEUE_CAPACITY`] slots.
pub fn channel() -> (KeySender, ChannelSource) {
    channel_with_capacity(QUEUE_CAPACITY)
}

pub fn channel_with_capacity(capacity: usize) -> (KeySender, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (KeySender { tx }, ChannelSource { rx })
}
