//! Terminal preview sink using crossterm.
//!
//! Draws the key grid in an alternate screen with true-color cells, one
//! cell per slot, labelled with the key legend where the slot has a key.
//!
//! On stdout the terminal is put in raw mode so typed keys do not echo over
//! the grid. Raw mode also swallows SIGINT, so [`watch_quit_keys`] turns a
//! Ctrl+C keypress back into a stop request.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::{
    cursor,
    event::{self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    style::{self, Color, Stylize},
    terminal, ExecutableCommand, QueueableCommand,
};
use futures::StreamExt;
use keystars_core::Color as KeyColor;
use tracing::{debug, warn};

use super::{LightingSink, SinkError};

/// Width of each cell in characters.
const CELL_W: usize = 4;
/// Color for slots the device reports as invisible.
const OFF: Color = Color::Rgb { r: 0, g: 0, b: 0 };

/// Renders frames to a terminal (stdout by default).
pub struct TerminalSink<W: Write = io::Stdout> {
    out: W,
    width: usize,
    height: usize,
    labels: Vec<String>,
    aux: Option<(u8, u8, u8)>,
    frames: u64,
    active: bool,
    raw_mode: bool,
    raw_enabled: bool,
}

/// Screen line for a grid row, saturating on absurdly tall grids.
fn line(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Ctrl+C as seen by a terminal in raw mode.
pub fn is_quit_key(key: &event::KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Clear `running` when Ctrl+C is pressed in the terminal.
///
/// Returns when the key is seen or the terminal event stream ends.
pub async fn watch_quit_keys(running: Arc<AtomicBool>) {
    let mut events = EventStream::new();
    while let Some(event) = events.next().await {
        match event {
            Ok(Event::Key(key)) if is_quit_key(&key) => {
                debug!("Ctrl+C pressed in preview");
                running.store(false, Ordering::SeqCst);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Terminal event error: {e}");
                return;
            }
        }
    }
}

impl TerminalSink<io::Stdout> {
    /// Preview on stdout, in raw mode.
    pub fn stdout(width: usize, height: usize, labels: &[Option<&str>]) -> Self {
        Self::with_writer(io::stdout(), width, height, labels).with_raw_mode(true)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn with_writer(out: W, width: usize, height: usize, labels: &[Option<&str>]) -> Self {
        let labels: Vec<String> = (0..width * height)
            .map(|i| {
                labels
                    .get(i)
                    .copied()
                    .flatten()
                    .map(|l| l.chars().take(CELL_W - 1).collect::<String>())
                    .unwrap_or_default()
            })
            .collect();
        Self {
            out,
            width,
            height,
            labels,
            aux: None,
            frames: 0,
            active: false,
            raw_mode: false,
            raw_enabled: false,
        }
    }

    /// Switch the controlling terminal to raw mode during `init`.
    pub fn with_raw_mode(mut self, raw_mode: bool) -> Self {
        self.raw_mode = raw_mode;
        self
    }

    pub fn raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// The underlying writer.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn draw(&mut self, frame: &[u32]) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(style::PrintStyledContent(
            format!(" keystars  |  frame {:8}  |  Ctrl+C to quit ", self.frames)
                .with(Color::White)
                .on(Color::DarkGrey),
        ))?;

        for row in 0..self.height {
            self.out.queue(cursor::MoveTo(0, line(row + 2)))?;
            for col in 0..self.width {
                let idx = row * self.width + col;
                let key = KeyColor::from_argb(frame[idx]);
                let bg = if key.is_visible() {
                    Color::Rgb {
                        r: key.r,
                        g: key.g,
                        b: key.b,
                    }
                } else {
                    OFF
                };
                let lum = (key.r as u16 + key.g as u16 + key.b as u16) / 3;
                let fg = if lum > 128 { Color::Black } else { Color::White };

                self.out.queue(style::PrintStyledContent(
                    format!("{:^width$}", self.labels[idx], width = CELL_W)
                        .with(fg)
                        .on(bg),
                ))?;
            }
        }

        if let Some((r, g, b)) = self.aux {
            let scale = |pct: u8| (pct.min(100) as u16 * 255 / 100) as u8;
            self.out.queue(cursor::MoveTo(0, line(self.height + 3)))?;
            self.out.queue(style::PrintStyledContent(
                format!(" Indicators ({r:3}%,{g:3}%,{b:3}%) ")
                    .with(Color::White)
                    .on(Color::Rgb {
                        r: scale(r),
                        g: scale(g),
                        b: scale(b),
                    }),
            ))?;
        }

        self.out.flush()
    }
}

impl<W: Write> LightingSink for TerminalSink<W> {
    fn init(&mut self) -> Result<(), SinkError> {
        if self.raw_mode {
            terminal::enable_raw_mode()?;
            self.raw_enabled = true;
        }
        self.out
            .execute(terminal::EnterAlternateScreen)?
            .execute(terminal::Clear(terminal::ClearType::All))?
            .execute(cursor::Hide)?;
        self.active = true;
        Ok(())
    }

    fn set_lighting_percent(&mut self, r: u8, g: u8, b: u8) -> Result<(), SinkError> {
        if !self.active {
            return Err(SinkError::NotInitialized);
        }
        self.aux = Some((r, g, b));
        Ok(())
    }

    fn push_frame(&mut self, frame: &[u32]) -> Result<(), SinkError> {
        if !self.active {
            return Err(SinkError::NotInitialized);
        }
        let expected = self.width * self.height;
        if frame.len() != expected {
            return Err(SinkError::FrameSize {
                expected,
                actual: frame.len(),
            });
        }
        self.frames += 1;
        self.draw(frame)?;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.active {
            self.active = false;
            let _ = self
                .out
                .execute(cursor::Show)
                .and_then(|out| out.execute(terminal::LeaveAlternateScreen));
        }
        // Also undone when init failed after entering raw mode
        if self.raw_enabled {
            self.raw_enabled = false;
            let _ = terminal::disable_raw_mode();
        }
    }
}

impl<W: Write> Drop for TerminalSink<W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
