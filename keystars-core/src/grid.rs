//! The per-key color canvas shared by the animator and the keymap dispatcher.
//!
//! Slots are row-major: `index = row * width + col`. The length is fixed
//! when the grid is created and every slot always holds a color.

use thiserror::Error;

use crate::color::Color;

/// Default layout width (columns), matching the per-key bitmap layout.
pub const DEFAULT_WIDTH: usize = 21;
/// Default layout height (rows).
pub const DEFAULT_HEIGHT: usize = 6;
/// Largest supported width or height.
pub const MAX_DIMENSION: usize = 255;

/// Errors from grid construction and addressing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid layout must be at least 1x1, got {width}x{height}")]
    EmptyLayout { width: usize, height: usize },

    #[error("grid layout {width}x{height} exceeds {max}x{max}")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("slot {index} out of range (grid has {len} slots)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Fixed-size row-major grid of key colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGrid {
    width: usize,
    height: usize,
    slots: Vec<Color>,
}

impl KeyGrid {
    /// Create a `width` x `height` grid with every slot set to `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyLayout { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self {
            width,
            height,
            slots: vec![fill; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Row-major slot index for `(row, col)`, or `None` outside the grid.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.slots.get(index).copied()
    }

    /// Overwrite one slot.
    pub fn paint(&mut self, index: usize, color: Color) -> Result<(), GridError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(GridError::IndexOutOfRange { index, len })?;
        *slot = color;
        Ok(())
    }

    pub fn fill(&mut self, color: Color) {
        self.slots.fill(color);
    }

    pub fn slots(&self) -> &[Color] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Color] {
        &mut self.slots
    }

    /// Packed `0xAARRGGBB` frame in slot order, as the lighting device takes it.
    pub fn to_argb(&self) -> Vec<u32> {
        self.slots.iter().map(|c| c.to_argb()).collect()
    }
}
