//! Text rendering, as used by the bar and the hidden-window picker.

use super::core::{Result, XWindowID};
use crate::types::Point;

/// The pixel extents of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextExtents {
    /// Horizontal offset from the origin to the start of the ink.
    pub x: i32,
    /// Distance from the top of the text to its baseline.
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Draws strings onto windows owned by the window manager.
pub trait Renderer {
    /// Measures a string in the configured font.
    fn text_extents(&self, text: &str) -> TextExtents;

    /// Clears a window to its background.
    fn clear(&self, window: XWindowID) -> Result<()>;

    /// Draws a string with its baseline starting at `at`.
    fn draw_text(&self, window: XWindowID, at: Point, text: &str) -> Result<()>;
}
