//! Glyphs of the standard X cursor font.

/// The default arrow pointer.
pub const LEFT_PTR: u16 = 68;

/// The four-way arrow shown while moving or resizing.
pub const SIZING: u16 = 120;
