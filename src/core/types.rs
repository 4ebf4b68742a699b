//! Basic geometric and styling types used throughout tsukiwm.

pub use crate::x::input::{ModMask, KeyCode};
pub use crate::x::core::XWindowID;

/// A colour in 0xRRGGBB form, as the X server takes it.
pub type Color = u32;

/// The direction of a workspace switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The position and size of a window.
///
/// Width and height describe the inner area, so the outer
/// extent of a window is `width + 2 * border`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Returns the point at the centre of the geometry.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns the bottom right corner of the geometry.
    pub fn corner(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Whether the point lies within the geometry, edges included.
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x
            && pt.x <= self.x + self.width
            && pt.y >= self.y
            && pt.y <= self.y + self.height
    }
}

/// The border a client is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    Focused,
    Unfocused,
}

/// Where a window goes in the stacking order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackMode {
    Above,
    Below,
}

/// Changes that can be made to a window's configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientConfig {
    /// Width of the window border.
    BorderWidth(u32),
    /// Position and size together.
    Position(Geometry),
    /// Size only.
    Resize { w: i32, h: i32 },
    /// Position only.
    Move { x: i32, y: i32 },
    /// Stacking order.
    StackingMode(StackMode),
}

/// Attributes that can be set on a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientAttrs {
    /// Colour of the window border.
    BorderColour(Color),
    /// Background pixel of the window.
    Background(Color),
    /// The event mask selected on every managed client.
    ClientEventMask,
    /// The event mask that makes us the window manager.
    RootEventMask,
    /// Cursor to display over the window.
    Cursor(u32),
}
