//! Backend-agnostic representations of X events.

use super::core::XWindowID;
use super::input::{ButtonIndex, KeyCode, ModMask};
use crate::types::Point;

/// Low-level wrapper around actual X server events.
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    /// A client is requesting to be mapped.
    MapRequest(XWindowID, bool), // bool: override_redirect
    /// A window was destroyed.
    DestroyNotify(XWindowID),
    /// A property of a window changed.
    PropertyNotify(PropertyEvent),
    /// Request for configuration from a client.
    ConfigureRequest(ConfigureRequestData),
    /// A window needs repainting.
    Expose(XWindowID),
    ButtonPress(ButtonEvent),
    KeyPress(KeypressEvent),
    /// The pointer moved, with its root-relative position.
    MotionNotify(Point),
    /// The server reported a failed request.
    Error(String),
    Unknown(String),
}

/// Data associated with a property change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyEvent {
    /// The window associated with the event.
    pub id: XWindowID,
    /// The atom representing the change.
    pub atom: u32,
    /// Whether the window is the root window.
    pub is_root: bool,
}

/// The geometry a client asked for. Fields not in the request's
/// value mask are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigureRequestData {
    pub id: XWindowID,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Data associated with a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// The window the event was reported on.
    pub id: XWindowID,
    pub button: ButtonIndex,
    /// Position relative to `id`.
    pub rel: Point,
    /// Position relative to the root.
    pub abs: Point,
}

/// Data associated with a key press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypressEvent {
    /// What modmask was active at the time.
    pub mask: ModMask,
    /// The key pressed.
    pub keycode: KeyCode,
}
