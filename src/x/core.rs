//! The core traits through which tsukiwm talks to the X server.

use thiserror::Error;

use super::event::XEvent;
use super::input::{KeyCode, keysym::KeySym};
use super::render::Renderer;
use crate::bindings::Keybind;
use crate::types::{ClientAttrs, ClientConfig, Color, Geometry, Point};

/// An X window ID.
pub type XWindowID = u32;

/// An X cursor ID.
pub type CursorID = u32;

/// Attributes of a window, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub override_redirect: bool,
    pub viewable: bool,
}

/// Errors returned by an X connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XError {
    /// An error when establishing a connection with the server.
    #[error("X connection error: {0}")]
    Connection(String),

    /// An error caused by a malformed protocol request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No screens were found by the window manager.
    #[error("Could not find screens from X server")]
    NoScreens,

    /// The font used for drawing could not be opened.
    #[error("Could not load font {0}")]
    Font(String),

    /// An internal server error.
    #[error("X server error: {0}")]
    ServerError(String),

    /// Some error not tracked by tsukiwm.
    #[error("{0}")]
    OtherError(String),
}

pub type Result<T> = ::core::result::Result<T, XError>;

/// The X requests the window manager issues.
///
/// Every method that targets a window may fail because that window
/// has already been destroyed; callers log such errors and move on.
pub trait XCore {
    //* General X server operations
    /// Blocks until the next event arrives.
    fn wait_for_event(&self) -> Result<XEvent>;
    /// The root window of the managed screen.
    fn root(&self) -> XWindowID;
    /// The geometry of the managed screen.
    fn root_geometry(&self) -> Geometry;
    /// The children of a window, bottom to top.
    fn query_tree(&self, window: XWindowID) -> Result<Vec<XWindowID>>;
    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes>;
    fn get_geometry(&self, window: XWindowID) -> Result<Geometry>;
    /// Forces a round trip to the server.
    fn sync(&self) -> Result<()>;

    //* Window-related operations
    fn map_window(&self, window: XWindowID) -> Result<()>;
    fn unmap_window(&self, window: XWindowID) -> Result<()>;
    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()>;
    fn change_window_attributes(&self, window: XWindowID, attrs: &[ClientAttrs]) -> Result<()>;
    fn set_input_focus(&self, window: XWindowID) -> Result<()>;
    /// Destroys the resources of the client that owns `window`.
    fn kill_client(&self, window: XWindowID) -> Result<()>;
    /// Creates an unmapped child of the root owned by the window manager.
    fn create_window(&self, geom: Geometry, background: Color) -> Result<XWindowID>;
    /// Creates a cursor from the standard cursor font.
    fn create_cursor(&self, glyph: u16) -> Result<CursorID>;

    //* Properties
    /// The WM_NAME of a window, if it has one.
    fn get_wm_name(&self, window: XWindowID) -> Option<String>;
    fn set_wm_name(&self, window: XWindowID, name: &str) -> Result<()>;

    //* Input
    /// Resolves a keysym to a keycode through the keyboard mapping.
    fn keysym_to_keycode(&self, keysym: KeySym) -> Result<Option<KeyCode>>;
    fn grab_key(&self, bind: Keybind, window: XWindowID) -> Result<()>;
    /// Passively grabs every button on a window, freezing the pointer
    /// until [`replay_pointer`](XCore::replay_pointer) is called.
    fn grab_button(&self, window: XWindowID) -> Result<()>;
    fn ungrab_button(&self, window: XWindowID) -> Result<()>;
    fn grab_pointer(&self, window: XWindowID, cursor: CursorID) -> Result<()>;
    fn ungrab_pointer(&self) -> Result<()>;
    /// Releases a frozen pointer and replays the click to the client.
    fn replay_pointer(&self) -> Result<()>;
    /// Moves the pointer to a position relative to the root.
    fn warp_pointer(&self, pt: Point) -> Result<()>;
}

/// A connection usable by a [`WindowManager`](crate::WindowManager):
/// it speaks the protocol and can draw text.
pub trait XConn: XCore + Renderer {}

impl<T> XConn for T where T: XCore + Renderer {}
