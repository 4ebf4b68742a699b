//! tsukiwm: a minimalist tiling window manager for X11.
//!
//! Windows are arranged in a master-stack layout across a chain of
//! workspaces, with a bar along the top edge for switching between
//! them and acting on the focused client. All state lives in a single
//! [`WindowManager`], driven by one event loop.

pub mod bindings;
pub mod core;
pub mod layouts;
pub mod manager;
pub mod util;
pub mod x;

pub use crate::core::types;
pub use crate::manager::{Config, WindowManager};
pub use crate::x::core::Result as XResult;

use thiserror::Error;

use crate::x::{x11rb::X11RBConn, Initialized, XError};

/// Errors that stop the window manager.
#[derive(Debug, Error)]
pub enum WmError {
    #[error(transparent)]
    X(#[from] XError),

    /// Redirecting substructure events on the root was refused.
    #[error("another window manager is already running")]
    AnotherWm,

    /// An external command could not be launched.
    #[error("could not spawn command: {0}")]
    Spawn(String),
}

pub type Result<T> = ::core::result::Result<T, WmError>;

/// An initialized x11rb connection.
pub type InitX11RB = X11RBConn<Initialized>;

/// Convenience function for creating an x11rb-backed WindowManager.
pub fn x11rb_backed_wm(config: Config) -> Result<WindowManager<InitX11RB>> {
    let conn = X11RBConn::new(&config.font, config.bar_background, config.bar_foreground)?;

    WindowManager::new(conn, config)
}
