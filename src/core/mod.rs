//! This module contains the core types used within tsukiwm.
//! It contains the window registry and workspace model that
//! tsukiwm manipulates in response to events.

/// Types used for desktop management.
pub mod desktop;
/// Basic types used throughout tsukiwm.
pub mod types;
/// Types used to represent individual windows.
pub mod window;
/// Types used within workspaces.
pub mod workspace;

pub use desktop::{Container, Desktop, Detached, Found, Screen, Unmanaged};
pub use window::{Client, ClientId};
pub use workspace::{Workspace, WorkspaceId};
