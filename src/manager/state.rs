use super::{bar::Hotspots, WindowManager};

use crate::bindings::Keybinds;
use crate::core::{Client, Desktop};
use crate::x::{XConn, XWindowID};

/// Provides a view into the state of the window manager.
/// It is used as a context when generating event actions.
///
/// The `'wm` lifetime refers to the lifetime of the parent
/// `WindowManager` type.
#[derive(Debug, Clone, Copy)]
pub struct WmState<'wm> {
    pub root: XWindowID,
    pub bar: XWindowID,
    pub picker: XWindowID,
    pub desktop: &'wm Desktop,
    pub keybinds: &'wm Keybinds,
    pub hotspots: &'wm Hotspots,
}

impl<X: XConn> WindowManager<X> {
    pub(crate) fn state(&self) -> WmState<'_> {
        WmState {
            root: self.root,
            bar: self.bar.window,
            picker: self.picker,
            desktop: &self.desktop,
            keybinds: &self.keybinds,
            hotspots: &self.bar.hotspots,
        }
    }
}

impl<'wm> WmState<'wm> {
    pub fn lookup_client(&self, id: XWindowID) -> Option<&'wm Client> {
        self.desktop.client_by_window(id)
    }

    /// Whether the window is one of our own.
    pub fn is_wm_window(&self, id: XWindowID) -> bool {
        id == self.root || id == self.bar || id == self.picker
    }
}
