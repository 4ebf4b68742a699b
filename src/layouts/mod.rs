//! The layout engine.
//!
//! Layouts are computed as a list of [`LayoutAction`]s that the
//! `WindowManager` then applies against the X server. Generating the
//! actions touches nothing but the desktop model, so a layout can be
//! checked without a server.

use tracing::trace;

use crate::core::{Desktop, Screen, WorkspaceId};
use crate::types::{BorderStyle, Geometry};
use crate::x::XWindowID;

/// The master-stack tiling algorithm.
pub mod tiled;

/// A single step of applying a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAction {
    /// Set the border colour of a window.
    Border { id: XWindowID, style: BorderStyle },
    /// Push a window below its siblings.
    Lower(XWindowID),
    /// Bring a window above its siblings.
    Raise(XWindowID),
    /// Intercept clicks on a window so that clicking focuses it.
    GrabButtons(XWindowID),
    /// Move and resize a window.
    Resize { id: XWindowID, geom: Geometry },
    /// Give a window input focus and stop intercepting its clicks.
    Focus(XWindowID),
}

/// The fixed inputs of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub screen: Screen,
    pub bar_height: i32,
    pub border_width: i32,
}

impl LayoutParams {
    /// The area below the bar available to tiled windows.
    pub fn usable_area(&self) -> Geometry {
        Geometry::new(
            0,
            self.bar_height,
            self.screen.width,
            self.screen.height - self.bar_height,
        )
    }
}

/// Generates the layout of a workspace.
///
/// An empty workspace yields no actions. Otherwise floating windows are
/// lowered and unfocused, tiled windows are unfocused and placed by
/// [`tiled::master_stack`], and the current client is focused last.
/// A floating current client is also raised.
pub fn gen_layout(desktop: &Desktop, ws: WorkspaceId, params: &LayoutParams) -> Vec<LayoutAction> {
    use LayoutAction::*;

    let Some(workspace) = desktop.workspace(ws) else {
        return Vec::new()
    };
    let Some(current) = workspace.current().and_then(|c| desktop.client(c)) else {
        trace!("no current client, nothing to lay out");
        return Vec::new()
    };

    let mut ret = Vec::new();

    for id in desktop.floating(ws) {
        ret.push(Border { id, style: BorderStyle::Unfocused });
        ret.push(Lower(id));
        ret.push(GrabButtons(id));
    }

    let tiled = desktop.tiled(ws);
    let geoms = tiled::master_stack(tiled.len(), params.usable_area(), params.border_width);
    for (id, geom) in tiled.into_iter().zip(geoms) {
        ret.push(Border { id, style: BorderStyle::Unfocused });
        ret.push(GrabButtons(id));
        ret.push(Resize { id, geom });
    }

    ret.push(Border { id: current.id(), style: BorderStyle::Focused });
    if current.is_floating() {
        ret.push(Raise(current.id()));
    }
    ret.push(Focus(current.id()));

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use LayoutAction::*;

    fn params() -> LayoutParams {
        LayoutParams {
            screen: Screen::new(1280, 800),
            bar_height: 20,
            border_width: 3,
        }
    }

    fn resizes(actions: &[LayoutAction]) -> Vec<(XWindowID, Geometry)> {
        actions
            .iter()
            .filter_map(|a| match a {
                Resize { id, geom } => Some((*id, *geom)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_workspace() {
        let desktop = Desktop::new();

        assert!(gen_layout(&desktop, desktop.active(), &params()).is_empty());
    }

    #[test]
    fn test_three_tiled_clients() {
        let mut desktop = Desktop::new();
        for w in [1, 2, 3] {
            desktop.manage(w, None);
        }
        // tiled list is 3 2 1

        let actions = gen_layout(&desktop, desktop.active(), &params());
        let rects = resizes(&actions);

        assert_eq!(rects[0], (3, Geometry::new(0, 20, 634, 774)));
        assert_eq!(rects[1], (2, Geometry::new(640, 20, 634, 384)));
        assert_eq!(rects[2], (1, Geometry::new(640, 410, 634, 384)));

        assert_eq!(actions[actions.len() - 2], Border { id: 3, style: BorderStyle::Focused });
        assert_eq!(actions[actions.len() - 1], Focus(3));
    }

    #[test]
    fn test_floating_clients_are_not_tiled() {
        let mut desktop = Desktop::new();
        for w in [1, 2] {
            desktop.manage(w, None);
        }
        desktop.toggle_float(2);

        let actions = gen_layout(&desktop, desktop.active(), &params());

        assert_eq!(resizes(&actions), vec![(1, Geometry::new(0, 20, 1274, 774))]);
        assert!(actions.contains(&Lower(2)));
        assert!(actions.contains(&GrabButtons(2)));
        assert!(!actions.contains(&Lower(1)));
        assert_eq!(actions[actions.len() - 2], Raise(2));
        assert_eq!(actions.last(), Some(&Focus(2)));
    }

    #[test]
    fn test_only_floating_clients() {
        let mut desktop = Desktop::new();
        desktop.manage(1, None);
        desktop.toggle_float(1);

        let actions = gen_layout(&desktop, desktop.active(), &params());

        assert!(resizes(&actions).is_empty());
        assert_eq!(actions.last(), Some(&Focus(1)));
    }
}
