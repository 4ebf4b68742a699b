//! Modal interactions layered over the general event dispatcher.
//!
//! While a mode other than [`Mode::Normal`] is active, each incoming
//! event is first offered to that mode's handler. The handler either
//! consumes the event or hands it back to be dispatched as usual.
//! After a handed-back event has been dispatched, the mode checks that
//! its subject still exists where it expects it and exits otherwise.

use tracing::{debug, instrument, trace, warn};

use super::bar;
use super::WindowManager;
use crate::core::Container;
use crate::types::{ClientConfig, Geometry, Point, StackMode};
use crate::x::{
    event::ButtonEvent,
    input::ButtonIndex,
    XConn, XEvent, XWindowID,
};

/// The interaction the window manager is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// No interaction in progress.
    #[default]
    Normal,
    /// A floating client follows the pointer, centred on it.
    Moving { client: XWindowID },
    /// A floating client's bottom right corner follows the pointer.
    Resizing { client: XWindowID },
    /// A client covers the whole screen until the next key press.
    /// `restore` is where it was before, for floating clients.
    FullscreenWatch { client: XWindowID, restore: Geometry },
    /// The hidden-client list is open.
    HiddenPicker,
}

impl Mode {
    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }

    /// The client the interaction acts on, if any.
    pub fn subject(&self) -> Option<XWindowID> {
        match self {
            Mode::Moving { client }
            | Mode::Resizing { client }
            | Mode::FullscreenWatch { client, .. } => Some(*client),
            _ => None,
        }
    }
}

impl<X: XConn> WindowManager<X> {
    /// Processes a single event.
    pub fn handle_event(&mut self, event: XEvent) {
        trace!("handling event {:?} in {:?}", event, self.mode);

        let forward = match self.mode {
            Mode::Normal => Some(event),
            Mode::Moving { client } | Mode::Resizing { client } => {
                self.pointer_event(client, event)
            }
            Mode::FullscreenWatch { .. } => self.fullscreen_event(event),
            Mode::HiddenPicker => self.picker_event(event),
        };

        if let Some(event) = forward {
            self.dispatch(event);
            self.revalidate_mode();
        }
    }

    //* Entering and leaving

    fn enter_mode(&mut self, mode: Mode) -> bool {
        if !self.mode.is_normal() {
            debug!("already in {:?}, not entering {:?}", self.mode, mode);
            return false
        }
        debug!("entering {:?}", mode);
        self.mode = mode;
        true
    }

    /// Returns to normal mode, undoing what the current mode changed.
    #[instrument(level = "debug", skip(self))]
    pub fn exit_mode(&mut self) {
        let mode = std::mem::take(&mut self.mode);

        match mode {
            Mode::Normal => return,
            Mode::Moving { .. } | Mode::Resizing { .. } => self.release_pointer(),
            Mode::FullscreenWatch { client, restore } => {
                if let Some(found) = self.desktop.locate(client) {
                    let mut change = vec![ClientConfig::BorderWidth(self.config.border_width)];
                    // tiled clients get their geometry back from the relayout
                    if found.is_floating() {
                        change.push(ClientConfig::Position(restore));
                    }
                    self.conn
                        .configure_window(client, &change)
                        .unwrap_or_else(|e| warn!("could not restore {}: {}", client, e));
                }
            }
            Mode::HiddenPicker => {
                self.release_pointer();
                self.conn
                    .unmap_window(self.picker)
                    .unwrap_or_else(|e| warn!("could not unmap picker: {}", e));
            }
        }

        debug!("left {:?}", mode);
        self.relayout();
    }

    fn release_pointer(&self) {
        self.conn
            .ungrab_pointer()
            .unwrap_or_else(|e| warn!("could not ungrab pointer: {}", e));
    }

    /// Exits the current mode if its subject has gone away. Puts a
    /// fullscreen client back over the layout that was just applied,
    /// and redraws the picker so its rows match the hidden store.
    fn revalidate_mode(&mut self) {
        let active = self.desktop.active();
        let location = self.mode.subject().and_then(|c| self.desktop.locate(c));

        match self.mode {
            Mode::Moving { client } | Mode::Resizing { client } => {
                if location.map(|f| f.container) != Some(Container::Floating(active)) {
                    debug!("client {} is no longer movable", client);
                    self.exit_mode();
                }
            }
            Mode::FullscreenWatch { client, .. } => {
                if location.and_then(|f| f.workspace()) == Some(active) {
                    self.fill_screen(client);
                } else {
                    debug!("fullscreen client {} left the workspace", client);
                    self.exit_mode();
                }
            }
            Mode::HiddenPicker if self.desktop.hidden_count() == 0 => self.exit_mode(),
            Mode::HiddenPicker => {
                let geom = self.picker_geometry();
                self.conn
                    .configure_window(self.picker, &[ClientConfig::Position(geom)])
                    .unwrap_or_else(|e| warn!("could not resize picker: {}", e));
                self.render_picker();
            }
            Mode::Normal => {}
        }
    }

    //* Move and resize

    /// Starts dragging the focused client, if it is floating.
    pub fn begin_move(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };
        if !self.desktop.locate(id).map(|f| f.is_floating()).unwrap_or(false) {
            debug!("client {} is not floating, not moving", id);
            return
        }
        if !self.mode.is_normal() {
            debug!("already in {:?}, not moving", self.mode);
            return
        }

        let geom = match self.conn.get_geometry(id) {
            Ok(g) => g,
            Err(e) => {
                warn!("could not get geometry of {}: {}", id, e);
                return
            }
        };

        self.conn
            .configure_window(id, &[ClientConfig::StackingMode(StackMode::Above)])
            .unwrap_or_else(|e| warn!("could not raise {}: {}", id, e));
        self.conn
            .warp_pointer(geom.center())
            .unwrap_or_else(|e| warn!("could not warp pointer: {}", e));

        if let Err(e) = self.conn.grab_pointer(self.root, self.cursors.sizing) {
            warn!("could not grab pointer: {}", e);
            return
        }

        self.enter_mode(Mode::Moving { client: id });
    }

    fn pointer_event(&mut self, client: XWindowID, event: XEvent) -> Option<XEvent> {
        match event {
            XEvent::MotionNotify(pt) => {
                self.drag_to(client, pt);
                None
            }
            XEvent::ButtonPress(ButtonEvent { button: ButtonIndex::Right, .. }) => {
                self.toggle_resizing(client);
                None
            }
            XEvent::ButtonPress(_) => {
                self.exit_mode();
                None
            }
            other => Some(other),
        }
    }

    fn drag_to(&mut self, client: XWindowID, pt: Point) {
        let geom = match self.conn.get_geometry(client) {
            Ok(g) => g,
            Err(e) => {
                debug!("lost client {} mid-drag: {}", client, e);
                return
            }
        };

        let change = match self.mode {
            Mode::Resizing { .. } => {
                let (w, h) = (pt.x - geom.x, pt.y - geom.y);
                if w <= 0 || h <= 0 {
                    return
                }
                ClientConfig::Resize { w, h }
            }
            _ => ClientConfig::Move {
                x: pt.x - geom.width / 2,
                y: pt.y - geom.height / 2,
            },
        };

        self.conn
            .configure_window(client, &[change])
            .unwrap_or_else(|e| warn!("could not drag {}: {}", client, e));
    }

    fn toggle_resizing(&mut self, client: XWindowID) {
        let geom = match self.conn.get_geometry(client) {
            Ok(g) => g,
            Err(e) => {
                debug!("lost client {} mid-drag: {}", client, e);
                return
            }
        };

        let warp_to = match self.mode {
            Mode::Moving { .. } => {
                self.mode = Mode::Resizing { client };
                geom.corner()
            }
            _ => {
                self.mode = Mode::Moving { client };
                geom.center()
            }
        };
        trace!("switched to {:?}", self.mode);

        self.conn
            .warp_pointer(warp_to)
            .unwrap_or_else(|e| warn!("could not warp pointer: {}", e));
    }

    //* Fullscreen

    /// Maximizes the focused client until the next key press.
    pub fn begin_fullscreen(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };
        let restore = match self.conn.get_geometry(id) {
            Ok(g) => g,
            Err(e) => {
                warn!("could not get geometry of {}: {}", id, e);
                return
            }
        };
        if !self.enter_mode(Mode::FullscreenWatch { client: id, restore }) {
            return
        }

        self.fill_screen(id);
    }

    fn fill_screen(&self, id: XWindowID) {
        let full = Geometry::new(0, 0, self.screen.width, self.screen.height);

        self.conn
            .configure_window(id, &[
                ClientConfig::BorderWidth(0),
                ClientConfig::Position(full),
                ClientConfig::StackingMode(StackMode::Above),
            ])
            .unwrap_or_else(|e| warn!("could not fullscreen {}: {}", id, e));
    }

    fn fullscreen_event(&mut self, event: XEvent) -> Option<XEvent> {
        match event {
            XEvent::KeyPress(_) => {
                self.exit_mode();
                None
            }
            ev @ (XEvent::MapRequest(..) | XEvent::DestroyNotify(_) | XEvent::ButtonPress(_)) => {
                Some(ev)
            }
            other => {
                trace!("dropping {:?} while fullscreen", other);
                None
            }
        }
    }

    //* Hidden picker

    /// The popup covers the picker trigger, one row per hidden client
    /// plus one for the focused client.
    fn picker_geometry(&self) -> Geometry {
        let rows = self.desktop.hidden_count() as i32 + 1;
        Geometry::new(0, 0, self.screen.width / 5, self.bar.height * rows)
    }

    /// Opens the list of hidden clients.
    pub fn begin_picker(&mut self) {
        if self.desktop.hidden_count() == 0 {
            debug!("nothing hidden");
            return
        }
        if !self.mode.is_normal() {
            debug!("already in {:?}, not opening picker", self.mode);
            return
        }

        let geom = self.picker_geometry();
        self.conn
            .configure_window(self.picker, &[
                ClientConfig::Position(geom),
                ClientConfig::StackingMode(StackMode::Above),
            ])
            .and_then(|_| self.conn.map_window(self.picker))
            .unwrap_or_else(|e| warn!("could not show picker: {}", e));

        if let Err(e) = self.conn.grab_pointer(self.root, self.cursors.normal) {
            warn!("could not grab pointer: {}", e);
            self.conn
                .unmap_window(self.picker)
                .unwrap_or_else(|e| warn!("could not unmap picker: {}", e));
            return
        }

        self.enter_mode(Mode::HiddenPicker);
        self.render_picker();
    }

    pub(crate) fn render_picker(&self) {
        let names: Vec<&str> = self
            .desktop
            .hidden()
            .map(|c| c.name().unwrap_or(bar::NO_CLIENT))
            .collect();
        let title = self.desktop.current_client().and_then(|c| c.name());
        let labels = bar::layout_picker(&self.conn, title, &names, self.bar.height, &self.config);

        let res = self.conn.clear(self.picker).and_then(|_| {
            labels
                .iter()
                .try_for_each(|l| self.conn.draw_text(self.picker, l.at, &l.text))
        });
        res.unwrap_or_else(|e| warn!("could not render picker: {}", e));
    }

    fn picker_event(&mut self, event: XEvent) -> Option<XEvent> {
        match event {
            XEvent::MotionNotify(pt) => {
                if !self.picker_geometry().contains(pt) {
                    trace!("pointer left the picker");
                    self.exit_mode();
                }
                None
            }
            XEvent::ButtonPress(ev) => {
                // row 0 shows the focused client
                let row = (ev.abs.y.max(0) / self.bar.height.max(1)) as usize;
                self.exit_mode();
                self.unhide(row.saturating_sub(1));
                None
            }
            XEvent::Expose(id) if id == self.picker => {
                self.render_picker();
                None
            }
            other => Some(other),
        }
    }
}
