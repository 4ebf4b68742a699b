//! The `WindowManager`: the session context every operation runs against.
//!
//! A `WindowManager` owns the X connection, the desktop model and the
//! bar. It pulls events from the server one at a time and routes each
//! through the current [`Mode`] before falling back to the general
//! dispatcher in [`event`].

use custom_debug_derive::Debug;
use tracing::{debug, info, instrument, trace, warn};

use crate::bindings::{KeyAction, Keybinds};
use crate::core::{Desktop, Screen, WorkspaceId};
use crate::layouts::{gen_layout, LayoutAction, LayoutParams};
use crate::types::{BorderStyle, ClientAttrs, ClientConfig, Direction, Geometry, StackMode};
use crate::util;
use crate::x::{
    cursor,
    event::ConfigureRequestData,
    CursorID, XConn, XWindowID,
};
use crate::{Result, WmError};

pub mod bar;
pub mod config;
pub mod event;
pub mod mode;
pub mod state;

#[doc(inline)]
pub use bar::{Bar, BarAction, BarButton, BarContent, Hotspots};
#[doc(inline)]
pub use config::{CommandButton, Config};
#[doc(inline)]
pub use event::EventAction;
#[doc(inline)]
pub use mode::Mode;
#[doc(inline)]
pub use state::WmState;

/// The name set on the root window at startup.
pub const WM_NAME: &str = "tsukiwm";

/// Cursors created at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub normal: CursorID,
    pub sizing: CursorID,
}

/// The main window manager object that receives and responds to events.
#[derive(Debug)]
pub struct WindowManager<X: XConn> {
    #[debug(skip)]
    pub(crate) conn: X,
    pub(crate) config: Config,
    pub(crate) desktop: Desktop,
    pub(crate) screen: Screen,
    pub(crate) root: XWindowID,
    pub(crate) bar: Bar,
    /// The popup listing hidden clients.
    pub(crate) picker: XWindowID,
    pub(crate) cursors: Cursors,
    pub(crate) keybinds: Keybinds,
    pub(crate) mode: Mode,
}

impl<X: XConn> WindowManager<X> {
    /// Registers as the window manager of the connection's screen.
    ///
    /// Selects substructure redirection on the root, creates the bar,
    /// the picker and the cursors, and grabs the key bindings.
    /// Fails if another window manager is running.
    pub fn new(conn: X, config: Config) -> Result<Self> {
        let root = conn.root();
        let rgeom = conn.root_geometry();
        let screen = Screen::new(rgeom.width, rgeom.height);
        info!("managing screen {}x{}", screen.width, screen.height);

        conn.change_window_attributes(root, &[ClientAttrs::RootEventMask])
            .map_err(|e| {
                debug!("could not select root events: {}", e);
                WmError::AnotherWm
            })?;

        let sample = conn.text_extents(bar::SAMPLE_TEXT);
        let bar_height = sample.height + config.bar_padding * 2;

        let bar_window = conn.create_window(
            Geometry::new(0, 0, screen.width, bar_height),
            config.bar_background,
        )?;
        conn.map_window(bar_window)?;
        let picker = conn.create_window(
            Geometry::new(0, 0, screen.width / 5, bar_height),
            config.bar_background,
        )?;

        let cursors = Cursors {
            normal: conn.create_cursor(cursor::LEFT_PTR)?,
            sizing: conn.create_cursor(cursor::SIZING)?,
        };
        conn.change_window_attributes(
            root,
            &[ClientAttrs::Cursor(cursors.normal), ClientAttrs::Background(config.background)],
        )?;
        conn.clear(root).unwrap_or_else(|e| warn!("could not clear root: {}", e));

        let keybinds = Keybinds::resolve(&conn, config.modmask, &config.keys);
        for bind in keybinds.keys() {
            conn.grab_key(*bind, root)?;
        }

        conn.set_wm_name(root, WM_NAME)
            .unwrap_or_else(|e| warn!("could not set root name: {}", e));
        conn.sync()?;

        Ok(Self {
            conn,
            desktop: Desktop::new(),
            screen,
            root,
            bar: Bar::new(bar_window, sample, config.bar_padding),
            picker,
            cursors,
            keybinds,
            mode: Mode::Normal,
            config,
        })
    }

    /// Manages the windows that already exist, then processes events
    /// until the connection fails.
    pub fn run(&mut self) -> Result<()> {
        self.scan();
        self.update_status();

        loop {
            let event = self.conn.wait_for_event()?;
            self.handle_event(event);
        }
    }

    //* Public accessors

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn conn(&self) -> &X {
        &self.conn
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    //* Startup

    /// Manages every existing top-level window that is viewable and
    /// not override-redirect.
    #[instrument(level = "debug", skip(self))]
    pub fn scan(&mut self) {
        let children = match self.conn.query_tree(self.root) {
            Ok(c) => c,
            Err(e) => {
                warn!("could not query existing windows: {}", e);
                return
            }
        };

        for id in children {
            if id == self.bar.window || id == self.picker {
                continue
            }
            match self.conn.get_window_attributes(id) {
                Ok(attrs) if !attrs.override_redirect && attrs.viewable => {
                    debug!("found existing window {}", id);
                    self.manage(id);
                }
                Ok(_) => trace!("skipping window {}", id),
                Err(e) => debug!("could not get attributes of {}: {}", id, e),
            }
        }
    }

    //* Event handling

    pub(crate) fn dispatch(&mut self, event: crate::x::XEvent) {
        let Some(actions) = EventAction::from_xevent(event, self.state()) else {
            return
        };

        for action in actions {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: EventAction) {
        use EventAction::*;

        trace!("running {:?}", action);
        match action {
            MapTrackedClient(id) => self.manage(id),
            DestroyClient(id) => self.unmanage(id),
            UpdateStatus => self.update_status(),
            ClientNameChange(id) => {
                let name = self.conn.get_wm_name(id);
                self.desktop.rename(id, name);
                self.render_bar();
            }
            ConfigureClient(data) => self.configure_floating(data),
            RedrawBar => self.render_bar(),
            RunBarAction(action) => self.run_bar_action(action),
            ClientFocus(id) => self.focus_click(id),
            RunKeybind(action) => self.run_key_action(action),
        }
    }

    fn run_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Fullscreen => self.begin_fullscreen(),
            KeyAction::MoveResize => self.begin_move(),
            KeyAction::Redraw => self.redraw(),
            KeyAction::ToggleFloat => self.toggle_float(),
        }
    }

    fn run_bar_action(&mut self, action: BarAction) {
        match action {
            BarAction::OpenPicker => self.begin_picker(),
            BarAction::SwitchWorkspace(dir) => self.switch_workspace(dir),
            BarAction::Button(BarButton::Hide) => self.hide(),
            BarAction::Button(BarButton::Zoom) => self.promote(),
            BarAction::Button(BarButton::Close) => self.close(),
            BarAction::Button(BarButton::Float) => self.toggle_float(),
            BarAction::Button(BarButton::Move) => self.begin_move(),
            BarAction::Spawn(idx) => self.spawn(idx),
        }
    }

    //* Client operations

    /// Starts managing a window and makes it the focused client.
    pub fn manage(&mut self, id: XWindowID) {
        let name = self.conn.get_wm_name(id);
        if self.desktop.manage(id, name).is_none() {
            return
        }

        self.conn
            .change_window_attributes(id, &[
                ClientAttrs::ClientEventMask,
                ClientAttrs::BorderColour(self.config.border_color),
            ])
            .unwrap_or_else(|e| warn!("could not set attributes of {}: {}", id, e));
        self.conn
            .configure_window(id, &[ClientConfig::BorderWidth(self.config.border_width)])
            .unwrap_or_else(|e| warn!("could not set border of {}: {}", id, e));
        self.conn
            .map_window(id)
            .unwrap_or_else(|e| warn!("could not map {}: {}", id, e));

        self.relayout();
    }

    /// Forgets a window whose X resources are gone.
    pub fn unmanage(&mut self, id: XWindowID) {
        let Some(removed) = self.desktop.unmanage(id) else {
            return
        };

        if removed.detached.map(|d| d.active_changed).unwrap_or(false) {
            self.map_workspace(self.desktop.active());
        }

        self.relayout();
    }

    /// Moves the focused client between the tiled and floating lists.
    pub fn toggle_float(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };
        if self.desktop.toggle_float(id).is_some() {
            self.relayout();
        }
    }

    /// Moves the focused client to the head of the tiled list.
    pub fn promote(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };
        if self.desktop.promote(id) {
            self.relayout();
        }
    }

    /// Unmaps the focused client and puts it in the hidden store.
    pub fn hide(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };

        self.conn
            .unmap_window(id)
            .unwrap_or_else(|e| warn!("could not unmap {}: {}", id, e));

        if let Some(detached) = self.desktop.hide(id) {
            if detached.active_changed {
                self.map_workspace(self.desktop.active());
            }
        }

        self.relayout();
    }

    /// Recalls a hidden client into the active workspace.
    pub fn unhide(&mut self, index: usize) {
        let Some(id) = self.desktop.unhide(index) else {
            debug!("no hidden client at {}", index);
            return
        };

        self.conn
            .map_window(id)
            .unwrap_or_else(|e| warn!("could not map {}: {}", id, e));

        self.relayout();
    }

    /// Makes the neighbouring workspace active.
    pub fn switch_workspace(&mut self, dir: Direction) {
        let Some(old) = self.desktop.switch_workspace(dir) else {
            return
        };

        self.unmap_workspace(old);
        self.map_workspace(self.desktop.active());
        self.relayout();
    }

    /// Asks the server to disconnect the focused client.
    pub fn close(&mut self) {
        if let Some(id) = self.desktop.current_window() {
            debug!("killing client {}", id);
            self.conn
                .kill_client(id)
                .unwrap_or_else(|e| warn!("could not kill {}: {}", id, e));
        }
    }

    /// Resizes the focused client by a pixel and back, which makes it
    /// repaint itself.
    pub fn redraw(&mut self) {
        let Some(id) = self.desktop.current_window() else {
            return
        };
        let geom = match self.conn.get_geometry(id) {
            Ok(g) => g,
            Err(e) => {
                warn!("could not get geometry of {}: {}", id, e);
                return
            }
        };

        for w in [geom.width - 1, geom.width] {
            self.conn
                .configure_window(id, &[ClientConfig::Resize { w, h: geom.height }])
                .unwrap_or_else(|e| warn!("could not resize {}: {}", id, e));
        }
    }

    /// Launches the command behind a bar button.
    pub fn spawn(&mut self, idx: usize) {
        let Some(cmd) = self.config.commands.get(idx) else {
            return
        };

        info!("spawning {}", cmd.label);
        util::spawn(&cmd.argv).unwrap_or_else(|e| warn!("{}", e));
    }

    fn focus_click(&mut self, id: XWindowID) {
        if self.desktop.focus(id) {
            self.relayout();
        }
        self.conn
            .replay_pointer()
            .unwrap_or_else(|e| warn!("could not replay pointer: {}", e));
    }

    /// Applies a configure request to a floating client, keeping its
    /// current geometry for any field the request leaves out.
    fn configure_floating(&mut self, data: ConfigureRequestData) {
        let id = data.id;
        if !self.desktop.locate(id).map(|f| f.is_floating()).unwrap_or(false) {
            return
        }

        let cur = match self.conn.get_geometry(id) {
            Ok(g) => g,
            Err(e) => {
                debug!("could not get geometry of {}: {}", id, e);
                return
            }
        };
        let geom = Geometry {
            x: data.x.unwrap_or(cur.x),
            y: data.y.unwrap_or(cur.y),
            width: data.width.unwrap_or(cur.width),
            height: data.height.unwrap_or(cur.height),
        };

        debug!("configuring floating window {} to {:?}", id, geom);
        self.conn
            .configure_window(id, &[ClientConfig::Position(geom)])
            .unwrap_or_else(|e| warn!("could not configure {}: {}", id, e));
    }

    //* Bar

    /// Re-reads the root window's name into the status string.
    pub fn update_status(&mut self) {
        self.bar.status = self.conn.get_wm_name(self.root);
        self.render_bar();
    }

    pub(crate) fn bar_content(&self) -> BarContent {
        let ws = self.desktop.active_workspace();
        BarContent {
            title: self
                .desktop
                .current_client()
                .and_then(|c| c.name().map(String::from)),
            has_prev: ws.prev().is_some(),
            has_next: ws.next().is_some(),
            workspaces: self.desktop.workspace_count(),
            status: self.bar.status.clone(),
        }
    }

    pub(crate) fn render_bar(&mut self) {
        let content = self.bar_content();
        self.bar
            .render(&self.conn, &content, self.screen.width, &self.config)
            .unwrap_or_else(|e| warn!("could not render bar: {}", e));
    }

    //* Layout

    pub(crate) fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            screen: self.screen,
            bar_height: self.bar.height,
            border_width: self.config.border_width as i32,
        }
    }

    /// Lays out the active workspace, then redraws the bar.
    pub fn relayout(&mut self) {
        let actions = gen_layout(&self.desktop, self.desktop.active(), &self.layout_params());
        for action in actions {
            self.apply(action);
        }
        self.render_bar();
    }

    fn apply(&self, action: LayoutAction) {
        use LayoutAction::*;

        let res = match action {
            Border { id, style } => {
                let colour = match style {
                    BorderStyle::Focused => self.config.border_focus,
                    BorderStyle::Unfocused => self.config.border_color,
                };
                self.conn.change_window_attributes(id, &[ClientAttrs::BorderColour(colour)])
            }
            Lower(id) => self
                .conn
                .configure_window(id, &[ClientConfig::StackingMode(StackMode::Below)]),
            Raise(id) => self
                .conn
                .configure_window(id, &[ClientConfig::StackingMode(StackMode::Above)]),
            GrabButtons(id) => self.conn.grab_button(id),
            Resize { id, geom } => self.conn.configure_window(id, &[ClientConfig::Position(geom)]),
            Focus(id) => self
                .conn
                .set_input_focus(id)
                .and_then(|_| self.conn.ungrab_button(id)),
        };

        res.unwrap_or_else(|e| warn!("could not apply {:?}: {}", action, e));
    }

    fn map_workspace(&self, ws: WorkspaceId) {
        for id in self.desktop.tiled(ws) {
            self.conn
                .map_window(id)
                .unwrap_or_else(|e| warn!("could not map {}: {}", id, e));
        }
        for id in self.desktop.floating(ws) {
            self.conn
                .map_window(id)
                .and_then(|_| {
                    self.conn
                        .configure_window(id, &[ClientConfig::StackingMode(StackMode::Above)])
                })
                .unwrap_or_else(|e| warn!("could not map {}: {}", id, e));
        }
    }

    fn unmap_workspace(&self, ws: WorkspaceId) {
        for id in self.desktop.windows_of(ws) {
            self.conn
                .unmap_window(id)
                .unwrap_or_else(|e| warn!("could not unmap {}: {}", id, e));
        }
    }
}
