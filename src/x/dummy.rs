//! A fake X connection for testing the window manager.
//!
//! `DummyConn` keeps a tiny model of the server: a set of windows with
//! geometry, map state and names, plus a scripted event queue. Every
//! request is recorded so tests can check what the window manager
//! asked for. Requests against windows that do not exist fail the way
//! a real server would, after being recorded.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use super::core::{CursorID, Result, WindowAttributes, XCore, XError, XWindowID};
use super::event::XEvent;
use super::input::{keysym::KeySym, KeyCode};
use super::render::{Renderer, TextExtents};
use crate::bindings::Keybind;
use crate::types::{ClientAttrs, ClientConfig, Color, Geometry, Point};

/// Every glyph of the dummy font is this wide.
pub const GLYPH_WIDTH: i32 = 6;

/// A request issued against the dummy server.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Map(XWindowID),
    Unmap(XWindowID),
    Configure(XWindowID, Vec<ClientConfig>),
    ChangeAttributes(XWindowID, Vec<ClientAttrs>),
    Focus(XWindowID),
    Kill(XWindowID),
    GrabKey(Keybind),
    GrabButton(XWindowID),
    UngrabButton(XWindowID),
    GrabPointer(XWindowID, CursorID),
    UngrabPointer,
    ReplayPointer,
    Warp(Point),
    SetName(XWindowID, String),
    Clear(XWindowID),
    DrawText(XWindowID, Point, String),
}

impl Request {
    /// The window the request targets, if any.
    pub fn window(&self) -> Option<XWindowID> {
        use Request::*;

        match self {
            Map(w) | Unmap(w) | Configure(w, _) | ChangeAttributes(w, _) | Focus(w) | Kill(w)
            | GrabButton(w) | UngrabButton(w) | GrabPointer(w, _) | SetName(w, _) | Clear(w)
            | DrawText(w, ..) => Some(*w),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DummyWindow {
    pub geom: Geometry,
    pub border: u32,
    pub mapped: bool,
    pub override_redirect: bool,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct DummyConn {
    root: XWindowID,
    screen: Geometry,
    next_id: Cell<XWindowID>,
    root_name: RefCell<Option<String>>,
    windows: RefCell<BTreeMap<XWindowID, DummyWindow>>,
    events: RefCell<VecDeque<XEvent>>,
    requests: RefCell<Vec<Request>>,
    /// Makes every pointer grab fail.
    pub refuse_grabs: Cell<bool>,
}

impl DummyConn {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            root: 1,
            screen: Geometry::new(0, 0, width, height),
            next_id: Cell::new(100),
            root_name: RefCell::new(None),
            windows: RefCell::new(BTreeMap::new()),
            events: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
            refuse_grabs: Cell::new(false),
        }
    }

    fn alloc_id(&self) -> XWindowID {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Creates an unmapped client window, as an application would.
    pub fn add_window(&self, name: Option<&str>, geom: Geometry) -> XWindowID {
        let id = self.alloc_id();
        self.windows.borrow_mut().insert(id, DummyWindow {
            geom,
            name: name.map(String::from),
            ..Default::default()
        });
        id
    }

    /// Creates a window that is already on screen.
    pub fn add_mapped_window(&self, name: Option<&str>, override_redirect: bool) -> XWindowID {
        let id = self.add_window(name, Geometry::new(0, 0, 100, 100));
        if let Some(w) = self.windows.borrow_mut().get_mut(&id) {
            w.mapped = true;
            w.override_redirect = override_redirect;
        }
        id
    }

    /// Removes a window from the server without telling anyone.
    pub fn destroy(&self, id: XWindowID) {
        self.windows.borrow_mut().remove(&id);
    }

    pub fn set_name(&self, id: XWindowID, name: &str) {
        if id == self.root {
            *self.root_name.borrow_mut() = Some(name.into());
        } else if let Some(w) = self.windows.borrow_mut().get_mut(&id) {
            w.name = Some(name.into());
        }
    }

    pub fn push_event(&self, event: XEvent) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn window(&self, id: XWindowID) -> Option<DummyWindow> {
        self.windows.borrow().get(&id).cloned()
    }

    pub fn is_mapped(&self, id: XWindowID) -> bool {
        self.window(id).map(|w| w.mapped).unwrap_or(false)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// The number of requests recorded so far, usable as a mark for
    /// [`requests_since`](DummyConn::requests_since).
    pub fn mark(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests_since(&self, mark: usize) -> Vec<Request> {
        self.requests.borrow()[mark..].to_vec()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn record(&self, req: Request) {
        self.requests.borrow_mut().push(req);
    }

    fn with_window<T>(
        &self,
        id: XWindowID,
        f: impl FnOnce(&mut DummyWindow) -> T,
    ) -> Result<T> {
        self.windows
            .borrow_mut()
            .get_mut(&id)
            .map(f)
            .ok_or_else(|| XError::ServerError(format!("BadWindow {}", id)))
    }

    fn is_window(&self, id: XWindowID) -> Result<()> {
        if id == self.root {
            Ok(())
        } else {
            self.with_window(id, |_| ())
        }
    }
}

impl XCore for DummyConn {
    fn wait_for_event(&self) -> Result<XEvent> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| XError::Connection("connection closed".into()))
    }

    fn root(&self) -> XWindowID {
        self.root
    }

    fn root_geometry(&self) -> Geometry {
        self.screen
    }

    fn query_tree(&self, _window: XWindowID) -> Result<Vec<XWindowID>> {
        Ok(self.windows.borrow().keys().copied().collect())
    }

    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes> {
        self.with_window(window, |w| WindowAttributes {
            override_redirect: w.override_redirect,
            viewable: w.mapped,
        })
    }

    fn get_geometry(&self, window: XWindowID) -> Result<Geometry> {
        if window == self.root {
            return Ok(self.screen)
        }
        self.with_window(window, |w| w.geom)
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }

    fn map_window(&self, window: XWindowID) -> Result<()> {
        self.record(Request::Map(window));
        self.with_window(window, |w| w.mapped = true)
    }

    fn unmap_window(&self, window: XWindowID) -> Result<()> {
        self.record(Request::Unmap(window));
        self.with_window(window, |w| w.mapped = false)
    }

    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()> {
        self.record(Request::Configure(window, attrs.to_vec()));
        self.with_window(window, |w| {
            for attr in attrs {
                match *attr {
                    ClientConfig::BorderWidth(b) => w.border = b,
                    ClientConfig::Position(g) => w.geom = g,
                    ClientConfig::Resize { w: width, h } => {
                        w.geom.width = width;
                        w.geom.height = h;
                    }
                    ClientConfig::Move { x, y } => {
                        w.geom.x = x;
                        w.geom.y = y;
                    }
                    ClientConfig::StackingMode(_) => {}
                }
            }
        })
    }

    fn change_window_attributes(&self, window: XWindowID, attrs: &[ClientAttrs]) -> Result<()> {
        self.record(Request::ChangeAttributes(window, attrs.to_vec()));
        self.is_window(window)
    }

    fn set_input_focus(&self, window: XWindowID) -> Result<()> {
        self.record(Request::Focus(window));
        self.is_window(window)
    }

    fn kill_client(&self, window: XWindowID) -> Result<()> {
        self.record(Request::Kill(window));
        self.is_window(window)
    }

    fn create_window(&self, geom: Geometry, _background: Color) -> Result<XWindowID> {
        let id = self.alloc_id();
        self.windows.borrow_mut().insert(id, DummyWindow {
            geom,
            override_redirect: true,
            ..Default::default()
        });
        Ok(id)
    }

    fn create_cursor(&self, glyph: u16) -> Result<CursorID> {
        Ok(glyph as CursorID)
    }

    fn get_wm_name(&self, window: XWindowID) -> Option<String> {
        if window == self.root {
            return self.root_name.borrow().clone()
        }
        self.windows.borrow().get(&window).and_then(|w| w.name.clone())
    }

    fn set_wm_name(&self, window: XWindowID, name: &str) -> Result<()> {
        self.record(Request::SetName(window, name.into()));
        self.set_name(window, name);
        Ok(())
    }

    /// Latin-1 keysyms map to their own low byte.
    fn keysym_to_keycode(&self, keysym: KeySym) -> Result<Option<KeyCode>> {
        Ok(KeyCode::try_from(keysym).ok())
    }

    fn grab_key(&self, bind: Keybind, _window: XWindowID) -> Result<()> {
        self.record(Request::GrabKey(bind));
        Ok(())
    }

    fn grab_button(&self, window: XWindowID) -> Result<()> {
        self.record(Request::GrabButton(window));
        self.is_window(window)
    }

    fn ungrab_button(&self, window: XWindowID) -> Result<()> {
        self.record(Request::UngrabButton(window));
        self.is_window(window)
    }

    fn grab_pointer(&self, window: XWindowID, cursor: CursorID) -> Result<()> {
        self.record(Request::GrabPointer(window, cursor));
        if self.refuse_grabs.get() {
            return Err(XError::ServerError("pointer grab refused".into()))
        }
        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.record(Request::UngrabPointer);
        Ok(())
    }

    fn replay_pointer(&self) -> Result<()> {
        self.record(Request::ReplayPointer);
        Ok(())
    }

    fn warp_pointer(&self, pt: Point) -> Result<()> {
        self.record(Request::Warp(pt));
        Ok(())
    }
}

impl Renderer for DummyConn {
    fn text_extents(&self, text: &str) -> TextExtents {
        TextExtents {
            x: 0,
            y: 11,
            width: GLYPH_WIDTH * text.chars().count() as i32,
            height: 14,
        }
    }

    fn clear(&self, window: XWindowID) -> Result<()> {
        self.record(Request::Clear(window));
        self.is_window(window)
    }

    fn draw_text(&self, window: XWindowID, at: Point, text: &str) -> Result<()> {
        self.record(Request::DrawText(window, at, text.into()));
        self.is_window(window)
    }
}
