use core::marker::PhantomData;

use std::fmt;

use x11rb::connection::Connection;
use x11rb::protocol::{
    xproto::{self, ConnectionExt as XConnectionExt},
    Event,
};
use x11rb::rust_connection::RustConnection;

use tracing::{debug, trace};

use super::{
    core::{Result, XError, XWindowID},
    event::{
        ButtonEvent, ConfigureRequestData, KeypressEvent, PropertyEvent, XEvent,
    },
    input::{ButtonIndex, ModMask},
    ConnStatus, Initialized, Uninitialized,
};
use crate::bindings::Keymap;
use crate::types::{Color, Geometry, Point};

mod convert;
mod render;
mod xconn;

const MAX_LONG_LENGTH: u32 = 1024;

/// A connection to an X server, backed by the x11rb library.
///
/// This is a very simple connection to the X server
/// and is completely synchronous, despite the async capabilities
/// of the underlying library.
///
/// It implements [XConn][1] and thus can be used with a
/// [WindowManager][2].
///
/// # Usage
///
/// ```no_run
/// use tsukiwm::x::x11rb::X11RBConn;
///
/// let conn = X11RBConn::connect().expect("Connection error");
/// let conn = conn.init("fixed", 0xffffff, 0x000000).expect("Could not initialize");
/// ```
///
/// [1]: crate::x::core::XConn
/// [2]: crate::manager::WindowManager
pub struct X11RBConn<S: ConnStatus> {
    conn: RustConnection,
    root: XWindowID,
    root_geom: Geometry,
    idx: usize,
    /// Graphics context holding the text font and colours.
    gc: u32,
    font: u32,
    keymap: Keymap,
    _marker: PhantomData<S>,
}

impl X11RBConn<Uninitialized> {
    /// Connect to the X server and allocate a new Connection.
    pub fn connect() -> Result<Self> {
        let (conn, idx) = x11rb::connect(None)?;
        trace!("Connected to x server, got preferred screen {}", idx);

        Ok(Self {
            conn,
            root: 0,
            root_geom: Geometry::zeroed(),
            idx,
            gc: 0,
            font: 0,
            keymap: Keymap::default(),
            _marker: PhantomData,
        })
    }

    /// Initializes the connection.
    ///
    /// It does the following:
    ///
    /// - Finds the root window of the preferred screen and its size.
    /// - Opens the core font used for text and creates a graphics
    ///   context drawing in `fg` over `bg`.
    /// - Reads the keyboard mapping.
    pub fn init(self, font: &str, bg: Color, fg: Color) -> Result<X11RBConn<Initialized>> {
        let (root, width, height) = match self.conn.setup().roots.get(self.idx) {
            Some(screen) => (
                screen.root,
                screen.width_in_pixels as i32,
                screen.height_in_pixels as i32,
            ),
            None => return Err(XError::NoScreens),
        };
        trace!("Got root: {}", root);

        let fid = self.conn.generate_id()?;
        self.conn
            .open_font(fid, font.as_bytes())?
            .check()
            .map_err(|_| XError::Font(font.into()))?;

        let gc = self.conn.generate_id()?;
        self.conn
            .create_gc(
                gc,
                root,
                &xproto::CreateGCAux::new()
                    .foreground(fg)
                    .background(bg)
                    .font(fid),
            )?
            .check()?;

        let keymap = self.keymap()?;

        Ok(X11RBConn {
            conn: self.conn,
            root,
            root_geom: Geometry::new(0, 0, width, height),
            idx: self.idx,
            gc,
            font: fid,
            keymap,
            _marker: PhantomData,
        })
    }

    fn keymap(&self) -> Result<Keymap> {
        let setup = self.conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);

        let reply = self
            .conn
            .get_keyboard_mapping(min, max - min + 1)?
            .reply()?;
        debug!(
            "got {} keysyms, {} per keycode",
            reply.keysyms.len(),
            reply.keysyms_per_keycode
        );

        Ok(Keymap::from_mapping(min, reply.keysyms_per_keycode, &reply.keysyms))
    }
}

impl<S: ConnStatus> X11RBConn<S> {
    #[inline]
    pub(crate) fn get_geometry_inner(&self, window: XWindowID) -> Result<Geometry> {
        trace!("Getting geometry for window {}", window);

        // send the request and grab its reply
        Ok(self.conn.get_geometry(window)?.reply().map(|ok| Geometry {
            // map the ok result into a Geometry
            x: ok.x as i32,
            y: ok.y as i32,
            height: ok.height as i32,
            width: ok.width as i32,
        })?)
    }

    #[inline]
    pub(crate) fn create_cursor_inner(&self, glyph: u16) -> Result<u32> {
        trace!("creating cursor");

        let fid = self.conn.generate_id()?;
        self.conn.open_font(fid, "cursor".as_bytes())?.check()?;

        let cid = self.conn.generate_id()?;
        self.conn
            .create_glyph_cursor(
                cid,
                fid,
                fid,
                glyph,
                glyph + 1,
                0,
                0,
                0,
                0xffff,
                0xffff,
                0xffff,
            )?
            .check()?;

        self.conn.close_font(fid)?;

        Ok(cid)
    }
}

impl X11RBConn<Initialized> {
    /// Shortcut static method for directly creating
    /// an initialized connection.
    pub fn new(font: &str, bg: Color, fg: Color) -> Result<Self> {
        X11RBConn::connect()?.init(font, bg, fg)
    }

    /// Exposes `X11RBConn`'s internal connection.
    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    /// Converts a raw event. Failures to query the server about the
    /// event's window turn the event into [`XEvent::Unknown`], since
    /// the window may be gone by the time the event is read.
    fn process_raw_event(&self, event: Event) -> XEvent {
        match event {
            Event::ConfigureRequest(req) => {
                use xproto::ConfigWindow as CWMask;

                let vmask = req.value_mask;
                let field = |bit: CWMask, val: i32| vmask.contains(bit).then_some(val);

                XEvent::ConfigureRequest(ConfigureRequestData {
                    id: req.window,
                    x: field(CWMask::X, req.x as i32),
                    y: field(CWMask::Y, req.y as i32),
                    width: field(CWMask::WIDTH, req.width as i32),
                    height: field(CWMask::HEIGHT, req.height as i32),
                })
            }
            Event::MapRequest(req) => {
                let attrs = self
                    .conn
                    .get_window_attributes(req.window)
                    .map_err(XError::from)
                    .and_then(|c| c.reply().map_err(XError::from));

                match attrs {
                    Ok(attrs) => XEvent::MapRequest(req.window, attrs.override_redirect),
                    Err(e) => XEvent::Unknown(format!("map request for {}: {}", req.window, e)),
                }
            }
            Event::DestroyNotify(event) => XEvent::DestroyNotify(event.window),
            Event::PropertyNotify(event) => XEvent::PropertyNotify(PropertyEvent {
                id: event.window,
                atom: event.atom,
                is_root: event.window == self.root,
            }),
            Event::Expose(event) if event.count == 0 => XEvent::Expose(event.window),
            Event::KeyPress(event) => XEvent::KeyPress(KeypressEvent {
                mask: ModMask::from_bits_truncate(u16::from(event.state)),
                keycode: event.detail,
            }),
            Event::ButtonPress(event) => match ButtonIndex::try_from(event.detail) {
                Ok(button) => XEvent::ButtonPress(ButtonEvent {
                    id: event.event,
                    button,
                    rel: Point::new(event.event_x as i32, event.event_y as i32),
                    abs: Point::new(event.root_x as i32, event.root_y as i32),
                }),
                Err(_) => XEvent::Unknown(format!("button {}", event.detail)),
            },
            Event::MotionNotify(event) => {
                XEvent::MotionNotify(Point::new(event.root_x as i32, event.root_y as i32))
            }
            Event::Error(e) => XEvent::Error(format!("{:?}", e)),
            unk => XEvent::Unknown(format!("{:?}", unk)),
        }
    }
}

impl<S: ConnStatus> fmt::Debug for X11RBConn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11RBConn")
            .field("root", &self.root)
            .field("idx", &self.idx)
            .field("gc", &self.gc)
            .field("font", &self.font)
            .finish()
    }
}
