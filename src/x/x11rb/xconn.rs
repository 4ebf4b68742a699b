//! Implementation of the XCore trait for X11RBConn.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    self, Allow, AtomEnum, ButtonIndex, ConnectionExt as XConnectionExt, EventMask, GrabMode,
    GrabStatus, MapState, PropMode,
};

use tracing::instrument;
use tracing::{error, trace};

use super::convert::{convert_configure, convert_cws};
use super::{Initialized, X11RBConn, MAX_LONG_LENGTH};
use crate::bindings::Keybind;
use crate::types::{ClientAttrs, ClientConfig, Color, Geometry, Point};
use crate::x::{
    core::{CursorID, Result, WindowAttributes, XCore, XError, XWindowID},
    event::XEvent,
    input::{keysym::KeySym, KeyCode},
};

macro_rules! client_button_grab_mask {
    () => {
        EventMask::BUTTON_PRESS
    };
}

macro_rules! pointer_grab_mask {
    () => {
        EventMask::BUTTON_PRESS | EventMask::POINTER_MOTION
    };
}

macro_rules! owned_window_mask {
    () => {
        EventMask::EXPOSURE | EventMask::BUTTON_PRESS
    };
}

impl XCore for X11RBConn<Initialized> {
    //* General X server operations
    #[cfg_attr(
        debug_assertions,
        instrument(target = "xconn", level = "trace", skip(self))
    )]
    fn wait_for_event(&self) -> Result<XEvent> {
        self.conn.flush()?;

        let event = self.conn.wait_for_event()?;
        Ok(self.process_raw_event(event))
    }

    fn root(&self) -> XWindowID {
        self.root
    }

    fn root_geometry(&self) -> Geometry {
        self.root_geom
    }

    fn query_tree(&self, window: XWindowID) -> Result<Vec<XWindowID>> {
        trace!("Querying tree");

        Ok(self.conn.query_tree(window)?.reply()?.children)
    }

    fn get_window_attributes(&self, window: XWindowID) -> Result<WindowAttributes> {
        let reply = self.conn.get_window_attributes(window)?.reply()?;

        Ok(WindowAttributes {
            override_redirect: reply.override_redirect,
            viewable: reply.map_state == MapState::VIEWABLE,
        })
    }

    fn get_geometry(&self, window: XWindowID) -> Result<Geometry> {
        self.get_geometry_inner(window)
    }

    fn sync(&self) -> Result<()> {
        self.conn.get_input_focus()?.reply()?;
        Ok(())
    }

    //* Window-related operations
    fn map_window(&self, window: XWindowID) -> Result<()> {
        trace!("Mapping window {}", window);

        let cookie = self.conn.map_window(window)?.check();
        if let Err(e) = cookie {
            error!("Could not map window {}: {}", window, e);
            Err(e.into())
        } else {
            Ok(())
        }
    }

    fn unmap_window(&self, window: XWindowID) -> Result<()> {
        trace!("Unmapping window {}", window);

        let cookie = self.conn.unmap_window(window)?.check();
        if let Err(e) = cookie {
            error!("Could not unmap window {}: {}", window, e);
            Err(e.into())
        } else {
            Ok(())
        }
    }

    fn configure_window(&self, window: XWindowID, attrs: &[ClientConfig]) -> Result<()> {
        trace!("Configuring window {} with attrs {:?}", window, attrs);

        let aux = convert_configure(attrs);
        Ok(self.conn.configure_window(window, &aux)?.check()?)
    }

    fn change_window_attributes(&self, window: XWindowID, attrs: &[ClientAttrs]) -> Result<()> {
        trace!("Changing window attributes");

        let attrs = convert_cws(attrs);
        Ok(self
            .conn
            .change_window_attributes(window, &attrs)?
            .check()?)
    }

    fn set_input_focus(&self, window: XWindowID) -> Result<()> {
        trace!("Setting focus for window {}", window);
        self.conn
            .set_input_focus(
                xproto::InputFocus::POINTER_ROOT,
                window,
                x11rb::CURRENT_TIME,
            )?
            .check()?;
        Ok(())
    }

    fn kill_client(&self, window: XWindowID) -> Result<()> {
        trace!("Killing client of window {}", window);

        Ok(self.conn.kill_client(window)?.check()?)
    }

    #[instrument(target = "xconn", level = "trace", skip(self))]
    fn create_window(&self, geom: Geometry, background: Color) -> Result<XWindowID> {
        use xproto::{CreateWindowAux, WindowClass};

        let data = CreateWindowAux::new()
            .background_pixel(background)
            .override_redirect(1)
            .event_mask(owned_window_mask!());

        let wid = self.conn.generate_id()?;
        self.conn
            .create_window(
                x11rb::COPY_DEPTH_FROM_PARENT,
                wid,
                self.root,
                geom.x as i16,
                geom.y as i16,
                geom.width as u16,
                geom.height as u16,
                0,
                WindowClass::INPUT_OUTPUT,
                x11rb::COPY_FROM_PARENT,
                &data,
            )?
            .check()?;

        Ok(wid)
    }

    fn create_cursor(&self, glyph: u16) -> Result<CursorID> {
        self.create_cursor_inner(glyph)
    }

    //* Properties
    fn get_wm_name(&self, window: XWindowID) -> Option<String> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::ANY,
                // start at offset 0
                0,
                // allow for up to 4 * MAX_LONG_LENGTH bytes of information
                MAX_LONG_LENGTH,
            )
            .ok()?
            .reply()
            .ok()?;

        if reply.type_ == x11rb::NONE {
            trace!("window {} has no name", window);
            return None
        }

        Some(
            String::from_utf8_lossy(&reply.value)
                .trim_end_matches('\0')
                .to_string(),
        )
    }

    fn set_wm_name(&self, window: XWindowID, name: &str) -> Result<()> {
        let bytes = name.as_bytes();

        Ok(self
            .conn
            .change_property(
                PropMode::REPLACE,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                8,
                bytes.len() as u32,
                bytes,
            )?
            .check()?)
    }

    //* Input
    fn keysym_to_keycode(&self, keysym: KeySym) -> Result<Option<KeyCode>> {
        Ok(self.keymap.lookup(keysym))
    }

    fn grab_key(&self, kb: Keybind, window: XWindowID) -> Result<()> {
        trace!("Grabbing key {} for window {}", kb.code, window);

        self.conn
            .grab_key(
                false,
                window,
                kb.modmask.into(),
                kb.code,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )
            .map_err(|_| {
                XError::ServerError(format!(
                    "Unable to grab key {} for window {}",
                    kb.code, window
                ))
            })?
            .check()?;

        Ok(())
    }

    fn grab_button(&self, window: XWindowID) -> Result<()> {
        trace!("Grabbing buttons for window: {}", window);

        self.conn
            .grab_button(
                false,
                window,
                client_button_grab_mask!(),
                GrabMode::SYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                ButtonIndex::ANY,
                xproto::ModMask::ANY,
            )
            .map_err(|_| {
                XError::ServerError(format!("Unable to grab buttons for window {}", window))
            })?
            .check()?;

        Ok(())
    }

    fn ungrab_button(&self, window: XWindowID) -> Result<()> {
        trace!("Ungrabbing buttons for window {}", window);

        Ok(self
            .conn
            .ungrab_button(ButtonIndex::ANY, window, xproto::ModMask::ANY)?
            .check()?)
    }

    fn grab_pointer(&self, window: XWindowID, cursor: CursorID) -> Result<()> {
        trace!("Grabbing pointer for window: {:?}", window);

        let reply = self
            .conn
            .grab_pointer(
                false,
                window,
                pointer_grab_mask!(),
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                x11rb::CURRENT_TIME,
            )?
            .reply()?;

        if reply.status != GrabStatus::SUCCESS {
            return Err(XError::ServerError(format!(
                "pointer grab refused: {:?}",
                reply.status
            )))
        }

        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        trace!("Ungrabbing pointer");

        self.conn.ungrab_pointer(x11rb::CURRENT_TIME)?.check()?;

        Ok(())
    }

    fn replay_pointer(&self) -> Result<()> {
        Ok(self
            .conn
            .allow_events(Allow::REPLAY_POINTER, x11rb::CURRENT_TIME)?
            .check()?)
    }

    fn warp_pointer(&self, pt: Point) -> Result<()> {
        trace!("Warping pointer to {:?}", pt);

        Ok(self
            .conn
            .warp_pointer(x11rb::NONE, self.root, 0, 0, 0, 0, pt.x as i16, pt.y as i16)?
            .check()?)
    }
}
