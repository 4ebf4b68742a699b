//! Text drawing with a core X font.

use x11rb::protocol::xproto::{Char2b, ConnectionExt as XConnectionExt};

use tracing::{trace, warn};

use super::{Initialized, X11RBConn};
use crate::types::Point;
use crate::x::{
    core::{Result, XWindowID},
    render::{Renderer, TextExtents},
};

/// Core fonts only cover Latin-1, everything else draws as '?'.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl Renderer for X11RBConn<Initialized> {
    fn text_extents(&self, text: &str) -> TextExtents {
        let chars: Vec<Char2b> = latin1(text)
            .into_iter()
            .map(|b| Char2b { byte1: 0, byte2: b })
            .collect();

        let reply = match self
            .conn
            .query_text_extents(self.font, &chars)
            .map_err(crate::x::XError::from)
            .and_then(|c| c.reply().map_err(crate::x::XError::from))
        {
            Ok(r) => r,
            Err(e) => {
                warn!("could not measure text: {}", e);
                return TextExtents::default()
            }
        };

        TextExtents {
            x: -reply.overall_left,
            y: reply.font_ascent as i32,
            width: reply.overall_width,
            height: (reply.font_ascent + reply.font_descent) as i32,
        }
    }

    fn clear(&self, window: XWindowID) -> Result<()> {
        Ok(self.conn.clear_area(false, window, 0, 0, 0, 0)?.check()?)
    }

    fn draw_text(&self, window: XWindowID, at: Point, text: &str) -> Result<()> {
        trace!("drawing {:?} at {:?}", text, at);

        let mut bytes = latin1(text);
        // ImageText8 takes at most 255 bytes
        bytes.truncate(u8::MAX as usize);

        Ok(self
            .conn
            .image_text8(window, self.gc, at.x as i16, at.y as i16, &bytes)?
            .check()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_replaces_wide_chars() {
        assert_eq!(latin1("aé日"), vec![b'a', 0xe9, b'?']);
    }
}
