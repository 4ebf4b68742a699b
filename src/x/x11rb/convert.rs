//! Conversions between tsukiwm and x11rb types.

use x11rb::errors;
use x11rb::protocol::xproto::{self, ChangeWindowAttributesAux, ConfigureWindowAux, EventMask};

use crate::types::{ClientAttrs, ClientConfig, StackMode};
use crate::x::{core::XError, input::ModMask};

//* modifier key conversions
#[doc(hidden)]
impl From<ModMask> for xproto::ModMask {
    fn from(from: ModMask) -> xproto::ModMask {
        xproto::ModMask::from(from.bits())
    }
}

#[doc(hidden)]
impl From<xproto::ModMask> for ModMask {
    fn from(from: xproto::ModMask) -> ModMask {
        ModMask::from_bits_truncate(u16::from(from))
    }
}

/// Folds a list of changes into a single ConfigureWindow request.
pub(super) fn convert_configure(attrs: &[ClientConfig]) -> ConfigureWindowAux {
    use ClientConfig::*;

    attrs.iter().fold(ConfigureWindowAux::new(), |cw, attr| match *attr {
        BorderWidth(px) => cw.border_width(px),
        Position(geom) => cw
            .x(geom.x)
            .y(geom.y)
            .width(geom.width.max(1) as u32)
            .height(geom.height.max(1) as u32),
        Resize { h, w } => cw.height(h.max(1) as u32).width(w.max(1) as u32),
        Move { x, y } => cw.x(x).y(y),
        StackingMode(StackMode::Above) => cw.stack_mode(xproto::StackMode::ABOVE),
        StackingMode(StackMode::Below) => cw.stack_mode(xproto::StackMode::BELOW),
    })
}

macro_rules! client_event_mask {
    () => {
        EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY
    };
}

macro_rules! root_event_mask {
    () => {
        EventMask::PROPERTY_CHANGE
            | EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
    };
}

pub(super) fn convert_cws(attrs: &[ClientAttrs]) -> ChangeWindowAttributesAux {
    use ClientAttrs::*;

    let new = ChangeWindowAttributesAux::new();
    attrs.iter().fold(new, |cw, attr| match *attr {
        BorderColour(px) => cw.border_pixel(px),
        Background(px) => cw.background_pixel(px),
        ClientEventMask => cw.event_mask(client_event_mask!()),
        RootEventMask => cw.event_mask(root_event_mask!()),
        Cursor(c) => cw.cursor(c),
    })
}

//* error conversions
impl From<errors::ConnectionError> for XError {
    fn from(e: errors::ConnectionError) -> XError {
        use errors::ConnectionError::*;
        match e {
            UnknownError | InsufficientMemory | FdPassingFailed => {
                XError::Connection(e.to_string())
            }
            IoError(e) => XError::Connection(e.to_string()),
            other => XError::Protocol(other.to_string()),
        }
    }
}

impl From<errors::ConnectError> for XError {
    fn from(e: errors::ConnectError) -> XError {
        XError::Connection(e.to_string())
    }
}

impl From<errors::ReplyError> for XError {
    fn from(e: errors::ReplyError) -> XError {
        match e {
            errors::ReplyError::ConnectionError(e) => e.into(),
            errors::ReplyError::X11Error(e) => XError::ServerError(format!("{:?}", e.error_kind)),
        }
    }
}

impl From<errors::ReplyOrIdError> for XError {
    fn from(e: errors::ReplyOrIdError) -> XError {
        match e {
            errors::ReplyOrIdError::ConnectionError(e) => e.into(),
            other => XError::ServerError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Geometry;

    #[test]
    fn test_modmask_roundtrip_bits() {
        let mask = ModMask::MOD4 | ModMask::SHIFT;
        let x: xproto::ModMask = mask.into();

        assert_eq!(u16::from(x), mask.bits());
        assert_eq!(ModMask::from(x), mask);
    }

    #[test]
    fn test_configure_folds_all_changes() {
        let aux = convert_configure(&[
            ClientConfig::BorderWidth(0),
            ClientConfig::Position(Geometry::new(0, 0, 1280, 800)),
            ClientConfig::StackingMode(StackMode::Above),
        ]);

        assert_eq!(aux.border_width, Some(0));
        assert_eq!(aux.width, Some(1280));
        assert_eq!(aux.height, Some(800));
        assert_eq!(aux.stack_mode, Some(xproto::StackMode::ABOVE));
    }

    #[test]
    fn test_degenerate_sizes_are_clamped() {
        let aux = convert_configure(&[ClientConfig::Resize { w: -4, h: 0 }]);

        assert_eq!(aux.width, Some(1));
        assert_eq!(aux.height, Some(1));
    }
}
