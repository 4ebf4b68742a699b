//! Type definitions for various input types defined
//! by the X server protocol.

use std::convert::TryFrom;

use bitflags::bitflags;

use super::core::XError;

//* Re-exports
pub mod keysym {
    pub type KeySym = u32;
    pub use x11::keysym::*;
}

/// A keycode as received from the X server.
pub type KeyCode = u8;

bitflags! {
    /// Bitmask representing one or a combination of modifier keys.
    ///
    /// See definition in the X Server Protocol.
    pub struct ModMask: u16 {
        /// The Shift key.
        const SHIFT   = 1 << 0;
        /// The Capslock key.
        const LOCK    = 1 << 1;
        /// The Control key.
        const CONTROL = 1 << 2;
        /// The Alt key.
        const MOD1    = 1 << 3;
        /// The Numlock key.
        const MOD2    = 1 << 4;
        const MOD3    = 1 << 5;
        /// The Super/Meta/Windows key.
        const MOD4    = 1 << 6;
        const MOD5    = 1 << 7;
    }
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonIndex {
    Left,
    Middle,
    Right,
    Button4,
    Button5,
}

impl TryFrom<u8> for ButtonIndex {
    type Error = XError;

    fn try_from(from: u8) -> Result<Self, XError> {
        use ButtonIndex::*;

        match from {
            1 => Ok(Left),
            2 => Ok(Middle),
            3 => Ok(Right),
            4 => Ok(Button4),
            5 => Ok(Button5),
            n => Err(XError::OtherError(format!("unknown button {}", n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modmask_exact() {
        let state = ModMask::from_bits_truncate(0x40 | 0x10);

        assert!(state.contains(ModMask::MOD4));
        assert_ne!(state, ModMask::MOD4);
        assert_eq!(ModMask::from_bits_truncate(0x40), ModMask::MOD4);
    }

    #[test]
    fn test_button_index() {
        assert_eq!(ButtonIndex::try_from(3), Ok(ButtonIndex::Right));
        assert!(ButtonIndex::try_from(9).is_err());
    }
}
