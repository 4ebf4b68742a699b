//! Key bindings and keysym resolution.

use std::collections::HashMap;

use strum::{EnumIter, IntoStaticStr};
use tracing::{debug, warn};

use crate::x::{
    core::XCore,
    event::KeypressEvent,
    input::{keysym::KeySym, KeyCode, ModMask},
};

/// A key combination: an exact modifier state plus a keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keybind {
    pub modmask: ModMask,
    pub code: KeyCode,
}

impl From<KeypressEvent> for Keybind {
    fn from(from: KeypressEvent) -> Keybind {
        Keybind {
            modmask: from.mask,
            code: from.keycode,
        }
    }
}

/// The actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum KeyAction {
    /// Maximize the focused client until the next key press.
    Fullscreen,
    /// Interactively move or resize the focused floating client.
    MoveResize,
    /// Nudge the focused client into repainting itself.
    Redraw,
    /// Move the focused client between the tiled and floating lists.
    ToggleFloat,
}

/// Key bindings resolved to keycodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keybinds {
    binds: HashMap<Keybind, KeyAction>,
}

impl Keybinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves each keysym through the server's keyboard mapping.
    ///
    /// Keysyms with no keycode on the current keyboard are skipped.
    pub fn resolve<X: XCore>(
        conn: &X,
        modmask: ModMask,
        keys: &[(KeySym, KeyAction)],
    ) -> Self {
        let mut binds = Self::new();

        for &(sym, action) in keys {
            match conn.keysym_to_keycode(sym) {
                Ok(Some(code)) => {
                    debug!("binding {:?} to keycode {}", action, code);
                    binds.insert(Keybind { modmask, code }, action);
                }
                Ok(None) => warn!("no keycode for keysym {:#x}, not binding {:?}", sym, action),
                Err(e) => warn!("could not resolve keysym {:#x}: {}", sym, e),
            }
        }

        binds
    }

    pub fn insert(&mut self, bind: Keybind, action: KeyAction) {
        self.binds.insert(bind, action);
    }

    /// Looks up a key press. The modifier state must match exactly.
    pub fn lookup(&self, event: KeypressEvent) -> Option<KeyAction> {
        self.binds.get(&Keybind::from(event)).copied()
    }

    /// Every bound key combination.
    pub fn keys(&self) -> impl Iterator<Item = &Keybind> + '_ {
        self.binds.keys()
    }
}

/// Maps keysyms to keycodes, built from the server's keyboard mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keymap {
    map: HashMap<KeySym, KeyCode>,
}

impl Keymap {
    /// Builds a keymap from a GetKeyboardMapping reply: `keysyms` holds
    /// `per_keycode` entries for each keycode starting at `min_keycode`.
    ///
    /// When a keysym appears on several keycodes, the lowest wins.
    pub fn from_mapping(min_keycode: KeyCode, per_keycode: u8, keysyms: &[KeySym]) -> Self {
        let mut map = HashMap::new();

        if per_keycode == 0 {
            return Self { map }
        }

        for (i, chunk) in keysyms.chunks(per_keycode as usize).enumerate() {
            let Some(code) = (min_keycode as usize)
                .checked_add(i)
                .and_then(|c| KeyCode::try_from(c).ok())
            else {
                break
            };
            for &sym in chunk.iter().filter(|s| **s != 0) {
                map.entry(sym).or_insert(code);
            }
        }

        Self { map }
    }

    pub fn lookup(&self, sym: KeySym) -> Option<KeyCode> {
        self.map.get(&sym).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x::input::keysym;

    #[test]
    fn test_keymap_from_mapping() {
        // two keysyms per keycode, starting at keycode 8
        let syms = [
            keysym::XK_a, keysym::XK_A,
            0, 0,
            keysym::XK_f, keysym::XK_F,
            keysym::XK_a, 0,
        ];
        let keymap = Keymap::from_mapping(8, 2, &syms);

        assert_eq!(keymap.lookup(keysym::XK_a), Some(8));
        assert_eq!(keymap.lookup(keysym::XK_F), Some(10));
        assert_eq!(keymap.lookup(keysym::XK_r), None);
    }

    #[test]
    fn test_lookup_requires_exact_mask() {
        let mut binds = Keybinds::new();
        binds.insert(Keybind { modmask: ModMask::MOD4, code: 41 }, KeyAction::Fullscreen);

        let exact = KeypressEvent { mask: ModMask::MOD4, keycode: 41 };
        let superset = KeypressEvent { mask: ModMask::MOD4 | ModMask::SHIFT, keycode: 41 };
        let none = KeypressEvent { mask: ModMask::empty(), keycode: 41 };

        assert_eq!(binds.lookup(exact), Some(KeyAction::Fullscreen));
        assert_eq!(binds.lookup(superset), None);
        assert_eq!(binds.lookup(none), None);
    }
}
