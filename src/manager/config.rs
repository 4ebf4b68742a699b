//! Compile-time configuration.

use crate::bindings::KeyAction;
use crate::types::Color;
use crate::x::input::{keysym::{self, KeySym}, ModMask};

/// A labelled bar button that launches a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandButton {
    pub label: String,
    pub argv: Vec<String>,
}

impl CommandButton {
    pub fn new<S: Into<String>>(label: S, argv: &[&str]) -> Self {
        Self {
            label: label.into(),
            argv: argv.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The exact modifier state every key binding requires.
    pub modmask: ModMask,
    pub keys: Vec<(KeySym, KeyAction)>,
    /// The core font used by the bar and the picker.
    pub font: String,
    pub border_width: u32,
    pub border_color: Color,
    pub border_focus: Color,
    pub bar_background: Color,
    pub bar_foreground: Color,
    /// Background of the root window.
    pub background: Color,
    /// Space above and below the bar text.
    pub bar_padding: i32,
    /// Space between bar buttons.
    pub menu_padding: i32,
    /// Client names are cut to this many characters.
    pub max_name_chars: usize,
    pub commands: Vec<CommandButton>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            modmask: ModMask::MOD4,
            keys: vec![
                (keysym::XK_f, KeyAction::Fullscreen),
                (keysym::XK_r, KeyAction::MoveResize),
                (keysym::XK_a, KeyAction::Redraw),
                (keysym::XK_d, KeyAction::ToggleFloat),
            ],
            font: "fixed".into(),
            border_width: 3,
            border_color: 0x757573,
            border_focus: 0x000000,
            bar_background: 0xffffff,
            bar_foreground: 0x000000,
            background: 0x757373,
            bar_padding: 3,
            menu_padding: 5,
            max_name_chars: 30,
            commands: vec![
                CommandButton::new("menu", &["dmenu_run"]),
                CommandButton::new("acme", &["acme"]),
                CommandButton::new("term", &["alacritty"]),
                CommandButton::new("9term", &["9term"]),
                CommandButton::new("web", &["chromium"]),
                CommandButton::new("fm", &["thunar"]),
                CommandButton::new("v+", &["pamixer", "-i", "5"]),
                CommandButton::new("v-", &["pamixer", "-d", "5"]),
                CommandButton::new("b+", &["brightnessctl", "set", "+5%"]),
                CommandButton::new("b-", &["brightnessctl", "set", "5%-"]),
            ],
        }
    }
}
