//! The status bar and the hidden-window picker.
//!
//! Both are windows owned by the window manager and never managed as
//! clients. The bar's hotspot table is rebuilt on every render pass,
//! since the widths of the texts it is made of change with the focused
//! client and the workspace chain.

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::trace;

use super::config::Config;
use crate::types::{Direction, Point};
use crate::x::{
    input::ButtonIndex,
    render::{Renderer, TextExtents},
    Result, XWindowID,
};

/// Text measured to size the bar.
pub const SAMPLE_TEXT: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shown in place of a name when nothing is focused.
pub const NO_CLIENT: &str = "<no client>";

/// The fixed action buttons, in bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum BarButton {
    Hide,
    Zoom,
    Close,
    Float,
    Move,
}

impl BarButton {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// What a click on the bar resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAction {
    OpenPicker,
    SwitchWorkspace(Direction),
    Button(BarButton),
    /// Launch the command at this index of the command table.
    Spawn(usize),
}

/// A horizontal region of the bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub width: i32,
}

impl Span {
    /// Inclusive on both edges.
    pub fn contains(&self, x: i32) -> bool {
        x >= self.x && x <= self.x + self.width
    }
}

/// The clickable regions of the bar, as of the last render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hotspots {
    /// Clicks left of this open the hidden-window picker.
    pub picker_limit: i32,
    pub workspace: Span,
    pub buttons: Vec<(BarButton, Span)>,
    pub commands: Vec<Span>,
}

impl Hotspots {
    /// Resolves a click at `x`, testing regions left to right.
    pub fn hit(&self, x: i32, button: ButtonIndex) -> Option<BarAction> {
        if x < self.picker_limit {
            return Some(BarAction::OpenPicker)
        }
        if self.workspace.contains(x) {
            let dir = if button == ButtonIndex::Right {
                Direction::Forward
            } else {
                Direction::Backward
            };
            return Some(BarAction::SwitchWorkspace(dir))
        }
        if let Some((b, _)) = self.buttons.iter().find(|(_, s)| s.contains(x)) {
            return Some(BarAction::Button(*b))
        }
        self.commands
            .iter()
            .position(|s| s.contains(x))
            .map(BarAction::Spawn)
    }
}

/// A string to draw, with its baseline origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub at: Point,
    pub text: String,
}

/// Everything the bar displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarContent {
    pub title: Option<String>,
    pub has_prev: bool,
    pub has_next: bool,
    pub workspaces: usize,
    pub status: Option<String>,
}

/// Cuts a name down to `max` characters.
pub fn truncate_name(name: &str, max: usize) -> &str {
    match name.char_indices().nth(max) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Places every bar item and builds the hotspot table.
pub fn layout_bar<R: Renderer>(
    r: &R,
    content: &BarContent,
    screen_width: i32,
    baseline: i32,
    config: &Config,
) -> (Hotspots, Vec<Label>) {
    let mut labels = Vec::new();
    let mut push = |x: i32, text: &str| labels.push(Label {
        at: Point::new(x, baseline),
        text: text.to_string(),
    });

    // focused client name, over the picker trigger
    let title = content
        .title
        .as_deref()
        .map(|t| truncate_name(t, config.max_name_chars))
        .unwrap_or(NO_CLIENT);
    push(r.text_extents(title).x, title);

    // workspace indicator
    let wstext = format!(
        "{}{}{}",
        if content.has_prev { '<' } else { ' ' },
        content.workspaces,
        if content.has_next { '>' } else { ' ' },
    );
    let ext = r.text_extents(&wstext);
    let wx = screen_width / 5;
    let workspace = Span { x: wx, width: ext.x + ext.width };
    push(ext.x + wx, &wstext);

    // fixed buttons
    let mut buttons = Vec::new();
    let mut last: Option<Span> = None;
    for b in BarButton::iter() {
        let ext = r.text_extents(b.label());
        let x = match last {
            Some(l) => l.x + l.width + ext.x + config.menu_padding,
            None => screen_width / 4 + ext.x,
        };
        let span = Span { x, width: ext.width };
        push(x, b.label());
        buttons.push((b, span));
        last = Some(span);
    }

    // command buttons, set apart from the fixed ones
    let mut commands = Vec::new();
    for (i, cmd) in config.commands.iter().enumerate() {
        let ext = r.text_extents(&cmd.label);
        let pad = if i == 0 { config.menu_padding * 3 } else { config.menu_padding };
        let x = last.map(|l| l.x + l.width).unwrap_or(0) + ext.x + pad;
        let span = Span { x, width: ext.width };
        push(x, &cmd.label);
        commands.push(span);
        last = Some(span);
    }

    if let Some(status) = &content.status {
        let ext = r.text_extents(status);
        push(ext.x + (screen_width - ext.width), status);
    }

    let hotspots = Hotspots {
        picker_limit: screen_width / 5,
        workspace,
        buttons,
        commands,
    };

    (hotspots, labels)
}

/// Places the rows of the hidden-window picker: the focused client's
/// name first, then each hidden client's name.
pub fn layout_picker<R, S>(
    r: &R,
    title: Option<&str>,
    hidden: &[S],
    row_height: i32,
    config: &Config,
) -> Vec<Label>
where
    R: Renderer,
    S: AsRef<str>,
{
    let title = title
        .map(|t| truncate_name(t, config.max_name_chars))
        .unwrap_or(NO_CLIENT);
    let ext = r.text_extents(title);
    let mut y = ext.y + config.bar_padding;

    let mut labels = vec![Label { at: Point::new(ext.x, y), text: title.to_string() }];

    for name in hidden {
        let name = truncate_name(name.as_ref(), config.max_name_chars);
        y += row_height;
        labels.push(Label {
            at: Point::new(r.text_extents(name).x, y),
            text: name.to_string(),
        });
    }

    labels
}

/// The bar window and the state of its last render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub window: XWindowID,
    pub height: i32,
    /// Y coordinate of the text baseline.
    pub baseline: i32,
    pub hotspots: Hotspots,
    /// The root window's name.
    pub status: Option<String>,
}

impl Bar {
    /// Sizes the bar around text with the given extents.
    pub fn new(window: XWindowID, sample: TextExtents, padding: i32) -> Self {
        Self {
            window,
            height: sample.height + padding * 2,
            baseline: sample.y + padding,
            hotspots: Hotspots::default(),
            status: None,
        }
    }

    /// Redraws the bar and refreshes its hotspot table.
    pub fn render<R: Renderer>(
        &mut self,
        r: &R,
        content: &BarContent,
        screen_width: i32,
        config: &Config,
    ) -> Result<()> {
        trace!("rendering bar");
        let (hotspots, labels) = layout_bar(r, content, screen_width, self.baseline, config);
        self.hotspots = hotspots;

        r.clear(self.window)?;
        for label in labels {
            r.draw_text(self.window, label.at, &label.text)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is 6 pixels wide.
    struct Fixed;

    impl Renderer for Fixed {
        fn text_extents(&self, text: &str) -> TextExtents {
            TextExtents { x: 0, y: 11, width: 6 * text.chars().count() as i32, height: 14 }
        }
        fn clear(&self, _: XWindowID) -> Result<()> {
            Ok(())
        }
        fn draw_text(&self, _: XWindowID, _: Point, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn content() -> BarContent {
        BarContent {
            title: Some("terminal".into()),
            has_prev: false,
            has_next: true,
            workspaces: 2,
            status: Some("12:00".into()),
        }
    }

    #[test]
    fn test_bar_size() {
        let bar = Bar::new(1, Fixed.text_extents(SAMPLE_TEXT), 3);

        assert_eq!(bar.height, 20);
        assert_eq!(bar.baseline, 14);
    }

    #[test]
    fn test_layout_positions() {
        let config = Config::default();
        let (hot, labels) = layout_bar(&Fixed, &content(), 1280, 14, &config);

        assert_eq!(labels[0], Label { at: Point::new(0, 14), text: "terminal".into() });
        assert_eq!(labels[1], Label { at: Point::new(256, 14), text: " 2>".into() });
        assert_eq!(hot.workspace, Span { x: 256, width: 18 });

        // Hide at width/4, then each button after the previous plus padding
        assert_eq!(hot.buttons[0], (BarButton::Hide, Span { x: 320, width: 24 }));
        assert_eq!(hot.buttons[1], (BarButton::Zoom, Span { x: 349, width: 24 }));
        assert_eq!(hot.buttons[4].0, BarButton::Move);
        let mv = hot.buttons[4].1;

        // the first command is set apart by three paddings
        assert_eq!(hot.commands[0], Span { x: mv.x + mv.width + 15, width: 24 });
        assert_eq!(hot.commands[1].x, hot.commands[0].x + 24 + 5);
        assert_eq!(hot.commands.len(), config.commands.len());

        // status is right aligned
        let status = labels.last().unwrap();
        assert_eq!(status.at.x, 1280 - 30);
    }

    #[test]
    fn test_hit_order() {
        let config = Config::default();
        let (hot, _) = layout_bar(&Fixed, &content(), 1280, 14, &config);

        assert_eq!(hot.hit(10, ButtonIndex::Left), Some(BarAction::OpenPicker));
        assert_eq!(hot.hit(255, ButtonIndex::Left), Some(BarAction::OpenPicker));
        assert_eq!(
            hot.hit(256, ButtonIndex::Right),
            Some(BarAction::SwitchWorkspace(Direction::Forward))
        );
        assert_eq!(
            hot.hit(274, ButtonIndex::Left),
            Some(BarAction::SwitchWorkspace(Direction::Backward))
        );
        // gap between the indicator and the buttons
        assert_eq!(hot.hit(300, ButtonIndex::Left), None);
        assert_eq!(hot.hit(320, ButtonIndex::Left), Some(BarAction::Button(BarButton::Hide)));
        assert_eq!(hot.hit(344, ButtonIndex::Left), Some(BarAction::Button(BarButton::Hide)));
        assert_eq!(hot.hit(349, ButtonIndex::Left), Some(BarAction::Button(BarButton::Zoom)));
        assert_eq!(hot.hit(hot.commands[2].x + 1, ButtonIndex::Left), Some(BarAction::Spawn(2)));
    }

    #[test]
    fn test_no_client_title() {
        let config = Config::default();
        let content = BarContent { title: None, ..content() };
        let (_, labels) = layout_bar(&Fixed, &content, 1280, 14, &config);

        assert_eq!(labels[0].text, NO_CLIENT);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("abcdef", 3), "abc");
        assert_eq!(truncate_name("ab", 3), "ab");
        assert_eq!(truncate_name("日本語テキスト", 2), "日本");
    }

    #[test]
    fn test_picker_rows() {
        let config = Config::default();
        let labels = layout_picker(&Fixed, Some("editor"), &["a", "b"], 20, &config);

        let ys: Vec<_> = labels.iter().map(|l| l.at.y).collect();
        assert_eq!(ys, vec![14, 34, 54]);
        assert_eq!(labels[0].text, "editor");
        assert_eq!(labels[2].text, "b");
    }
}
