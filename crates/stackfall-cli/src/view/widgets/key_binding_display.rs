use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// A group of keys and what they do.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub keys: &'static [&'static str],
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(keys: &'static [&'static str], action: &'static str) -> Self {
        Self { keys, action }
    }
}

/// One centered line of key hints.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    hints: &'a [KeyHint],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self { hints }
    }

    fn line(&self) -> Line<'a> {
        let mut spans = vec![];
        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", SEPARATOR_STYLE));
            }
            for (j, &key) in hint.keys.iter().enumerate() {
                if j > 0 {
                    spans.push(Span::styled("/", SEPARATOR_STYLE));
                }
                spans.push(Span::styled(key, KEY_STYLE));
            }
            spans.push(Span::styled(format!(" {}", hint.action), ACTION_STYLE));
        }
        Line::from(spans).centered()
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const ACTION_STYLE: Style = Style::new().fg(Color::White);
const SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().render(area, buf);
    }
}
