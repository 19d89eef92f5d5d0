use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::GameSession;

use crate::view::widgets::style;

pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX) + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = fn(&GameSession) -> String;

#[derive(Clone, Copy)]
enum Row {
    Blank,
    Heading(&'static str),
    Big(Value),
    Pair(&'static str, Value),
}

fn format_elapsed(session: &GameSession) -> String {
    let elapsed = session.elapsed();
    format!(
        "{}:{:0>2}.{:0>2}",
        elapsed.as_secs() / 60,
        elapsed.as_secs() % 60,
        elapsed.subsec_millis() / 10
    )
}

const ROWS: &[Row] = &[
    Row::Heading("SCORE"),
    Row::Big(|s| s.stats().score().to_string()),
    Row::Heading("TIME"),
    Row::Big(format_elapsed),
    Row::Blank,
    Row::Pair("LEVEL", |s| s.stats().level().to_string()),
    Row::Pair("LINES", |s| s.stats().total_cleared_lines().to_string()),
    Row::Pair("PIECES", |s| s.stats().completed_pieces().to_string()),
    Row::Blank,
    Row::Pair("SINGLE", |s| s.stats().line_cleared_counter()[1].to_string()),
    Row::Pair("DOUBLE", |s| s.stats().line_cleared_counter()[2].to_string()),
    Row::Pair("TRIPLE", |s| s.stats().line_cleared_counter()[3].to_string()),
    Row::Pair("TETRIS", |s| s.stats().line_cleared_counter()[4].to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let style = style::DEFAULT;

        let row_areas = Layout::vertical(ROWS.iter().map(|_| Constraint::Length(1))).split(area);
        for (row, &area) in iter::zip(ROWS, row_areas.iter()) {
            match *row {
                Row::Blank => {}
                Row::Heading(label) => Line::styled(label, style).left_aligned().render(area, buf),
                Row::Big(value) => Line::styled(value(self.session), style::HIGHLIGHT)
                    .right_aligned()
                    .render(area, buf),
                Row::Pair(label, value) => {
                    let [label_area, value_area] =
                        area.layout(&Layout::horizontal([Constraint::Fill(1); 2]));
                    Line::styled(label, style).left_aligned().render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
