use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use stackfall_engine::{PieceKind, RenderCell};

use crate::view::widgets::style;

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    /// Board cell; empty cells show a dot when `show_dots` is set.
    pub fn from_cell(cell: RenderCell, show_dots: bool) -> Self {
        match cell {
            RenderCell::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            RenderCell::Empty => Self::new(style::EMPTY, ""),
            RenderCell::Ghost(kind) => Self::new(style::ghost(kind), "[]"),
            RenderCell::Piece(kind) => Self::from_piece(kind),
        }
    }

    pub fn from_piece(kind: PieceKind) -> Self {
        Self::new(style::piece(kind), "")
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph paints the whole area, not only the symbol's cells.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
