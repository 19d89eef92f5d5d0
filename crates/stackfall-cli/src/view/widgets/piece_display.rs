use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::{PieceKind, PiecePreview, RenderCell};

use crate::view::widgets::BlockDisplay;

/// 4×4 preview box for the hold and next pieces.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

#[expect(clippy::cast_possible_truncation)]
const GRID: u16 = PiecePreview::SIZE as u16;

impl<'a> PieceDisplay<'a> {
    pub fn new(piece: Option<PieceKind>) -> Self {
        Self {
            piece,
            dimmed: false,
            block: None,
        }
    }

    /// Draws the piece as a ghost, e.g. a hold that cannot be used yet.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        GRID * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        GRID * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area).centered(
            Constraint::Length(GRID * BlockDisplay::WIDTH),
            Constraint::Length(GRID * BlockDisplay::HEIGHT),
        );

        let horizontal = Layout::horizontal([Constraint::Length(BlockDisplay::WIDTH); PiecePreview::SIZE]);
        let vertical = Layout::vertical([Constraint::Length(BlockDisplay::HEIGHT); PiecePreview::SIZE]);
        let grid = area
            .layout::<{ PiecePreview::SIZE }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ PiecePreview::SIZE }>(&horizontal));

        let preview = self.piece.map(PiecePreview::of);
        for (y, grid_row) in grid.enumerate() {
            for (x, grid_cell) in iter::zip(0.., grid_row) {
                let cell = match preview.and_then(|p| p.get(x, y)) {
                    Some(kind) if self.dimmed => RenderCell::Ghost(kind),
                    Some(kind) => RenderCell::Piece(kind),
                    None => RenderCell::Empty,
                };
                BlockDisplay::from_cell(cell, false).render(grid_cell, buf);
            }
        }
    }
}
