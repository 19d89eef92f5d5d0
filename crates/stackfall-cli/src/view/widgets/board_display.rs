use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::{BOARD_COLS, BOARD_ROWS, RenderBoard};

use crate::view::widgets::BlockDisplay;

/// The 10×20 playfield.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a RenderBoard,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a RenderBoard) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_COLS as u16 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_ROWS as u16 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let horizontal =
            Layout::horizontal([Constraint::Length(BlockDisplay::WIDTH); BOARD_COLS]).flex(Flex::Center);
        let vertical = Layout::vertical([Constraint::Length(BlockDisplay::HEIGHT); BOARD_ROWS]);

        let grid = area
            .layout::<BOARD_ROWS>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_COLS>(&horizontal));

        for (grid_row, row) in iter::zip(grid, self.board.rows()) {
            for (grid_cell, &cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}
