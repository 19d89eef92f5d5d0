//! Read-only views for front ends.
//!
//! Front ends either walk [`Board::cell`] and [`ActivePiece::occupied_cells`]
//! themselves, or take a composited [`RenderBoard`].

use crate::core::{
    board::{BOARD_COLS, BOARD_ROWS, Block, Board},
    piece::{ActivePiece, MAX_PIECE_SIZE, PieceKind},
};

use super::session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderCell {
    #[default]
    Empty,
    /// Landing position of the active piece.
    Ghost(PieceKind),
    Piece(PieceKind),
}

impl RenderCell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == RenderCell::Empty
    }
}

impl From<Block> for RenderCell {
    fn from(block: Block) -> Self {
        match block {
            Block::Empty => RenderCell::Empty,
            Block::Piece(kind) => RenderCell::Piece(kind),
        }
    }
}

/// The visible board with the ghost and active piece drawn over locked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBoard {
    rows: [[RenderCell; BOARD_COLS]; BOARD_ROWS],
}

impl RenderBoard {
    #[must_use]
    pub fn new(board: &Board, active: Option<&ActivePiece>, ghost: Option<&ActivePiece>) -> Self {
        let mut rows = [[RenderCell::Empty; BOARD_COLS]; BOARD_ROWS];
        for (row, cells) in board.rows().zip(&mut rows) {
            for (&block, cell) in row.iter().zip(cells) {
                *cell = block.into();
            }
        }
        let mut stamp = |piece: &ActivePiece, cell: RenderCell| {
            for (col, row) in piece.occupied_cells() {
                let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
                    continue;
                };
                if let Some(slot) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                    *slot = cell;
                }
            }
        };
        if let Some(ghost) = ghost {
            stamp(ghost, RenderCell::Ghost(ghost.kind()));
        }
        if let Some(active) = active {
            stamp(active, RenderCell::Piece(active.kind()));
        }
        Self { rows }
    }

    /// Composites the session; the active piece and ghost are hidden after game over.
    #[must_use]
    pub fn from_session(session: &GameSession) -> Self {
        if session.session_state().is_game_over() {
            return Self::new(session.board(), None, None);
        }
        let ghost = session.ghost_piece();
        Self::new(session.board(), Some(session.active_piece()), Some(&ghost))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RenderCell; BOARD_COLS]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> RenderCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }
}

/// A piece template centered in a 4×4 grid, for the hold and next boxes.
///
/// ```
/// use stackfall_engine::{PieceKind, PiecePreview};
///
/// let preview = PiecePreview::of(PieceKind::O);
/// assert!(preview.get(1, 1).is_some());
/// assert!(preview.get(0, 0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePreview {
    cells: [[Option<PieceKind>; MAX_PIECE_SIZE]; MAX_PIECE_SIZE],
}

impl PiecePreview {
    pub const SIZE: usize = MAX_PIECE_SIZE;

    #[must_use]
    pub fn of(kind: PieceKind) -> Self {
        let matrix = kind.template();
        let off_x = (Self::SIZE - matrix.width()) / 2;
        let off_y = (Self::SIZE - matrix.height()) / 2;
        let mut cells = [[None; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (x, y) in matrix.occupied_cells() {
            cells[off_y + y][off_x + x] = Some(kind);
        }
        Self { cells }
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<PieceKind> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<PieceKind>; MAX_PIECE_SIZE]> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(preview: &PiecePreview) -> Vec<(usize, usize)> {
        (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| preview.get(x, y).is_some())
            .collect()
    }

    #[test]
    fn test_preview_offsets() {
        // I is 4×1: offset (0, 1).
        assert_eq!(
            occupied(&PiecePreview::of(PieceKind::I)),
            [(0, 1), (1, 1), (2, 1), (3, 1)]
        );
        // O is 2×2: offset (1, 1).
        assert_eq!(
            occupied(&PiecePreview::of(PieceKind::O)),
            [(1, 1), (2, 1), (1, 2), (2, 2)]
        );
        // T is 3×2: offset (0, 1).
        assert_eq!(
            occupied(&PiecePreview::of(PieceKind::T)),
            [(1, 1), (0, 2), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn test_preview_keeps_kind() {
        for kind in PieceKind::ALL {
            let preview = PiecePreview::of(kind);
            assert_eq!(occupied(&preview).len(), 4);
            assert!(
                preview
                    .rows()
                    .flatten()
                    .flatten()
                    .all(|&k| k == kind)
            );
        }
    }

    #[test]
    fn test_render_board_layers() {
        let mut board = Board::EMPTY;
        board.set_cell(0, 19, Block::Piece(PieceKind::Z));
        let active = ActivePiece::spawn(PieceKind::O).shifted(0, 5);
        let ghost = active.drop_position(&board);
        let render = RenderBoard::new(&board, Some(&active), Some(&ghost));

        assert_eq!(render.cell(0, 19), RenderCell::Piece(PieceKind::Z));
        assert_eq!(render.cell(4, 4), RenderCell::Piece(PieceKind::O));
        assert_eq!(render.cell(4, 18), RenderCell::Ghost(PieceKind::O));
        assert_eq!(render.cell(9, 0), RenderCell::Empty);
        assert_eq!(render.cell(10, 0), RenderCell::Empty);
    }

    #[test]
    fn test_render_board_skips_cells_above_board() {
        let board = Board::EMPTY;
        let active = ActivePiece::spawn(PieceKind::T);
        let render = RenderBoard::new(&board, Some(&active), None);
        let filled = render.rows().flatten().filter(|c| !c.is_empty()).count();
        // The top row of T sits at row -1.
        assert_eq!(filled, 3);
    }

    #[test]
    fn test_active_piece_drawn_over_ghost() {
        let board = Board::EMPTY;
        let active = ActivePiece::spawn(PieceKind::I).drop_position(&board);
        let render = RenderBoard::new(&board, Some(&active), Some(&active));
        assert_eq!(render.cell(3, 19), RenderCell::Piece(PieceKind::I));
    }
}
