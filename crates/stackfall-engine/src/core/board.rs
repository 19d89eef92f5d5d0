use super::piece::{ActivePiece, PieceKind, PieceMatrix};

/// Number of visible columns.
pub const BOARD_COLS: usize = 10;
/// Number of visible rows.
pub const BOARD_ROWS: usize = 20;

/// A single cell of the board or of a piece matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Block::Empty)
    }

    /// Returns `0` for an empty cell and the piece's color index otherwise.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.color_index(),
        }
    }

    #[must_use]
    pub const fn kind(self) -> Option<PieceKind> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind),
        }
    }
}

/// One row of the board.
pub type BoardRow = [Block; BOARD_COLS];

const EMPTY_ROW: BoardRow = [Block::Empty; BOARD_COLS];

fn is_filled(row: &BoardRow) -> bool {
    row.iter().all(|cell| !cell.is_empty())
}

/// The 10×20 grid of locked cells.
///
/// Row `0` is the top of the visible board and rows grow downward. Positions
/// above the board (negative rows) are never stored and always read as empty,
/// so a piece can spawn or lock partially off the top.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Board, PieceKind};
///
/// let mut board = Board::EMPTY;
/// board.lock_cells(&PieceKind::O.template(), 0, 18);
/// assert!(board.is_occupied(0, 19));
/// assert!(!board.is_occupied(0, -1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const COLS: usize = BOARD_COLS;
    pub const ROWS: usize = BOARD_ROWS;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_ROWS],
    };

    fn index(col: i32, row: i32) -> Option<(usize, usize)> {
        let col = usize::try_from(col).ok().filter(|&c| c < Self::COLS)?;
        let row = usize::try_from(row).ok().filter(|&r| r < Self::ROWS)?;
        Some((col, row))
    }

    /// Returns the cell at `(col, row)`; out-of-bounds positions read as empty.
    #[must_use]
    pub fn cell(&self, col: i32, row: i32) -> Block {
        Self::index(col, row).map_or(Block::Empty, |(c, r)| self.rows[r][c])
    }

    /// Returns true if `(col, row)` is inside the board and filled.
    #[must_use]
    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        !self.cell(col, row).is_empty()
    }

    /// Returns an iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Sets a single in-bounds cell. Out-of-bounds positions are ignored.
    pub fn set_cell(&mut self, col: i32, row: i32, block: Block) {
        if let Some((c, r)) = Self::index(col, row) {
            self.rows[r][c] = block;
        }
    }

    /// Checks whether `matrix` placed at `(col, row)` fits.
    ///
    /// Every filled cell must have a column in `[0, COLS)` and a row below
    /// `ROWS`. Cells above the board are allowed; cells on the board must be
    /// empty.
    #[must_use]
    pub fn is_valid_position(&self, matrix: &PieceMatrix, col: i32, row: i32) -> bool {
        matrix.occupied_cells().all(|(x, y)| {
            let (gx, gy) = (col + to_i32(x), row + to_i32(y));
            if gx < 0 || gx >= to_i32(Self::COLS) || gy >= to_i32(Self::ROWS) {
                return false;
            }
            gy < 0 || !self.is_occupied(gx, gy)
        })
    }

    /// Writes the filled cells of `matrix` placed at `(col, row)`.
    ///
    /// Cells above the board are dropped.
    pub fn lock_cells(&mut self, matrix: &PieceMatrix, col: i32, row: i32) {
        for (x, y) in matrix.occupied_cells() {
            self.set_cell(col + to_i32(x), row + to_i32(y), matrix.get(x, y));
        }
    }

    /// Locks the active piece into the board.
    pub fn lock_piece(&mut self, piece: &ActivePiece) {
        self.lock_cells(piece.matrix(), piece.col(), piece.row());
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows are scanned bottom to top; remaining rows shift down and empty
    /// rows are inserted at the top.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..Self::ROWS).rev() {
            if is_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn to_i32(n: usize) -> i32 {
    n as i32
}
