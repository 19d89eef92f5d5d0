use serde::{Deserialize, Serialize};

use super::board::{Block, Board};

/// Largest side of any piece matrix.
pub const MAX_PIECE_SIZE: usize = 4;

/// Origin row of a freshly spawned piece (one row above the visible board).
pub const SPAWN_ROW: i32 = -1;

/// One of the seven tetromino shapes.
///
/// The discriminant order matches the color indices used on the board
/// (`I` is 1, `Z` is 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl PieceKind {
    /// Number of kinds.
    pub const LEN: usize = 7;

    /// Every piece kind, in color-index order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the board color index of this kind (`1..=7`).
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.color_index(), 1);
    /// assert_eq!(PieceKind::Z.color_index(), 7);
    /// ```
    #[must_use]
    pub const fn color_index(self) -> u8 {
        self as u8 + 1
    }

    /// Returns the spawn-orientation shape of this kind.
    ///
    /// The matrix is a copy; mutating or rotating it never affects the template.
    #[must_use]
    pub const fn template(self) -> PieceMatrix {
        PIECE_TEMPLATES[self as usize]
    }

    /// Letter used in board dumps and test fixtures.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Inverse of [`Self::as_char`].
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub(crate) const fn as_index(self) -> usize {
        match self {
            RotationDirection::Clockwise => 0,
            RotationDirection::CounterClockwise => 1,
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(state: u8) -> Self {
        Self(state % 4)
    }

    #[must_use]
    pub const fn state(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => PieceRotation((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => PieceRotation((self.0 + 3) % 4),
        }
    }

    pub(crate) const fn as_index(self) -> usize {
        self.0 as usize
    }
}

/// A piece shape as an H×W matrix of blocks (H, W ≤ 4).
///
/// Cells outside `width × height` are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMatrix {
    width: u8,
    height: u8,
    cells: [[Block; MAX_PIECE_SIZE]; MAX_PIECE_SIZE],
}

impl PieceMatrix {
    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Returns the block at `(x, y)`, or [`Block::Empty`] outside the matrix.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Block {
        if x < self.width() && y < self.height() {
            self.cells[y][x]
        } else {
            Block::Empty
        }
    }

    /// Returns an iterator over the rows, each `width` blocks long.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Returns the relative `(x, y)` positions of the non-empty cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(x, _)| (x, y))
        })
    }

    /// Returns this matrix rotated by 90°; an H×W matrix becomes W×H.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let (w, h) = (self.width(), self.height());
        let mut cells = [[Block::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (y, row) in self.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                match direction {
                    RotationDirection::Clockwise => cells[x][h - 1 - y] = cell,
                    RotationDirection::CounterClockwise => cells[w - 1 - x][y] = cell,
                }
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

const PIECE_TEMPLATES: [PieceMatrix; PieceKind::LEN] = {
    const fn m(kind: PieceKind, width: u8, height: u8, bits: [[bool; 4]; 2]) -> PieceMatrix {
        let mut cells = [[Block::Empty; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        let mut y = 0;
        while y < 2 {
            let mut x = 0;
            while x < MAX_PIECE_SIZE {
                if bits[y][x] {
                    cells[y][x] = Block::Piece(kind);
                }
                x += 1;
            }
            y += 1;
        }
        PieceMatrix {
            width,
            height,
            cells,
        }
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    [
        m(PieceKind::I, 4, 1, [[C, C, C, C], EEEE]),
        m(PieceKind::J, 3, 2, [[C, E, E, E], [C, C, C, E]]),
        m(PieceKind::L, 3, 2, [[E, E, C, E], [C, C, C, E]]),
        m(PieceKind::O, 2, 2, [[C, C, E, E], [C, C, E, E]]),
        m(PieceKind::S, 3, 2, [[E, C, C, E], [C, C, E, E]]),
        m(PieceKind::T, 3, 2, [[E, C, E, E], [C, C, C, E]]),
        m(PieceKind::Z, 3, 2, [[C, C, E, E], [E, C, C, E]]),
    ]
};

/// The falling piece: a matrix placed at an origin on the board.
///
/// Like the rest of the engine's pieces this is a value type; movement and
/// rotation return new instances.
///
/// ```
/// use stackfall_engine::{ActivePiece, Board, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = ActivePiece::spawn(PieceKind::T);
/// assert_eq!((piece.col(), piece.row()), (3, -1));
///
/// let moved = piece.moved(&board, 1, 0).unwrap();
/// assert_eq!(moved.col(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    matrix: PieceMatrix,
    col: i32,
    row: i32,
    kind: PieceKind,
    rotation: PieceRotation,
}

impl ActivePiece {
    /// Places `kind` in spawn orientation, horizontally centered, at [`SPAWN_ROW`].
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let matrix = kind.template();
        Self {
            matrix,
            col: spawn_col(matrix.width()),
            row: SPAWN_ROW,
            kind,
            rotation: PieceRotation::default(),
        }
    }

    #[must_use]
    pub fn matrix(&self) -> &PieceMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Returns the absolute `(col, row)` of every occupied cell.
    ///
    /// Rows may be negative while the piece is above the visible board.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix
            .occupied_cells()
            .map(move |(x, y)| (self.col + offset(x), self.row + offset(y)))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn is_valid_on(&self, board: &Board) -> bool {
        board.is_valid_position(&self.matrix, self.col, self.row)
    }

    /// Returns the piece shifted by `(dx, dy)` if that position is valid.
    #[must_use]
    pub fn moved(&self, board: &Board, dx: i32, dy: i32) -> Option<Self> {
        Some(self.shifted(dx, dy)).filter(|piece| piece.is_valid_on(board))
    }

    /// Returns true if the piece cannot move down one row.
    #[must_use]
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.moved(board, 0, 1).is_none()
    }

    /// Returns the position the piece would land at by falling straight down.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while let Some(piece) = dropped.moved(board, 0, 1) {
            dropped = piece;
        }
        dropped
    }

    pub(crate) fn with_rotation(self, matrix: PieceMatrix, rotation: PieceRotation) -> Self {
        Self {
            matrix,
            rotation,
            ..self
        }
    }
}

fn spawn_col(width: usize) -> i32 {
    (offset(Board::COLS) - offset(width)) / 2
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn offset(n: usize) -> i32 {
    n as i32
}
