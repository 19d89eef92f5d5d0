//! Super Rotation System wall kicks.
//!
//! When a rotation collides, the offsets for the current rotation state and
//! direction are tried in order and the first one that fits is used.
//! Offsets are `(dx, dy)` with `y` growing downward.

use super::{
    board::Board,
    piece::{ActivePiece, PieceKind, RotationDirection},
};

/// Offsets tried for one `(rotation state, direction)` transition.
pub type KickOffsets = [(i32, i32); 5];

/// Indexed by `[rotation state][direction]` (clockwise first).
const JLSTZ_KICKS: [[KickOffsets; 2]; 4] = [
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
];

const I_KICKS: [[KickOffsets; 2]; 4] = [
    [
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    ],
    [
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    ],
    [
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    ],
    [
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    ],
];

/// Returns the kick candidates for rotating `piece` in `direction`.
#[must_use]
pub fn kick_offsets(piece: &ActivePiece, direction: RotationDirection) -> &'static KickOffsets {
    let table = match piece.kind() {
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    &table[piece.rotation().as_index()][direction.as_index()]
}

impl ActivePiece {
    /// Rotates the piece, applying the first wall kick that fits.
    ///
    /// The O piece never rotates and always succeeds unchanged. Returns `None`
    /// when no kick candidate is valid.
    ///
    /// ```
    /// use stackfall_engine::{ActivePiece, Board, PieceKind, RotationDirection};
    ///
    /// let board = Board::EMPTY;
    /// let piece = ActivePiece::spawn(PieceKind::T).shifted(0, 5);
    /// let rotated = piece.try_rotate(&board, RotationDirection::Clockwise).unwrap();
    /// assert_eq!(rotated.rotation().state(), 1);
    /// ```
    #[must_use]
    pub fn try_rotate(&self, board: &Board, direction: RotationDirection) -> Option<Self> {
        if self.kind() == PieceKind::O {
            return Some(*self);
        }
        let matrix = self.matrix().rotated(direction);
        let rotation = self.rotation().rotated(direction);
        kick_offsets(self, direction)
            .iter()
            .map(|&(dx, dy)| self.shifted(dx, dy).with_rotation(matrix, rotation))
            .find(|piece| piece.is_valid_on(board))
    }
}
