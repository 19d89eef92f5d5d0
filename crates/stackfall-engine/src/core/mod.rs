//! Board, piece and rotation primitives.
//!
//! - [`Board`] - 10×20 grid of locked [`Block`]s with collision and line clears
//! - [`PieceKind`], [`PieceMatrix`] - the seven templates and their rotations
//! - [`ActivePiece`] - a matrix placed on the board, moved and rotated by value
//! - [`kick_offsets`] - Super Rotation System wall-kick tables

pub use self::{board::*, kick::*, piece::*};

pub(crate) mod board;
pub(crate) mod kick;
pub(crate) mod piece;
