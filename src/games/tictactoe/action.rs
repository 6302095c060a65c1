//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They represent
//! the mover's intent and can be validated independently of execution.

use super::{GameStatus, Mark, Position};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// The position where the mark is placed.
    pub position: Position,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a placement was refused.
///
/// Rejections are silent by design: learner code that targets a bad square
/// simply does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    Occupied(Position),

    /// Row or column outside the board.
    #[display("Row {row}, column {col} is off the board")]
    OutOfBounds {
        /// Requested row (one-indexed, as supplied by learner code).
        row: i64,
        /// Requested column (one-indexed, as supplied by learner code).
        col: i64,
    },

    /// The game on this board is already over.
    #[display("Game is already over")]
    GameAlreadyOver,
}

impl std::error::Error for Rejection {}

/// Result of asking a game to place a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The mark was placed; carries the status recomputed after the mutation.
    Placed(GameStatus),
    /// Nothing changed.
    Rejected(Rejection),
}

impl Placement {
    /// Returns true if the board was mutated.
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }

    /// Status after the placement, if one happened.
    pub fn status(&self) -> Option<GameStatus> {
        match self {
            Placement::Placed(status) => Some(*status),
            Placement::Rejected(_) => None,
        }
    }
}
