//! Named squares of the 3x3 board.

use super::types::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board (0-8, row-major).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// The four corners.
    pub const CORNERS: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-indexed row.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Zero-indexed column.
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// Creates a position from zero-indexed row and column.
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Self::from_index(row * 3 + col)
        } else {
            None
        }
    }

    /// Creates a position from the one-indexed row and column used by learner blocks.
    ///
    /// Anything outside `1..=3` yields `None`.
    #[instrument]
    pub fn from_one_indexed(row: i64, col: i64) -> Option<Self> {
        let row = usize::try_from(row.checked_sub(1)?).ok()?;
        let col = usize::try_from(col.checked_sub(1)?).ok()?;
        Self::from_row_col(row, col)
    }

    /// Point reflection through the centre: `(r, c)` becomes `(2 - r, 2 - c)`.
    pub fn reflected(self) -> Self {
        Self::ALL[8 - self.to_index()]
    }

    /// Clockwise quarter turn about the centre: `(r, c)` becomes `(c, 2 - r)`.
    pub fn rotated_quarter(self) -> Self {
        Self::ALL[self.col() * 3 + (2 - self.row())]
    }

    /// Applies `turns` clockwise quarter turns.
    pub fn rotated(self, turns: usize) -> Self {
        (0..turns % 4).fold(self, |pos, _| pos.rotated_quarter())
    }

    /// Returns true for the four corner squares.
    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Filters positions by board state - returns only empty squares.
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
