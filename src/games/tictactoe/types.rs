//! Core domain types for tic-tac-toe.

use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mark placed on the board.
///
/// The learner always plays `X`; the computer opponent always plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// The learner's mark.
    X,
    /// The computer opponent's mark.
    O,
}

impl Mark {
    /// Mark used by learner code.
    pub const PLAYER: Mark = Mark::X;

    /// Mark used by the computer opponent.
    pub const OPPONENT: Mark = Mark::O;

    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from three rows of `'X'`, `'O'` or anything else for empty.
    ///
    /// ```
    /// use tictactoe_tutor::{Board, Mark, Position, Square};
    ///
    /// let board = Board::from_rows(["O.O", ".X.", "..."]);
    /// assert_eq!(board.get(Position::Center), Square::Occupied(Mark::X));
    /// ```
    pub fn from_rows(rows: [&str; 3]) -> Self {
        let mut board = Self::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().take(3).enumerate() {
                let square = match ch {
                    'X' | 'x' => Square::Occupied(Mark::X),
                    'O' | 'o' => Square::Occupied(Mark::O),
                    _ => Square::Empty,
                };
                if let Some(pos) = Position::from_row_col(row, col) {
                    board.set(pos, square);
                }
            }
        }
        board
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    ///
    /// Unchecked: callers outside the game engine go through `Game::place`.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::valid_moves(self)
    }

    /// Returns a copy of this board with `mark` at `pos`.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Self {
        let mut next = *self;
        next.set(pos, Square::Occupied(mark));
        next
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => ".".to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Current status of a board, always derived from its squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    Active,
    /// The learner has three in a row.
    PlayerWin,
    /// The opponent has three in a row.
    OpponentWin,
    /// Board is full with no winner.
    Draw,
}

impl GameStatus {
    /// Returns true for every status other than `Active`.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Active
    }

    /// Status message shown to the learner.
    pub fn message(self) -> &'static str {
        match self {
            GameStatus::Active => "Your turn (X)",
            GameStatus::PlayerWin => "You win!",
            GameStatus::OpponentWin => "Computer wins!",
            GameStatus::Draw => "It's a draw!",
        }
    }
}
