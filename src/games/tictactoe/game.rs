//! Single-board game engine.

use super::action::{Move, Placement, Rejection};
use super::{Board, GameStatus, Mark, Position, Square, rules};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One board plus its move history and derived status.
///
/// The status is recomputed after every successful placement, before any
/// further placement is accepted. Once terminal, every placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) history: Vec<Move>,
    pub(crate) status: GameStatus,
}

impl Game {
    /// Creates a new game on an empty board.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            history: Vec::new(),
            status: GameStatus::Active,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the status derived after the last mutation.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the move history, including setup placements.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns true once the game has a winner or is drawn.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Most recent placement by `mark`, if any.
    pub fn last_move_by(&self, mark: Mark) -> Option<Position> {
        self.history
            .iter()
            .rev()
            .find(|m| m.mark == mark)
            .map(|m| m.position)
    }

    /// Places `mark` at `pos` if the square is empty and the game is active.
    #[instrument(skip(self), fields(status = ?self.status))]
    pub fn place(&mut self, pos: Position, mark: Mark) -> Placement {
        if self.status.is_terminal() {
            debug!("Rejected placement on finished game");
            return Placement::Rejected(Rejection::GameAlreadyOver);
        }
        if !self.board.is_empty(pos) {
            debug!("Rejected placement on occupied square");
            return Placement::Rejected(Rejection::Occupied(pos));
        }

        self.board.set(pos, Square::Occupied(mark));
        self.history.push(Move::new(mark, pos));
        self.status = rules::status(&self.board);

        #[cfg(debug_assertions)]
        self.assert_invariants();

        debug!(status = ?self.status, "Mark placed");
        Placement::Placed(self.status)
    }

    /// Places `mark` using one-indexed row and column as supplied by learner code.
    #[instrument(skip(self))]
    pub fn place_at(&mut self, row: i64, col: i64, mark: Mark) -> Placement {
        if self.status.is_terminal() {
            return Placement::Rejected(Rejection::GameAlreadyOver);
        }
        match Position::from_one_indexed(row, col) {
            Some(pos) => self.place(pos, mark),
            None => Placement::Rejected(Rejection::OutOfBounds { row, col }),
        }
    }

    /// Clears the board back to an empty, active game.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use super::invariants::{InvariantSet, TicTacToeInvariants};
        use tracing::warn;

        if let Err(violations) = TicTacToeInvariants::check_all(self) {
            for violation in &violations {
                warn!(description = %violation.description, "Invariant violated");
            }
            debug_assert!(violations.is_empty(), "Game invariants violated");
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
