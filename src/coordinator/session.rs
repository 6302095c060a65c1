//! Mutable state of one tutoring session: the boards and the opponent.

use crate::games::tictactoe::{Board, Game, GameStatus, Mark, Placement, Position, Rejection};
use crate::lessons::Lesson;
use crate::opponent::{self, Difficulty, MoveContext, Strategy};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

/// Per-board turn bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct BoardSlot {
    game: Game,
    has_moved: bool,
    awaiting_reply: bool,
}

impl BoardSlot {
    /// The board's game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Whether the learner already placed a mark this turn.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

/// A learner placement that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerMove {
    /// Square taken.
    pub position: Position,
    /// Board after the move.
    pub board: Board,
    /// Status after the move.
    pub status: GameStatus,
    /// Lesson feedback for the move, if the lesson gives any.
    pub feedback: Option<String>,
}

/// An opponent reply that went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentMove {
    /// Square taken.
    pub position: Position,
    /// Board after the move.
    pub board: Board,
    /// Status after the move.
    pub status: GameStatus,
}

/// Boards, difficulty, strategy and randomness, owned by the coordinator.
#[derive(Debug)]
pub struct Session {
    boards: Vec<BoardSlot>,
    difficulty: Difficulty,
    strategy: Strategy,
    lesson: Option<&'static Lesson>,
    rng: StdRng,
}

impl Session {
    /// Creates a session with `board_count` empty boards.
    pub fn new(board_count: usize, rng: StdRng) -> Self {
        Self {
            boards: vec![BoardSlot::default(); board_count],
            difficulty: Difficulty::default(),
            strategy: Strategy::Random,
            lesson: None,
            rng,
        }
    }

    /// Number of boards.
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// Slot for board `index`.
    pub fn slot(&self, index: usize) -> Option<&BoardSlot> {
        self.boards.get(index)
    }

    /// Copies of every board.
    pub fn boards(&self) -> Vec<Board> {
        self.boards.iter().map(|slot| *slot.game.board()).collect()
    }

    /// Status of every board.
    pub fn statuses(&self) -> Vec<GameStatus> {
        self.boards.iter().map(|slot| slot.game.status()).collect()
    }

    /// Indices of boards still in play.
    pub fn active_boards(&self) -> Vec<usize> {
        (0..self.boards.len()).filter(|&i| !self.is_over(i)).collect()
    }

    /// Whether board `index` is finished. Unknown boards count as finished.
    pub fn is_over(&self, index: usize) -> bool {
        self.boards.get(index).is_none_or(|slot| slot.game.is_over())
    }

    /// Whether every board is finished.
    pub fn all_over(&self) -> bool {
        self.boards.iter().all(|slot| slot.game.is_over())
    }

    /// Current opponent difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Changes the opponent difficulty for every board.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        debug!(%difficulty, "Difficulty set");
        self.difficulty = difficulty;
    }

    /// Current opponent strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Clears every board and applies `lesson`'s setup. Board `i` receives
    /// the opening rotated by `i` quarter turns.
    #[instrument(skip(self, lesson), fields(lesson = %lesson.id))]
    pub fn reset(&mut self, lesson: &'static Lesson, strategy: Strategy) {
        for (index, slot) in self.boards.iter_mut().enumerate() {
            *slot = BoardSlot::default();
            for pos in lesson.opening {
                slot.game.place(pos.rotated(index), Mark::OPPONENT);
            }
        }
        self.strategy = strategy;
        if let Some(difficulty) = lesson.difficulty {
            self.difficulty = difficulty;
        }
        self.lesson = Some(lesson);
    }

    /// Whether the learner moved this turn on board `index`.
    pub fn has_moved(&self, index: usize) -> bool {
        self.boards.get(index).is_some_and(|slot| slot.has_moved)
    }

    /// One-indexed emptiness query; false off the board.
    pub fn is_square_empty(&self, index: usize, row: i64, col: i64) -> bool {
        match (self.boards.get(index), Position::from_one_indexed(row, col)) {
            (Some(slot), Some(pos)) => slot.game.board().is_empty(pos),
            _ => false,
        }
    }

    /// Learner placement from one-indexed coordinates. `None` when nothing changed.
    pub fn player_place_at(&mut self, index: usize, row: i64, col: i64) -> Option<PlayerMove> {
        match Position::from_one_indexed(row, col) {
            Some(pos) => self.player_place(index, pos),
            None => {
                debug!(index, rejection = %Rejection::OutOfBounds { row, col }, "Placement ignored");
                None
            }
        }
    }

    /// Learner placement on a random empty square.
    pub fn player_place_randomly(&mut self, index: usize) -> Option<PlayerMove> {
        let slot = self.boards.get(index)?;
        if slot.has_moved || slot.game.is_over() {
            return None;
        }
        let board = *slot.game.board();
        let pos = opponent::random_move(&board, &mut self.rng)?;
        self.player_place(index, pos)
    }

    /// Learner placement; at most one per turn.
    #[instrument(level = "debug", skip(self))]
    pub fn player_place(&mut self, index: usize, pos: Position) -> Option<PlayerMove> {
        let lesson = self.lesson;
        let slot = self.boards.get_mut(index)?;
        if slot.has_moved {
            debug!("Already moved this turn");
            return None;
        }
        match slot.game.place(pos, Mark::PLAYER) {
            Placement::Placed(status) => {
                slot.has_moved = true;
                slot.awaiting_reply = !status.is_terminal();
                let board = *slot.game.board();
                Some(PlayerMove {
                    position: pos,
                    board,
                    status,
                    feedback: lesson.and_then(|l| l.feedback(&board, pos)),
                })
            }
            Placement::Rejected(rejection) => {
                debug!(%rejection, "Placement ignored");
                None
            }
        }
    }

    /// Boards whose learner moved and still wait for the opponent.
    pub fn pending_replies(&self) -> Vec<usize> {
        self.boards
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.awaiting_reply && !slot.game.is_over())
            .map(|(index, _)| index)
            .collect()
    }

    /// Plays the opponent's reply on board `index`.
    #[instrument(level = "debug", skip(self), fields(strategy = %self.strategy))]
    pub fn opponent_move(&mut self, index: usize) -> Option<OpponentMove> {
        let Self {
            boards,
            difficulty,
            strategy,
            rng,
            ..
        } = self;
        let slot = boards.get_mut(index)?;
        slot.awaiting_reply = false;
        if slot.game.is_over() {
            return None;
        }

        let board = *slot.game.board();
        let ctx = MoveContext::new(&board, *difficulty, slot.game.last_move_by(Mark::PLAYER));
        let position = strategy.choose(&ctx, rng)?;
        let status = slot.game.place(position, Mark::OPPONENT).status()?;
        Some(OpponentMove {
            position,
            board: *slot.game.board(),
            status,
        })
    }

    /// Starts a new turn on board `index`.
    pub fn new_turn(&mut self, index: usize) {
        if let Some(slot) = self.boards.get_mut(index) {
            slot.has_moved = false;
        }
    }

    /// Starts a new turn on every board.
    pub fn begin_turn(&mut self) {
        for slot in &mut self.boards {
            slot.has_moved = false;
            slot.awaiting_reply = false;
        }
    }

    /// Replaces board `index` with the marks in `rows`, placed in row-major order.
    #[cfg(test)]
    pub(crate) fn preset(&mut self, index: usize, rows: [&str; 3]) {
        let board = Board::from_rows(rows);
        let slot = &mut self.boards[index];
        *slot = BoardSlot::default();
        for pos in Position::ALL {
            if let crate::games::tictactoe::Square::Occupied(mark) = board.get(pos) {
                slot.game.place(pos, mark);
            }
        }
    }

    /// Uniform integer in the inclusive range spanned by `a` and `b`.
    pub fn random_int(&mut self, a: i64, b: i64) -> i64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.rng.random_range(lo..=hi)
    }
}
