//! End-of-game judgement for lessons.

use crate::games::tictactoe::GameStatus;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Terminal winner token handed to end evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Winner {
    /// The learner won.
    #[display("X")]
    X,
    /// The opponent won.
    #[display("O")]
    O,
    /// Draw.
    #[display("Tie")]
    Tie,
}

impl Winner {
    /// Token for a terminal status, `None` while the game is active.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Active => None,
            GameStatus::PlayerWin => Some(Winner::X),
            GameStatus::OpponentWin => Some(Winner::O),
            GameStatus::Draw => Some(Winner::Tie),
        }
    }
}

/// Pass/fail result of a finished lesson attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the attempt met the lesson's goal.
    pub passed: bool,
    /// Message shown to the learner.
    pub message: String,
}

impl Verdict {
    /// Creates a verdict.
    pub fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }
}

/// What a lesson demands of the finished board(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCriterion {
    /// Every board must be won.
    WinAll,
    /// No board may be lost; wins and draws both count.
    LoseNone,
    /// Every board must be a draw and none won. A single win with no
    /// losses beats a perfect opponent and is not penalized.
    TieAll,
}

impl EndCriterion {
    /// Judges one outcome per board.
    #[instrument(level = "debug")]
    pub fn judge(self, outcomes: &[Winner]) -> Verdict {
        let count = |w: Winner| outcomes.iter().filter(|&&o| o == w).count();
        let (wins, losses, ties) = (count(Winner::X), count(Winner::O), count(Winner::Tie));
        let total = outcomes.len();
        let single = total == 1;

        match self {
            EndCriterion::WinAll if wins == total => Verdict::new(
                true,
                if single {
                    "You won! Lesson complete.".to_string()
                } else {
                    format!("You won all {total} boards! Lesson complete.")
                },
            ),
            EndCriterion::WinAll if single && ties == 1 => {
                Verdict::new(false, "A draw isn't enough here. Go for the win!")
            }
            EndCriterion::WinAll if single => {
                Verdict::new(false, "The computer won. Try again!")
            }
            EndCriterion::WinAll => Verdict::new(
                false,
                format!("You won {wins} of {total} boards. Win them all to pass."),
            ),
            EndCriterion::LoseNone | EndCriterion::TieAll if losses > 0 => Verdict::new(
                false,
                if single {
                    "The computer won. Watch for its lines and block them!".to_string()
                } else {
                    format!("You lost {losses} of {total} boards. Don't lose any to pass.")
                },
            ),
            EndCriterion::LoseNone => Verdict::new(
                true,
                if single && wins == 1 {
                    "You beat a smarter opponent!".to_string()
                } else if single {
                    "A draw. You held your ground!".to_string()
                } else {
                    format!("No losses: {wins} won, {ties} drawn. Lesson complete.")
                },
            ),
            EndCriterion::TieAll if ties == total => Verdict::new(
                true,
                "A draw against a perfect opponent. That's the best anyone can do!",
            ),
            EndCriterion::TieAll if wins == 1 => Verdict::new(
                true,
                "You beat a perfect opponent?! That shouldn't be possible, but it counts.",
            ),
            EndCriterion::TieAll => Verdict::new(
                false,
                format!("You won {wins} of {total} boards. Draw them all to pass."),
            ),
        }
    }
}
