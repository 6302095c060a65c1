//! Status invariant: the cached status always matches the board.

use super::super::{Game, rules};
use super::Invariant;

/// Invariant: the stored status equals the status derived from the squares.
pub struct StatusConsistentInvariant;

impl Invariant<Game> for StatusConsistentInvariant {
    fn holds(game: &Game) -> bool {
        game.status() == rules::status(game.board())
    }

    fn description() -> &'static str {
        "Game status matches the board"
    }
}
