//! Tic-tac-toe board model, rules, and invariants.

mod action;
mod game;
pub mod invariants;
mod position;
pub mod rules;
mod types;

pub use action::{Move, Placement, Rejection};
pub use game::Game;
pub use position::Position;
pub use types::{Board, GameStatus, Mark, Square};
