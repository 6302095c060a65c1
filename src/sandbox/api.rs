//! Operations learner programs may call.

use async_trait::async_trait;

/// Engine operations exposed to learner code, bound to one board.
///
/// Placement requests never fail: invalid, occupied or out-of-turn targets
/// are silently ignored. Operations that update the board are async because
/// they suspend for the visual settle delay.
#[async_trait(?Send)]
pub trait EngineApi {
    /// Places the learner's mark at a one-indexed square.
    async fn place_mark_at(&self, row: i64, col: i64);

    /// Whether a one-indexed square is empty; false off the board.
    fn is_square_empty(&self, row: i64, col: i64) -> bool;

    /// Places the learner's mark on a random empty square.
    async fn place_mark_randomly(&self);

    /// Sets the opponent difficulty, clamped into `1..=5`.
    fn set_difficulty(&self, level: i64);

    /// Whether the learner has already moved this turn on this board.
    fn has_player_moved(&self) -> bool;

    /// Yields to the opponent and suspends until the shared turn resolves.
    async fn end_turn(&self);

    /// Uniform integer between `lo` and `hi` inclusive, in either order.
    fn random_int(&self, lo: i64, hi: i64) -> i64;

    /// Whether the bound board's game has ended.
    fn is_game_over(&self) -> bool;
}
