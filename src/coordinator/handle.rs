//! Per-board engine binding handed to each interpreter.

use super::Coordinator;
use crate::opponent::Difficulty;
use crate::sandbox::EngineApi;
use async_trait::async_trait;

/// Engine operations bound to one board index at creation.
///
/// Every interpreter gets its own handle, so operations resolve against the
/// right board even while several programs interleave.
#[derive(Clone, Copy)]
pub struct BoardHandle<'c> {
    coordinator: &'c Coordinator,
    index: usize,
}

impl<'c> BoardHandle<'c> {
    pub(crate) fn new(coordinator: &'c Coordinator, index: usize) -> Self {
        Self { coordinator, index }
    }

    /// Board this handle is bound to.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Debug for BoardHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardHandle")
            .field("index", &self.index)
            .finish()
    }
}

#[async_trait(?Send)]
impl EngineApi for BoardHandle<'_> {
    async fn place_mark_at(&self, row: i64, col: i64) {
        self.coordinator.player_place_at(self.index, row, col).await;
    }

    fn is_square_empty(&self, row: i64, col: i64) -> bool {
        self.coordinator
            .session()
            .is_square_empty(self.index, row, col)
    }

    async fn place_mark_randomly(&self) {
        self.coordinator.player_place_randomly(self.index).await;
    }

    fn set_difficulty(&self, level: i64) {
        self.coordinator
            .session_mut()
            .set_difficulty(Difficulty::clamped(level));
    }

    fn has_player_moved(&self) -> bool {
        self.coordinator.session().has_moved(self.index)
    }

    async fn end_turn(&self) {
        self.coordinator.end_turn(self.index).await;
    }

    fn random_int(&self, lo: i64, hi: i64) -> i64 {
        self.coordinator.session_mut().random_int(lo, hi)
    }

    fn is_game_over(&self) -> bool {
        self.coordinator.session().is_over(self.index)
    }
}
