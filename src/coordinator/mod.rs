//! Turn coordination between learner programs and the opponent.
//!
//! A single board alternates strictly: each learner placement is answered by
//! one opponent move right away. Quad boards run one interpreter per board
//! and hold every opponent reply until all non-terminal boards have ended
//! their turn or finished, then answer them in one shared cycle.
//!
//! Everything runs on one task. Interpreters interleave only at placement
//! settle delays and at the barrier; session borrows never span an await.

mod barrier;
mod handle;
mod session;

pub use barrier::{Arrival, TurnBarrier};
pub use handle::BoardHandle;
pub use session::{BoardSlot, OpponentMove, PlayerMove, Session};

use crate::games::tictactoe::{Board, GameStatus};
use crate::lessons::Lesson;
use crate::opponent::Strategy;
use crate::presenter::Presenter;
use crate::sandbox::{Interpreter, LoopBudget, Program, SandboxFault};
use futures::future::join_all;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// When the opponent answers a learner placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    /// Right after the placement.
    Immediate,
    /// In a shared cycle once every running board has ended its turn.
    Barrier,
}

/// A fault that aborted one board's program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFault {
    /// Board whose program faulted.
    pub board: usize,
    /// What went wrong.
    pub fault: SandboxFault,
}

/// Owns the session and sequences player moves, opponent moves and refreshes.
pub struct Coordinator {
    session: RefCell<Session>,
    barrier: TurnBarrier,
    presenter: Rc<dyn Presenter>,
    mode: TurnMode,
    settle: Duration,
}

impl Coordinator {
    /// Creates a coordinator over `session`.
    pub fn new(
        session: Session,
        presenter: Rc<dyn Presenter>,
        mode: TurnMode,
        settle: Duration,
    ) -> Self {
        Self {
            session: RefCell::new(session),
            barrier: TurnBarrier::new(),
            presenter,
            mode,
            settle,
        }
    }

    /// Read access to the session.
    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    pub(crate) fn session_mut(&self) -> RefMut<'_, Session> {
        self.session.borrow_mut()
    }

    /// Turn mode.
    pub fn mode(&self) -> TurnMode {
        self.mode
    }

    /// Copies of every board.
    pub fn boards(&self) -> Vec<Board> {
        self.session().boards()
    }

    /// Status of every board.
    pub fn statuses(&self) -> Vec<GameStatus> {
        self.session().statuses()
    }

    /// Engine binding for board `index`.
    pub fn handle(&self, index: usize) -> BoardHandle<'_> {
        BoardHandle::new(self, index)
    }

    /// Resets the boards for `lesson` and shows them.
    #[instrument(skip(self, lesson), fields(lesson = %lesson.id))]
    pub fn setup(&self, lesson: &'static Lesson, strategy: Strategy) {
        self.session_mut().reset(lesson, strategy);
        let boards = self.boards();
        for (index, board) in boards.iter().enumerate() {
            self.presenter.refresh_board(index, board);
        }
        info!(boards = boards.len(), %strategy, "Boards ready");
    }

    /// Runs `program` once on every board still in play.
    ///
    /// Each board gets its own interpreter bound to its own handle; all of
    /// them share `budget`. A fault aborts only the board that raised it.
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn run_round(&self, program: &Program, budget: &LoopBudget) -> Vec<BoardFault> {
        let active = {
            let mut session = self.session_mut();
            session.begin_turn();
            session.active_boards()
        };
        if self.mode == TurnMode::Barrier {
            self.barrier.open(active.len());
        }
        debug!(?active, "Round started");

        let runs = active.into_iter().map(|index| async move {
            let handle = self.handle(index);
            let result = Interpreter::new(&handle, budget).run(program).await;
            self.finish_board().await;
            result.err().map(|fault| {
                warn!(board = index, %fault, "Program aborted");
                BoardFault {
                    board: index,
                    fault,
                }
            })
        });
        let faults: Vec<BoardFault> = join_all(runs).await.into_iter().flatten().collect();

        if !self.session().pending_replies().is_empty() {
            self.opponent_cycle().await;
        }
        faults
    }

    /// Learner placement at one-indexed coordinates on board `index`.
    pub async fn player_place_at(&self, index: usize, row: i64, col: i64) {
        let placed = self.session_mut().player_place_at(index, row, col);
        if let Some(placed) = placed {
            self.after_player_move(index, placed).await;
        }
    }

    /// Learner placement on a random empty square of board `index`.
    pub async fn player_place_randomly(&self, index: usize) {
        let placed = self.session_mut().player_place_randomly(index);
        if let Some(placed) = placed {
            self.after_player_move(index, placed).await;
        }
    }

    async fn after_player_move(&self, index: usize, placed: PlayerMove) {
        debug!(index, position = %placed.position, status = ?placed.status, "Learner placed");
        self.presenter.refresh_board(index, &placed.board);
        if let Some(feedback) = &placed.feedback {
            self.presenter.show_status(feedback);
        }
        self.announce(index, placed.status);
        self.settle().await;

        if self.mode == TurnMode::Immediate && !placed.status.is_terminal() {
            self.reply(index).await;
        }
    }

    /// Explicit end of turn for board `index`.
    ///
    /// On a single board this just opens a new turn. On quad boards the
    /// caller waits at the barrier until the shared opponent cycle is done.
    pub async fn end_turn(&self, index: usize) {
        if self.session().is_over(index) {
            return;
        }
        match self.mode {
            TurnMode::Immediate => self.session_mut().new_turn(index),
            TurnMode::Barrier => match self.barrier.arrive() {
                Arrival::Leader => {
                    self.opponent_cycle().await;
                    self.barrier.release();
                }
                Arrival::Follower(generation) => self.barrier.wait(generation).await,
            },
        }
    }

    async fn finish_board(&self) {
        if self.mode == TurnMode::Barrier && self.barrier.depart() {
            self.opponent_cycle().await;
            self.barrier.release();
        }
    }

    /// Answers every board that is waiting for the opponent, then opens a new
    /// turn everywhere.
    #[instrument(skip(self))]
    async fn opponent_cycle(&self) {
        let pending = self.session().pending_replies();
        debug!(?pending, "Opponent cycle");
        for index in pending {
            self.reply(index).await;
        }
        self.session_mut().begin_turn();
    }

    async fn reply(&self, index: usize) {
        let reply = self.session_mut().opponent_move(index);
        let Some(reply) = reply else {
            return;
        };
        debug!(index, position = %reply.position, status = ?reply.status, "Opponent placed");
        self.presenter.refresh_board(index, &reply.board);
        self.announce(index, reply.status);
        self.settle().await;
    }

    fn announce(&self, index: usize, status: GameStatus) {
        let single = self.session().board_count() == 1;
        if single {
            self.presenter.show_status(status.message());
        } else if status.is_terminal() {
            self.presenter
                .show_status(&format!("Board {}: {}", index + 1, status.message()));
        }
    }

    async fn settle(&self) {
        if self.settle.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.settle).await;
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("session", &self.session)
            .field("mode", &self.mode)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}
