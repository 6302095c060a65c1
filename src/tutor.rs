//! The tutor: lessons, boards and learner runs tied together.

use crate::config::{TutorConfig, Variant};
use crate::coordinator::{BoardFault, Coordinator, Session, TurnMode};
use crate::games::tictactoe::{Board, GameStatus};
use crate::lessons::{Lesson, LessonId, LessonProgress, ProgressError, Verdict, Winner};
use crate::opponent::{Difficulty, Strategy};
use crate::presenter::Presenter;
use crate::sandbox::{LoopBudget, Program};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{info, instrument, warn};

/// Why a run was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RunError {
    /// Another run is still executing.
    #[display("A program is already running")]
    AlreadyRunning,
    /// The boards have not been set up yet.
    #[display("The boards are not ready yet")]
    NotReady,
    /// Every board is finished; restart or advance first.
    #[display("The game is over. Restart the lesson to play again")]
    GameOver,
    /// The final lesson has been passed.
    #[display("Every lesson is complete")]
    CurriculumComplete,
}

impl std::error::Error for RunError {}

/// Outcome of one run/continue action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Boards whose program aborted.
    pub faults: Vec<BoardFault>,
    /// Loop iterations spent.
    pub iterations: u32,
    /// Lesson verdict, once every board finished during this run.
    pub verdict: Option<Verdict>,
    /// Lesson entered after a pass, if the learner accepted.
    pub advanced_to: Option<LessonId>,
    /// Whether this run completed the final lesson.
    pub curriculum_complete: bool,
}

/// Clears the running flag however the run ends.
struct RunGuard<'a>(&'a Cell<bool>);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Session façade used by front ends.
///
/// ```no_run
/// use std::rc::Rc;
/// use tictactoe_tutor::{ConsolePresenter, Program, Tutor, TutorConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let tutor = Tutor::new(TutorConfig::default(), Rc::new(ConsolePresenter::new(false)));
/// tutor.start();
/// let program = Program::load("center.json")?;
/// let report = tutor.run(&program).await?;
/// println!("{:?}", report.verdict);
/// # Ok(())
/// # }
/// ```
pub struct Tutor {
    config: TutorConfig,
    presenter: Rc<dyn Presenter>,
    coordinator: Coordinator,
    progress: RefCell<LessonProgress>,
    running: Cell<bool>,
    ready: Cell<bool>,
    secrets_unlocked: Cell<bool>,
}

impl Tutor {
    /// Creates a tutor. Boards stay unset until [`Tutor::start`].
    pub fn new(config: TutorConfig, presenter: Rc<dyn Presenter>) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        let session = Session::new(config.variant().board_count(), rng);
        let mode = match config.variant() {
            Variant::Single => TurnMode::Immediate,
            Variant::Quad => TurnMode::Barrier,
        };
        let coordinator = Coordinator::new(session, presenter.clone(), mode, config.settle_delay());
        let progress = LessonProgress::starting_at(*config.start_lesson());

        Self {
            config,
            presenter,
            coordinator,
            progress: RefCell::new(progress),
            running: Cell::new(false),
            ready: Cell::new(false),
            secrets_unlocked: Cell::new(false),
        }
    }

    /// Sets up the boards for the starting lesson.
    pub fn start(&self) {
        self.enter_lesson();
    }

    /// Configuration in use.
    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Current lesson.
    pub fn lesson(&self) -> &'static Lesson {
        self.progress.borrow().current().lesson()
    }

    /// Progress through the curriculum.
    pub fn progress(&self) -> LessonProgress {
        *self.progress.borrow()
    }

    /// Whether a run is executing.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Current lesson's teaching text.
    pub fn teaching_text(&self) -> &'static str {
        self.lesson().teaching
    }

    /// Current lesson's hints, in order.
    pub fn hints(&self) -> &'static [&'static str] {
        self.lesson().hints
    }

    /// Current opponent difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.coordinator.session().difficulty()
    }

    /// Copies of every board.
    pub fn boards(&self) -> Vec<Board> {
        self.coordinator.boards()
    }

    /// Status of every board.
    pub fn statuses(&self) -> Vec<GameStatus> {
        self.coordinator.statuses()
    }

    /// Opponent strategy for `lesson` under this configuration.
    pub fn strategy_for(&self, lesson: &Lesson) -> Strategy {
        if *self.config.variant() == Variant::Quad
            && *self.config.mirror_final_lesson()
            && lesson.id == LessonId::LAST
        {
            Strategy::Mirror
        } else {
            lesson.strategy
        }
    }

    #[instrument(skip(self))]
    fn enter_lesson(&self) {
        self.ready.set(false);
        let lesson = self.lesson();
        self.coordinator.setup(lesson, self.strategy_for(lesson));
        info!(lesson = %lesson.id, name = lesson.name, "Lesson entered");
        self.presenter
            .show_status(&format!("Lesson {}: {}", lesson.id, lesson.name));
        self.presenter.show_status(lesson.teaching);
        self.ready.set(true);
    }

    /// Resets the boards and replays the current lesson's setup.
    pub fn restart_lesson(&self) -> Result<(), RunError> {
        if self.running.get() {
            return Err(RunError::AlreadyRunning);
        }
        if self.progress.borrow().is_complete() {
            return Err(RunError::CurriculumComplete);
        }
        self.progress.borrow_mut().retry();
        self.enter_lesson();
        Ok(())
    }

    /// Moves to the next lesson after a pass. Returns `None` when the final
    /// lesson was completed instead.
    pub fn advance(&self) -> Result<Option<LessonId>, ProgressError> {
        if self.running.get() {
            warn!("Advance refused: a program is running");
            return Err(ProgressError::RunInProgress);
        }
        self.advance_lesson()
    }

    fn advance_lesson(&self) -> Result<Option<LessonId>, ProgressError> {
        let next = self.progress.borrow_mut().advance()?;
        match next {
            Some(_) => self.enter_lesson(),
            None => {
                self.ready.set(false);
                self.presenter
                    .show_status("Congratulations! You finished every lesson.");
            }
        }
        Ok(next)
    }

    /// Executes `program` once against every board still in play.
    #[instrument(skip_all, fields(lesson = %self.progress.borrow().current()))]
    pub async fn run(&self, program: &Program) -> Result<RunReport, RunError> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            warn!("Run refused: already running");
            return Err(RunError::AlreadyRunning);
        };
        if self.progress.borrow().is_complete() {
            return Err(RunError::CurriculumComplete);
        }
        if !self.ready.get() {
            return Err(RunError::NotReady);
        }
        if self.coordinator.session().all_over() {
            return Err(RunError::GameOver);
        }

        let lesson = self.lesson();
        if let Some(difficulty) = lesson.difficulty {
            self.coordinator.session_mut().set_difficulty(difficulty);
        }

        let budget = LoopBudget::new(*self.config.iteration_cap());
        let faults = self.coordinator.run_round(program, &budget).await;
        let several = self.coordinator.mode() == TurnMode::Barrier;
        for BoardFault { board, fault } in &faults {
            if several {
                self.presenter
                    .show_status(&format!("Board {}: {}", board + 1, fault));
            } else {
                self.presenter.show_status(&fault.to_string());
            }
        }

        let mut report = RunReport {
            faults,
            iterations: budget.consumed(),
            ..RunReport::default()
        };
        info!(iterations = report.iterations, faults = report.faults.len(), "Run finished");

        if self.coordinator.session().all_over() {
            let verdict = self.judge(lesson);
            if verdict.passed {
                self.offer_advance(&mut report).await;
            } else if *self.config.auto_retry() {
                info!("Retrying failed lesson");
                self.progress.borrow_mut().retry();
                self.enter_lesson();
            }
            report.verdict = Some(verdict);
        }
        Ok(report)
    }

    fn judge(&self, lesson: &Lesson) -> Verdict {
        let outcomes: Vec<Winner> = self
            .statuses()
            .into_iter()
            .filter_map(Winner::from_status)
            .collect();
        let verdict = lesson.evaluate(&outcomes);
        info!(passed = verdict.passed, ?outcomes, "Lesson judged");
        self.progress.borrow_mut().record(&verdict);
        self.presenter.show_status(&verdict.message);
        verdict
    }

    async fn offer_advance(&self, report: &mut RunReport) {
        tokio::time::sleep(self.config.advance_delay()).await;

        let current = self.progress.borrow().current();
        let accepted = match current.next() {
            Some(next) => self.presenter.confirm(&format!(
                "Lesson {} complete! Continue to lesson {}: {}?",
                current,
                next,
                next.lesson().name
            )),
            None => true,
        };
        if !accepted {
            return;
        }
        match self.advance_lesson() {
            Ok(Some(next)) => report.advanced_to = Some(next),
            Ok(None) => report.curriculum_complete = true,
            Err(e) => warn!(error = %e, "Advance refused"),
        }
    }

    /// Asks the presenter for the secrets password.
    pub fn request_secrets(&self) -> bool {
        if self.secrets_unlocked.get() {
            return true;
        }
        match self.presenter.prompt("Password:") {
            Some(password) => self.unlock_secrets(&password),
            None => false,
        }
    }

    /// Unlocks the secrets panel if `password` matches.
    pub fn unlock_secrets(&self, password: &str) -> bool {
        if password == self.config.secrets_password() {
            info!("Secrets unlocked");
            self.secrets_unlocked.set(true);
            true
        } else {
            self.presenter.show_status("Wrong password.");
            false
        }
    }

    /// Whether the secrets panel is unlocked.
    pub fn secrets_unlocked(&self) -> bool {
        self.secrets_unlocked.get()
    }

    /// Current lesson's solution, once unlocked.
    pub fn secrets(&self) -> Option<&'static str> {
        self.secrets_unlocked
            .get()
            .then(|| self.lesson().solution)
    }
}

impl std::fmt::Debug for Tutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tutor")
            .field("config", &self.config)
            .field("progress", &self.progress)
            .field("running", &self.running)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::ScriptedPresenter;

    fn tutor(presenter: ScriptedPresenter) -> (Tutor, Rc<ScriptedPresenter>) {
        let presenter = Rc::new(presenter);
        let config = TutorConfig::default().with_seed(3);
        (Tutor::new(config, presenter.clone()), presenter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_before_start_is_refused() {
        let (tutor, _) = tutor(ScriptedPresenter::new());
        assert_eq!(
            tutor.run(&Program::default()).await,
            Err(RunError::NotReady)
        );
        tutor.start();
        assert!(tutor.run(&Program::default()).await.is_ok());
        assert!(!tutor.is_running());
    }

    #[test]
    fn test_secrets_gate() {
        let (tutor, presenter) = tutor(ScriptedPresenter::new().with_prompts(["nope", "blockly"]));
        tutor.start();
        assert_eq!(tutor.secrets(), None);
        assert!(!tutor.request_secrets());
        assert_eq!(presenter.last_status().as_deref(), Some("Wrong password."));
        assert!(tutor.request_secrets());
        assert_eq!(tutor.secrets(), Some(tutor.lesson().solution));
        assert!(tutor.request_secrets());
        assert_eq!(presenter.questions().len(), 2);
    }

    #[test]
    fn test_quad_final_lesson_mirrors() {
        let presenter = Rc::new(ScriptedPresenter::new());
        let config = TutorConfig::default().with_variant(Variant::Quad);
        let quad = Tutor::new(config, presenter.clone());
        assert_eq!(quad.strategy_for(LessonId::LAST.lesson()), Strategy::Mirror);
        assert_eq!(
            quad.strategy_for(LessonId::FIRST.lesson()),
            Strategy::Passive
        );

        let single = Tutor::new(TutorConfig::default(), presenter);
        assert_eq!(
            single.strategy_for(LessonId::LAST.lesson()),
            Strategy::Weighted
        );
    }

    fn place(row: i64, col: i64) -> Program {
        Program::new(vec![crate::sandbox::Stmt::PlaceMarkAt {
            row: crate::sandbox::Expr::Number(row),
            col: crate::sandbox::Expr::Number(col),
        }])
        .unwrap()
    }

    const NEAR_DRAW: [&str; 3] = ["XOX", "XOO", "O.X"];

    #[tokio::test(start_paused = true)]
    async fn test_win_passes_and_advances() {
        let (tutor, presenter) = tutor(ScriptedPresenter::always_confirm());
        tutor.start();
        tutor
            .coordinator
            .session_mut()
            .preset(0, ["XO.", "X..", "..."]);

        let report = tutor.run(&place(3, 1)).await.unwrap();
        let verdict = report.verdict.unwrap();
        assert!(verdict.passed);
        assert_eq!(report.advanced_to, LessonId::new(2));
        assert_eq!(tutor.progress().current(), LessonId::new(2).unwrap());
        assert!(
            presenter
                .questions()
                .iter()
                .any(|q| q.contains("Continue to lesson 2"))
        );
        // Lesson 2 opens with the opponent in the center.
        assert!(!tutor.boards()[0].is_empty(crate::Position::Center));
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_advance_keeps_lesson() {
        let (tutor, _) = tutor(ScriptedPresenter::new());
        tutor.start();
        tutor
            .coordinator
            .session_mut()
            .preset(0, ["XO.", "X..", "..."]);

        let report = tutor.run(&place(3, 1)).await.unwrap();
        assert!(report.verdict.unwrap().passed);
        assert_eq!(report.advanced_to, None);
        assert_eq!(tutor.progress().phase(), crate::Phase::Passed);
        assert_eq!(
            tutor.run(&place(1, 3)).await,
            Err(RunError::GameOver)
        );
        assert_eq!(tutor.advance(), Ok(LessonId::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_fails_first_lesson() {
        let (tutor, presenter) = tutor(ScriptedPresenter::always_confirm());
        tutor.start();
        tutor.coordinator.session_mut().preset(0, NEAR_DRAW);

        let report = tutor.run(&place(3, 2)).await.unwrap();
        let verdict = report.verdict.unwrap();
        assert!(!verdict.passed);
        assert_eq!(presenter.last_status(), Some(verdict.message));
        assert_eq!(tutor.progress().phase(), crate::Phase::Failed);
        assert_eq!(tutor.run(&place(1, 1)).await, Err(RunError::GameOver));

        tutor.restart_lesson().unwrap();
        assert_eq!(tutor.progress().phase(), crate::Phase::Playing);
        assert_eq!(tutor.boards()[0].empty_positions().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_retry_reenters_lesson() {
        let presenter = Rc::new(ScriptedPresenter::new());
        let config = TutorConfig::default().with_seed(3).with_auto_retry(true);
        let tutor = Tutor::new(config, presenter.clone());
        tutor.start();
        tutor.coordinator.session_mut().preset(0, NEAR_DRAW);

        let report = tutor.run(&place(3, 2)).await.unwrap();
        assert!(!report.verdict.unwrap().passed);
        assert_eq!(tutor.progress().phase(), crate::Phase::Playing);
        assert_eq!(tutor.boards()[0].empty_positions().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_lesson_completes_curriculum() {
        let presenter = Rc::new(ScriptedPresenter::new());
        let config = TutorConfig::default()
            .with_seed(3)
            .with_start_lesson(LessonId::LAST);
        let tutor = Tutor::new(config, presenter.clone());
        tutor.start();
        assert_eq!(tutor.difficulty(), Difficulty::HARDEST);
        tutor.coordinator.session_mut().preset(0, NEAR_DRAW);

        let report = tutor.run(&place(3, 2)).await.unwrap();
        assert!(report.verdict.unwrap().passed);
        assert!(report.curriculum_complete);
        assert!(tutor.progress().is_complete());
        assert!(presenter.questions().is_empty());
        assert_eq!(
            tutor.run(&place(1, 1)).await,
            Err(RunError::CurriculumComplete)
        );
        assert_eq!(tutor.restart_lesson(), Err(RunError::CurriculumComplete));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lesson_difficulty_reasserted_each_run() {
        let presenter = Rc::new(ScriptedPresenter::new());
        let config = TutorConfig::default()
            .with_seed(3)
            .with_start_lesson(LessonId::new(4).unwrap());
        let tutor = Tutor::new(config, presenter);
        tutor.start();

        let lower = Program::new(vec![crate::sandbox::Stmt::SetDifficulty {
            level: crate::sandbox::Expr::Number(1),
        }])
        .unwrap();
        tutor.run(&lower).await.unwrap();
        assert_eq!(tutor.difficulty(), Difficulty::EASIEST);

        tutor.run(&Program::default()).await.unwrap();
        assert_eq!(tutor.difficulty(), Difficulty::MEDIUM);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_refused_while_running() {
        let (tutor, _) = tutor(ScriptedPresenter::new());
        tutor.start();
        tutor
            .coordinator
            .session_mut()
            .preset(0, ["XO.", "X..", "..."]);

        let program = place(3, 1);
        let (report, during) = tokio::join!(tutor.run(&program), async { tutor.advance() });
        assert_eq!(during, Err(ProgressError::RunInProgress));
        assert!(report.unwrap().verdict.unwrap().passed);
        assert_eq!(tutor.progress().current(), LessonId::FIRST);

        assert_eq!(tutor.advance(), Ok(LessonId::new(2)));
    }

    #[test]
    fn test_advance_requires_pass() {
        let (tutor, _) = tutor(ScriptedPresenter::new());
        tutor.start();
        assert_eq!(
            tutor.advance(),
            Err(ProgressError::NotPassed(LessonId::FIRST))
        );
        assert_eq!(tutor.progress().current(), LessonId::FIRST);
    }
}
