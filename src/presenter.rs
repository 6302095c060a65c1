//! Presentation seam.
//!
//! The core never renders anything itself; it reports board changes and
//! status text through a [`Presenter`] and asks it the two questions it
//! needs answered (advance to the next lesson, secrets password).

use crate::games::tictactoe::Board;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::{debug, instrument, warn};

/// Output and prompts the core relies on.
pub trait Presenter {
    /// Called after every mutation of board `index`.
    fn refresh_board(&self, index: usize, board: &Board);

    /// Shows transient status text.
    fn show_status(&self, text: &str);

    /// Asks a yes/no question and blocks for the answer.
    fn confirm(&self, question: &str) -> bool;

    /// Asks for a line of text; `None` when the learner cancels.
    fn prompt(&self, question: &str) -> Option<String>;
}

/// Terminal presenter used by the binary.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    assume_yes: bool,
}

impl ConsolePresenter {
    /// Creates a presenter; with `assume_yes`, confirmations are answered
    /// automatically.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

/// Flushes a question out before blocking on input. Returns false if the
/// flush failed.
fn flush_or_warn(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to flush stdout");
            false
        }
    }
}

impl Presenter for ConsolePresenter {
    fn refresh_board(&self, index: usize, board: &Board) {
        println!("Board {}:\n{}\n", index + 1, board);
    }

    fn show_status(&self, text: &str) {
        println!("{text}");
    }

    #[instrument(skip(self))]
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            println!("{question} [y/n] y");
            return true;
        }
        print!("{question} [y/n] ");
        flush_or_warn(&mut io::stdout());
        let answer = self.read_line();
        debug!(?answer, "Confirmation answered");
        matches!(answer.as_deref(), Some("y" | "Y" | "yes" | "Yes"))
    }

    fn prompt(&self, question: &str) -> Option<String> {
        print!("{question} ");
        flush_or_warn(&mut io::stdout());
        self.read_line()
    }
}

/// Headless presenter that records everything and answers from a script.
///
/// Unscripted confirmations answer `default_confirm`; unscripted prompts
/// are cancelled.
#[derive(Debug, Default)]
pub struct ScriptedPresenter {
    statuses: RefCell<Vec<String>>,
    refreshes: RefCell<Vec<(usize, Board)>>,
    questions: RefCell<Vec<String>>,
    confirms: RefCell<VecDeque<bool>>,
    prompts: RefCell<VecDeque<String>>,
    default_confirm: bool,
}

impl ScriptedPresenter {
    /// Creates a presenter that declines every confirmation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a presenter that accepts every unscripted confirmation.
    pub fn always_confirm() -> Self {
        Self {
            default_confirm: true,
            ..Self::default()
        }
    }

    /// Queues answers for upcoming confirmations.
    pub fn with_confirms(self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirms.borrow_mut().extend(answers);
        self
    }

    /// Queues answers for upcoming prompts.
    pub fn with_prompts<S: Into<String>>(self, answers: impl IntoIterator<Item = S>) -> Self {
        self.prompts
            .borrow_mut()
            .extend(answers.into_iter().map(Into::into));
        self
    }

    /// Every status text shown so far.
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.borrow().clone()
    }

    /// Most recent status text.
    pub fn last_status(&self) -> Option<String> {
        self.statuses.borrow().last().cloned()
    }

    /// Every refresh as `(board index, board)`.
    pub fn refreshes(&self) -> Vec<(usize, Board)> {
        self.refreshes.borrow().clone()
    }

    /// Every question asked through `confirm` or `prompt`.
    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Presenter for ScriptedPresenter {
    fn refresh_board(&self, index: usize, board: &Board) {
        self.refreshes.borrow_mut().push((index, *board));
    }

    fn show_status(&self, text: &str) {
        self.statuses.borrow_mut().push(text.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        self.confirms
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.default_confirm)
    }

    fn prompt(&self, question: &str) -> Option<String> {
        self.questions.borrow_mut().push(question.to_string());
        self.prompts.borrow_mut().pop_front()
    }
}
