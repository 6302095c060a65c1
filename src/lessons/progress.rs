//! Forward-only lesson progression.

use super::catalog::LessonId;
use super::evaluation::Verdict;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Where the learner stands within the current lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Boards are in play.
    Playing,
    /// The end criterion was met; advancing is allowed.
    Passed,
    /// The end criterion was missed; only a retry is allowed.
    Failed,
    /// The final lesson was passed.
    Complete,
}

/// Illegal progression request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ProgressError {
    /// Advancing requires a passed lesson.
    #[display("Lesson {_0} has not been passed yet")]
    NotPassed(LessonId),
    /// Nothing follows the final lesson.
    #[display("The curriculum is already complete")]
    AlreadyComplete,
    /// Lessons cannot change while a program is running.
    #[display("Cannot change lessons while a program is running")]
    RunInProgress,
}

impl std::error::Error for ProgressError {}

/// Current lesson plus its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    current: LessonId,
    phase: Phase,
}

impl LessonProgress {
    /// Starts playing at `lesson`.
    pub fn starting_at(lesson: LessonId) -> Self {
        Self {
            current: lesson,
            phase: Phase::Playing,
        }
    }

    /// Current lesson.
    pub fn current(&self) -> LessonId {
        self.current
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true once the last lesson has been passed and acknowledged.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Records the end-of-game verdict for the current lesson.
    #[instrument(skip(self), fields(lesson = %self.current))]
    pub fn record(&mut self, verdict: &Verdict) {
        if self.phase != Phase::Playing {
            return;
        }
        self.phase = if verdict.passed {
            Phase::Passed
        } else {
            Phase::Failed
        };
        info!(phase = %self.phase, "Lesson judged");
    }

    /// Moves to the next lesson. Returns the new lesson, or `None` when the
    /// final lesson was just completed.
    #[instrument(skip(self), fields(lesson = %self.current))]
    pub fn advance(&mut self) -> Result<Option<LessonId>, ProgressError> {
        match self.phase {
            Phase::Complete => Err(ProgressError::AlreadyComplete),
            Phase::Playing | Phase::Failed => Err(ProgressError::NotPassed(self.current)),
            Phase::Passed => match self.current.next() {
                Some(next) => {
                    info!(next = %next, "Advancing");
                    *self = Self::starting_at(next);
                    Ok(Some(next))
                }
                None => {
                    info!("Curriculum complete");
                    self.phase = Phase::Complete;
                    Ok(None)
                }
            },
        }
    }

    /// Self-loop back to playing the same lesson.
    pub fn retry(&mut self) {
        if self.phase != Phase::Complete {
            self.phase = Phase::Playing;
        }
    }
}

impl Default for LessonProgress {
    fn default() -> Self {
        Self::starting_at(LessonId::FIRST)
    }
}
