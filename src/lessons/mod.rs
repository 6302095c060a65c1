//! Curriculum: lesson descriptors, end-of-game judgement and progression.

mod catalog;
mod evaluation;
mod progress;

pub use catalog::{LESSONS, Lesson, LessonId, MoveFeedback};
pub use evaluation::{EndCriterion, Verdict, Winner};
pub use progress::{LessonProgress, Phase, ProgressError};
