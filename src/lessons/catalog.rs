//! The five-lesson curriculum.

use super::evaluation::{EndCriterion, Verdict, Winner};
use crate::games::tictactoe::{Board, Mark, Position, Square, rules};
use crate::opponent::{Difficulty, Strategy};
use serde::{Deserialize, Serialize};

/// Advisory feedback for one learner placement, given the board after the move.
pub type MoveFeedback = fn(&Board, Position) -> String;

/// Identifier of a lesson, `1..=5`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{_0}")]
pub struct LessonId(u8);

impl LessonId {
    /// The first lesson.
    pub const FIRST: LessonId = LessonId(1);
    /// The final lesson.
    pub const LAST: LessonId = LessonId(5);

    /// Creates an id if `number` names a lesson.
    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::LAST.0).contains(&number).then_some(Self(number))
    }

    /// Lesson number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// The following lesson, `None` after the last.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Lesson descriptor for this id.
    pub fn lesson(self) -> &'static Lesson {
        &LESSONS[usize::from(self.0 - 1)]
    }
}

impl TryFrom<u8> for LessonId {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number).ok_or_else(|| format!("no lesson {number}"))
    }
}

impl From<LessonId> for u8 {
    fn from(id: LessonId) -> Self {
        id.0
    }
}

/// Immutable lesson descriptor.
#[derive(Debug)]
pub struct Lesson {
    /// Position in the curriculum.
    pub id: LessonId,
    /// Display name.
    pub name: &'static str,
    /// Text shown when the lesson starts.
    pub teaching: &'static str,
    /// Ordered hints.
    pub hints: &'static [&'static str],
    /// Canonical solution, revealed through the secrets panel.
    pub solution: &'static str,
    /// Opponent marks placed on entry (rotated per board on quad boards).
    pub opening: &'static [Position],
    /// Difficulty set on entry and reasserted before every run.
    pub difficulty: Option<Difficulty>,
    /// Opponent strategy on a single board.
    pub strategy: Strategy,
    /// Advisory per-move feedback.
    pub move_feedback: Option<MoveFeedback>,
    /// What the finished board(s) must show.
    pub end: EndCriterion,
}

impl Lesson {
    /// Judges the finished boards.
    pub fn evaluate(&self, outcomes: &[Winner]) -> Verdict {
        self.end.judge(outcomes)
    }

    /// Feedback for a learner placement, if this lesson gives any.
    pub fn feedback(&self, board: &Board, pos: Position) -> Option<String> {
        self.move_feedback.map(|f| f(board, pos))
    }
}

/// All lessons in curriculum order.
pub static LESSONS: [Lesson; 5] = [
    Lesson {
        id: LessonId(1),
        name: "Take the Center",
        teaching: "The computer already played the top edge. Place your X with the \
                   'place X at row, col' block. The center square is part of four lines.",
        hints: &[
            "Rows and columns are numbered 1 to 3 from the top-left.",
            "The center is row 2, column 2.",
            "Run your program once per turn, or use 'end turn' inside a loop.",
        ],
        solution: "place X at row 2 col 2",
        opening: &[Position::TopCenter],
        difficulty: None,
        strategy: Strategy::Passive,
        move_feedback: Some(center_feedback),
        end: EndCriterion::WinAll,
    },
    Lesson {
        id: LessonId(2),
        name: "Corner Play",
        teaching: "The computer took the center. Corners sit on three lines each. \
                   Claim them and build two threats at once.",
        hints: &[
            "Corners are (1,1), (1,3), (3,1) and (3,3).",
            "Use 'is square empty?' with an if block before placing.",
            "Two corners on the same side make a threat along that edge.",
        ],
        solution: "if is square at row 1 col 1 empty? place X at row 1 col 1\n\
                   else if is square at row 3 col 3 empty? place X at row 3 col 3\n\
                   else place X randomly",
        opening: &[Position::Center],
        difficulty: None,
        strategy: Strategy::Passive,
        move_feedback: Some(corner_feedback),
        end: EndCriterion::WinAll,
    },
    Lesson {
        id: LessonId(3),
        name: "Complete the Line",
        teaching: "Line up two X's with the third square open, then finish the line. \
                   Loops and 'has player moved?' let one program play a whole game.",
        hints: &[
            "A 'repeat' block can try several squares in order.",
            "Check 'has player moved?' so you stop after one placement.",
            "Put 'end turn' at the bottom of the loop to let the computer answer.",
        ],
        solution: "repeat 5 times:\n  for each square in order: if not has player moved? \
                   and is square empty? place X there\n  end turn",
        opening: &[Position::TopLeft],
        difficulty: None,
        strategy: Strategy::Passive,
        move_feedback: Some(threat_feedback),
        end: EndCriterion::WinAll,
    },
    Lesson {
        id: LessonId(4),
        name: "Defense",
        teaching: "This computer sometimes plays its best move. Block its lines and \
                   don't lose: a win or a draw passes.",
        hints: &[
            "Before attacking, check whether O has two in a line.",
            "Blocking means placing X in the empty third square of O's line.",
            "The center is still the strongest first move.",
        ],
        solution: "take the center first; each turn block any line where O has two marks, \
                   otherwise take a free corner",
        opening: &[],
        difficulty: Some(Difficulty::MEDIUM),
        strategy: Strategy::Weighted,
        move_feedback: None,
        end: EndCriterion::LoseNone,
    },
    Lesson {
        id: LessonId(5),
        name: "The Perfect Opponent",
        teaching: "This computer never makes a mistake. Nobody can beat it, but \
                   careful play always earns a draw.",
        hints: &[
            "Against perfect play a draw is the best possible result.",
            "If O takes a corner first, take the center.",
            "Always block before you attack.",
        ],
        solution: "center first, then block every O threat; take a corner when nothing \
                   needs blocking",
        opening: &[],
        difficulty: Some(Difficulty::HARDEST),
        strategy: Strategy::Weighted,
        move_feedback: None,
        end: EndCriterion::TieAll,
    },
];

fn center_feedback(_board: &Board, pos: Position) -> String {
    if pos == Position::Center {
        "You took the center! It is part of four different lines.".to_string()
    } else {
        format!("You played {pos}. Next time try the center: it is part of four lines.")
    }
}

fn corner_feedback(_board: &Board, pos: Position) -> String {
    if pos.is_corner() {
        format!("Nice, {pos} is a corner. Corners are part of three lines.")
    } else {
        format!("{pos} is an edge square and only sits on two lines. Try a corner.")
    }
}

fn threat_feedback(board: &Board, pos: Position) -> String {
    let threatens = rules::LINES.iter().filter(|line| line.contains(&pos)).any(|line| {
        let mine = line
            .iter()
            .filter(|&&p| board.get(p) == Square::Occupied(Mark::PLAYER))
            .count();
        let open = line.iter().filter(|&&p| board.is_empty(p)).count();
        mine == 2 && open == 1
    });

    if rules::check_win(board, Mark::PLAYER) {
        "Three in a row!".to_string()
    } else if threatens {
        "Two in a line with the third open. You can win next turn!".to_string()
    } else {
        "Try to line up two X's with the third square still open.".to_string()
    }
}
