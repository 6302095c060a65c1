//! Opponent difficulty levels.

use serde::{Deserialize, Serialize};

/// Opponent skill from 1 (always random) to 5 (always optimal).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{_0}")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Lowest level: every opponent move is random.
    pub const EASIEST: Difficulty = Difficulty(1);
    /// Middle level: half of the moves are optimal.
    pub const MEDIUM: Difficulty = Difficulty(3);
    /// Highest level: every opponent move is optimal.
    pub const HARDEST: Difficulty = Difficulty(5);

    /// Creates a difficulty if `level` is in `1..=5`.
    pub fn new(level: u8) -> Option<Self> {
        (1..=5).contains(&level).then_some(Self(level))
    }

    /// Creates a difficulty, clamping `level` into `1..=5`.
    pub fn clamped(level: i64) -> Self {
        // Clamp keeps the value inside u8 range before the cast.
        Self(level.clamp(1, 5) as u8)
    }

    /// Numeric level.
    pub fn level(self) -> u8 {
        self.0
    }

    /// Probability that the opponent plays the minimax move: `(level - 1) * 0.25`.
    pub fn optimal_probability(self) -> f64 {
        f64::from(self.0 - 1) * 0.25
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASIEST
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("difficulty must be 1-5, got {level}"))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_is_linear() {
        let probabilities: Vec<f64> = (1..=5)
            .filter_map(Difficulty::new)
            .map(Difficulty::optimal_probability)
            .collect();
        assert_eq!(probabilities, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(Difficulty::new(0), None);
        assert_eq!(Difficulty::new(6), None);
        assert_eq!(Difficulty::new(3), Some(Difficulty::MEDIUM));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Difficulty::clamped(-7), Difficulty::EASIEST);
        assert_eq!(Difficulty::clamped(99), Difficulty::HARDEST);
        assert_eq!(Difficulty::clamped(4).level(), 4);
    }
}
