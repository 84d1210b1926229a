//! Point values within a single game.

use serde::{Deserialize, Serialize};

/// Score of one side within the current game.
///
/// `GameWon` only ever comes out of the point ladder; a stored game score
/// is reset to 0-0 as soon as a game is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointValue {
    #[default]
    Zero,
    Fifteen,
    Thirty,
    Forty,
    Advantage,
    GameWon,
}

impl PointValue {
    /// Scoreboard label for this value.
    pub fn label(&self) -> &'static str {
        match self {
            PointValue::Zero => "0",
            PointValue::Fifteen => "15",
            PointValue::Thirty => "30",
            PointValue::Forty => "40",
            PointValue::Advantage => "AD",
            PointValue::GameWon => "GAME",
        }
    }
}

impl std::fmt::Display for PointValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether games are played with deuce/advantage or sudden death at 40-40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointScoring {
    Advantage,
    NoAdvantage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(PointValue::Zero.to_string(), "0");
        assert_eq!(PointValue::Forty.to_string(), "40");
        assert_eq!(PointValue::Advantage.to_string(), "AD");
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(PointValue::default(), PointValue::Zero);
    }
}
