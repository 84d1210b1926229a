use crate::domain::{PointScoring, PointValue};

/// Advance the game score after `scorer` wins a point against `opponent`.
///
/// Returns the new `(scorer, opponent)` pair. The scorer's value is
/// `PointValue::GameWon` when the point ends the game.
pub fn advance(
    scorer: PointValue,
    opponent: PointValue,
    scoring: PointScoring,
) -> (PointValue, PointValue) {
    match (scorer, scoring) {
        (PointValue::Zero, _) => (PointValue::Fifteen, opponent),
        (PointValue::Fifteen, _) => (PointValue::Thirty, opponent),
        (PointValue::Thirty, _) => (PointValue::Forty, opponent),
        (PointValue::Forty, PointScoring::NoAdvantage) => (PointValue::GameWon, opponent),
        (PointValue::Forty, PointScoring::Advantage) => match opponent {
            // Deuce.
            PointValue::Forty => (PointValue::Advantage, PointValue::Forty),
            // Opponent loses the advantage; back to deuce.
            PointValue::Advantage => (PointValue::Forty, PointValue::Forty),
            _ => (PointValue::GameWon, opponent),
        },
        (PointValue::Advantage, _) | (PointValue::GameWon, _) => (PointValue::GameWon, opponent),
    }
}
