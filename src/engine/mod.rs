//! Match-scoring state machine.
//!
//! `transition` holds the pure state transitions; `ScoringEngine` wraps them
//! with the match configuration and the result sink.

use crate::domain::Side;
use serde::{Deserialize, Serialize};

pub mod ladder;
pub mod scoring;
pub mod snapshot;
pub mod transition;

pub use scoring::ScoringEngine;
pub use snapshot::{ScoreSnapshot, SetSnapshot};

/// A discrete input to the scoring state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringEvent {
    /// A point won by the given side.
    Point(Side),
    /// Operator correction: hand serve to the other side.
    ForceServerSwap,
    /// Operator correction: current game back to 0-0.
    ResetGamePoints,
}

impl ScoringEvent {
    /// Parse an operator token: `a`, `b`, `swap` or `reset`.
    ///
    /// Returns `None` for anything else; callers ignore unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "swap" => Some(ScoringEvent::ForceServerSwap),
            "reset" => Some(ScoringEvent::ResetGamePoints),
            other => other.parse::<Side>().ok().map(ScoringEvent::Point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(ScoringEvent::from_token("a"), Some(ScoringEvent::Point(Side::A)));
        assert_eq!(ScoringEvent::from_token("B"), Some(ScoringEvent::Point(Side::B)));
        assert_eq!(
            ScoringEvent::from_token(" swap "),
            Some(ScoringEvent::ForceServerSwap)
        );
        assert_eq!(
            ScoringEvent::from_token("RESET"),
            Some(ScoringEvent::ResetGamePoints)
        );
        assert_eq!(ScoringEvent::from_token("c"), None);
        assert_eq!(ScoringEvent::from_token(""), None);
    }
}
