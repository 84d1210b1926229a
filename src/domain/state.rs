//! Live match state: current game points, sets, server.

use crate::domain::{PointValue, Score, Side};
use serde::{Deserialize, Serialize};

/// State of one set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetState {
    pub games: Score<u8>,
    pub in_tiebreak: bool,
    pub tiebreak_points: Score<u16>,
    /// Side that served the first tiebreak point; set once the tiebreak starts.
    pub tiebreak_starting_server: Option<Side>,
    /// Never reverts to false.
    pub finished: bool,
    pub winner: Option<Side>,
}

impl SetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this set has gone (or is going) to a tiebreak.
    pub fn went_to_tiebreak(&self) -> bool {
        self.tiebreak_starting_server.is_some()
    }

    /// Finished-set scoreline, `"6-4"` or `"7-6(5)"` with the tiebreak loser's points.
    pub fn scoreline(&self) -> String {
        let games = format!("{}-{}", self.games.a, self.games.b);
        match (self.went_to_tiebreak(), self.winner) {
            (true, Some(winner)) => {
                format!("{}({})", games, self.tiebreak_points.get(winner.other()))
            }
            _ => games,
        }
    }
}

/// Full state of one match, threaded through the transition functions.
///
/// `sets` is never empty and only its last element may be unfinished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub points: Score<PointValue>,
    pub sets: Vec<SetState>,
    pub server: Side,
    /// Change of ends; display only.
    pub sides_swapped: bool,
    pub winner: Option<Side>,
}

impl MatchState {
    pub fn new(starting_server: Side) -> Self {
        Self {
            points: Score::default(),
            sets: vec![SetState::new()],
            server: starting_server,
            sides_swapped: false,
            winner: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn current_set(&self) -> &SetState {
        // Invariant: sets is non-empty.
        &self.sets[self.sets.len() - 1]
    }

    pub fn current_set_mut(&mut self) -> &mut SetState {
        let last = self.sets.len() - 1;
        &mut self.sets[last]
    }

    /// Number of finished sets won by `side`.
    pub fn sets_won(&self, side: Side) -> usize {
        self.sets
            .iter()
            .filter(|set| set.finished && set.winner == Some(side))
            .count()
    }

    /// Scorelines of all finished sets, in order.
    pub fn finished_scorelines(&self) -> Vec<String> {
        self.sets
            .iter()
            .filter(|set| set.finished)
            .map(SetState::scoreline)
            .collect()
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(Side::A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_has_one_open_set() {
        let state = MatchState::new(Side::B);
        assert_eq!(state.sets.len(), 1);
        assert!(!state.current_set().finished);
        assert_eq!(state.server, Side::B);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_scoreline_plain() {
        let set = SetState {
            games: Score::new(6, 4),
            finished: true,
            winner: Some(Side::A),
            ..SetState::default()
        };
        assert_eq!(set.scoreline(), "6-4");
    }

    #[test]
    fn test_scoreline_tiebreak_shows_loser_points() {
        let set = SetState {
            games: Score::new(6, 7),
            tiebreak_points: Score::new(5, 7),
            tiebreak_starting_server: Some(Side::A),
            finished: true,
            winner: Some(Side::B),
            ..SetState::default()
        };
        assert_eq!(set.scoreline(), "6-7(5)");
    }
}
