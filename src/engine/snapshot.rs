use super::transition;
use crate::domain::{MatchConfig, MatchState, SetState, Side};
use serde::{Deserialize, Serialize};

/// Read-only projection of a match for scoreboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub side_a: String,
    pub side_b: String,
    /// Current game score labels (`"0"`, `"15"`, `"40"`, `"AD"`), or the
    /// tiebreak point counts while a tiebreak is running.
    pub points_a: String,
    pub points_b: String,
    pub sets: Vec<SetSnapshot>,
    pub server: Side,
    pub sides_swapped: bool,
    pub in_tiebreak: bool,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSnapshot {
    pub games_a: u8,
    pub games_b: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiebreak_a: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiebreak_b: Option<u16>,
    pub finished: bool,
}

impl From<&SetState> for SetSnapshot {
    fn from(set: &SetState) -> Self {
        let tiebreak = set.went_to_tiebreak().then_some(set.tiebreak_points);
        Self {
            games_a: set.games.a,
            games_b: set.games.b,
            tiebreak_a: tiebreak.map(|p| p.a),
            tiebreak_b: tiebreak.map(|p| p.b),
            finished: set.finished,
        }
    }
}

impl ScoreSnapshot {
    pub fn capture(config: &MatchConfig, state: &MatchState) -> Self {
        let current = state.current_set();
        let in_tiebreak = current.in_tiebreak && !state.is_complete();
        let (points_a, points_b) = if in_tiebreak {
            (
                current.tiebreak_points.a.to_string(),
                current.tiebreak_points.b.to_string(),
            )
        } else {
            (
                state.points.a.label().to_string(),
                state.points.b.label().to_string(),
            )
        };

        Self {
            side_a: config.side_a.clone(),
            side_b: config.side_b.clone(),
            points_a,
            points_b,
            sets: state.sets.iter().map(SetSnapshot::from).collect(),
            server: transition::current_server(state),
            sides_swapped: state.sides_swapped,
            in_tiebreak,
            complete: state.is_complete(),
            winner: state.winner,
        }
    }

    /// One-line scoreboard, e.g. `"6-4 3-2 (30-15)"`.
    pub fn scoreline(&self) -> String {
        let sets: Vec<String> = self
            .sets
            .iter()
            .map(|set| format!("{}-{}", set.games_a, set.games_b))
            .collect();
        if self.complete {
            sets.join(" ")
        } else {
            format!("{} ({}-{})", sets.join(" "), self.points_a, self.points_b)
        }
    }
}
