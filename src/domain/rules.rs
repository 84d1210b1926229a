//! Winning rules for a match: set format, tiebreak thresholds, best-of count.

use crate::domain::{PointScoring, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thresholds for a point-based tiebreak.
///
/// A tiebreak is decided when the scorer reaches `target` with a lead of at
/// least `win_by`. With a `cap`, once the opponent already holds `cap`
/// points the next point decides regardless of margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakRule {
    pub target: u8,
    pub win_by: u8,
    #[serde(default)]
    pub cap: Option<u8>,
}

impl TiebreakRule {
    /// Seven points, win by two.
    pub const fn standard() -> Self {
        Self {
            target: 7,
            win_by: 2,
            cap: None,
        }
    }

    /// Fast4: first to five points, a single point of margin is enough.
    pub const fn fast() -> Self {
        Self {
            target: 5,
            win_by: 1,
            cap: None,
        }
    }

    /// Fast4 read as "to four, win by two, next point wins at 4-4".
    pub const fn fast_sudden_death() -> Self {
        Self {
            target: 4,
            win_by: 2,
            cap: Some(4),
        }
    }

    /// Final sets: seven points win by two, next point wins at 10-10.
    pub const fn final_set() -> Self {
        Self {
            target: 7,
            win_by: 2,
            cap: Some(10),
        }
    }

    /// Whether `scorer` points against `opponent` points ends the tiebreak
    /// in the scorer's favour.
    pub fn is_decided(&self, scorer: u16, opponent: u16) -> bool {
        if scorer <= opponent {
            return false;
        }
        if let Some(cap) = self.cap {
            if opponent >= u16::from(cap) {
                return true;
            }
        }
        scorer >= u16::from(self.target) && scorer - opponent >= u16::from(self.win_by)
    }

    fn validate(&self) -> Result<(), RuleError> {
        if self.target == 0 {
            return Err(RuleError::InvalidTiebreak(
                "target must be at least 1".to_string(),
            ));
        }
        if self.win_by == 0 {
            return Err(RuleError::InvalidTiebreak(
                "win_by must be at least 1".to_string(),
            ));
        }
        if let Some(cap) = self.cap {
            if u16::from(cap) + 1 < u16::from(self.target) {
                return Err(RuleError::InvalidTiebreak(format!(
                    "cap {} is unreachable below target {}",
                    cap, self.target
                )));
            }
        }
        Ok(())
    }
}

impl Default for TiebreakRule {
    fn default() -> Self {
        Self::standard()
    }
}

/// The rule set a match is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RuleSet {
    /// Advantage scoring, six-game sets, tiebreak at 6-6.
    Standard {
        #[serde(default = "best_of_three")]
        best_of_sets: u8,
    },
    /// One set raced to `games_target` games; no margin, no tiebreak.
    FirstToNGames { games_target: u8 },
    /// Fast4: no-ad, four-game sets, tiebreak at 3-3.
    FastSet {
        #[serde(default = "best_of_one")]
        best_of_sets: u8,
        #[serde(default = "TiebreakRule::fast")]
        tiebreak: TiebreakRule,
    },
    /// Finals: six-game sets with a capped tiebreak at 6-6.
    Final {
        #[serde(default = "best_of_three")]
        best_of_sets: u8,
        #[serde(default = "no_ad_default")]
        no_ad: bool,
    },
}

fn best_of_one() -> u8 {
    1
}

fn best_of_three() -> u8 {
    3
}

fn no_ad_default() -> bool {
    true
}

impl RuleSet {
    /// Reject malformed parameters. Never clamps.
    pub fn validate(&self) -> Result<(), RuleError> {
        match *self {
            RuleSet::Standard { best_of_sets } | RuleSet::Final { best_of_sets, .. } => {
                validate_best_of(best_of_sets)
            }
            RuleSet::FirstToNGames { games_target } => {
                if (1..=6).contains(&games_target) {
                    Ok(())
                } else {
                    Err(RuleError::InvalidGamesTarget(games_target))
                }
            }
            RuleSet::FastSet {
                best_of_sets,
                tiebreak,
            } => {
                validate_best_of(best_of_sets)?;
                tiebreak.validate()
            }
        }
    }

    pub fn point_scoring(&self) -> PointScoring {
        match self {
            RuleSet::Standard { .. } | RuleSet::FirstToNGames { .. } => PointScoring::Advantage,
            RuleSet::FastSet { .. } => PointScoring::NoAdvantage,
            RuleSet::Final { no_ad: true, .. } => PointScoring::NoAdvantage,
            RuleSet::Final { no_ad: false, .. } => PointScoring::Advantage,
        }
    }

    /// Number of sets a side needs to take the match.
    pub fn sets_to_win(&self) -> usize {
        match *self {
            RuleSet::FirstToNGames { .. } => 1,
            RuleSet::Standard { best_of_sets }
            | RuleSet::FastSet { best_of_sets, .. }
            | RuleSet::Final { best_of_sets, .. } => usize::from(best_of_sets) / 2 + 1,
        }
    }

    /// Tiebreak thresholds, if this format plays tiebreaks at all.
    pub fn tiebreak_rule(&self) -> Option<TiebreakRule> {
        match *self {
            RuleSet::Standard { .. } => Some(TiebreakRule::standard()),
            RuleSet::FirstToNGames { .. } => None,
            RuleSet::FastSet { tiebreak, .. } => Some(tiebreak),
            RuleSet::Final { .. } => Some(TiebreakRule::final_set()),
        }
    }
}

fn validate_best_of(best_of_sets: u8) -> Result<(), RuleError> {
    match best_of_sets {
        1 | 3 | 5 => Ok(()),
        other => Err(RuleError::InvalidBestOf(other)),
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::Standard { best_of_sets: 3 }
    }
}

impl std::fmt::Display for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSet::Standard { best_of_sets } => write!(f, "standard, best of {}", best_of_sets),
            RuleSet::FirstToNGames { games_target } => write!(f, "first to {} games", games_target),
            RuleSet::FastSet { best_of_sets, .. } => write!(f, "fast4, best of {}", best_of_sets),
            RuleSet::Final { best_of_sets, .. } => write!(f, "final, best of {}", best_of_sets),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("best_of_sets must be 1, 3 or 5, got {0}")]
    InvalidBestOf(u8),
    #[error("games_target must be between 1 and 6, got {0}")]
    InvalidGamesTarget(u8),
    #[error("invalid tiebreak rule: {0}")]
    InvalidTiebreak(String),
    #[error("name for side {0} must not be empty")]
    EmptySideName(Side),
}
