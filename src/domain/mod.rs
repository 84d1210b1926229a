//! Domain types for live tennis scoring.
//!
//! This module provides:
//! - Primitives: Side and the per-side Score pair
//! - Point values and ad/no-ad scoring policy
//! - Rule sets with their tiebreak thresholds and validation
//! - Match configuration, live match state and the completed MatchResult

pub mod match_config;
pub mod points;
pub mod primitives;
pub mod result;
pub mod rules;
pub mod state;

pub use match_config::MatchConfig;
pub use points::{PointScoring, PointValue};
pub use primitives::{Score, Side, SideParseError};
pub use result::MatchResult;
pub use rules::{RuleError, RuleSet, TiebreakRule};
pub use state::{MatchState, SetState};
