//! Match configuration supplied once, before the first point.

use crate::domain::{RuleError, RuleSet, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sides, rule set and starting server for one match. Immutable once the
/// engine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Nil when a script omits it; `MatchScript` then derives one.
    #[serde(default)]
    pub match_id: Uuid,
    pub side_a: String,
    pub side_b: String,
    #[serde(default)]
    pub rule_set: RuleSet,
    #[serde(default = "default_starting_server")]
    pub starting_server: Side,
}

fn default_starting_server() -> Side {
    Side::A
}

impl MatchConfig {
    /// Create a config with a fresh match id.
    pub fn new(
        side_a: impl Into<String>,
        side_b: impl Into<String>,
        rule_set: RuleSet,
        starting_server: Side,
    ) -> Self {
        Self {
            match_id: Uuid::new_v4(),
            side_a: side_a.into(),
            side_b: side_b.into(),
            rule_set,
            starting_server,
        }
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.side_a.trim().is_empty() {
            return Err(RuleError::EmptySideName(Side::A));
        }
        if self.side_b.trim().is_empty() {
            return Err(RuleError::EmptySideName(Side::B));
        }
        self.rule_set.validate()
    }

}
