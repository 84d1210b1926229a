//! Completed match record handed to the result sink.

use crate::domain::{MatchConfig, MatchState, RuleSet, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finished match. Created once, when the engine detects completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Stable key for idempotent persistence.
    pub result_key: String,
    pub match_id: Uuid,
    pub side_a: String,
    pub side_b: String,
    pub rule_set: RuleSet,
    pub per_set_scoreline: Vec<String>,
    pub winning_side: Side,
    pub completed_at: DateTime<Utc>,
}

impl MatchResult {
    /// Build the record from the final state of a match.
    pub fn from_state(
        config: &MatchConfig,
        state: &MatchState,
        winning_side: Side,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let per_set_scoreline = state.finished_scorelines();
        let result_key = Self::compute_result_key(
            &config.match_id,
            &config.side_a,
            &config.side_b,
            &per_set_scoreline,
            winning_side,
        );
        Self {
            result_key,
            match_id: config.match_id,
            side_a: config.side_a.clone(),
            side_b: config.side_b.clone(),
            rule_set: config.rule_set,
            per_set_scoreline,
            winning_side,
            completed_at,
        }
    }

    /// Name of the winning side.
    pub fn winner_name(&self) -> &str {
        match self.winning_side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn loser_name(&self) -> &str {
        match self.winning_side {
            Side::A => &self.side_b,
            Side::B => &self.side_a,
        }
    }

    /// Deterministic key over the match identity and its outcome.
    ///
    /// Redelivering the same result always yields the same key, so the store
    /// can drop duplicates.
    pub fn compute_result_key(
        match_id: &Uuid,
        side_a: &str,
        side_b: &str,
        per_set_scoreline: &[String],
        winning_side: Side,
    ) -> String {
        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        hasher.update(match_id.as_bytes());
        hash_var(&mut hasher, side_a);
        hash_var(&mut hasher, side_b);
        for set in per_set_scoreline {
            hash_var(&mut hasher, set);
        }
        hasher.update(if winning_side == Side::A { b"A" } else { b"B" });

        let hash = hasher.finalize();
        format!("match:{}", hex::encode(&hash[..16]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoreline(sets: &[&str]) -> Vec<String> {
        sets.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_result_key_deterministic() {
        let id = Uuid::new_v4();
        let lines = scoreline(&["6-4", "7-6(3)"]);
        let k1 = MatchResult::compute_result_key(&id, "Graf", "Seles", &lines, Side::A);
        let k2 = MatchResult::compute_result_key(&id, "Graf", "Seles", &lines, Side::A);
        assert_eq!(k1, k2);
        assert!(k1.starts_with("match:"));
        assert_eq!(k1.len(), 6 + 32);
    }

    #[test]
    fn test_result_key_differs_per_match() {
        let lines = scoreline(&["6-0", "6-0"]);
        let k1 = MatchResult::compute_result_key(&Uuid::new_v4(), "Graf", "Seles", &lines, Side::A);
        let k2 = MatchResult::compute_result_key(&Uuid::new_v4(), "Graf", "Seles", &lines, Side::A);
        // Same names and scoreline, different matches.
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_result_key_separates_names() {
        let id = Uuid::new_v4();
        let lines = scoreline(&["4-2"]);
        let k1 = MatchResult::compute_result_key(&id, "ab", "c", &lines, Side::A);
        let k2 = MatchResult::compute_result_key(&id, "a", "bc", &lines, Side::A);
        assert_ne!(k1, k2);
    }
}
