//! Drive an engine from a recorded match script.

use crate::db::Repository;
use crate::domain::{MatchConfig, MatchResult};
use crate::engine::{ScoreSnapshot, ScoringEngine, ScoringEvent};
use crate::error::AppError;
use crate::orchestration::recorder::{RecorderStats, ResultRecorder, RetryPolicy};
use crate::sink::{QueueSink, ResultSink};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A match configuration plus the operator tokens entered during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScript {
    pub config: MatchConfig,
    #[serde(default)]
    pub events: Vec<String>,
}

impl MatchScript {
    /// Parse a script. A missing `match_id` is derived from the script
    /// contents, so loading the same file twice names the same match.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let mut script: MatchScript = serde_json::from_str(json)?;
        if script.config.match_id.is_nil() {
            script.config.match_id = script.derived_match_id()?;
        }
        Ok(script)
    }

    /// SHA-256 over the config (with a nil id) and the event tokens, truncated
    /// to a uuid.
    pub fn derived_match_id(&self) -> Result<Uuid, AppError> {
        use sha2::{Digest, Sha256};

        let mut config = self.config.clone();
        config.match_id = Uuid::nil();
        let config_json = serde_json::to_string(&config)?;

        let mut hasher = Sha256::new();
        hasher.update((config_json.len() as u32).to_le_bytes());
        hasher.update(config_json.as_bytes());
        for token in &self.events {
            hasher.update((token.len() as u32).to_le_bytes());
            hasher.update(token.as_bytes());
        }
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Ok(Uuid::from_bytes(bytes))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Script(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub snapshot: ScoreSnapshot,
    pub result: Option<MatchResult>,
    /// Tokens that were not a side, `swap` or `reset`.
    pub ignored_tokens: usize,
}

/// Play `script` through a fresh engine that reports to `sink`.
///
/// # Errors
/// Fails on invalid configuration, or when the sink rejects the final result.
pub fn play_script(
    script: &MatchScript,
    sink: Arc<dyn ResultSink>,
) -> Result<ReplayOutcome, AppError> {
    let mut engine = ScoringEngine::new(script.config.clone(), sink)?;
    let mut ignored_tokens = 0;

    for token in &script.events {
        match ScoringEvent::from_token(token) {
            Some(event) => engine.apply(event)?,
            None => {
                debug!(token = %token, "Ignoring unknown token");
                ignored_tokens += 1;
            }
        }
    }

    Ok(ReplayOutcome {
        snapshot: engine.score_snapshot(),
        result: engine.result().cloned(),
        ignored_tokens,
    })
}

/// Play `script` and persist its result through the recorder.
///
/// Returns once the recorder has drained the queue.
pub async fn record_script(
    script: &MatchScript,
    repo: Arc<Repository>,
    policy: RetryPolicy,
) -> Result<(ReplayOutcome, RecorderStats), AppError> {
    let (sink, rx) = QueueSink::channel();
    let recorder = ResultRecorder::new(repo, policy);
    let handle = tokio::spawn(recorder.run(rx));

    // The engine owns the only sender; dropping it closes the queue.
    let outcome = play_script(script, Arc::new(sink));

    let stats = handle
        .await
        .map_err(|e| AppError::Internal(format!("recorder task failed: {}", e)))?;
    Ok((outcome?, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RuleSet, Side};
    use crate::sink::MemorySink;

    fn script(rule_set: RuleSet, events: &[&str]) -> MatchScript {
        MatchScript {
            config: MatchConfig::new("Becker", "Edberg", rule_set, Side::A),
            events: events.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_json() {
        let script = MatchScript::from_json(
            r#"{
                "config": {
                    "side_a": "Becker",
                    "side_b": "Edberg",
                    "rule_set": {"format": "first_to_n_games", "games_target": 2},
                    "starting_server": "b"
                },
                "events": ["a", "a", "swap"]
            }"#,
        )
        .unwrap();
        assert_eq!(script.config.rule_set, RuleSet::FirstToNGames { games_target: 2 });
        assert_eq!(script.config.starting_server, Side::B);
        assert_eq!(script.events.len(), 3);
    }

    const NO_ID: &str = r#"{
        "config": {"side_a": "Graf", "side_b": "Seles"},
        "events": ["a", "a", "a", "a"]
    }"#;

    #[test]
    fn test_missing_match_id_is_derived_from_contents() {
        let first = MatchScript::from_json(NO_ID).unwrap();
        let second = MatchScript::from_json(NO_ID).unwrap();
        assert!(!first.config.match_id.is_nil());
        assert_eq!(first.config.match_id, second.config.match_id);

        let mut other = first.clone();
        other.events.push("b".to_string());
        assert_ne!(other.derived_match_id().unwrap(), first.config.match_id);
    }

    #[test]
    fn test_explicit_match_id_is_kept() {
        let script = MatchScript::from_json(
            r#"{
                "config": {
                    "match_id": "6f1c1c2e-5d0a-4a63-9d1e-3f4f0c9b8a11",
                    "side_a": "Graf",
                    "side_b": "Seles"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            script.config.match_id.to_string(),
            "6f1c1c2e-5d0a-4a63-9d1e-3f4f0c9b8a11"
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            MatchScript::from_json("{not json"),
            Err(AppError::Script(_))
        ));
    }

    #[test]
    fn test_play_script_counts_ignored_tokens() {
        let sink = Arc::new(MemorySink::new());
        let script = script(
            RuleSet::FirstToNGames { games_target: 1 },
            &["a", "?", "a", "let", "a", "a"],
        );
        let outcome = play_script(&script, sink.clone()).unwrap();
        assert_eq!(outcome.ignored_tokens, 2);
        assert!(outcome.snapshot.complete);
        assert_eq!(outcome.result.map(|r| r.winning_side), Some(Side::A));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_play_script_rejects_invalid_rules() {
        let script = script(RuleSet::Standard { best_of_sets: 2 }, &[]);
        let err = play_script(&script, Arc::new(MemorySink::new())).unwrap_err();
        assert!(matches!(err, AppError::Rule(_)));
    }

    #[test]
    fn test_play_script_surfaces_sink_rejection() {
        let script = script(RuleSet::FirstToNGames { games_target: 1 }, &["b", "b", "b", "b"]);
        let err = play_script(&script, Arc::new(MemorySink::rejecting("full"))).unwrap_err();
        assert!(matches!(err, AppError::Sink(_)));
    }
}
