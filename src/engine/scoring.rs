use super::{transition, ScoreSnapshot, ScoringEvent};
use crate::domain::{MatchConfig, MatchResult, MatchState, RuleError, Side};
use crate::sink::{ResultSink, SinkError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Live scorer for a single match.
///
/// Every operation is synchronous and performs no I/O apart from the single
/// `ResultSink::submit` call made when the match completes. Input after
/// completion, and unknown side tokens, are ignored rather than reported.
pub struct ScoringEngine {
    config: MatchConfig,
    state: MatchState,
    sink: Arc<dyn ResultSink>,
    result: Option<MatchResult>,
}

impl ScoringEngine {
    /// Build an engine for `config`.
    ///
    /// # Errors
    /// Returns an error if the rule parameters or side names are invalid.
    pub fn new(config: MatchConfig, sink: Arc<dyn ResultSink>) -> Result<Self, RuleError> {
        config.validate()?;
        info!(
            match_id = %config.match_id,
            side_a = %config.side_a,
            side_b = %config.side_b,
            rule_set = %config.rule_set,
            "Match started"
        );
        Ok(Self {
            state: MatchState::new(config.starting_server),
            config,
            sink,
            result: None,
        })
    }

    /// Award a point to `side`.
    ///
    /// # Errors
    /// Returns the sink's error when this point completes the match and the
    /// sink rejects the result. The match stays complete either way and
    /// `result()` still returns the record.
    pub fn award_point(&mut self, side: Side) -> Result<(), SinkError> {
        self.apply(ScoringEvent::Point(side))
    }

    /// Award a point from an operator token (`a` / `b`). Unknown tokens are ignored.
    pub fn award_point_token(&mut self, token: &str) -> Result<(), SinkError> {
        match token.parse::<Side>() {
            Ok(side) => self.award_point(side),
            Err(e) => {
                debug!(error = %e, "Ignoring point for unknown side");
                Ok(())
            }
        }
    }

    /// Operator correction: hand serve to the other side.
    pub fn force_server_swap(&mut self) {
        if self.state.is_complete() {
            warn!(match_id = %self.config.match_id, "Server swap ignored, match complete");
            return;
        }
        self.state = transition::force_server_swap(std::mem::take(&mut self.state));
        debug!(server = %self.current_server(), "Server swapped by operator");
    }

    /// Operator correction: current game (or tiebreak) back to 0-0.
    pub fn reset_game_points(&mut self) {
        if self.state.is_complete() {
            warn!(match_id = %self.config.match_id, "Point reset ignored, match complete");
            return;
        }
        self.state = transition::reset_game_points(std::mem::take(&mut self.state));
        debug!("Game points reset by operator");
    }

    /// Apply any scoring event.
    pub fn apply(&mut self, event: ScoringEvent) -> Result<(), SinkError> {
        if self.state.is_complete() {
            debug!(?event, "Ignoring event, match complete");
            return Ok(());
        }

        let state = std::mem::take(&mut self.state);
        self.state = transition::apply(state, &self.config.rule_set, event);

        match self.state.winner {
            Some(winner) => self.complete(winner),
            None => Ok(()),
        }
    }

    fn complete(&mut self, winner: Side) -> Result<(), SinkError> {
        let result = MatchResult::from_state(&self.config, &self.state, winner, Utc::now());
        info!(
            match_id = %self.config.match_id,
            result_key = %result.result_key,
            winner = %result.winner_name(),
            scoreline = %result.per_set_scoreline.join(" "),
            "Match complete"
        );
        self.result = Some(result.clone());

        self.sink.submit(&result).map_err(|e| {
            warn!(result_key = %result.result_key, error = %e, "Result sink rejected match result");
            e
        })
    }

    /// Side serving the next point.
    pub fn current_server(&self) -> Side {
        transition::current_server(&self.state)
    }

    pub fn is_match_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Owned display projection of the current state.
    pub fn score_snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot::capture(&self.config, &self.state)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The completed match record, once the match is over.
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("match_id", &self.config.match_id)
            .field("state", &self.state)
            .field("complete", &self.is_match_complete())
            .finish()
    }
}
