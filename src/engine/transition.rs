//! Pure state transitions: `MatchState` in, `MatchState` out.
//!
//! Replaying the same events against the same rule set always yields the
//! same state. Once the state records a winner every transition returns it
//! unchanged.

use super::{ladder, ScoringEvent};
use crate::domain::{MatchState, PointValue, RuleSet, Score, SetState, Side};
use tracing::{debug, info};

/// Apply one scoring event.
pub fn apply(state: MatchState, rules: &RuleSet, event: ScoringEvent) -> MatchState {
    match event {
        ScoringEvent::Point(side) => award_point(state, rules, side),
        ScoringEvent::ForceServerSwap => force_server_swap(state),
        ScoringEvent::ResetGamePoints => reset_game_points(state),
    }
}

/// Replay a sequence of events from a fresh match.
pub fn replay<I>(starting_server: Side, rules: &RuleSet, events: I) -> MatchState
where
    I: IntoIterator<Item = ScoringEvent>,
{
    events
        .into_iter()
        .fold(MatchState::new(starting_server), |state, event| {
            apply(state, rules, event)
        })
}

/// Award one point to `side`.
pub fn award_point(mut state: MatchState, rules: &RuleSet, side: Side) -> MatchState {
    if state.is_complete() {
        return state;
    }
    if state.current_set().in_tiebreak {
        tiebreak_point(&mut state, rules, side);
    } else {
        game_point(&mut state, rules, side);
    }
    state
}

/// Operator correction: hand serve to the other side.
pub fn force_server_swap(mut state: MatchState) -> MatchState {
    if state.is_complete() {
        return state;
    }
    state.server = state.server.other();
    let set = state.current_set_mut();
    if set.in_tiebreak {
        set.tiebreak_starting_server = set.tiebreak_starting_server.map(|s| s.other());
    }
    state
}

/// Operator correction: current game (or tiebreak) back to 0-0.
pub fn reset_game_points(mut state: MatchState) -> MatchState {
    if state.is_complete() {
        return state;
    }
    state.points = Score::default();
    let set = state.current_set_mut();
    if set.in_tiebreak {
        // Undo the end changes taken every six tiebreak points.
        let end_changes = set.tiebreak_points.total() / 6;
        set.tiebreak_points = Score::default();
        if end_changes % 2 == 1 {
            state.sides_swapped = !state.sides_swapped;
        }
    }
    state
}

/// Side serving the next point, following the tiebreak rotation when one
/// is in progress.
pub fn current_server(state: &MatchState) -> Side {
    let set = state.current_set();
    match (set.in_tiebreak, set.tiebreak_starting_server) {
        (true, Some(starter)) => {
            // Starter serves one point, then each side serves two.
            let played = set.tiebreak_points.total();
            if ((played + 1) / 2) % 2 == 0 {
                starter
            } else {
                starter.other()
            }
        }
        _ => state.server,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetProgress {
    Continue,
    Tiebreak,
    Won,
}

/// Set-completion policy, evaluated after `winner` takes a game.
fn set_progress(rules: &RuleSet, games: Score<u8>, winner: Side) -> SetProgress {
    let won = games.get(winner);
    let lost = games.get(winner.other());
    match *rules {
        RuleSet::Standard { .. } | RuleSet::Final { .. } => {
            if (won >= 6 && won >= lost + 2) || won >= 7 {
                SetProgress::Won
            } else if won == 6 && lost == 6 {
                SetProgress::Tiebreak
            } else {
                SetProgress::Continue
            }
        }
        RuleSet::FastSet { .. } => {
            if won >= 4 {
                SetProgress::Won
            } else if won == 3 && lost == 3 {
                SetProgress::Tiebreak
            } else {
                SetProgress::Continue
            }
        }
        RuleSet::FirstToNGames { games_target } => {
            if won >= games_target {
                SetProgress::Won
            } else {
                SetProgress::Continue
            }
        }
    }
}

fn game_point(state: &mut MatchState, rules: &RuleSet, side: Side) {
    let (scorer, opponent) = ladder::advance(
        state.points.get(side),
        state.points.get(side.other()),
        rules.point_scoring(),
    );
    if scorer == PointValue::GameWon {
        game_won(state, rules, side);
    } else {
        state.points.set(side, scorer);
        state.points.set(side.other(), opponent);
    }
}

fn game_won(state: &mut MatchState, rules: &RuleSet, side: Side) {
    state.points = Score::default();
    state.server = state.server.other();

    let games = {
        let set = state.current_set_mut();
        set.games.increment(side);
        set.games
    };
    if games.total() % 2 == 1 {
        state.sides_swapped = !state.sides_swapped;
    }
    debug!(winner = %side, games_a = games.a, games_b = games.b, "Game won");

    match set_progress(rules, games, side) {
        SetProgress::Continue => {}
        SetProgress::Tiebreak => {
            let server = state.server;
            let set = state.current_set_mut();
            set.in_tiebreak = true;
            set.tiebreak_points = Score::default();
            set.tiebreak_starting_server = Some(server);
            debug!(starting_server = %server, "Tiebreak started");
        }
        SetProgress::Won => finish_set(state, rules, side),
    }
}

fn tiebreak_point(state: &mut MatchState, rules: &RuleSet, side: Side) {
    let Some(rule) = rules.tiebreak_rule() else {
        return;
    };

    let (points, starter) = {
        let set = state.current_set_mut();
        set.tiebreak_points.increment(side);
        (set.tiebreak_points, set.tiebreak_starting_server)
    };

    if !rule.is_decided(points.get(side), points.get(side.other())) {
        if points.total() % 6 == 0 {
            state.sides_swapped = !state.sides_swapped;
        }
        return;
    }

    debug!(
        winner = %side,
        points_a = points.a,
        points_b = points.b,
        "Tiebreak won"
    );
    // The tiebreak receiver opens the next set.
    state.server = starter.unwrap_or(state.server).other();
    let games = {
        let set = state.current_set_mut();
        set.games.increment(side);
        set.games
    };
    if games.total() % 2 == 1 {
        state.sides_swapped = !state.sides_swapped;
    }
    finish_set(state, rules, side);
}

fn finish_set(state: &mut MatchState, rules: &RuleSet, winner: Side) {
    let scoreline = {
        let set = state.current_set_mut();
        set.finished = true;
        set.winner = Some(winner);
        set.in_tiebreak = false;
        set.scoreline()
    };
    info!(winner = %winner, scoreline = %scoreline, "Set finished");

    if state.sets_won(winner) >= rules.sets_to_win() {
        state.winner = Some(winner);
        info!(
            winner = %winner,
            sets_a = state.sets_won(Side::A),
            sets_b = state.sets_won(Side::B),
            "Match finished"
        );
    } else {
        state.sets.push(SetState::new());
    }
}
