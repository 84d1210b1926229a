pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod sink;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    MatchConfig, MatchResult, MatchState, PointScoring, PointValue, RuleError, RuleSet, Score,
    SetState, Side, TiebreakRule,
};
pub use engine::{ScoreSnapshot, ScoringEngine, ScoringEvent};
pub use error::AppError;
pub use sink::{MemorySink, QueueSink, ResultSink, SinkError};
