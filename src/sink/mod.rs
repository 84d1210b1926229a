//! Result sink abstraction: where finished matches go.

use crate::domain::MatchResult;
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod queue;

pub use memory::MemorySink;
pub use queue::QueueSink;

/// Receives one finalized `MatchResult` per match.
///
/// The engine calls `submit` exactly once, synchronously, at the moment the
/// match completes, and never retries. Implementations that persist must
/// queue and retry on their own side.
pub trait ResultSink: Send + Sync + fmt::Debug {
    fn submit(&self, result: &MatchResult) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The receiving side has shut down.
    #[error("result sink closed")]
    Closed,
    #[error("result rejected: {0}")]
    Rejected(String),
}
