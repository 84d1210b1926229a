//! In-memory sink for tests and embedding.

use super::{ResultSink, SinkError};
use crate::domain::MatchResult;
use std::sync::Mutex;

/// Collects submitted results in memory. Can be told to reject submissions.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<MatchResult>>,
    reject_with: Option<String>,
}

impl MemorySink {
    /// Create a sink that accepts every result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every submission with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            reject_with: Some(reason.into()),
        }
    }

    /// Results accepted so far, in submission order.
    pub fn results(&self) -> Vec<MatchResult> {
        match self.results.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn submit(&self, result: &MatchResult) -> Result<(), SinkError> {
        if let Some(reason) = &self.reject_with {
            return Err(SinkError::Rejected(reason.clone()));
        }
        let mut guard = match self.results.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(result.clone());
        Ok(())
    }
}
