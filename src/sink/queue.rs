//! Channel-backed sink feeding the async result recorder.

use super::{ResultSink, SinkError};
use crate::domain::MatchResult;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Hands results to a `ResultRecorder` over an unbounded channel.
///
/// `submit` never blocks, so it is safe to call from the synchronous engine.
#[derive(Debug, Clone)]
pub struct QueueSink {
    tx: UnboundedSender<MatchResult>,
}

impl QueueSink {
    /// Create a sink and the receiver the recorder drains.
    pub fn channel() -> (Self, UnboundedReceiver<MatchResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ResultSink for QueueSink {
    fn submit(&self, result: &MatchResult) -> Result<(), SinkError> {
        self.tx
            .send(result.clone())
            .map_err(|_| SinkError::Closed)?;
        debug!(result_key = %result.result_key, "Queued match result");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchConfig, MatchState, RuleSet, Side};
    use chrono::Utc;

    fn sample_result() -> MatchResult {
        let config = MatchConfig::new("Laver", "Rosewall", RuleSet::default(), Side::A);
        MatchResult::from_state(&config, &MatchState::new(Side::A), Side::A, Utc::now())
    }

    #[tokio::test]
    async fn test_submit_delivers_to_receiver() {
        let (sink, mut rx) = QueueSink::channel();
        let result = sample_result();
        sink.submit(&result).unwrap();
        assert_eq!(rx.recv().await, Some(result));
    }

    #[test]
    fn test_submit_after_receiver_dropped_is_closed() {
        let (sink, rx) = QueueSink::channel();
        drop(rx);
        assert_eq!(sink.submit(&sample_result()), Err(SinkError::Closed));
    }
}
