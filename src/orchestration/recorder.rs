//! Persists queued match results with retry.

use crate::config::Config;
use crate::db::Repository;
use crate::domain::MatchResult;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use sqlx::error::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

/// Durable destination for finished matches.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Store `result`; `Ok(false)` means it was already present.
    async fn store(&self, result: &MatchResult) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl ResultStore for Repository {
    async fn store(&self, result: &MatchResult) -> Result<bool, sqlx::Error> {
        self.insert_match_result(result).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub max_elapsed: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_interval: config.persist_initial_interval(),
            max_elapsed: config.persist_max_elapsed(),
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(100),
            max_elapsed: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Outcome counters for one recorder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub stored: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Drains a `QueueSink` channel into a `ResultStore`.
#[derive(Clone)]
pub struct ResultRecorder {
    store: Arc<dyn ResultStore>,
    policy: RetryPolicy,
}

impl ResultRecorder {
    pub fn new(store: Arc<dyn ResultStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Persist one result, retrying transient failures with exponential backoff.
    pub async fn record(&self, result: &MatchResult) -> Result<bool, RecordError> {
        retry(self.policy.backoff(), || async {
            self.store.store(result).await.map_err(|e| {
                if is_transient(&e) {
                    warn!(result_key = %result.result_key, error = %e, "Persisting result failed, retrying");
                    backoff::Error::transient(RecordError::Db(e))
                } else {
                    backoff::Error::permanent(RecordError::Db(e))
                }
            })
        })
        .await
    }

    /// Record every result received until all senders are dropped.
    pub async fn run(self, mut rx: UnboundedReceiver<MatchResult>) -> RecorderStats {
        let mut stats = RecorderStats::default();

        while let Some(result) = rx.recv().await {
            match self.record(&result).await {
                Ok(true) => {
                    debug!(result_key = %result.result_key, "Stored match result");
                    stats.stored += 1;
                }
                Ok(false) => {
                    debug!(result_key = %result.result_key, "Match result already stored");
                    stats.duplicates += 1;
                }
                Err(e) => {
                    error!(result_key = %result.result_key, error = %e, "Giving up on match result");
                    stats.failed += 1;
                }
            }
        }

        info!(
            stored = stats.stored,
            duplicates = stats.duplicates,
            failed = stats.failed,
            "Result recorder stopped"
        );
        stats
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => matches!(db.kind(), ErrorKind::Other),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchConfig, MatchState, RuleSet, Side};
    use crate::sink::{QueueSink, ResultSink};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fails the first `failures` calls with `make_error`, then succeeds.
    struct FlakyStore {
        failures: usize,
        calls: AtomicUsize,
        make_error: fn() -> sqlx::Error,
        stored: Mutex<Vec<String>>,
    }

    impl FlakyStore {
        fn new(failures: usize, make_error: fn() -> sqlx::Error) -> Self {
            Self {
                failures,
                calls: AtomicUsize::new(0),
                make_error,
                stored: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResultStore for FlakyStore {
        async fn store(&self, result: &MatchResult) -> Result<bool, sqlx::Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err((self.make_error)());
            }
            let mut stored = self.stored.lock().unwrap();
            if stored.contains(&result.result_key) {
                return Ok(false);
            }
            stored.push(result.result_key.clone());
            Ok(true)
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            initial_interval: Duration::from_millis(1),
            max_elapsed: Duration::from_secs(2),
        }
    }

    fn sample_result() -> MatchResult {
        let config = MatchConfig::new("Djokovic", "Murray", RuleSet::default(), Side::A);
        MatchResult::from_state(&config, &MatchState::new(Side::A), Side::B, Utc::now())
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let store = Arc::new(FlakyStore::new(2, || sqlx::Error::PoolTimedOut));
        let recorder = ResultRecorder::new(store.clone(), fast_policy());

        let stored = tokio_test::assert_ok!(recorder.record(&sample_result()).await);
        assert!(stored);
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let store = Arc::new(FlakyStore::new(5, || sqlx::Error::RowNotFound));
        let recorder = ResultRecorder::new(store.clone(), fast_policy());

        let err = recorder.record(&sample_result()).await.unwrap_err();
        assert!(matches!(err, RecordError::Db(sqlx::Error::RowNotFound)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_drains_queue_and_counts_duplicates() {
        let store = Arc::new(FlakyStore::new(0, || sqlx::Error::PoolTimedOut));
        let recorder = ResultRecorder::new(store.clone(), fast_policy());
        let (sink, rx) = QueueSink::channel();

        let result = sample_result();
        sink.submit(&result).unwrap();
        sink.submit(&result).unwrap();
        sink.submit(&sample_result()).unwrap();
        drop(sink);

        let stats = recorder.run(rx).await;
        assert_eq!(
            stats,
            RecorderStats {
                stored: 2,
                duplicates: 1,
                failed: 0
            }
        );
    }
}
