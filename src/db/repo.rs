//! Repository layer for match result records.

use crate::domain::{MatchResult, RuleSet, Side};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert a match result idempotently.
    ///
    /// Returns `false` when a result with the same key was already stored.
    ///
    /// # Errors
    /// Returns an error if encoding or the insert fails.
    pub async fn insert_match_result(&self, result: &MatchResult) -> Result<bool, sqlx::Error> {
        let rule_set = serde_json::to_string(&result.rule_set)
            .map_err(|e| sqlx::Error::Protocol(format!("encoding match result: {}", e)))?;
        let scoreline = serde_json::to_string(&result.per_set_scoreline)
            .map_err(|e| sqlx::Error::Protocol(format!("encoding match result: {}", e)))?;

        let outcome = sqlx::query(
            r#"
            INSERT INTO match_results (
                result_key, match_id, side_a, side_b, rule_set, per_set_scoreline,
                winning_side, completed_at, completed_at_ms, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(result_key) DO NOTHING
            "#,
        )
        .bind(result.result_key.as_str())
        .bind(result.match_id.to_string())
        .bind(result.side_a.as_str())
        .bind(result.side_b.as_str())
        .bind(rule_set)
        .bind(scoreline)
        .bind(result.winning_side.to_string())
        .bind(result.completed_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .bind(result.completed_at.timestamp_millis())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    /// Fetch a single result by its key.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row cannot be decoded.
    pub async fn get_match_result(
        &self,
        result_key: &str,
    ) -> Result<Option<MatchResult>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT result_key, match_id, side_a, side_b, rule_set, per_set_scoreline,
                   winning_side, completed_at
            FROM match_results
            WHERE result_key = ?
            "#,
        )
        .bind(result_key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_result).transpose()
    }

    /// Query stored results, optionally only those involving `side_name`,
    /// ordered by completion time.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row cannot be decoded.
    pub async fn query_match_results(
        &self,
        side_name: Option<&str>,
    ) -> Result<Vec<MatchResult>, sqlx::Error> {
        let rows = match side_name {
            Some(name) => {
                sqlx::query(
                    r#"
                    SELECT result_key, match_id, side_a, side_b, rule_set, per_set_scoreline,
                           winning_side, completed_at
                    FROM match_results
                    WHERE side_a = ? OR side_b = ?
                    ORDER BY completed_at_ms ASC, result_key ASC
                    "#,
                )
                .bind(name)
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT result_key, match_id, side_a, side_b, rule_set, per_set_scoreline,
                           winning_side, completed_at
                    FROM match_results
                    ORDER BY completed_at_ms ASC, result_key ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_result).collect()
    }

    /// Count stored results.
    pub async fn count_match_results(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM match_results")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }
}

fn row_to_result(row: &SqliteRow) -> Result<MatchResult, sqlx::Error> {
    let match_id: String = row.get("match_id");
    let rule_set: String = row.get("rule_set");
    let scoreline: String = row.get("per_set_scoreline");
    let winning_side: String = row.get("winning_side");
    let completed_at: String = row.get("completed_at");

    let match_id = Uuid::parse_str(&match_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let rule_set: RuleSet =
        serde_json::from_str(&rule_set).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let per_set_scoreline: Vec<String> =
        serde_json::from_str(&scoreline).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let winning_side =
        Side::from_str(&winning_side).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let completed_at = DateTime::parse_from_rfc3339(&completed_at)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    Ok(MatchResult {
        result_key: row.get("result_key"),
        match_id,
        side_a: row.get("side_a"),
        side_b: row.get("side_b"),
        rule_set,
        per_set_scoreline,
        winning_side,
        completed_at,
    })
}
