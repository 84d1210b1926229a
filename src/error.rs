use crate::domain::RuleError;
use crate::sink::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid match setup: {0}")]
    Rule(#[from] RuleError),
    #[error("Result sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("Invalid match script: {0}")]
    Script(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Script(err.to_string())
    }
}
