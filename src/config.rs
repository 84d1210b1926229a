use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub persist_initial_interval_ms: u64,
    pub persist_max_elapsed_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let persist_initial_interval_ms =
            parse_millis(&env_map, "PERSIST_INITIAL_INTERVAL_MS", "100")?;
        let persist_max_elapsed_ms = parse_millis(&env_map, "PERSIST_MAX_ELAPSED_MS", "30000")?;

        if persist_initial_interval_ms > persist_max_elapsed_ms {
            return Err(ConfigError::InvalidValue(
                "PERSIST_INITIAL_INTERVAL_MS".to_string(),
                "must not exceed PERSIST_MAX_ELAPSED_MS".to_string(),
            ));
        }

        Ok(Config {
            database_path,
            persist_initial_interval_ms,
            persist_max_elapsed_ms,
        })
    }

    pub fn persist_initial_interval(&self) -> Duration {
        Duration::from_millis(self.persist_initial_interval_ms)
    }

    pub fn persist_max_elapsed(&self) -> Duration {
        Duration::from_millis(self.persist_max_elapsed_ms)
    }
}

fn parse_millis(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<u64, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(default);
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be a positive number of milliseconds, got {}", raw),
        )),
        Ok(ms) => Ok(ms),
    }
}
