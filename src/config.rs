use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ledger_backend: LedgerBackend,
    pub store_timeout_ms: u64,
}

/// Where the ledger rows live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackend {
    Sqlite { database_path: String },
    Csv { path: String },
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
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let required = |key: &str| {
            env_map
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
        };

        let ledger_backend = match env_map
            .get("LEDGER_BACKEND")
            .map(|s| s.as_str())
            .unwrap_or("sqlite")
        {
            "sqlite" => LedgerBackend::Sqlite {
                database_path: required("DATABASE_PATH")?,
            },
            "csv" => LedgerBackend::Csv {
                path: required("LEDGER_CSV_PATH")?,
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "LEDGER_BACKEND".to_string(),
                    format!("must be sqlite or csv, got {}", other),
                ))
            }
        };

        let store_timeout_ms = env_map
            .get("STORE_TIMEOUT_MS")
            .map(|s| s.as_str())
            .unwrap_or("10000")
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "STORE_TIMEOUT_MS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        Ok(Config {
            port,
            ledger_backend,
            store_timeout_ms,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
