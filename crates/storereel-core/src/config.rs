//! Configuration module
//!
//! Environment-driven configuration for the API server and the ingestion
//! pipeline. Call [`Config::from_env`] after loading `.env` (dotenvy) in the
//! binary.

use std::env;

use crate::validation::MAX_UPLOAD_BYTES;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Postgres connection string. When unset the server falls back to the
    /// in-memory store (development mode).
    pub database_url: Option<String>,
    /// Base URL of the remote asset service.
    pub asset_api_url: String,
    /// API key sent to the asset service, when it requires one.
    pub asset_api_key: Option<String>,
    pub max_upload_bytes: u64,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config {
            server_port: env_parse("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            asset_api_url: env::var("ASSET_API_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
            asset_api_key: env::var("ASSET_API_KEY").ok(),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", MAX_UPLOAD_BYTES)?,
            poll_interval_ms: env_parse("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            max_poll_attempts: env_parse("MAX_POLL_ATTEMPTS", DEFAULT_MAX_POLL_ATTEMPTS)?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.asset_api_url.trim().is_empty() {
            anyhow::bail!("ASSET_API_URL must not be empty");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be positive");
        }
        if self.max_poll_attempts == 0 {
            anyhow::bail!("MAX_POLL_ATTEMPTS must be positive");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("POLL_INTERVAL_MS must be positive");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: Vec::new(),
            environment: "development".to_string(),
            database_url: None,
            asset_api_url: "http://localhost:4000".to_string(),
            asset_api_key: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
