// config.rs
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::service::error::ServiceError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub expiry_check_interval_secs: u64,
    pub notification_concurrency: usize,
    pub seed_plans: bool,
    pub log_level: LevelFilter,
}

/// Parses `raw` for `key`, falling back to `default` when unset or blank.
fn env_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ServiceError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ServiceError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        _ => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Config, ServiceError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `init` reads the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ServiceError::Config("DATABASE_URL must be set".to_string()))?;

        let database_max_connections =
            env_or("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 10)?;
        let expiry_check_interval_secs =
            env_or("EXPIRY_CHECK_INTERVAL_SECS", lookup("EXPIRY_CHECK_INTERVAL_SECS"), 3600)?;
        let notification_concurrency =
            env_or("NOTIFICATION_CONCURRENCY", lookup("NOTIFICATION_CONCURRENCY"), 8)?;
        let seed_plans = env_or("SEED_PLANS", lookup("SEED_PLANS"), true)?;
        let log_level = env_or("LOG_LEVEL", lookup("LOG_LEVEL"), LevelFilter::DEBUG)?;

        if expiry_check_interval_secs == 0 {
            return Err(ServiceError::Config(
                "EXPIRY_CHECK_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            database_url,
            database_max_connections,
            expiry_check_interval_secs,
            notification_concurrency,
            seed_plans,
            log_level,
        })
    }
}
