//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Upper bound for `SESSION_TTL_DAYS`, roughly ten years.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` selects the in-memory storage backend.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
    pub cors_origin: String,
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: None,
            log_level: Level::INFO,
            session_ttl_days: 30,
            cookie_secure: false,
            cors_origin: "http://localhost:5173".to_string(),
            seed_demo: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server and Database Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        // --- Auth Settings ---
        let session_ttl_days = match lookup("SESSION_TTL_DAYS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if (1..=MAX_SESSION_TTL_DAYS).contains(&days) => days,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "SESSION_TTL_DAYS".to_string(),
                        format!(
                            "'{}' is not a number of days between 1 and {}",
                            raw, MAX_SESSION_TTL_DAYS
                        ),
                    ))
                }
            },
            None => defaults.session_ttl_days,
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool("COOKIE_SECURE", &raw)?,
            None => defaults.cookie_secure,
        };

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let seed_demo = match lookup("SEED_DEMO") {
            Some(raw) => parse_bool("SEED_DEMO", &raw)?,
            None => defaults.seed_demo,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            session_ttl_days,
            cookie_secure,
            cors_origin,
            seed_demo,
        })
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            var.to_string(),
            format!("'{}' is not a boolean", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 5000);
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.session_ttl_days, 30);
        assert!(!config.cookie_secure);
        assert!(config.seed_demo);
    }

    #[test]
    fn blank_database_url_means_memory_backend() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());

        let config = load(&[("DATABASE_URL", "postgres://localhost/mindtrack")]).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/mindtrack")
        );
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("SESSION_TTL_DAYS", "7"),
            ("COOKIE_SECURE", "TRUE"),
            ("SEED_DEMO", "0"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.session_ttl_days, 7);
        assert!(config.cookie_secure);
        assert!(!config.seed_demo);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            load(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "BIND_ADDRESS"
        ));
        assert!(matches!(
            load(&[("SESSION_TTL_DAYS", "0")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_TTL_DAYS"
        ));
        assert!(matches!(
            load(&[("SESSION_TTL_DAYS", "200000000")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_TTL_DAYS"
        ));
        assert!(matches!(
            load(&[("SESSION_TTL_DAYS", "3651")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_TTL_DAYS"
        ));
        assert_eq!(
            load(&[("SESSION_TTL_DAYS", "3650")]).unwrap().session_ttl_days,
            MAX_SESSION_TTL_DAYS
        );
        assert!(matches!(
            load(&[("COOKIE_SECURE", "maybe")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "COOKIE_SECURE"
        ));
    }
}
