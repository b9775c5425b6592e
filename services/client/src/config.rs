//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! Configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The backend URL has no built-in default:
//! it must come from an explicit override or from `TEXTBOOK_BACKEND_URL`.

use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const BACKEND_URL_VAR: &str = "TEXTBOOK_BACKEND_URL";
pub const SESSION_PATH_VAR: &str = "TEXTBOOK_SESSION_PATH";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the retrieval backend, without a trailing slash.
    pub backend_url: String,
    pub session_path: PathBuf,
    pub log_level: Level,
    pub request_timeout: Option<Duration>,
    pub sign_in_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `backend_override` takes precedence over `TEXTBOOK_BACKEND_URL`, the way a
    /// page-injected global would. A `.env` file is read in non-test builds only,
    /// so tests stay hermetic.
    pub fn from_env(backend_override: Option<String>) -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(backend_override, |key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary variable source.
    pub fn from_lookup<F>(backend_override: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend endpoint ---
        let backend_raw = backend_override
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup(BACKEND_URL_VAR).filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingVar(BACKEND_URL_VAR.to_string()))?;
        let backend_url = normalize_backend_url(&backend_raw)?;

        // --- Local session storage ---
        let session_path = lookup(SESSION_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.textbook/session.json"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Optional tuning ---
        let request_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_u64("HTTP_TIMEOUT_SECS", &raw)?)),
            None => None,
        };
        let sign_in_delay = match lookup("AUTH_SIMULATED_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_u64("AUTH_SIMULATED_DELAY_MS", &raw)?),
            None => Duration::ZERO,
        };

        Ok(Self {
            backend_url,
            session_path,
            log_level,
            request_timeout,
            sign_in_delay,
        })
    }
}

fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidValue(BACKEND_URL_VAR.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidValue(
            BACKEND_URL_VAR.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_u64(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_backend_url_is_an_error() {
        let err = Config::from_lookup(None, vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == BACKEND_URL_VAR));
    }

    #[test]
    fn override_wins_over_environment() {
        let config = Config::from_lookup(
            Some("http://override.test/".to_string()),
            vars(&[(BACKEND_URL_VAR, "http://env.test")]),
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://override.test");
    }

    #[test]
    fn environment_used_when_no_override() {
        let config =
            Config::from_lookup(None, vars(&[(BACKEND_URL_VAR, "https://api.test")])).unwrap();
        assert_eq!(config.backend_url, "https://api.test");
        assert_eq!(config.session_path, PathBuf::from("./.textbook/session.json"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.sign_in_delay, Duration::ZERO);
    }

    #[test]
    fn rejects_non_http_backend() {
        let err = Config::from_lookup(Some("ftp://files.test".to_string()), vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
    }

    #[test]
    fn parses_optional_tuning() {
        let config = Config::from_lookup(
            None,
            vars(&[
                (BACKEND_URL_VAR, "http://api.test"),
                ("HTTP_TIMEOUT_SECS", "15"),
                ("AUTH_SIMULATED_DELAY_MS", "500"),
                ("RUST_LOG", "debug"),
            ]),
        )
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.sign_in_delay, Duration::from_millis(500));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_lookup(
            None,
            vars(&[(BACKEND_URL_VAR, "http://api.test"), ("HTTP_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "HTTP_TIMEOUT_SECS"));
    }
}
