//! Settings read from the environment
//!
//! | Variable                      | Default         |
//! |-------------------------------|-----------------|
//! | `OPENAI_API_KEY`              | required        |
//! | `OPENAI_API_BASE`             | provider default|
//! | `OPENAI_MODEL`                | `gpt-3.5-turbo` |
//! | `MARKET_BRIEF_TIMEOUT_SECS`   | provider default|
//! | `MARKET_BRIEF_MAX_RETRIES`    | `0`             |
//! | `MARKET_BRIEF_CACHE_TTL_SECS` | `0` (no cache)  |
//! | `MARKET_BRIEF_SEARCH_RPM`     | `30`            |
//! | `MARKET_BRIEF_LOG_FORMAT`     | `pretty`        |
//!
//! Empty values count as unset.

use crate::LogFormat;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SEARCH_RPM: u32 = 30;

/// Errors raised while reading settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set to something unusable
    #[error("Invalid value for {var}: {detail}")]
    Invalid { var: &'static str, detail: String },
}

/// Runtime settings for the market-brief binary
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Key for the OpenAI-compatible endpoint
    pub openai_api_key: String,

    /// Endpoint override (local or compatible deployments)
    pub openai_api_base: Option<String>,

    /// Model used for all three completions
    pub openai_model: String,

    /// HTTP request timeout, if overridden
    pub request_timeout_secs: Option<u64>,

    /// Retries after a transient gateway failure (0 disables retrying)
    pub max_retries: u32,

    /// Market data cache lifetime in seconds (0 disables caching)
    pub cache_ttl_secs: u64,

    /// Search requests allowed per minute
    pub search_requests_per_minute: u32,

    /// Log output format
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment, after loading `.env` if present
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let openai_api_base = match get("OPENAI_API_BASE") {
            Some(base) => {
                url::Url::parse(&base).map_err(|e| ConfigError::Invalid {
                    var: "OPENAI_API_BASE",
                    detail: e.to_string(),
                })?;
                Some(base)
            }
            None => None,
        };

        Ok(Self {
            openai_api_key,
            openai_api_base,
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout_secs: parse_var(&get, "MARKET_BRIEF_TIMEOUT_SECS")?,
            max_retries: parse_var(&get, "MARKET_BRIEF_MAX_RETRIES")?.unwrap_or(0),
            cache_ttl_secs: parse_var(&get, "MARKET_BRIEF_CACHE_TTL_SECS")?.unwrap_or(0),
            search_requests_per_minute: parse_var(&get, "MARKET_BRIEF_SEARCH_RPM")?
                .unwrap_or(DEFAULT_SEARCH_RPM),
            log_format: parse_var(&get, "MARKET_BRIEF_LOG_FORMAT")?.unwrap_or_default(),
        })
    }

    /// Market data cache lifetime, or `None` when caching is off
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_api_base", &self.openai_api_base)
            .field("openai_model", &self.openai_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("search_requests_per_minute", &self.search_requests_per_minute)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    get(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                detail: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(settings.openai_api_key, "sk-test");
        assert_eq!(settings.openai_model, "gpt-3.5-turbo");
        assert_eq!(settings.openai_api_base, None);
        assert_eq!(settings.request_timeout_secs, None);
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.cache_ttl(), None);
        assert_eq!(settings.search_requests_per_minute, 30);
        assert_eq!(settings.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(
            settings(&[]).unwrap_err(),
            ConfigError::Missing("OPENAI_API_KEY")
        );
        assert_eq!(
            settings(&[("OPENAI_API_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("OPENAI_API_KEY")
        );
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:1234/v1"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("MARKET_BRIEF_TIMEOUT_SECS", "30"),
            ("MARKET_BRIEF_MAX_RETRIES", "2"),
            ("MARKET_BRIEF_CACHE_TTL_SECS", "60"),
            ("MARKET_BRIEF_SEARCH_RPM", "10"),
            ("MARKET_BRIEF_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(
            settings.openai_api_base.as_deref(),
            Some("http://localhost:1234/v1")
        );
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.request_timeout_secs, Some(30));
        assert_eq!(settings.max_retries, 2);
        assert_eq!(settings.cache_ttl(), Some(Duration::from_secs(60)));
        assert_eq!(settings.search_requests_per_minute, 10);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_number() {
        let err = settings(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MARKET_BRIEF_MAX_RETRIES", "many"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { var: "MARKET_BRIEF_MAX_RETRIES", .. }
        ));
    }

    #[test]
    fn test_invalid_api_base() {
        let err = settings(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "not a url"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "OPENAI_API_BASE", .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = settings(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
