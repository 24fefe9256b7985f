// Service configuration
// Built once at startup and handed to every component; nothing reads the
// environment mid-request

use std::time::Duration;
use thiserror::Error;

/// Timeout applied to identity and mail calls unless configured otherwise
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings of the player service
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string; `None` runs on the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub identity_verify_url: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    /// Sender address for notifications derived from match events
    pub mail_sender: String,
    pub upstream_timeout: Duration,
    /// Answer 406 instead of 202 when notifying an empty roster
    pub reject_empty_roster: bool,
}

impl Config {
    /// Loads configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", optional("PORT"), 3000)?,
            database_url: optional("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                optional("DATABASE_MAX_CONNECTIONS"),
                5,
            )?,
            identity_verify_url: required("IDENTITY_VERIFY_URL")?,
            mail_api_url: required("MAIL_API_URL")?,
            mail_api_key: required("MAIL_API_KEY")?,
            mail_sender: required("MAIL_SENDER")?,
            upstream_timeout: Duration::from_secs(parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                optional("UPSTREAM_TIMEOUT_SECS"),
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            reject_empty_roster: parse_or(
                "NOTIFY_REJECT_EMPTY_ROSTER",
                optional("NOTIFY_REJECT_EMPTY_ROSTER"),
                false,
            )?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("IDENTITY_VERIFY_URL", "http://auth/verify"),
        ("MAIL_API_URL", "http://mail/send"),
        ("MAIL_API_KEY", "key"),
        ("MAIL_SENDER", "noreply@club.com"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(env(&REQUIRED)).expect("valid config");

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert!(!config.reject_empty_roster);
    }

    #[test]
    fn overrides_apply() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/players"),
            ("UPSTREAM_TIMEOUT_SECS", "2"),
            ("NOTIFY_REJECT_EMPTY_ROSTER", "true"),
        ]);

        let config = Config::from_lookup(env(&pairs)).expect("valid config");

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/players")
        );
        assert_eq!(config.upstream_timeout, Duration::from_secs(2));
        assert!(config.reject_empty_roster);
    }

    #[test]
    fn missing_required_value_fails() {
        let err = Config::from_lookup(env(&REQUIRED[1..])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("IDENTITY_VERIFY_URL")));
    }

    #[test]
    fn invalid_number_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));

        let err = Config::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err.to_string(), "PORT is not valid: eighty");
    }
}
