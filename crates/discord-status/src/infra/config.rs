use std::{collections::HashMap, time::Duration};

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

pub const BOT_TOKEN: &str = "BOT_TOKEN";
pub const CHANNEL_ID: &str = "CHANNEL_ID";
pub const ANNOUNCE_SHUTDOWN: &str = "ANNOUNCE_SHUTDOWN";
pub const SHUTDOWN_TIMEOUT_SECS: &str = "SHUTDOWN_TIMEOUT_SECS";

const KEYS: &[&str] = &[BOT_TOKEN, CHANNEL_ID, ANNOUNCE_SHUTDOWN, SHUTDOWN_TIMEOUT_SECS];

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required config key '{0}' is not set")]
    Missing(&'static str),

    #[error("config key '{0}' is empty")]
    Empty(&'static str),

    #[error("config key '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[non_exhaustive]
pub struct Config {
    kv: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let kv = std::env::vars()
            .filter(|(k, _)| KEYS.contains(&k.as_str()))
            .collect();

        Self { kv }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_map(kv: HashMap<String, String>) -> Self {
        Self { kv }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.kv.get(key).map(|v| v.as_str())
    }

    /// Present and non-blank, surrounding whitespace stripped.
    pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        let value = self.optional(key).ok_or(ConfigError::Missing(key))?.trim();
        if value.is_empty() {
            return Err(ConfigError::Empty(key));
        }

        Ok(value)
    }
}

/// Validated start-up configuration, immutable once built.
#[derive(Debug)]
pub struct Settings {
    pub channel_id: String,
    pub token: Secret<String>,
    pub announce_shutdown: bool,
    pub shutdown_timeout: Duration,
}

impl Settings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let token = Secret::new(config.require(BOT_TOKEN)?.to_string());
        let channel_id = config.require(CHANNEL_ID)?.to_string();

        let announce_shutdown = match config.optional(ANNOUNCE_SHUTDOWN) {
            Some(raw) => parse_flag(ANNOUNCE_SHUTDOWN, raw)?,
            None => true,
        };

        let shutdown_timeout = match config.optional(SHUTDOWN_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(SHUTDOWN_TIMEOUT_SECS, raw)?,
            None => DEFAULT_SHUTDOWN_TIMEOUT,
        };

        Ok(Self {
            channel_id,
            token,
            announce_shutdown,
            shutdown_timeout,
        })
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_timeout(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".into(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
