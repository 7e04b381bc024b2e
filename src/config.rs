//! # Configuration Module
//!
//! Environment-provided settings. Only the bot token is required; everything
//! else falls back to the defaults below.

use std::env;
use std::fmt;

use teloxide::types::ChatId;

use crate::errors::ConfigError;

/// Private staff channel that receives completed requests
pub const DEFAULT_STAFF_CHANNEL_ID: i64 = -1003650413645;
pub const DEFAULT_HEALTH_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const CHANNEL_ID_VAR: &str = "CHANNEL_ID";
pub const PORT_VAR: &str = "PORT";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Runtime configuration of the bot process
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub staff_channel_id: ChatId,
    pub health_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"***")
            .field("staff_channel_id", &self.staff_channel_id)
            .field("health_port", &self.health_port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl BotConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token =
            get(BOT_TOKEN_VAR).ok_or_else(|| ConfigError::MissingEnvVar(BOT_TOKEN_VAR.to_string()))?;

        let staff_channel_id = match get(CHANNEL_ID_VAR) {
            Some(raw) => ChatId(parse_value(CHANNEL_ID_VAR, &raw)?),
            None => ChatId(DEFAULT_STAFF_CHANNEL_ID),
        };

        let health_port = match get(PORT_VAR) {
            Some(raw) => parse_value(PORT_VAR, &raw)?,
            None => DEFAULT_HEALTH_PORT,
        };

        let log_level = get(LOG_LEVEL_VAR)
            .map(|level| level.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: LOG_FORMAT_VAR.to_string(),
                message,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bot_token,
            staff_channel_id,
            health_port,
            log_level,
            log_format,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
