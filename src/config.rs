//! Runtime configuration read from the process environment (optionally seeded from a `.env` file).

use thiserror::Error;

use crate::utils::gemini_client::{DEFAULT_API_BASE, DEFAULT_MODEL, SafetyThreshold};

/// Default command prefix for text commands.
pub const DEFAULT_PREFIX: &str = "!";
/// Default filename for the SQLite configuration store.
pub const DEFAULT_DATABASE_PATH: &str = "application_data.db";

/// Errors raised while assembling the bot configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable was not set (or was blank).
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable was set to a value that could not be understood.
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Settings needed to start the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Discord bot token.
    pub discord_token: String,
    /// Prefix used by text commands (e.g. `!ai`).
    pub prefix: String,
    /// Path of the SQLite file holding the stored API key.
    pub database_path: String,
    /// Base URL of the Gemini REST API.
    pub api_base: String,
    /// Gemini model name.
    pub model: String,
    /// Safety threshold applied to every harm category, if any.
    pub safety_threshold: Option<SafetyThreshold>,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        // "OFF" leaves the safety settings out of the request entirely.
        let safety_threshold = match get("GEMINI_SAFETY_THRESHOLD") {
            Some(value) if value.eq_ignore_ascii_case("off") => None,
            Some(value) => Some(value.parse().map_err(|_| ConfigError::Invalid {
                name: "GEMINI_SAFETY_THRESHOLD",
                value,
            })?),
            None => Some(SafetyThreshold::default()),
        };

        Ok(Self {
            discord_token,
            prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            database_path: get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            safety_threshold,
        })
    }
}
