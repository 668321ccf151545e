mod credentials;
mod defaults;


pub use credentials::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::HomeworkError;
use defaults::*;

/// Top-level bot configuration.
///
/// Secrets are not part of this file; see [`Credentials`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Status polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Homework status endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Pause between cycles, successful or not.
    #[serde(default = "default_retry_period")]
    pub retry_period_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Suppress repeated identical notifications within one run.
    #[serde(default = "default_true")]
    pub dedupe: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period(),
            request_timeout_secs: default_request_timeout(),
            dedupe: default_true(),
        }
    }
}

impl PollerConfig {
    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Telegram Bot API settings (token lives in [`Credentials`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HomeworkError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HomeworkError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| HomeworkError::Config(format!("failed to parse config: {}", e)))?;

    if config.poller.retry_period_secs == 0 {
        return Err(HomeworkError::Config(
            "poller.retry_period_secs must be greater than zero".to_string(),
        ));
    }
    if config.poller.request_timeout_secs == 0 {
        return Err(HomeworkError::Config(
            "poller.request_timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}
