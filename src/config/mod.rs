use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult, ScheduleResult};
use crate::generation::RequestFormat;
use crate::jobs::schedule::ScheduleSpec;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the article collection
    #[serde(default = "default_articles_path")]
    pub articles_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token; usually supplied through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub request_format: RequestFormat,
    /// Model name, sent only with chat-completion requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(with = "duration_serde::duration", default = "default_request_timeout")]
    pub timeout: Duration,
    /// Responses whose body is shorter than this are treated as degenerate
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression; 5-field patterns get a leading seconds field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    /// Named interval (`hourly`, `daily`, ...) or duration such as `10m`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Selects the fallback schedule when neither `cron` nor `interval` is set
    #[serde(default)]
    pub development: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_on_startup")]
    pub on_startup: bool,
    #[serde(default = "default_seed_count")]
    pub count: usize,
    /// Pause between upstream calls while seeding
    #[serde(with = "duration_serde::duration", default = "default_seed_delay")]
    pub delay: Duration,
}

fn default_articles_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTICLES_PATH)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_min_content_length() -> usize {
    DEFAULT_MIN_CONTENT_LENGTH
}

fn default_max_new_tokens() -> u32 {
    DEFAULT_MAX_NEW_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_top_p() -> f32 {
    DEFAULT_TOP_P
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_seed_on_startup() -> bool {
    DEFAULT_SEED_ON_STARTUP
}

fn default_seed_count() -> usize {
    DEFAULT_SEED_COUNT
}

fn default_seed_delay() -> Duration {
    Duration::from_secs(DEFAULT_SEED_DELAY_SECS)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            articles_path: default_articles_path(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            request_format: RequestFormat::default(),
            model: None,
            timeout: default_request_timeout(),
            min_content_length: default_min_content_length(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: None,
            interval: None,
            timezone: default_timezone(),
            development: false,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_startup: default_seed_on_startup(),
            count: default_seed_count(),
            delay: default_seed_delay(),
        }
    }
}

impl ScheduleConfig {
    /// Resolve the configured schedule.
    ///
    /// Precedence: `cron`, then `interval`, then the profile default (every
    /// five minutes in development, daily at 09:00 otherwise).
    pub fn to_spec(&self) -> ScheduleResult<ScheduleSpec> {
        if let Some(cron) = self.cron.as_deref().filter(|c| !c.trim().is_empty()) {
            if self.interval.is_some() {
                warn!("Both cron and interval are configured; using cron '{}'", cron);
            }
            return ScheduleSpec::cron(cron, &self.timezone);
        }

        if let Some(interval) = self.interval.as_deref().filter(|i| !i.trim().is_empty()) {
            return ScheduleSpec::interval(interval);
        }

        let fallback = if self.development {
            DEVELOPMENT_CRON
        } else {
            PRODUCTION_CRON
        };
        ScheduleSpec::cron(fallback, &self.timezone)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var(ENV_CONFIG_FILE).unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    /// Read the config file, writing one with defaults if it does not exist,
    /// then apply environment overrides.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_LEGACY_API_KEY)) {
            self.generation.api_key = Some(key);
        }

        if let Some(cron) = non_empty(ENV_CRON_SCHEDULE) {
            info!("Using cron schedule from {}: {}", ENV_CRON_SCHEDULE, cron);
            self.schedule.cron = Some(cron);
        }

        if let Some(env) = non_empty(ENV_APP_ENV) {
            self.schedule.development = env.eq_ignore_ascii_case("development");
        }
    }

    /// Check values the rest of the service relies on
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.generation.api_url).map_err(|e| {
            AppError::configuration(format!(
                "generation.api_url '{}' is not a valid URL: {}",
                self.generation.api_url, e
            ))
        })?;

        if self.generation.timeout.is_zero() {
            return Err(AppError::configuration(
                "generation.timeout must be greater than zero",
            ));
        }

        if self.generation.min_content_length == 0 {
            return Err(AppError::configuration(
                "generation.min_content_length must be greater than zero",
            ));
        }

        if self.generation.request_format == RequestFormat::ChatCompletion
            && self.generation.model.is_none()
        {
            return Err(AppError::configuration(
                "generation.model is required for chat-completion requests",
            ));
        }

        if self.generation.api_key.is_none() {
            warn!(
                "No API key configured (set {} or generation.api_key); requests will be unauthenticated",
                ENV_API_KEY
            );
        }

        self.schedule.to_spec()?;
        Ok(())
    }
}
