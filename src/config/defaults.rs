/// Configuration default values
///
/// Central location for every default the config file falls back to.
// Storage defaults
pub const DEFAULT_ARTICLES_PATH: &str = "./data/articles.json";

// Generation defaults
pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 200;
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 800;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;

// Schedule defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";
/// Daily at 09:00
pub const PRODUCTION_CRON: &str = "0 0 9 * * *";
/// Every five minutes
pub const DEVELOPMENT_CRON: &str = "0 */5 * * * *";

// Seed defaults
pub const DEFAULT_SEED_ON_STARTUP: bool = false;
pub const DEFAULT_SEED_COUNT: usize = 5;
pub const DEFAULT_SEED_DELAY_SECS: u64 = 2;

// Environment variables
pub const ENV_CONFIG_FILE: &str = "CONFIG_FILE";
pub const ENV_API_KEY: &str = "AUTOBLOG_API_KEY";
pub const ENV_LEGACY_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_CRON_SCHEDULE: &str = "CRON_SCHEDULE";
pub const ENV_APP_ENV: &str = "APP_ENV";
