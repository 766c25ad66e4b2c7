use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub unsplash: UnsplashConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Chats that receive the daily summary and may use /stats
    #[serde(default)]
    pub operator_ids: Vec<i64>,
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UnsplashConfig {
    pub access_key: String,
    #[serde(default = "default_unsplash_base_url")]
    pub base_url: String,
    #[serde(default = "default_unsplash_timeout_sec")]
    pub timeout_sec: u64,
}

fn default_unsplash_base_url() -> String {
    unsplash_client::DEFAULT_BASE_URL.to_string()
}

fn default_unsplash_timeout_sec() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "data/logs".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// IANA timezone every daily job is anchored to, DST included (default: "Asia/Nicosia")
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Cache prefetch time in HH:MM format (default: "03:00")
    #[serde(default = "default_prefetch_time")]
    pub prefetch_time: String,
    /// Morning category prompt time in HH:MM format (default: "11:00")
    #[serde(default = "default_morning_time")]
    pub morning_time: String,
    /// "Did you use it?" prompt time in HH:MM format (default: "22:00")
    #[serde(default = "default_usage_prompt_time")]
    pub usage_prompt_time: String,
    /// Operator summary time in HH:MM format (default: "23:00")
    #[serde(default = "default_summary_time")]
    pub summary_time: String,
    /// Images requested per provider call (default: 5)
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Provider requests allowed per rate window before cooling down (default: 45)
    #[serde(default = "default_max_requests_per_window")]
    pub max_requests_per_window: u32,
    /// Rate window length in seconds (default: 1 hour)
    #[serde(default = "default_rate_window_sec")]
    pub rate_window_sec: u64,
    /// Pause after hitting the request cap, in seconds (default: 1 hour)
    #[serde(default = "default_cooldown_sec")]
    pub cooldown_sec: u64,
    /// Minimum hours between two category selections of one user (default: 12)
    #[serde(default = "default_throttle_hours")]
    pub throttle_hours: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            prefetch_time: default_prefetch_time(),
            morning_time: default_morning_time(),
            usage_prompt_time: default_usage_prompt_time(),
            summary_time: default_summary_time(),
            batch_size: default_batch_size(),
            max_requests_per_window: default_max_requests_per_window(),
            rate_window_sec: default_rate_window_sec(),
            cooldown_sec: default_cooldown_sec(),
            throttle_hours: default_throttle_hours(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Nicosia".to_string()
}

fn default_prefetch_time() -> String {
    "03:00".to_string()
}

fn default_morning_time() -> String {
    "11:00".to_string()
}

fn default_usage_prompt_time() -> String {
    "22:00".to_string()
}

fn default_summary_time() -> String {
    "23:00".to_string()
}

fn default_batch_size() -> u32 {
    5
}

fn default_max_requests_per_window() -> u32 {
    45
}

fn default_rate_window_sec() -> u64 {
    60 * 60
}

fn default_cooldown_sec() -> u64 {
    60 * 60
}

fn default_throttle_hours() -> u64 {
    12
}

impl SchedulerConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| {
                anyhow!(
                    "Invalid timezone '{}' (expected e.g. Asia/Nicosia): {}",
                    self.timezone,
                    e
                )
            })
    }

    pub fn throttle(&self) -> chrono::Duration {
        chrono::Duration::hours(self.throttle_hours as i64)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_sec)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_sec)
    }
}

/// Parse a time string in HH:MM format
pub fn parse_daily_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("Invalid time '{}' (expected HH:MM)", value))
}

impl Config {
    pub fn load() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(
                config::Environment::with_prefix("WALL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.operator_ids")
                    .try_parsing(true),
            );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "info" => tracing::Level::INFO,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }
}
