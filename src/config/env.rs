use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub content: ContentConfig,
    pub badge: BadgeConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub db_filename: String,
    pub export_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

/// Timing and cosmetics of the page-side script.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub auto_scan_delay: Duration,
    pub highlight_duration: Duration,
    pub highlight_border: String,
}

#[derive(Debug, Clone)]
pub struct BadgeConfig {
    pub color: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
