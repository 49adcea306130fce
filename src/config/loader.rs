use std::{env, time::Duration};

use super::env::{
    AppConfig, BadgeConfig, ConfigError, ContentConfig, DirectoryConfig, LoggingConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "profile.db".to_string()),
            export_filename: env::var("EXPORT_FILENAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "job-form-filler-data.json".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let content = ContentConfig {
            auto_scan_delay: parse_millis("AUTO_SCAN_DELAY_MS", 2_000)?,
            highlight_duration: parse_millis("HIGHLIGHT_DURATION_MS", 2_000)?,
            highlight_border: env::var("HIGHLIGHT_BORDER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "2px solid #4CAF50".to_string()),
        };

        let badge = BadgeConfig {
            color: env::var("BADGE_COLOR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "#4CAF50".to_string()),
        };

        Ok(Self {
            directories,
            logging,
            content,
            badge,
        })
    }
}

fn parse_millis(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}
