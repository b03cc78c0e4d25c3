//! Configuration management for the abuse protection service.
//!
//! This module handles loading and managing application configuration
//! from environment variables and configuration files.

use crate::models::Config;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use std::env;

/// Load configuration from a config file and environment variables
pub fn load_config() -> Result<Config, ConfigError> {
    let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config/default.toml".to_string());

    let config = ConfigBuilder::builder()
        .add_source(File::with_name(&config_file).required(false))
        .add_source(Environment::default())
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("rate_limit.max_requests", 100)?
        .set_default("rate_limit.window_ms", 60_000)?
        .set_default("rate_limit.block_duration_ms", 3_600_000)?
        .set_default("spam_filter.max_links", 2)?
        .set_default("behavior.repeat_length", 10)?
        .set_default("behavior.burst_length", 5)?
        .set_default("behavior.burst_threshold_ms", 1_000)?
        .set_default("view_patterns.view_threshold", 30)?
        .set_default("view_patterns.pattern_window_ms", 300_000)?
        .set_default("view_patterns.min_interval_samples", 5)?
        .set_default("view_patterns.uniformity_tolerance_ms", 100.0)?
        .set_default("monitor.channel_id", "")?
        .set_default("monitor.video_ids", Vec::<String>::new())?
        .set_default("monitor.activity_fetch_limit", 50)?
        .set_default("monitor.poll_interval_secs", 60)?
        .set_default("monitor.maintenance_interval_secs", 300)?
        .set_default("monitor.recent_activity_threshold_ms", 1_000)?
        .set_default("platform.base_url", "https://api.example.com/v3")?
        .set_default("platform.api_key", "")?
        .set_default("platform.request_timeout_secs", 10)?
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = load_config().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.view_patterns.view_threshold, 30);
        assert!(config.monitor.video_ids.is_empty());
    }
}
