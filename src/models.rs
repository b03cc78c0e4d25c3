use serde::{Deserialize, Serialize};

/// Rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per window
    pub max_requests: usize,
    /// Request counting window in milliseconds
    pub window_ms: u64,
    /// How long a blocked address stays blocked, in milliseconds
    pub block_duration_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_ms: 60_000,
            block_duration_ms: 3_600_000,
        }
    }
}

/// Spam filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamFilterConfig {
    /// Maximum number of links tolerated before a comment is spam
    pub max_links: usize,
}

impl Default for SpamFilterConfig {
    fn default() -> Self {
        Self { max_links: 2 }
    }
}

/// Behavior sequence analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Minimum sequence length for the identical-action check
    pub repeat_length: usize,
    /// Minimum sequence length for the burst check
    pub burst_length: usize,
    /// First-to-last span below which a sequence counts as a burst (ms)
    pub burst_threshold_ms: i64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            repeat_length: 10,
            burst_length: 5,
            burst_threshold_ms: 1_000,
        }
    }
}

/// View pattern analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewPatternConfig {
    /// Views per window above which a viewer is flagged
    pub view_threshold: usize,
    /// Trailing window for view timestamps in milliseconds
    pub pattern_window_ms: u64,
    /// Minimum views before interval uniformity is evaluated
    pub min_interval_samples: usize,
    /// Maximum deviation from the mean interval still counted as uniform (ms)
    pub uniformity_tolerance_ms: f64,
}

impl Default for ViewPatternConfig {
    fn default() -> Self {
        Self {
            view_threshold: 30,
            pattern_window_ms: 300_000,
            min_interval_samples: 5,
            uniformity_tolerance_ms: 100.0,
        }
    }
}

/// Monitoring loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Channel whose recent activities are polled
    pub channel_id: String,
    /// Videos whose view counts are sampled
    pub video_ids: Vec<String>,
    /// Activities fetched per poll
    pub activity_fetch_limit: u32,
    /// Poll interval for activities and view counts, in seconds
    pub poll_interval_secs: u64,
    /// Interval between maintenance sweeps, in seconds
    pub maintenance_interval_secs: u64,
    /// Activities published within this many ms of the fetch are suspicious
    pub recent_activity_threshold_ms: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            video_ids: Vec::new(),
            activity_fetch_limit: 50,
            poll_interval_secs: 60,
            maintenance_interval_secs: 300,
            recent_activity_threshold_ms: 1_000,
        }
    }
}

/// Platform API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API
    pub base_url: String,
    /// API key used as a bearer token
    pub api_key: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.example.com/v3".to_string(),
            api_key: String::new(),
            request_timeout_secs: 10,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Spam filter configuration
    pub spam_filter: SpamFilterConfig,
    /// Behavior analyzer configuration
    pub behavior: BehaviorConfig,
    /// View pattern analyzer configuration
    pub view_patterns: ViewPatternConfig,
    /// Monitoring loop configuration
    pub monitor: MonitorConfig,
    /// Platform API configuration
    pub platform: PlatformConfig,
}
