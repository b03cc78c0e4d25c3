//! Core functionality for the abuse protection service.
//!
//! This module contains the detection engine: rate limiting, comment spam
//! filtering, behavior sequence analysis, view-bot detection, the platform
//! collaborator client and the coordinator that ties them together.

pub mod behavior;
pub mod coordinator;
pub mod platform;
pub mod rate_limiter;
pub mod spam_filter;
pub mod view_patterns;

pub use behavior::BehaviorAnalyzer;
pub use coordinator::AbuseCoordinator;
pub use platform::{
    AbuseReport, Activity, ActivityKind, HttpPlatformClient, ModerationStatus, PlatformApi,
    PlatformError,
};
pub use rate_limiter::{RateLimiter, SlidingWindowCounter};
pub use spam_filter::SpamFilter;
pub use view_patterns::{ViewKey, ViewPattern, ViewPatternAnalyzer};
