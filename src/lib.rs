//! Heuristic abuse detection for a content platform.
//!
//! Rate-limits inbound requests per client address, flags spam-like
//! comment text and detects anomalous view patterns (view-bot behavior)
//! on monitored videos. All detector state is in-memory; the platform
//! integration (activity polling, moderation, abuse reporting) is behind
//! the [`core::PlatformApi`] trait.

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod shutdown;
pub mod utils;
