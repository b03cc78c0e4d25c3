//! Rate limiting for the abuse protection service.
//!
//! This module provides per-address rate limiting backed by an in-memory
//! sliding window of request timestamps, plus a blocklist with per-address
//! expiry for addresses that exceed the limit.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::RateLimitConfig;
use crate::utils::now_millis;

/// Per-key log of event timestamps within a trailing time window.
///
/// Timestamps are milliseconds since the Unix epoch and are appended in
/// non-decreasing order. Entries older than the window are dropped on
/// prune; pruning is a monotone filter, so pruning twice yields the same
/// result as pruning once.
#[derive(Debug)]
pub struct SlidingWindowCounter<K> {
    window_ms: u64,
    events: HashMap<K, Vec<u64>>,
}

impl<K: Eq + Hash> SlidingWindowCounter<K> {
    /// Create a counter with the given trailing window.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            events: HashMap::new(),
        }
    }

    /// Drop a key's entries that have aged out of the window and return
    /// how many remain.
    pub fn prune(&mut self, key: &K, now_ms: u64) -> usize {
        match self.events.get_mut(key) {
            Some(log) => {
                log.retain(|&t| now_ms.saturating_sub(t) < self.window_ms);
                log.len()
            }
            None => 0,
        }
    }

    /// Record an event for a key, creating the log lazily.
    pub fn record(&mut self, key: K, now_ms: u64) {
        self.events.entry(key).or_default().push(now_ms);
    }

    /// Current timestamps for a key, unpruned.
    pub fn timestamps(&self, key: &K) -> Option<&[u64]> {
        self.events.get(key).map(Vec::as_slice)
    }

    /// Prune every log and drop keys left with no in-window events.
    pub fn sweep(&mut self, now_ms: u64) {
        let window_ms = self.window_ms;
        self.events.retain(|_, log| {
            log.retain(|&t| now_ms.saturating_sub(t) < window_ms);
            !log.is_empty()
        });
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Rate limiter keyed by client address.
///
/// An address that exceeds the limit within one window is added to the
/// blocklist and denied until its expiry passes. Expiry is checked lazily
/// on the next request for that address rather than with a deferred timer,
/// so sustained abuse cannot accumulate pending unblock tasks.
pub struct RateLimiter {
    /// Request timestamps per address
    requests: SlidingWindowCounter<String>,
    /// Blocked addresses with their expiry timestamps (ms)
    blocklist: HashMap<String, u64>,
    /// Rate limit configuration
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter instance
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: SlidingWindowCounter::new(config.window_ms),
            blocklist: HashMap::new(),
            config,
        }
    }

    /// Check whether a request from the given address should be allowed.
    ///
    /// Returns `true` and records the request if the address is under the
    /// limit; returns `false` if the address is currently blocked or just
    /// exceeded the limit (which blocks it for the configured duration).
    pub fn check_request(&mut self, address: &str) -> bool {
        self.check_request_at(address, now_millis())
    }

    /// [`check_request`](Self::check_request) with an explicit clock.
    pub fn check_request_at(&mut self, address: &str, now_ms: u64) -> bool {
        if let Some(&expiry) = self.blocklist.get(address) {
            if now_ms < expiry {
                return false;
            }
            self.blocklist.remove(address);
        }

        let key = address.to_string();
        let recent = self.requests.prune(&key, now_ms);
        if recent >= self.config.max_requests {
            self.blocklist
                .insert(key, now_ms + self.config.block_duration_ms);
            return false;
        }

        self.requests.record(key, now_ms);
        true
    }

    /// Whether an address is currently blocked.
    pub fn is_blocked(&self, address: &str, now_ms: u64) -> bool {
        self.blocklist
            .get(address)
            .is_some_and(|&expiry| now_ms < expiry)
    }

    /// Drop expired blocklist entries and request logs with no in-window
    /// events. Called from the periodic maintenance sweep.
    pub fn sweep(&mut self, now_ms: u64) {
        self.blocklist.retain(|_, &mut expiry| now_ms < expiry);
        self.requests.sweep(now_ms);
    }

    /// Number of currently blocked addresses.
    pub fn blocked_count(&self) -> usize {
        self.blocklist.len()
    }
}
