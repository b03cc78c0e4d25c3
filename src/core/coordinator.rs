//! Abuse coordinator for the abuse protection service.
//!
//! Composes the rate limiter, spam filter, behavior analyzer and view
//! pattern analyzer, and drives the periodic polling and maintenance
//! loops against the platform API. Collaborator failures are logged and
//! swallowed; detection verdicts themselves never error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use log::{error, info, warn};
use metrics::increment_counter;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::core::behavior::BehaviorAnalyzer;
use crate::core::platform::{AbuseReport, Activity, ActivityKind, ModerationStatus, PlatformApi};
use crate::core::rate_limiter::RateLimiter;
use crate::core::spam_filter::SpamFilter;
use crate::core::view_patterns::ViewPatternAnalyzer;
use crate::models::{Config, MonitorConfig};
use crate::shutdown::Shutdown;
use crate::utils::now_millis;

/// Coordinates the detectors and the platform collaborator.
pub struct AbuseCoordinator {
    /// Per-address rate limiter
    rate_limiter: Mutex<RateLimiter>,
    /// Stateless comment spam filter
    spam_filter: SpamFilter,
    /// Stateless action-sequence analyzer
    behavior: BehaviorAnalyzer,
    /// Per-(video, viewer) view tracker
    view_patterns: Mutex<ViewPatternAnalyzer>,
    /// Last view-count sample per monitored video
    view_samples: Mutex<HashMap<String, u64>>,
    /// View-count increase per poll above which a report is filed
    view_spike_threshold: u64,
    /// Monitoring loop configuration
    monitor: MonitorConfig,
    /// Platform collaborator
    platform: Arc<dyn PlatformApi>,
}

impl AbuseCoordinator {
    /// Create a new coordinator instance
    pub fn new(config: &Config, platform: Arc<dyn PlatformApi>) -> Self {
        Self {
            rate_limiter: Mutex::new(RateLimiter::new(config.rate_limit.clone())),
            spam_filter: SpamFilter::new(config.spam_filter.clone()),
            behavior: BehaviorAnalyzer::new(config.behavior.clone()),
            view_patterns: Mutex::new(ViewPatternAnalyzer::new(config.view_patterns.clone())),
            view_samples: Mutex::new(HashMap::new()),
            view_spike_threshold: config.view_patterns.view_threshold as u64,
            monitor: config.monitor.clone(),
            platform,
        }
    }

    /// Check whether a request from the given address should be allowed.
    pub async fn check_request(&self, address: &str) -> bool {
        let allowed = self.rate_limiter.lock().await.check_request(address);
        if !allowed {
            increment_counter!("abuse_requests_blocked");
            warn!("Blocked request from {}", address);
        }
        allowed
    }

    /// Classify an inbound comment. Returns `true` for spam.
    ///
    /// Spam comments are rejected through the platform; a failed
    /// moderation call is logged and does not change the verdict.
    pub async fn handle_comment(&self, comment_id: &str, text: &str) -> bool {
        let spam = self.spam_filter.is_spam(text);
        if spam {
            increment_counter!("abuse_spam_comments");
            info!("Rejecting spam comment {}", comment_id);
            if let Err(e) = self
                .platform
                .set_moderation_status(comment_id, ModerationStatus::Rejected)
                .await
            {
                error!("Failed to moderate comment {}: {}", comment_id, e);
            }
        }
        spam
    }

    /// Record a view and return whether the viewer was flagged as a bot.
    pub async fn record_view(&self, video_id: &str, viewer_ip: &str) -> bool {
        let flagged = self
            .view_patterns
            .lock()
            .await
            .record_view(video_id, viewer_ip);
        if flagged {
            increment_counter!("abuse_views_flagged");
            warn!("Bot-like viewing on {} from {}", video_id, viewer_ip);
        }
        flagged
    }

    /// Fetch the channel's recent activities and reject the suspicious
    /// ones. Failures are logged; the cycle never panics.
    pub async fn scan_channel(&self) -> usize {
        if self.monitor.channel_id.is_empty() {
            return 0;
        }

        let activities = match self
            .platform
            .fetch_recent_activities(&self.monitor.channel_id, self.monitor.activity_fetch_limit)
            .await
        {
            Ok(activities) => activities,
            Err(e) => {
                error!("Failed to fetch activities: {}", e);
                return 0;
            }
        };

        let fetch_now = Utc::now();
        let mut rejected = 0;
        for activity in &activities {
            if !self.is_suspicious_activity(activity, fetch_now.timestamp_millis()) {
                continue;
            }

            info!("Rejecting suspicious activity {}", activity.id);
            match self
                .platform
                .set_moderation_status(&activity.id, ModerationStatus::Rejected)
                .await
            {
                Ok(()) => {
                    increment_counter!("abuse_activities_rejected");
                    rejected += 1;
                }
                Err(e) => error!("Failed to moderate activity {}: {}", activity.id, e),
            }
        }
        rejected
    }

    /// An activity is suspicious if the platform claims it was published
    /// implausibly close to the fetch (timestamp spoofing or too-rapid
    /// repeated actions), or if it is a comment whose description trips
    /// the behavior analyzer.
    fn is_suspicious_activity(&self, activity: &Activity, fetch_now_ms: i64) -> bool {
        let age_ms = fetch_now_ms - activity.published_at.timestamp_millis();
        if age_ms < self.monitor.recent_activity_threshold_ms {
            return true;
        }

        activity.kind == ActivityKind::Comment
            && self.behavior.is_suspicious(&[activity.description.as_str()])
    }

    /// Sample the view count of every monitored video and file an abuse
    /// report for any video whose count jumped by more than the threshold
    /// since the previous sample.
    pub async fn sample_views(&self) {
        for video_id in &self.monitor.video_ids {
            if let Err(e) = self.sample_video(video_id).await {
                error!("View sampling for {} failed: {:#}", video_id, e);
            }
        }
    }

    async fn sample_video(&self, video_id: &str) -> anyhow::Result<()> {
        let views = self
            .platform
            .fetch_view_count(video_id)
            .await
            .context("fetch view count")?;

        let previous = {
            let mut samples = self.view_samples.lock().await;
            samples.insert(video_id.to_string(), views)
        };

        // First sample only establishes the baseline.
        let Some(previous) = previous else {
            return Ok(());
        };
        if views.saturating_sub(previous) <= self.view_spike_threshold {
            return Ok(());
        }

        warn!(
            "Suspicious view spike on {}: {} -> {}",
            video_id, previous, views
        );
        let report = AbuseReport::view_botting("Suspicious view bot activity detected");
        self.platform
            .file_abuse_report(video_id, &report)
            .await
            .context("file abuse report")?;
        increment_counter!("abuse_reports_filed");
        Ok(())
    }

    /// Drop expired blocklist entries, aged-out request logs and quiet
    /// view patterns.
    pub async fn sweep(&self) {
        let now = now_millis();
        self.rate_limiter.lock().await.sweep(now);
        self.view_patterns.lock().await.sweep(now);
    }

    /// Spawn the channel poller, the view-count poller and the maintenance
    /// sweep. Each loop runs one cycle to completion per tick and exits
    /// promptly when the shutdown signal fires.
    pub fn spawn_monitors(self: Arc<Self>, shutdown: Shutdown) -> Vec<JoinHandle<()>> {
        let poll_interval = Duration::from_secs(self.monitor.poll_interval_secs);
        let maintenance_interval = Duration::from_secs(self.monitor.maintenance_interval_secs);

        let channel_task = {
            let coordinator = Arc::clone(&self);
            let mut shutdown = shutdown.clone();
            tokio::spawn(async move {
                let mut interval = time::interval(poll_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            coordinator.scan_channel().await;
                        }
                        _ = shutdown.cancelled() => break,
                    }
                }
                info!("Channel monitor stopped");
            })
        };

        let views_task = {
            let coordinator = Arc::clone(&self);
            let mut shutdown = shutdown.clone();
            tokio::spawn(async move {
                let mut interval = time::interval(poll_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            coordinator.sample_views().await;
                        }
                        _ = shutdown.cancelled() => break,
                    }
                }
                info!("View monitor stopped");
            })
        };

        let maintenance_task = {
            let coordinator = self;
            let mut shutdown = shutdown;
            tokio::spawn(async move {
                let mut interval = time::interval(maintenance_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            coordinator.sweep().await;
                        }
                        _ = shutdown.cancelled() => break,
                    }
                }
                info!("Maintenance sweep stopped");
            })
        };

        vec![channel_task, views_task, maintenance_task]
    }
}
