//! View-bot detection for monitored videos.
//!
//! Tracks view timestamps per (video, viewer) pair and flags viewers that
//! either rack up too many views inside the trailing window or arrive at
//! mechanically regular intervals, a signature organic viewing essentially
//! never produces.

use std::collections::HashMap;

use crate::models::ViewPatternConfig;
use crate::utils::now_millis;

/// Composite key identifying one viewer on one video.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ViewKey {
    /// Monitored video identifier
    pub video_id: String,
    /// Viewer identifier (IP or equivalent)
    pub viewer_ip: String,
}

/// Recent view history for one (video, viewer) pair.
#[derive(Debug, Default)]
pub struct ViewPattern {
    /// View timestamps in ms, pruned to the trailing window
    pub timestamps: Vec<u64>,
    /// Lifetime view total for this key; never pruned, reporting only
    pub session_count: u64,
}

/// Stateful per-(video, viewer) view tracker.
pub struct ViewPatternAnalyzer {
    patterns: HashMap<ViewKey, ViewPattern>,
    config: ViewPatternConfig,
}

impl ViewPatternAnalyzer {
    /// Create a new view pattern analyzer instance
    pub fn new(config: ViewPatternConfig) -> Self {
        Self {
            patterns: HashMap::new(),
            config,
        }
    }

    /// Record a view and return whether the viewer now looks like a bot.
    pub fn record_view(&mut self, video_id: &str, viewer_ip: &str) -> bool {
        self.record_view_at(video_id, viewer_ip, now_millis())
    }

    /// [`record_view`](Self::record_view) with an explicit clock.
    ///
    /// The verdict is computed over the timestamps as they stand after the
    /// new view is appended and before pruning; the sequence is then pruned
    /// to the trailing window and persisted.
    pub fn record_view_at(&mut self, video_id: &str, viewer_ip: &str, now_ms: u64) -> bool {
        let key = ViewKey {
            video_id: video_id.to_string(),
            viewer_ip: viewer_ip.to_string(),
        };
        let pattern = self.patterns.entry(key).or_default();
        pattern.timestamps.push(now_ms);
        pattern.session_count += 1;

        let flagged = Self::analyze(&pattern.timestamps, &self.config);

        let window_ms = self.config.pattern_window_ms;
        pattern
            .timestamps
            .retain(|&t| now_ms.saturating_sub(t) < window_ms);

        flagged
    }

    fn analyze(timestamps: &[u64], config: &ViewPatternConfig) -> bool {
        if timestamps.len() > config.view_threshold {
            return true;
        }

        if timestamps.len() > config.min_interval_samples {
            let intervals: Vec<f64> = timestamps
                .windows(2)
                .map(|w| w[1].saturating_sub(w[0]) as f64)
                .collect();
            let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
            if intervals
                .iter()
                .all(|i| (i - mean).abs() < config.uniformity_tolerance_ms)
            {
                return true;
            }
        }

        false
    }

    /// Lifetime view total for a (video, viewer) pair, if tracked.
    pub fn session_count(&self, video_id: &str, viewer_ip: &str) -> Option<u64> {
        let key = ViewKey {
            video_id: video_id.to_string(),
            viewer_ip: viewer_ip.to_string(),
        };
        self.patterns.get(&key).map(|p| p.session_count)
    }

    /// Prune every pattern and drop keys whose viewers have gone quiet.
    /// Called from the periodic maintenance sweep to bound memory growth.
    pub fn sweep(&mut self, now_ms: u64) {
        let window_ms = self.config.pattern_window_ms;
        self.patterns.retain(|_, pattern| {
            pattern
                .timestamps
                .retain(|&t| now_ms.saturating_sub(t) < window_ms);
            !pattern.timestamps.is_empty()
        });
    }

    /// Number of tracked (video, viewer) pairs.
    pub fn tracked_keys(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ViewPatternAnalyzer {
        ViewPatternAnalyzer::new(ViewPatternConfig::default())
    }

    #[test]
    fn thirty_first_view_in_window_is_flagged() {
        let mut analyzer = analyzer();

        // Jittered spacing keeps the uniformity rule quiet.
        let mut now = 0;
        for i in 0..30 {
            now += 1_000 + (i % 7) * 333;
            assert!(
                !analyzer.record_view_at("vid", "1.2.3.4", now),
                "view {} should not be flagged",
                i + 1
            );
        }

        now += 1_000;
        assert!(analyzer.record_view_at("vid", "1.2.3.4", now));
    }

    #[test]
    fn uniform_intervals_are_flagged() {
        let mut analyzer = analyzer();

        let mut flagged = false;
        for i in 0..6 {
            flagged = analyzer.record_view_at("vid", "1.2.3.4", i * 500);
        }
        assert!(flagged);
    }

    #[test]
    fn jittered_intervals_are_not_flagged() {
        let mut analyzer = analyzer();

        let timestamps = [0, 700, 1_100, 2_400, 2_900, 4_600, 5_000];
        let mut flagged = false;
        for t in timestamps {
            flagged = analyzer.record_view_at("vid", "1.2.3.4", t);
        }
        assert!(!flagged);
    }

    #[test]
    fn viewers_are_tracked_independently() {
        let mut analyzer = analyzer();

        for i in 0..6 {
            analyzer.record_view_at("vid", "1.2.3.4", i * 500);
        }
        assert!(!analyzer.record_view_at("vid", "5.6.7.8", 9_999));
    }

    #[test]
    fn session_count_survives_pruning() {
        let mut analyzer = analyzer();

        analyzer.record_view_at("vid", "1.2.3.4", 0);
        analyzer.record_view_at("vid", "1.2.3.4", 400_000);

        // The first view has aged out of the window, the total has not.
        assert_eq!(analyzer.session_count("vid", "1.2.3.4"), Some(2));
    }

    #[test]
    fn sweep_drops_quiet_viewers() {
        let mut analyzer = analyzer();

        analyzer.record_view_at("vid", "1.2.3.4", 0);
        analyzer.record_view_at("vid", "5.6.7.8", 250_000);
        assert_eq!(analyzer.tracked_keys(), 2);

        analyzer.sweep(400_000);
        assert_eq!(analyzer.tracked_keys(), 1);
        assert_eq!(analyzer.session_count("vid", "1.2.3.4"), None);
    }

    #[test]
    fn old_views_age_out_of_the_verdict() {
        let mut analyzer = analyzer();

        for i in 0..20 {
            analyzer.record_view_at("vid", "1.2.3.4", i * 777);
        }
        // Far enough ahead that everything above has been pruned; a fresh
        // view starts a short sequence again.
        assert!(!analyzer.record_view_at("vid", "1.2.3.4", 1_000_000));
    }
}
