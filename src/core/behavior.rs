//! Behavior sequence analysis.
//!
//! Stateless classifier over an ordered sequence of action tokens,
//! detecting pure repetition and burstiness.

use std::collections::HashSet;

use crate::models::BehaviorConfig;

/// Stateless analyzer for ordered action-token sequences.
pub struct BehaviorAnalyzer {
    config: BehaviorConfig,
}

impl BehaviorAnalyzer {
    /// Create a new behavior analyzer instance
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    /// Classify an ordered sequence of action tokens.
    ///
    /// Suspicious if the sequence is longer than the repeat length and
    /// every token is identical, or if it is longer than the burst length
    /// and the span between the first and last token (each parsed as an
    /// integer timestamp in ms) is below the burst threshold. A token
    /// that fails to parse makes the burst branch evaluate false rather
    /// than erroring.
    ///
    /// By convention the tokens in the burst case encode millisecond
    /// timestamps as numeric strings; there is no separate timestamp
    /// parameter.
    pub fn is_suspicious<S: AsRef<str>>(&self, actions: &[S]) -> bool {
        if actions.len() > self.config.repeat_length {
            let unique: HashSet<&str> = actions.iter().map(|a| a.as_ref()).collect();
            if unique.len() == 1 {
                return true;
            }
        }

        if actions.len() > self.config.burst_length {
            let first = actions.first().and_then(|a| a.as_ref().parse::<i64>().ok());
            let last = actions.last().and_then(|a| a.as_ref().parse::<i64>().ok());
            if let (Some(first), Some(last)) = (first, last) {
                if last - first < self.config.burst_threshold_ms {
                    return true;
                }
            }
        }

        false
    }
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new(BehaviorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_identical_tokens_are_suspicious() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec!["click"; 11];
        assert!(analyzer.is_suspicious(&actions));
    }

    #[test]
    fn ten_identical_tokens_are_not() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec!["click"; 10];
        assert!(!analyzer.is_suspicious(&actions));
    }

    #[test]
    fn varied_long_sequence_is_not_repetition() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec![
            "click", "scroll", "click", "pause", "click", "scroll", "click", "pause", "click",
            "scroll", "click",
        ];
        assert!(!analyzer.is_suspicious(&actions));
    }

    #[test]
    fn sub_second_timestamp_span_is_a_burst() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec!["1000", "1100", "1200", "1300", "1400", "1500"];
        assert!(analyzer.is_suspicious(&actions));
    }

    #[test]
    fn wide_timestamp_span_is_not_a_burst() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec!["1000", "2000", "3000", "4000", "5000", "6000"];
        assert!(!analyzer.is_suspicious(&actions));
    }

    #[test]
    fn non_numeric_tokens_never_trip_the_burst_branch() {
        let analyzer = BehaviorAnalyzer::default();
        let actions = vec!["open", "close", "open", "close", "open", "close"];
        assert!(!analyzer.is_suspicious(&actions));
    }

    #[test]
    fn single_element_sequence_is_clean() {
        let analyzer = BehaviorAnalyzer::default();
        assert!(!analyzer.is_suspicious(&["some comment text"]));
        assert!(!analyzer.is_suspicious::<&str>(&[]));
    }
}
