//! Spam detection for comment text.
//!
//! Stateless heuristic classifier over free text. A comment is spam if it
//! matches any of a fixed set of self-promotion / reciprocal-subscription
//! phrases, or if it carries more links than the configured limit.

use regex::Regex;

use crate::models::SpamFilterConfig;

/// Case-insensitive phrase patterns; tokens may be separated by arbitrary
/// filler text.
const SPAM_PATTERNS: &[&str] = &[
    r"(?i)check.+my.+channel",
    r"(?i)subscribe.+back",
    r"(?i)sub4sub",
    r"(?i)follow.+me",
    r"(?i)want.+free.+subscribers",
];

/// Stateless spam classifier for comment text.
pub struct SpamFilter {
    patterns: Vec<Regex>,
    link_pattern: Regex,
    max_links: usize,
}

impl SpamFilter {
    /// Create a new spam filter instance
    pub fn new(config: SpamFilterConfig) -> Self {
        let patterns = SPAM_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("spam pattern"))
            .collect();
        Self {
            patterns,
            link_pattern: Regex::new(r"https?://").expect("link pattern"),
            max_links: config.max_links,
        }
    }

    /// Classify a piece of comment text. Returns `true` for spam.
    ///
    /// The verdict is the logical OR of all rules; evaluation order does
    /// not matter. Total function: any text yields a verdict.
    pub fn is_spam(&self, text: &str) -> bool {
        if self.patterns.iter().any(|p| p.is_match(text)) {
            return true;
        }

        self.link_pattern.find_iter(text).count() > self.max_links
    }
}

impl Default for SpamFilter {
    fn default() -> Self {
        Self::new(SpamFilterConfig::default())
    }
}
