//! Configuration options for conversation extraction.
//!
//! The `Options` struct carries every tunable threshold of the pipeline:
//! the candidate length band, the scoring weight, the last-resort band and
//! the de-duplication prefix.

use crate::noise::NoiseFilter;

/// Configuration options for conversation extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     url: Some("https://claude.ai/chat/abc".to_string()),
///     message_like_weight: 5,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Page URL, used to pick the site profile.
    ///
    /// Without it only the universal and last-resort tiers run.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Candidates must have strictly more characters than this.
    ///
    /// Default: `5`
    pub min_text_len: usize,

    /// Candidates must have strictly fewer characters than this.
    ///
    /// Default: `10000`
    pub max_text_len: usize,

    /// Bonus per candidate whose class/attributes look message-like.
    ///
    /// A selector's score is `count + message_like_weight * message_like`.
    ///
    /// Default: `10`
    pub message_like_weight: usize,

    /// Minimum characters (inclusive) for a last-resort `div`.
    ///
    /// Default: `50`
    pub fallback_min_len: usize,

    /// Maximum characters (inclusive) for a last-resort `div`.
    ///
    /// Default: `5000`
    pub fallback_max_len: usize,

    /// Leading characters of question and answer compared for de-duplication.
    ///
    /// Default: `100`
    pub dedup_prefix_len: usize,

    /// Override for the text heuristic's length limit.
    ///
    /// `None` uses the profile's own limit (300, or 200 for the universal
    /// profile).
    ///
    /// Default: `None`
    pub user_text_max_len: Option<usize>,

    /// Navigation/noise rules. Site profiles append their own rules.
    ///
    /// Default: [`NoiseFilter::default`]
    pub noise_filter: NoiseFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            min_text_len: 5,
            max_text_len: 10_000,
            message_like_weight: 10,
            fallback_min_len: 50,
            fallback_max_len: 5_000,
            dedup_prefix_len: 100,
            user_text_max_len: None,
            noise_filter: NoiseFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_thresholds() {
        let opts = Options::default();

        assert!(opts.url.is_none());
        assert_eq!(opts.min_text_len, 5);
        assert_eq!(opts.max_text_len, 10_000);
        assert_eq!(opts.message_like_weight, 10);
        assert_eq!(opts.fallback_min_len, 50);
        assert_eq!(opts.fallback_max_len, 5_000);
        assert_eq!(opts.dedup_prefix_len, 100);
        assert!(opts.user_text_max_len.is_none());
        assert!(!opts.noise_filter.is_empty());
    }

    #[test]
    fn test_options_custom_values() {
        let opts = Options {
            min_text_len: 0,
            user_text_max_len: Some(120),
            ..Options::default()
        };

        assert_eq!(opts.min_text_len, 0);
        assert_eq!(opts.user_text_max_len, Some(120));
        assert_eq!(opts.max_text_len, 10_000);
    }
}
