//! Navigation/noise filter.
//!
//! Classifies short snippets (menu labels, dates, keyboard shortcuts, bullet
//! markers, upgrade prompts) as page chrome rather than conversation content.
//! Rules are an ordered list of regexes; any single match marks the text as
//! noise. The list is data, so it can be tuned without touching control flow.

use regex::Regex;

use crate::patterns::DEFAULT_NOISE_PATTERNS;
use crate::Result;

/// Ordered set of OR-combined noise rules.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    rules: Vec<Regex>,
}

impl NoiseFilter {
    /// Build a filter from an explicit pattern list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_chat_navigator::NoiseFilter;
    ///
    /// let filter = NoiseFilter::from_patterns(&[r"^Advertisement$"])?;
    /// assert!(filter.is_noise("Advertisement"));
    /// assert!(!filter.is_noise("New chat"));
    /// # Ok::<(), rs_chat_navigator::Error>(())
    /// ```
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Extend this filter with additional patterns (e.g. per-site rules).
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.rules.push(Regex::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Returns `true` when any rule matches the trimmed text.
    #[must_use]
    pub fn is_noise(&self, text: &str) -> bool {
        let text = text.trim();
        self.rules.iter().any(|rule| rule.is_match(text))
    }

    /// Number of rules in the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the filter has no rules (nothing is ever noise).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        // The default list is covered by `patterns::tests::default_noise_patterns_compile`.
        let rules = DEFAULT_NOISE_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { rules }
    }
}
