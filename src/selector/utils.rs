//! Utility functions for selector and role rules.
//!
//! Small string and attribute helpers shared by the cascade, the role
//! classifier and table detection.

use crate::dom;
use dom_query::Selection;

// === String Utilities ===

/// Case-sensitive check for any of `tokens` inside `haystack`.
///
/// An empty token list never matches.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::selector::utils;
///
/// assert!(utils::contains_any("font-user-message", &["user", "human"]));
/// assert!(!utils::contains_any("font-claude-message", &["user"]));
/// assert!(!utils::contains_any("anything", &[]));
/// ```
#[inline]
#[must_use]
pub fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| haystack.contains(token))
}

// === Element Attribute Helpers ===

/// Get element ID attribute (empty string if missing)
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> String {
    dom::get_attribute(sel, "id").unwrap_or_default()
}

/// Get element class attribute (empty string if missing)
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::class_name(sel).unwrap_or_default()
}

/// Combine id and class for multi-attribute checks.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::selector::utils;
/// use rs_chat_navigator::dom;
///
/// let doc = dom::parse(r#"<table id="nav-grid" class="compact">…</table>"#);
/// let table = doc.select("table");
///
/// assert!(utils::contains_any(&utils::id_class(&table), &["nav"]));
/// ```
#[inline]
#[must_use]
pub fn id_class(sel: &Selection) -> String {
    format!("{} {}", id(sel), class(sel))
}

// === Message Heuristics ===

/// Whether the element's class or attributes carry a message-like token.
///
/// Used by the cascade's scoring bonus.
#[must_use]
pub fn is_message_like(sel: &Selection, tokens: &[&str]) -> bool {
    contains_any(&class(sel), tokens) || contains_any(&dom::attribute_string(sel), tokens)
}

/// Whether the element sits inside (or is) one of the containers matching
/// `selector`.
#[inline]
#[must_use]
pub fn is_inside(sel: &Selection, selector: &str) -> bool {
    dom::closest(sel, selector).is_some()
}
