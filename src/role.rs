//! Role classification for message fragments.
//!
//! Each site carries a [`RoleRules`] table. Evaluation order:
//!
//! 1. direct class/attribute tokens (own element, then parent),
//! 2. structural selectors (descendant, ancestor-or-self),
//! 3. explicit assistant markers,
//! 4. the textual fallback (short text that asks something),
//! 5. continuation: an unmatched fragment answers a pending question,
//!    otherwise it is [`Role::Unknown`] and gets dropped.

use std::sync::LazyLock;

use dom_query::Selection;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::selector::utils;

/// Author of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored question.
    User,
    /// Assistant-authored answer.
    Assistant,
    /// Could not be attributed; ignored by the pairing engine.
    Unknown,
}

/// Short texts that ask something are probably user turns.
#[derive(Debug)]
pub struct TextFallback {
    /// Only texts strictly shorter than this (in characters) qualify.
    pub max_len: usize,
    /// Whether a `?` anywhere in the text is enough.
    pub question_mark: bool,
    /// Interrogative/request openers ("what", "can you", "please", ...).
    pub openers: &'static LazyLock<Regex>,
}

impl TextFallback {
    /// Whether `text` reads like a user question.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.matches_within(text, self.max_len)
    }

    fn matches_within(&self, text: &str, max_len: usize) -> bool {
        let text = text.trim();
        if text.chars().count() >= max_len {
            return false;
        }
        (self.question_mark && text.contains('?')) || self.openers.is_match(text)
    }
}

/// Per-site role classification rules.
///
/// All token checks are case-sensitive substring checks; profiles list both
/// spellings where sites differ (`Human`/`human`).
#[derive(Debug)]
pub struct RoleRules {
    /// Substrings of the element's `class` that mark a user turn.
    pub user_class_tokens: &'static [&'static str],
    /// Substrings of the `name=value` attribute string that mark a user turn.
    pub user_attr_tokens: &'static [&'static str],
    /// Substrings of any parent attribute value that mark a user turn.
    pub user_parent_tokens: &'static [&'static str],
    /// A descendant matching any of these marks a user turn.
    pub user_descendant_selectors: &'static [&'static str],
    /// The element or an ancestor matching any of these marks a user turn.
    pub user_closest_selectors: &'static [&'static str],
    /// Class substrings that mark an assistant turn.
    pub assistant_class_tokens: &'static [&'static str],
    /// Attribute-string substrings that mark an assistant turn.
    pub assistant_attr_tokens: &'static [&'static str],
    /// A descendant matching any of these marks an assistant turn.
    pub assistant_descendant_selectors: &'static [&'static str],
    /// The element or an ancestor matching any of these marks an assistant turn.
    pub assistant_closest_selectors: &'static [&'static str],
    /// Textual user heuristic, for sites whose markup is unreliable.
    pub text_fallback: Option<TextFallback>,
}

impl RoleRules {
    /// Classify one fragment.
    ///
    /// `user_pending` is whether the pairing engine is waiting for an answer;
    /// it drives the continuation rule for otherwise unmatched fragments.
    #[must_use]
    pub fn classify(&self, sel: &Selection, text: &str, user_pending: bool) -> Role {
        self.classify_with_limit(sel, text, user_pending, None)
    }

    /// [`classify`](Self::classify) with the text-fallback length limit
    /// overridden (`Options::user_text_max_len`).
    #[must_use]
    pub fn classify_with_limit(
        &self,
        sel: &Selection,
        text: &str,
        user_pending: bool,
        max_len: Option<usize>,
    ) -> Role {
        if self.has_user_markers(sel) || self.has_user_structure(sel) {
            return Role::User;
        }
        if self.has_assistant_markers(sel) {
            return Role::Assistant;
        }
        let asks = self
            .text_fallback
            .as_ref()
            .is_some_and(|f| f.matches_within(text, max_len.unwrap_or(f.max_len)));
        if asks {
            return Role::User;
        }
        if user_pending {
            Role::Assistant
        } else {
            Role::Unknown
        }
    }

    fn has_user_markers(&self, sel: &Selection) -> bool {
        let class = utils::class(sel);
        if utils::contains_any(&class, self.user_class_tokens) {
            return true;
        }

        let attrs = dom::attribute_string(sel);
        if utils::contains_any(&attrs, self.user_attr_tokens) {
            return true;
        }

        if self.user_parent_tokens.is_empty() {
            return false;
        }
        let parent = dom::parent(sel);
        parent.exists()
            && dom::get_all_attributes(&parent)
                .iter()
                .any(|(_, value)| utils::contains_any(value, self.user_parent_tokens))
    }

    fn has_user_structure(&self, sel: &Selection) -> bool {
        self.user_descendant_selectors
            .iter()
            .any(|s| dom::has_descendant(sel, s))
            || self
                .user_closest_selectors
                .iter()
                .any(|s| dom::closest(sel, s).is_some())
    }

    fn has_assistant_markers(&self, sel: &Selection) -> bool {
        utils::contains_any(&utils::class(sel), self.assistant_class_tokens)
            || utils::contains_any(&dom::attribute_string(sel), self.assistant_attr_tokens)
            || self
                .assistant_descendant_selectors
                .iter()
                .any(|s| dom::has_descendant(sel, s))
            || self
                .assistant_closest_selectors
                .iter()
                .any(|s| dom::closest(sel, s).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::CLAUDE_QUESTION_START;

    static RULES: RoleRules = RoleRules {
        user_class_tokens: &["user"],
        user_attr_tokens: &["data-message-author-role=user"],
        user_parent_tokens: &["Human"],
        user_descendant_selectors: &["[data-role='user']"],
        user_closest_selectors: &["[data-testid*='user']"],
        assistant_class_tokens: &["bot"],
        assistant_attr_tokens: &["data-message-author-role=assistant"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &[],
        text_fallback: Some(TextFallback {
            max_len: 300,
            question_mark: true,
            openers: &CLAUDE_QUESTION_START,
        }),
    };

    fn classify(html: &str, pending: bool) -> Role {
        let doc = dom::parse(html);
        let sel = doc.select("#m");
        let text = crate::normalize::element_text(&sel);
        RULES.classify(&sel, &text, pending)
    }

    #[test]
    fn direct_class_and_attribute_tokens() {
        assert_eq!(classify(r#"<div id="m" class="user-bubble">Long statement here.</div>"#, false), Role::User);
        assert_eq!(
            classify(r#"<div id="m" data-message-author-role="user">Long statement.</div>"#, false),
            Role::User
        );
        assert_eq!(
            classify(r#"<div id="m" data-message-author-role="assistant">Sure thing?</div>"#, false),
            Role::Assistant
        );
    }

    #[test]
    fn parent_and_structural_checks() {
        assert_eq!(classify(r#"<div class="Human-turn"><div id="m">Plain text.</div></div>"#, false), Role::User);
        assert_eq!(classify(r#"<div id="m"><span data-role="user">Plain text.</span></div>"#, false), Role::User);
        assert_eq!(
            classify(r#"<section data-testid="user-1"><div id="m">Plain text.</div></section>"#, false),
            Role::User
        );
    }

    #[test]
    fn text_fallback_for_short_questions() {
        assert_eq!(classify(r#"<div id="m">Is this fast?</div>"#, false), Role::User);
        assert_eq!(classify(r#"<div id="m">Explain closures in Rust</div>"#, false), Role::User);

        let long_question = format!(r#"<div id="m">{}?</div>"#, "word ".repeat(80));
        assert_eq!(classify(&long_question, false), Role::Unknown);
    }

    #[test]
    fn length_limit_override() {
        let doc = dom::parse(r#"<div id="m">Is this a reasonably short question?</div>"#);
        let sel = doc.select("#m");
        let text = crate::normalize::element_text(&sel);
        assert_eq!(RULES.classify_with_limit(&sel, &text, false, Some(10)), Role::Unknown);
        assert_eq!(RULES.classify_with_limit(&sel, &text, false, None), Role::User);
    }

    #[test]
    fn continuation_rule() {
        let html = r#"<div id="m">Use memoization.</div>"#;
        assert_eq!(classify(html, true), Role::Assistant);
        assert_eq!(classify(html, false), Role::Unknown);
    }

    #[test]
    fn explicit_assistant_marker_beats_text_fallback() {
        assert_eq!(classify(r#"<div id="m" class="bot">Anything else?</div>"#, false), Role::Assistant);
    }
}
