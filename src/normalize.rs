//! Text normalization for message fragments.
//!
//! [`element_text`] yields the visible text of a subtree the way `textContent`
//! would after scripts, styles, buttons and copy affordances were removed. It
//! walks the tree read-only, so the host document is never touched.
//!
//! [`sanitize_text`] prepares text for serialization across the message channel.

use dom_query::{NodeRef, Selection};

use crate::patterns::NON_CONTENT_TAGS;

/// Visible text of the first node in `sel`, trimmed.
///
/// Returns an empty string for an empty selection.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::{dom, normalize};
///
/// let doc = dom::parse(r#"<div>Answer<button>Copy</button><script>x()</script></div>"#);
/// assert_eq!(normalize::element_text(&doc.select("div")), "Answer");
/// ```
#[must_use]
pub fn element_text(sel: &Selection) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };

    let mut out = String::new();
    collect_text(node, &mut out);
    out.trim().to_string()
}

fn collect_text(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() && !is_non_content(&child) {
            collect_text(&child, out);
        }
    }
}

/// Elements whose text never belongs to a message.
fn is_non_content(node: &NodeRef) -> bool {
    let is_skipped_tag = node
        .node_name()
        .is_some_and(|tag| NON_CONTENT_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)));
    if is_skipped_tag {
        return true;
    }

    // `.copy-button`, `[class*="copy"]`
    node.attr("class").is_some_and(|class| class.contains("copy"))
}

/// Characters that survive `char::is_control` but still break rendering or
/// comparisons downstream.
const INVISIBLE_CHARS: &[char] = &['\u{FEFF}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FFFD}'];

/// Strip control and invisible characters, then trim.
///
/// Newlines and tabs are kept (tables and code blocks depend on them). Returns
/// `None` when nothing printable remains; such a fragment is treated as
/// malformed and skipped.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::normalize::sanitize_text;
///
/// assert_eq!(sanitize_text("\u{FEFF} Hello\u{0007} "), Some("Hello".to_string()));
/// assert_eq!(sanitize_text("\u{0000}\u{200B}"), None);
/// ```
#[must_use]
pub fn sanitize_text(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .filter(|c| !INVISIBLE_CHARS.contains(c))
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First `n` characters of trimmed text, used for prefix comparisons.
#[must_use]
pub fn char_prefix(text: &str, n: usize) -> &str {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(n) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}
