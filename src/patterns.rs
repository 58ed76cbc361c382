//! Compiled regex patterns and CSS selectors shared across the extraction pipeline.
//!
//! All patterns are compiled once at first use with `LazyLock`. Pattern *lists*
//! that callers are expected to tune (noise rules) are kept as string slices and
//! compiled by their owners.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Navigation / Noise Rules
// =============================================================================

/// Default navigation/noise rules, evaluated against trimmed fragment text.
///
/// Any single match marks a fragment as noise. Menu-label rules end in `\b`
/// so that prose such as "Provide a summary" is not caught by the `Pro` label.
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &[
    // Chat sidebar labels
    r"(?i)^(Chat history|New chat|Search chats|Library)\b",
    // Date-only strings: "9/6/2025", "2024-01-01"
    r"^[\d/.-]+$",
    // Keyboard shortcut glyphs: "⇧⌘O"
    r"(?i)^[⇧⌘⌃⌥]+[A-Z\d]$",
    // Icon-only strings
    r"^[×☕🔍📋➕✕]+$",
    // Conversation item actions
    r"(?i)^(Chat\s+history|New\s+chat|Search\s+chats|Copy\s+link|Share|Delete|Rename)\b",
    // A single short word with an optional close glyph
    r"(?i)^[A-Z]{2,}\s*[×✕]?\s*$",
    // Date group headers
    r"(?i)^(Today|Yesterday|Previous \d+ Days|Last \d+ days)\b",
    // Settings/menu items
    r"(?i)^(Settings|Help|Logout|Sign out|Profile|Account)\b",
    // Bullets or arrows
    r"^\s*[•·‣▸►]\s*",
    // Subscription/upgrade prompts
    r"(?i)^(Upgrade|Subscribe|Pro|Plus)\b",
];

/// Extra noise rules for the ChatGPT sidebar (custom GPT names, Sora).
pub const CHATGPT_NOISE_PATTERNS: &[&str] = &[r"(?i)^(Sora|GPT|Life Coach|No psycho)\b"];

// =============================================================================
// Role Heuristics
// =============================================================================

/// Interrogative/request openers used by the Claude text fallback.
pub static CLAUDE_QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(what|how|why|when|where|can you|could you|please|help|explain|tell me)\b")
        .expect("CLAUDE_QUESTION_START regex")
});

/// Gemini users also phrase requests as commands ("generate", "create").
pub static GEMINI_QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(what|how|why|when|where|can you|could you|please|help|explain|tell me|show me|generate|create)\b",
    )
    .expect("GEMINI_QUESTION_START regex")
});

/// Openers for the cross-site fallback classifier.
pub static UNIVERSAL_QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(what|how|why|when|where|can you|could you|please|help|explain)\b")
        .expect("UNIVERSAL_QUESTION_START regex")
});

// =============================================================================
// Table Patterns
// =============================================================================

/// An HTML table somewhere in a text blob.
pub static HTML_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table[\s\S]*?</table>").expect("HTML_TABLE regex"));

/// A Markdown header separator row: `|---|:---:|`.
pub static MARKDOWN_SEPARATOR_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("MARKDOWN_SEPARATOR_ROW regex")
});

/// Two or more whitespace characters separating space-aligned columns.
pub static COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("COLUMN_GAP regex"));

// =============================================================================
// CSS Selectors
// =============================================================================

/// Descendants excluded from fragment text (the text normalizer's skip list).
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "button"];

/// Containers whose contents are never conversation messages.
pub const EXCLUDED_CONTAINER_SELECTOR: &str =
    "nav, aside, [class*='sidebar'], [role='navigation']";

/// Nodes whose insertion suggests a new message was rendered.
pub const MESSAGE_HINT_SELECTOR: &str = "[data-message-author-role], \
     [data-testid*='conversation-turn'], [data-testid*='message'], \
     div[class*='font-user'], div[class*='font-claude'], .prose, \
     message-content, model-response-text, [class*='message'], [role='article']";

/// Ancestors that mark an HTML table as part of the page chrome.
pub const UI_TABLE_CONTAINER_SELECTOR: &str = ".sidebar, .nav, .menu, .header, .footer, .toolbar";

/// Interactive descendants that mark an HTML table as page chrome.
pub const INTERACTIVE_SELECTOR: &str = "button, a, input, select, textarea";

/// Class/id fragments that mark an HTML table as page chrome.
pub const UI_TABLE_TOKENS: &[&str] = &["nav", "menu", "sidebar", "header", "footer", "toolbar", "controls"];
