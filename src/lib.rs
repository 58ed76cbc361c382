//! # rs-chat-navigator
//!
//! Heuristic question/answer extraction from rendered AI chat pages
//! (ChatGPT, Claude, Gemini, You.com, Bing) plus detection and CSV export of
//! tables found in assistant answers.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_chat_navigator::{extract, Strategy};
//!
//! let html = r#"<html><body><main>
//!   <div data-message-author-role="user">How do I optimize performance?</div>
//!   <div data-message-author-role="assistant">Profile first, then fix the hot path.</div>
//! </main></body></html>"#;
//!
//! let result = extract(html, "https://chat.openai.com/c/123");
//! assert_eq!(result.strategy, Strategy::Site);
//! assert_eq!(result.pairs[0].question, "How do I optimize performance?");
//! ```
//!
//! ## How it works
//!
//! - The page URL selects a [`SiteProfile`]; each profile carries candidate
//!   selectors, role markers and extra noise rules.
//! - The selector cascade picks the best-scoring selector, then every
//!   fragment is classified as user, assistant or unknown and paired.
//! - When a site's selectors find nothing, the extractor falls back to
//!   cross-site selectors and finally to a scan of text-heavy `div`s.
//! - [`table::extract_table`] recognizes HTML, Markdown, TSV, CSV and
//!   space-aligned tables; [`export`] writes them as CSV.
//! - [`monitor::Monitor`] re-runs extraction on DOM changes and ships
//!   results over the [`messaging`] protocol.

mod error;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Visible text and text sanitization.
pub mod normalize;

/// Navigation/noise text filter.
pub mod noise;

/// User/assistant role classification.
pub mod role;

/// Selector cascade and candidate scoring.
pub mod selector;

/// Per-site extraction profiles.
pub mod site;

/// Extraction pipeline and pairing state machine.
pub mod extractor;

/// Table detection and parsing.
pub mod table;

/// CSV export.
pub mod export;

/// Cross-context message protocol and delivery.
pub mod messaging;

/// Debounced re-extraction loop.
pub mod monitor;

// Public API - re-exports
pub use error::{Error, Result};
pub use noise::NoiseFilter;
pub use options::Options;
pub use result::{ConversationPair, ExtractionResult, PairId, SourceRef, Strategy};
pub use role::{Role, RoleRules};
pub use site::{Site, SiteProfile};
pub use table::{DetectedTable, TableData};

/// Extract conversation pairs from a page snapshot.
///
/// `url` picks the site profile; an unknown or unparsable URL runs only the
/// generic fallbacks.
#[must_use]
pub fn extract(html: &str, url: &str) -> ExtractionResult {
    let options = Options {
        url: Some(url.to_string()),
        ..Options::default()
    };
    extract_with_options(html, &options)
}

/// Extract conversation pairs with custom options.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::{extract_with_options, Options};
///
/// let options = Options {
///     url: Some("https://claude.ai/chat/abc".to_string()),
///     min_text_len: 2,
///     ..Options::default()
/// };
/// let result = extract_with_options("<html><body></body></html>", &options);
/// assert!(result.is_empty());
/// ```
#[must_use]
pub fn extract_with_options(html: &str, options: &Options) -> ExtractionResult {
    let doc = dom::parse(html);
    extractor::extract_conversations(&doc, options)
}

/// Find every exportable table in a page snapshot.
///
/// `url` picks the assistant containers searched for code blocks and
/// Markdown tables; without a known site the generic containers are used.
#[must_use]
pub fn find_tables(html: &str, url: Option<&str>) -> Vec<DetectedTable> {
    let doc = dom::parse(html);
    let profile = url.and_then(site::profile_for_url);
    table::find_page_tables(&doc, profile)
}
