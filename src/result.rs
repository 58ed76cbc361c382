//! Result types for extraction output.
//!
//! An [`ExtractionResult`] is produced fresh on every pass and replaces the
//! previous one wholesale; nothing in here is patched incrementally.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dom::{self, Document, NodeRef, Selection};
use crate::normalize;
use crate::site::Site;

/// Identifier of a conversation pair.
///
/// Extraction assigns integers in discovery order; pairs added by hand on the
/// panel side may carry string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PairId {
    /// Discovery-order id assigned by extraction (1-based).
    Number(u64),
    /// Free-form id.
    Text(String),
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PairId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Number of leading characters kept to detect a stale [`SourceRef`].
const FINGERPRINT_CHARS: usize = 50;

/// Weak back-reference to the element a fragment came from.
///
/// Holds no handle into the host document: only the element-child index path
/// from the root and a short text fingerprint. Resolve it against a freshly
/// parsed snapshot; `None` means the page has changed underneath and the pair
/// must be looked up again by id after the next extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Element-child indices from the document root.
    pub path: Vec<usize>,
    /// Leading characters of the element's normalized text.
    pub fingerprint: String,
}

impl SourceRef {
    /// Record the location of `node`.
    #[must_use]
    pub fn from_node(node: &NodeRef, text: &str) -> Self {
        Self {
            path: dom::node_path(node),
            fingerprint: normalize::char_prefix(text, FINGERPRINT_CHARS).to_string(),
        }
    }

    /// Record the location of the first node of `sel` (empty ref if none).
    #[must_use]
    pub fn from_selection(sel: &Selection, text: &str) -> Self {
        sel.nodes()
            .first()
            .map(|node| Self::from_node(node, text))
            .unwrap_or_default()
    }

    /// Find the referenced element in `doc`, if it is still there.
    #[must_use]
    pub fn resolve<'a>(&self, doc: &'a Document) -> Option<Selection<'a>> {
        if self.path.is_empty() {
            return None;
        }
        let sel = dom::resolve_path(doc, &self.path)?;
        let text = normalize::element_text(&sel);
        (normalize::char_prefix(&text, FINGERPRINT_CHARS) == self.fingerprint).then_some(sel)
    }
}

/// A completed question/answer unit.
///
/// Both `question` and `answer` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPair {
    /// Unique within one extraction pass; discovery order.
    pub id: PairId,

    /// User-authored text.
    pub question: String,

    /// Assistant-authored text.
    pub answer: String,

    /// When the pair was extracted.
    pub timestamp: DateTime<Utc>,

    /// Where the question came from (scroll/highlight only).
    pub question_ref: SourceRef,

    /// Where the answer came from.
    pub answer_ref: SourceRef,
}

/// Which tier of the fallback chain produced a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Site profile selectors.
    Site,
    /// Separately selected user and answer lists zipped by index.
    PairedLists,
    /// Cross-site selector list.
    Universal,
    /// Scan of all divs with substantial text.
    LastResort,
    /// Nothing produced a pair.
    #[default]
    None,
}

/// Result of one extraction pass over a page snapshot.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Completed pairs in document order.
    pub pairs: Vec<ConversationPair>,

    /// Site profile matched from the page URL, if any.
    pub site: Option<Site>,

    /// Tier that produced `pairs`.
    pub strategy: Strategy,

    /// Winning CSS selector (or the paired-list selectors), if any.
    pub selector: Option<String>,

    /// Fragments dropped because they were empty after sanitization.
    pub skipped_fragments: usize,

    /// Non-fatal issues encountered during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Look up a pair by id.
    #[must_use]
    pub fn find(&self, id: &PairId) -> Option<&ConversationPair> {
        self.pairs.iter().find(|pair| &pair.id == id)
    }

    /// Whether the pass produced no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
