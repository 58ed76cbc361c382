//! Table detection and parsing.
//!
//! [`extract_table`] tries every supported format in a fixed priority order
//! (HTML, Markdown, TSV, CSV, space-aligned) and returns the first one that
//! validates. Lower-priority formats are never attempted once one succeeds,
//! so an HTML table is not re-split on its commas.
//!
//! [`detect::find_page_tables`] finds exportable tables in a whole page.

pub mod detect;
mod parsers;

use std::collections::HashMap;

use serde::Serialize;

use crate::patterns::HTML_TABLE;

pub use detect::{find_page_tables, DetectedTable};
pub use parsers::{
    find_markdown_tables, parse_csv, parse_html_table, parse_markdown_table, parse_space_aligned,
    parse_tsv,
};

/// Maximum distance between a row's width and the reference width.
pub const ROW_WIDTH_TOLERANCE: usize = 1;

/// Ordered rows of ordered cell strings.
///
/// Only constructed through validation: at least two rows, at least two
/// columns, every row within [`ROW_WIDTH_TOLERANCE`] of the reference width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableData(Vec<Vec<String>>);

/// Which width every row is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthReference {
    /// Most frequent row width (earliest wins ties).
    Modal,
    /// Width of the first row.
    First,
    /// Mean row width.
    Average,
}

impl TableData {
    /// Validate `rows` against the modal width.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_chat_navigator::TableData;
    ///
    /// let table = TableData::new(vec![
    ///     vec!["Name".into(), "Age".into()],
    ///     vec!["Alice".into(), "30".into()],
    /// ]);
    /// assert!(table.is_some());
    /// assert!(TableData::new(vec![vec!["only one row".into()]]).is_none());
    /// ```
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Option<Self> {
        Self::validate(rows, WidthReference::Modal)
    }

    /// Validate `rows` against the given width reference.
    #[must_use]
    pub fn validate(rows: Vec<Vec<String>>, reference: WidthReference) -> Option<Self> {
        if rows.len() < 2 {
            return None;
        }

        let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
        let within = match reference {
            WidthReference::Modal => {
                let width = modal_width(&widths);
                width >= 2 && widths.iter().all(|w| w.abs_diff(width) <= ROW_WIDTH_TOLERANCE)
            }
            WidthReference::First => {
                let width = widths[0];
                width >= 2 && widths.iter().all(|w| w.abs_diff(width) <= ROW_WIDTH_TOLERANCE)
            }
            WidthReference::Average => {
                let avg = widths.iter().sum::<usize>() as f64 / widths.len() as f64;
                avg >= 2.0
                    && widths
                        .iter()
                        .all(|&w| (w as f64 - avg).abs() <= ROW_WIDTH_TOLERANCE as f64)
            }
        };

        within.then_some(Self(rows))
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Number of rows (always at least two).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Widest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.iter().map(Vec::len).max().unwrap_or(0)
    }
}

fn modal_width(widths: &[usize]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &w in widths {
        *counts.entry(w).or_default() += 1;
    }

    let mut best = (0, 0);
    for &w in widths {
        let count = counts.get(&w).copied().unwrap_or(0);
        if count > best.1 {
            best = (w, count);
        }
    }
    best.0
}

/// Parse tabular data from free text.
///
/// Priority: HTML `<table>` → Markdown pipe table → TSV → CSV →
/// space-aligned columns. A format is tried only when its trigger is present
/// (`<table…</table>`, `|`, a tab, a comma); the space-aligned parser is the
/// unconditional last resort.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::table;
///
/// let table = table::extract_table("| A | B |\n|---|---|\n| 1 | 2 |").expect("markdown");
/// assert_eq!(table.rows(), &[vec!["A", "B"], vec!["1", "2"]]);
///
/// assert!(table::extract_table("just a sentence").is_none());
/// ```
#[must_use]
pub fn extract_table(text: &str) -> Option<TableData> {
    if text.trim().is_empty() {
        return None;
    }

    if HTML_TABLE.is_match(text) {
        if let Some(table) = parse_html_table(text) {
            return Some(table);
        }
    }
    if text.contains('|') {
        if let Some(table) = parse_markdown_table(text) {
            return Some(table);
        }
    }
    if text.contains('\t') {
        if let Some(table) = parse_tsv(text) {
            return Some(table);
        }
    }
    if text.contains(',') {
        if let Some(table) = parse_csv(text) {
            return Some(table);
        }
    }
    parse_space_aligned(text)
}
