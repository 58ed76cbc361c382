//! Per-format table parsers.
//!
//! Each parser returns `None` when its input does not validate as a table
//! (see [`TableData::validate`]). Reference widths: modal for HTML and
//! Markdown, first row for TSV and CSV, average for space-aligned text.

use dom_query::{Document, Selection};

use crate::patterns::{COLUMN_GAP, HTML_TABLE, MARKDOWN_SEPARATOR_ROW};

use super::{TableData, WidthReference};

// === HTML ===

/// Parse the first valid `<table>` found in `text`.
#[must_use]
pub fn parse_html_table(text: &str) -> Option<TableData> {
    HTML_TABLE.find_iter(text).find_map(|m| {
        let doc = Document::from(m.as_str());
        let table = doc.select("table").first();
        TableData::validate(html_rows(&table), WidthReference::Modal)
    })
}

/// Cell texts of every `tr` in a table element; rows without cells are dropped.
pub(crate) fn html_rows(table: &Selection) -> Vec<Vec<String>> {
    table
        .select("tr")
        .nodes()
        .iter()
        .map(|tr| {
            Selection::from(*tr)
                .select("td, th")
                .nodes()
                .iter()
                .map(|cell| Selection::from(*cell).text().trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

// === Markdown ===

/// Parse a Markdown pipe table. The separator line right under the header
/// is excluded; dash-only rows further down are data.
///
/// Only lines containing `|` take part; interior empty cells are kept.
#[must_use]
pub fn parse_markdown_table(text: &str) -> Option<TableData> {
    let rows = text
        .lines()
        .filter(|line| line.contains('|'))
        .enumerate()
        .filter(|(index, line)| !(*index == 1 && MARKDOWN_SEPARATOR_ROW.is_match(line)))
        .map(|(_, line)| split_pipe_row(line))
        .filter(|row| !row.is_empty())
        .collect();

    TableData::validate(rows, WidthReference::Modal)
}

fn split_pipe_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Every contiguous block of `|…|` lines in `text` that parses as a table.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::table::find_markdown_tables;
///
/// let text = "Here you go:\n| A | B |\n|---|---|\n| 1 | 2 |\n\nAnd another:\n| X | Y |\n| 3 | 4 |";
/// assert_eq!(find_markdown_tables(text).len(), 2);
/// ```
#[must_use]
pub fn find_markdown_tables(text: &str) -> Vec<TableData> {
    let mut tables = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        let trimmed = line.trim();
        if trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|') {
            block.push(trimmed);
            continue;
        }
        if !block.is_empty() {
            if let Some(table) = parse_markdown_table(&block.join("\n")) {
                tables.push(table);
            }
            block.clear();
        }
    }

    tables
}

// === Delimited ===

/// Parse tab-separated lines (lines without a tab are ignored).
#[must_use]
pub fn parse_tsv(text: &str) -> Option<TableData> {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty() && line.contains('\t'))
        .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
        .collect();

    TableData::validate(rows, WidthReference::First)
}

/// Parse comma-separated lines (lines without a comma are ignored).
///
/// Double-quoted fields may contain commas and doubled quotes; their content
/// is kept verbatim, unquoted fields are trimmed.
#[must_use]
pub fn parse_csv(text: &str) -> Option<TableData> {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty() && line.contains(','))
        .map(split_csv_line)
        .collect();

    TableData::validate(rows, WidthReference::First)
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if !quoted && current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' if !in_quotes => {
                cells.push(finish_cell(std::mem::take(&mut current), quoted));
                quoted = false;
            }
            // whitespace between a closing quote and the next comma
            c if quoted && !in_quotes && c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    cells.push(finish_cell(current, quoted));

    cells
}

fn finish_cell(cell: String, quoted: bool) -> String {
    if quoted {
        cell
    } else {
        cell.trim().to_string()
    }
}

// === Space-aligned ===

/// Parse columns separated by runs of two or more spaces.
///
/// Lines without such a gap are ignored; rows are checked against the
/// average width.
#[must_use]
pub fn parse_space_aligned(text: &str) -> Option<TableData> {
    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && COLUMN_GAP.is_match(line))
        .map(|line| {
            COLUMN_GAP
                .split(line)
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect();

    TableData::validate(rows, WidthReference::Average)
}
