//! Exportable tables in a rendered chat page.
//!
//! Three sources, in this order:
//!
//! - HTML `<table>` elements that are not page chrome, named `table_<n>`
//!   (`n` counts every table in the document);
//! - `pre`/`code` blocks inside assistant containers whose text parses as a
//!   table, named `ai_table_<container>_<n>`;
//! - Markdown pipe tables in the prose of assistant containers, named
//!   `md_table_<container>_<n>`.

use dom_query::{NodeId, NodeRef, Selection};
use tracing::debug;

use crate::dom::{self, Document};
use crate::patterns::{INTERACTIVE_SELECTOR, UI_TABLE_CONTAINER_SELECTOR, UI_TABLE_TOKENS};
use crate::result::SourceRef;
use crate::selector::{utils, Rule};
use crate::site::{SiteProfile, UNIVERSAL};

use super::parsers::{find_markdown_tables, html_rows};
use super::{extract_table, TableData};

/// A table found on the page, ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTable {
    /// Export base name (`table_1`, `ai_table_2_1`, `md_table_1_1`).
    pub name: String,
    /// Parsed rows.
    pub data: TableData,
    /// Element the table was found in.
    pub source: SourceRef,
}

/// Rules marking an HTML table as page chrome; any match rejects it.
const UI_TABLE_RULES: &[Rule] = &[has_ui_token, is_tiny, has_interactive_content, is_in_ui_container];

fn has_ui_token(sel: &Selection) -> bool {
    utils::contains_any(&utils::id_class(sel).to_lowercase(), UI_TABLE_TOKENS)
}

fn is_tiny(sel: &Selection) -> bool {
    sel.select("tr").length() <= 1 || sel.select("td, th").length() <= 2
}

fn has_interactive_content(sel: &Selection) -> bool {
    dom::has_descendant(sel, INTERACTIVE_SELECTOR)
}

fn is_in_ui_container(sel: &Selection) -> bool {
    utils::is_inside(sel, UI_TABLE_CONTAINER_SELECTOR)
}

/// Whether an HTML table looks like navigation or controls rather than data.
#[must_use]
pub fn is_ui_table(sel: &Selection) -> bool {
    UI_TABLE_RULES.iter().any(|rule| rule(sel))
}

/// Find every exportable table on the page.
///
/// `profile` picks the assistant container selectors; without one the
/// generic containers are used.
#[must_use]
pub fn find_page_tables(doc: &Document, profile: Option<&SiteProfile>) -> Vec<DetectedTable> {
    let mut found = Vec::new();

    for (index, node) in doc.select("table").nodes().iter().enumerate() {
        let sel = Selection::from(*node);
        if is_ui_table(&sel) {
            continue;
        }
        let Some(data) = TableData::new(html_rows(&sel)) else {
            continue;
        };
        found.push(DetectedTable {
            name: format!("table_{}", index + 1),
            data,
            source: SourceRef::from_node(node, &sel.text()),
        });
    }

    let selectors = profile.map_or(UNIVERSAL.assistant_containers, |p| p.assistant_containers);
    for (c, container) in assistant_containers(doc, selectors).iter().enumerate() {
        let sel = Selection::from(*container);

        for (n, block) in code_blocks(&sel).iter().enumerate() {
            let text = Selection::from(*block).text().to_string();
            if let Some(data) = extract_table(&text) {
                found.push(DetectedTable {
                    name: format!("ai_table_{}_{}", c + 1, n + 1),
                    data,
                    source: SourceRef::from_node(block, &text),
                });
            }
        }

        let prose = prose_text(container);
        for (n, data) in find_markdown_tables(&prose).into_iter().enumerate() {
            found.push(DetectedTable {
                name: format!("md_table_{}_{}", c + 1, n + 1),
                data,
                source: SourceRef::from_node(container, &prose),
            });
        }
    }

    debug!(tables = found.len(), "table scan finished");
    found
}

/// Containers matching any selector, in selector-then-document order.
///
/// A container nested in an earlier one is skipped so its tables are not
/// reported twice.
fn assistant_containers<'a>(doc: &'a Document, selectors: &[&str]) -> Vec<NodeRef<'a>> {
    let mut containers: Vec<NodeRef<'a>> = Vec::new();
    for selector in selectors {
        let Some(matches) = dom::select_all(doc, selector) else {
            continue;
        };
        for node in matches.nodes() {
            let ids: Vec<NodeId> = containers.iter().map(|c| c.id).collect();
            let seen = ids.contains(&node.id) || node.ancestors(None).iter().any(|anc| ids.contains(&anc.id));
            if !seen {
                containers.push(*node);
            }
        }
    }
    containers
}

/// `pre` blocks and `code` elements not already inside a `pre`.
fn code_blocks<'a>(container: &Selection<'a>) -> Vec<NodeRef<'a>> {
    container
        .select("pre, code")
        .nodes()
        .iter()
        .filter(|node| {
            is_tag(node, "pre") || !node.ancestors(None).iter().any(|anc| is_tag(anc, "pre"))
        })
        .copied()
        .collect()
}

fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.node_name().is_some_and(|name| &*name == tag)
}

/// Text of a subtree without `pre`/`code` blocks (those are scanned separately).
fn prose_text(node: &NodeRef) -> String {
    fn walk(node: &NodeRef, out: &mut String) {
        for child in node.children() {
            if child.is_text() {
                out.push_str(&child.text());
            } else if child.is_element() {
                let skip = ["pre", "code", "script", "style"]
                    .iter()
                    .any(|tag| is_tag(&child, tag));
                if !skip {
                    walk(&child, out);
                }
            }
        }
    }

    let mut out = String::new();
    walk(node, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;

    fn names(tables: &[DetectedTable]) -> Vec<&str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_ui_tables_are_skipped() {
        let doc = dom::parse(
            r#"<table class="nav-grid"><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>
               <table><tr><td>only</td><td>row</td></tr></table>
               <table><tr><td><a href="/x">link</a></td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>
               <div class="toolbar"><table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table></div>
               <table><tr><th>Name</th><th>Age</th></tr><tr><td>Alice</td><td>30</td></tr></table>"#,
        );
        let tables = find_page_tables(&doc, None);
        assert_eq!(names(&tables), vec!["table_5"]);
        assert_eq!(tables[0].data.rows()[1], vec!["Alice", "30"]);
    }

    #[test]
    fn test_code_blocks_in_assistant_containers() {
        let doc = dom::parse(
            "<div data-message-author-role=\"user\"><pre>a,b\nc,d</pre></div>\
             <div data-message-author-role=\"assistant\"><p>Here:</p>\
             <pre><code>Name,Age\nAlice,30\nBob,25</code></pre></div>",
        );
        let tables = find_page_tables(&doc, Some(Site::ChatGpt.profile()));
        assert_eq!(names(&tables), vec!["ai_table_1_1"]);
        assert_eq!(tables[0].data.len(), 3);
    }

    #[test]
    fn test_markdown_in_prose() {
        let doc = dom::parse(
            "<div class=\"font-claude-message\"><p>| A | B |\n|---|---|\n| 1 | 2 |</p></div>",
        );
        let tables = find_page_tables(&doc, Some(Site::Claude.profile()));
        assert_eq!(names(&tables), vec!["md_table_1_1"]);
    }

    #[test]
    fn test_nested_containers_reported_once() {
        let doc = dom::parse(
            "<div class=\"response\"><div class=\"markdown\"><pre>x\ty\n1\t2</pre></div></div>",
        );
        let tables = find_page_tables(&doc, None);
        assert_eq!(names(&tables), vec!["ai_table_1_1"]);
    }

    #[test]
    fn test_is_ui_table_rules() {
        let doc = dom::parse(
            r#"<table id="t"><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>"#,
        );
        assert!(!is_ui_table(&doc.select("#t")));
    }
}
