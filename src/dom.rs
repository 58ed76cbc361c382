//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate giving the rest of the crate a
//! small, read-only vocabulary: attribute access, `closest`-style ancestor
//! matching and element-index paths used by [`crate::SourceRef`].
//!
//! Nothing in here mutates the host document.

// Re-export core types for external use
pub use dom_query::{Document, Matcher, NodeRef, Selection};

// === Attribute Operations ===

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get all attributes as key-value pairs
///
/// Returns empty vector if node has no attributes or if selection is empty.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// All attributes rendered as `name=value` pairs joined by spaces.
///
/// Role and scoring heuristics run substring checks against this string, so
/// `data-message-author-role=user` can be matched as a single token.
#[must_use]
pub fn attribute_string(sel: &Selection) -> String {
    get_all_attributes(sel)
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// === Node Information ===

/// Get parent element
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Direct element children of a node, skipping text and comment nodes.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(dom_query::NodeRef::is_element)
        .collect()
}

// === Matching ===

/// Check whether the first node of the selection matches a CSS selector.
///
/// Invalid selectors never match.
#[must_use]
pub fn matches(sel: &Selection, selector: &str) -> bool {
    sel.exists() && sel.is(selector)
}

/// Closest ancestor-or-self matching a CSS selector (DOM `Element.closest`).
#[must_use]
pub fn closest<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    let node = *sel.nodes().first()?;
    if matches(sel, selector) {
        return Some(sel.clone());
    }
    node.ancestors(None)
        .into_iter()
        .filter(dom_query::NodeRef::is_element)
        .map(Selection::from)
        .find(|anc| matches(anc, selector))
}

/// Whether any descendant matches a CSS selector (`querySelector` != null).
#[inline]
#[must_use]
pub fn has_descendant(sel: &Selection, selector: &str) -> bool {
    sel.select(selector).exists()
}

/// All elements in `doc` matching `selector`, or `None` when the selector
/// does not parse.
#[must_use]
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Option<Selection<'a>> {
    let matcher = Matcher::new(selector).ok()?;
    Some(doc.select_matcher(&matcher))
}

// === Paths ===

/// Element-child index path from the document root down to `node`.
#[must_use]
pub fn node_path(node: &NodeRef) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = *node;

    while let Some(parent) = current.parent() {
        let index = element_children(&parent)
            .iter()
            .position(|child| child.id == current.id)
            .unwrap_or(0);
        path.push(index);
        current = parent;
    }

    path.reverse();
    path
}

/// Follow an element-child index path from the document root.
#[must_use]
pub fn resolve_path<'a>(doc: &'a Document, path: &[usize]) -> Option<Selection<'a>> {
    let mut current = doc.root();
    for &index in path {
        current = *element_children(&current).get(index)?;
    }
    current.is_element().then(|| Selection::from(current))
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
