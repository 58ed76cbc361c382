//! Selector Cascade
//!
//! Finds the elements most likely to be conversation messages. Each site
//! profile lists candidate selectors in priority order; every selector is
//! evaluated, filtered and scored, and the best-populated set wins.
//!
//! When no selector yields anything, [`last_resort_candidates`] scans every
//! `div` with a substantial amount of text.

use dom_query::{NodeId, NodeRef, Selection};
use tracing::debug;

use crate::dom::{self, Document};
use crate::noise::NoiseFilter;
use crate::normalize;
use crate::options::Options;
use crate::patterns::EXCLUDED_CONTAINER_SELECTOR;

pub mod utils;

/// A rule that tests whether a selection matches some criteria.
pub type Rule = fn(&Selection) -> bool;

/// One candidate message element with its normalized text.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The matched element.
    pub node: NodeRef<'a>,
    /// Visible text, as produced by [`normalize::element_text`].
    pub text: String,
}

impl<'a> Candidate<'a> {
    /// The element as a single-node selection.
    #[must_use]
    pub fn selection(&self) -> Selection<'a> {
        Selection::from(self.node)
    }
}

/// The filtered matches of the winning selector.
#[derive(Debug, Clone)]
pub struct CandidateSet<'a> {
    /// Selector that produced the set.
    pub selector: String,
    /// Candidates in document order.
    pub candidates: Vec<Candidate<'a>>,
    /// Candidates whose class/attributes carry a message-like token.
    pub message_like: usize,
    /// `candidates.len() + weight * message_like`.
    pub score: usize,
}

/// Evaluate `selectors` in priority order and return the best-scoring set.
///
/// For each selector: matches inside excluded containers, noise, and texts
/// outside the `(min_text_len, max_text_len)` band are dropped; of the
/// survivors only the outermost are kept when they nest. Score is the count
/// plus `message_like_weight` per message-like candidate; ties keep the
/// earlier selector. Invalid selectors are skipped.
///
/// Returns `None` when no selector produced a candidate.
#[must_use]
pub fn select_candidates<'a>(
    doc: &'a Document,
    selectors: &[&str],
    message_tokens: &[&str],
    noise: &NoiseFilter,
    options: &Options,
) -> Option<CandidateSet<'a>> {
    let mut best: Option<CandidateSet<'a>> = None;

    for &selector in selectors {
        let Some(matches) = dom::select_all(doc, selector) else {
            debug!(selector, "skipping invalid selector");
            continue;
        };

        let kept: Vec<Candidate<'a>> = matches
            .nodes()
            .iter()
            .filter_map(|node| {
                let sel = Selection::from(*node);
                if utils::is_inside(&sel, EXCLUDED_CONTAINER_SELECTOR) {
                    return None;
                }
                let text = normalize::element_text(&sel);
                let len = text.chars().count();
                if len <= options.min_text_len || len >= options.max_text_len || noise.is_noise(&text) {
                    return None;
                }
                Some(Candidate { node: *node, text })
            })
            .collect();
        let candidates = outermost(kept);
        if candidates.is_empty() {
            continue;
        }

        let message_like = candidates
            .iter()
            .filter(|c| utils::is_message_like(&c.selection(), message_tokens))
            .count();
        let score = candidates.len() + options.message_like_weight * message_like;
        debug!(selector, count = candidates.len(), message_like, score, "scored selector");

        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(CandidateSet {
                selector: selector.to_string(),
                candidates,
                message_like,
                score,
            });
        }
    }

    best
}

/// Innermost `div`s whose text length lies in
/// `[fallback_min_len, fallback_max_len]`, in document order.
#[must_use]
pub fn last_resort_candidates<'a>(doc: &'a Document, options: &Options) -> Vec<Candidate<'a>> {
    let qualifying: Vec<Candidate<'a>> = doc
        .select("div")
        .nodes()
        .iter()
        .filter_map(|node| {
            let sel = Selection::from(*node);
            if utils::is_inside(&sel, EXCLUDED_CONTAINER_SELECTOR) {
                return None;
            }
            let text = normalize::element_text(&sel);
            let len = text.chars().count();
            (options.fallback_min_len..=options.fallback_max_len)
                .contains(&len)
                .then_some(Candidate { node: *node, text })
        })
        .collect();

    innermost(qualifying)
}

/// Drop candidates that have another candidate as an ancestor.
fn outermost(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let ids: Vec<NodeId> = candidates.iter().map(|c| c.node.id).collect();
    candidates
        .into_iter()
        .filter(|c| {
            !c.node
                .ancestors(None)
                .iter()
                .any(|anc| ids.contains(&anc.id))
        })
        .collect()
}

/// Drop candidates that have another candidate as a descendant.
fn innermost(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let mut containers: Vec<NodeId> = Vec::new();
    for candidate in &candidates {
        for anc in candidate.node.ancestors(None) {
            containers.push(anc.id);
        }
    }
    candidates
        .into_iter()
        .filter(|c| !containers.contains(&c.node.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: &[&str] = &["message"];

    fn cascade<'a>(doc: &'a Document, selectors: &[&str]) -> Option<CandidateSet<'a>> {
        select_candidates(doc, selectors, TOKENS, &NoiseFilter::default(), &Options::default())
    }

    fn texts(set: &CandidateSet) -> Vec<String> {
        set.candidates.iter().map(|c| c.text.clone()).collect()
    }

    #[test]
    fn test_message_like_bonus_beats_raw_count() {
        let doc = dom::parse(
            r#"<main>
                <p>Paragraph number one</p><p>Paragraph number two</p><p>Paragraph number three</p>
                <div class="message">First message text</div>
                <div class="message">Second message text</div>
            </main>"#,
        );
        let set = cascade(&doc, &["p", "div.message"]).expect("candidates");
        assert_eq!(set.selector, "div.message");
        assert_eq!(set.score, 2 + 10 * 2);
    }

    #[test]
    fn test_tie_keeps_earlier_selector() {
        let doc = dom::parse(r#"<section>Some section text</section><article>Some article text</article>"#);
        let set = cascade(&doc, &["section", "article"]).expect("candidates");
        assert_eq!(set.selector, "section");
    }

    #[test]
    fn test_length_band_is_exclusive() {
        let doc = dom::parse(r#"<div class="m">ab cd</div><div class="m">ab cde</div>"#);
        let set = cascade(&doc, &["div.m"]).expect("candidates");
        assert_eq!(texts(&set), vec!["ab cde"]);
    }

    #[test]
    fn test_excluded_containers_and_noise_are_dropped() {
        let doc = dom::parse(
            r#"<nav><div class="message">Sidebar conversation title</div></nav>
               <aside><div class="message">Another sidebar entry</div></aside>
               <div class="sidebar-panel"><div class="message">Third sidebar entry</div></div>
               <main><div class="message">New chat</div>
                     <div class="message">How do I optimize performance?</div></main>"#,
        );
        let set = cascade(&doc, &["div.message"]).expect("candidates");
        assert_eq!(texts(&set), vec!["How do I optimize performance?"]);
    }

    #[test]
    fn test_nested_matches_keep_outermost() {
        let doc = dom::parse(
            r#"<div class="turn">Question text here<div class="turn">nested copy</div></div>
               <div class="turn">Answer text here</div>"#,
        );
        let set = cascade(&doc, &["div.turn"]).expect("candidates");
        assert_eq!(set.candidates.len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let doc = dom::parse(r#"<div class="message">Hello there friend</div>"#);
        let set = cascade(&doc, &["div[[", "div.message"]).expect("candidates");
        assert_eq!(set.selector, "div.message");
    }

    #[test]
    fn test_no_matches_returns_none() {
        let doc = dom::parse("<p>tiny</p>");
        assert!(cascade(&doc, &["div.message", "p"]).is_none());
    }

    #[test]
    fn test_last_resort_keeps_innermost_divs() {
        let long_a = "a".repeat(60);
        let long_b = "b".repeat(60);
        let html = format!(
            r#"<div id="outer"><div id="a">{long_a}</div><div id="b">{long_b}</div></div><div>short</div>"#
        );
        let doc = dom::parse(&html);
        let found = last_resort_candidates(&doc, &Options::default());
        let found: Vec<&str> = found.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(found, vec![long_a.as_str(), long_b.as_str()]);
    }
}
