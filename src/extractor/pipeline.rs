//! Conversation extraction pipeline.
//!
//! Runs the fallback chain over one parsed snapshot:
//!
//! 1. site profile selectors (when the URL matches a profile),
//! 2. paired user/answer lists (profiles that define them),
//! 3. the universal selector list,
//! 4. the last-resort `div` scan.
//!
//! The first tier that yields at least one pair wins.

use chrono::{DateTime, Utc};
use dom_query::Selection;
use tracing::{debug, warn};

use crate::dom::{self, Document};
use crate::noise::NoiseFilter;
use crate::normalize::{self, sanitize_text};
use crate::result::{ConversationPair, ExtractionResult, SourceRef, Strategy};
use crate::role::{Role, RoleRules};
use crate::selector::{self, Candidate};
use crate::site::{self, PairedLists, SiteProfile, UNIVERSAL};
use crate::Options;

use super::pairing::{Fragment, PairingEngine};

/// Per-pass bookkeeping shared by the tiers.
struct Pass<'o> {
    options: &'o Options,
    noise: NoiseFilter,
    timestamp: DateTime<Utc>,
    skipped: usize,
    warnings: Vec<String>,
}

impl Pass<'_> {
    fn engine(&self) -> PairingEngine {
        PairingEngine::new(self.options.dedup_prefix_len, self.timestamp)
    }

    /// Sanitize and noise-check a fragment text; `None` means skip it.
    fn admit(&mut self, raw: &str) -> Option<String> {
        let Some(text) = sanitize_text(raw) else {
            self.skipped += 1;
            return None;
        };
        (!self.noise.is_noise(&text)).then_some(text)
    }

    /// Classify and pair candidates in document order.
    fn pair_candidates(&mut self, candidates: &[Candidate<'_>], roles: &RoleRules) -> Vec<ConversationPair> {
        let mut engine = self.engine();
        for candidate in candidates {
            let Some(text) = self.admit(&candidate.text) else {
                continue;
            };
            let sel = candidate.selection();
            let role = roles.classify_with_limit(
                &sel,
                &text,
                engine.awaiting_answer(),
                self.options.user_text_max_len,
            );
            let source = SourceRef::from_node(&candidate.node, &text);
            engine.push(Fragment { text, source }, role);
        }
        engine.finish()
    }

    /// Zip separately selected question and answer lists by index.
    fn pair_lists(&mut self, doc: &Document, lists: &PairedLists) -> Option<(String, Vec<ConversationPair>)> {
        let (user_selector, users) = first_populated(doc, lists.user_selectors)?;
        let (answer_selector, answers) = first_populated(doc, lists.answer_selectors)?;

        let mut engine = self.engine();
        for (user, answer) in users.nodes().iter().zip(answers.nodes()) {
            let user_sel = Selection::from(*user);
            let answer_sel = Selection::from(*answer);
            let (Some(question), Some(reply)) = (
                self.admit(&normalize::element_text(&user_sel)),
                self.admit(&normalize::element_text(&answer_sel)),
            ) else {
                continue;
            };
            let question_ref = SourceRef::from_node(user, &question);
            let answer_ref = SourceRef::from_node(answer, &reply);
            engine.push(Fragment { text: question, source: question_ref }, Role::User);
            engine.push(Fragment { text: reply, source: answer_ref }, Role::Assistant);
        }

        Some((format!("{user_selector} | {answer_selector}"), engine.finish()))
    }

    fn cascade(
        &mut self,
        doc: &Document,
        profile: &SiteProfile,
    ) -> Option<(String, Vec<ConversationPair>)> {
        let set = selector::select_candidates(
            doc,
            profile.selectors,
            profile.message_tokens,
            &self.noise,
            self.options,
        )?;
        let pairs = self.pair_candidates(&set.candidates, &profile.roles);
        Some((set.selector, pairs))
    }
}

/// First selector in `selectors` with at least one match.
fn first_populated<'a>(doc: &'a Document, selectors: &[&'a str]) -> Option<(&'a str, Selection<'a>)> {
    selectors.iter().find_map(|&selector| {
        dom::select_all(doc, selector)
            .filter(Selection::exists)
            .map(|sel| (selector, sel))
    })
}

/// Extract conversation pairs from a parsed snapshot.
///
/// Never fails: tiers that find nothing fall through to the next one, and a
/// page with no conversation yields an empty result with
/// [`Strategy::None`].
#[must_use]
pub fn extract_conversations(doc: &Document, options: &Options) -> ExtractionResult {
    let profile = options.url.as_deref().and_then(site::profile_for_url);

    let mut warnings = Vec::new();
    let noise = match profile {
        Some(p) if !p.noise_patterns.is_empty() => options
            .noise_filter
            .clone()
            .with_patterns(p.noise_patterns)
            .unwrap_or_else(|err| {
                warnings.push(format!("ignoring {} noise rules: {err}", p.site));
                options.noise_filter.clone()
            }),
        _ => options.noise_filter.clone(),
    };

    let mut pass = Pass {
        options,
        noise,
        timestamp: Utc::now(),
        skipped: 0,
        warnings,
    };

    let outcome = run_tiers(doc, profile, &mut pass);
    if pass.skipped > 0 {
        warn!(skipped = pass.skipped, "skipped malformed fragments");
    }

    let (strategy, selector, pairs) = outcome.unwrap_or((Strategy::None, None, Vec::new()));
    debug!(
        site = ?profile.map(|p| p.site),
        ?strategy,
        pairs = pairs.len(),
        "extraction pass finished"
    );

    ExtractionResult {
        pairs,
        site: profile.map(|p| p.site),
        strategy,
        selector,
        skipped_fragments: pass.skipped,
        warnings: pass.warnings,
    }
}

type TierOutcome = (Strategy, Option<String>, Vec<ConversationPair>);

fn run_tiers(doc: &Document, profile: Option<&SiteProfile>, pass: &mut Pass<'_>) -> Option<TierOutcome> {
    if let Some(profile) = profile {
        if let Some((selector, pairs)) = pass.cascade(doc, profile) {
            if !pairs.is_empty() {
                return Some((Strategy::Site, Some(selector), pairs));
            }
        }

        if let Some(lists) = &profile.paired_lists {
            if let Some((selector, pairs)) = pass.pair_lists(doc, lists) {
                if !pairs.is_empty() {
                    return Some((Strategy::PairedLists, Some(selector), pairs));
                }
            }
        }

        pass.warnings
            .push(format!("{} selectors found no conversation; using generic fallbacks", profile.site));
    }

    if let Some((selector, pairs)) = pass.cascade(doc, &UNIVERSAL) {
        if !pairs.is_empty() {
            return Some((Strategy::Universal, Some(selector), pairs));
        }
    }

    let candidates = selector::last_resort_candidates(doc, pass.options);
    let pairs = pass.pair_candidates(&candidates, &UNIVERSAL.roles);
    (!pairs.is_empty()).then_some((Strategy::LastResort, None, pairs))
}
