//! Site profiles.
//!
//! Each supported chat site is described by a static [`SiteProfile`] record:
//! candidate selectors, role rules, scoring tokens and optional extras. The
//! extraction pipeline is written once and parameterized by the profile
//! selected from the page hostname.

mod profiles;

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::role::RoleRules;

pub use profiles::{PROFILES, UNIVERSAL};

/// Supported chat sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// chatgpt.com / chat.openai.com
    ChatGpt,
    /// claude.ai
    Claude,
    /// gemini.google.com / bard.google.com
    Gemini,
    /// you.com
    YouCom,
    /// bing.com (Copilot chat)
    Bing,
}

impl Site {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ChatGpt => "ChatGPT",
            Self::Claude => "Claude",
            Self::Gemini => "Gemini",
            Self::YouCom => "You.com",
            Self::Bing => "Bing",
        }
    }

    /// The profile describing this site.
    #[must_use]
    pub fn profile(self) -> &'static SiteProfile {
        match self {
            Self::ChatGpt => &profiles::CHATGPT,
            Self::Claude => &profiles::CLAUDE,
            Self::Gemini => &profiles::GEMINI,
            Self::YouCom => &profiles::YOU_COM,
            Self::Bing => &profiles::BING,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Separately selected question and answer lists, zipped by index.
///
/// For each list the first selector with any match is used.
#[derive(Debug)]
pub struct PairedLists {
    /// Question selectors, in priority order.
    pub user_selectors: &'static [&'static str],
    /// Answer selectors, in priority order.
    pub answer_selectors: &'static [&'static str],
}

/// Everything the pipeline needs to know about one site.
#[derive(Debug)]
pub struct SiteProfile {
    /// Which site this is.
    pub site: Site,

    /// Hostnames served by the site; subdomains match too.
    pub hostnames: &'static [&'static str],

    /// Candidate message selectors, highest priority first.
    pub selectors: &'static [&'static str],

    /// Class/attribute tokens that earn a candidate the scoring bonus.
    pub message_tokens: &'static [&'static str],

    /// Role classification rules.
    pub roles: RoleRules,

    /// Extra noise rules appended to the configured filter.
    pub noise_patterns: &'static [&'static str],

    /// Fallback tier used when the selector cascade yields no pairs.
    pub paired_lists: Option<PairedLists>,

    /// Containers holding assistant output (table detection).
    pub assistant_containers: &'static [&'static str],
}

impl SiteProfile {
    /// Whether `host` is one of this profile's hostnames or a subdomain of one.
    #[must_use]
    pub fn serves(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.hostnames.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Profile for a bare hostname. First matching profile wins.
///
/// # Example
///
/// ```rust
/// use rs_chat_navigator::site::{self, Site};
///
/// assert_eq!(site::profile_for_host("claude.ai").map(|p| p.site), Some(Site::Claude));
/// assert_eq!(site::profile_for_host("www.bing.com").map(|p| p.site), Some(Site::Bing));
/// assert!(site::profile_for_host("notclaude.ai").is_none());
/// ```
#[must_use]
pub fn profile_for_host(host: &str) -> Option<&'static SiteProfile> {
    PROFILES.iter().copied().find(|profile| profile.serves(host))
}

/// Profile for a page URL; `None` for unparsable URLs or unknown hosts.
#[must_use]
pub fn profile_for_url(page_url: &str) -> Option<&'static SiteProfile> {
    let parsed = Url::parse(page_url).ok()?;
    profile_for_host(parsed.host_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_lookup() {
        let cases = [
            ("https://chatgpt.com/c/123", Some(Site::ChatGpt)),
            ("https://chat.openai.com/", Some(Site::ChatGpt)),
            ("https://claude.ai/chat/abc", Some(Site::Claude)),
            ("https://gemini.google.com/app", Some(Site::Gemini)),
            ("https://bard.google.com/", Some(Site::Gemini)),
            ("https://you.com/search?q=x", Some(Site::YouCom)),
            ("https://www.bing.com/chat", Some(Site::Bing)),
            ("https://example.com/", None),
            ("https://google.com/", None),
            ("not a url", None),
        ];

        for (url, expected) in cases {
            assert_eq!(profile_for_url(url).map(|p| p.site), expected, "{url}");
        }
    }

    #[test]
    fn test_suffix_match_requires_label_boundary() {
        assert!(profile_for_host("evilclaude.ai").is_none());
        assert!(profile_for_host("CLAUDE.AI").is_some());
    }

    #[test]
    fn test_every_site_has_a_profile() {
        for site in [Site::ChatGpt, Site::Claude, Site::Gemini, Site::YouCom, Site::Bing] {
            assert_eq!(site.profile().site, site);
            assert!(!site.profile().selectors.is_empty());
        }
    }

    #[test]
    fn test_only_gemini_uses_paired_lists() {
        for profile in PROFILES {
            assert_eq!(profile.paired_lists.is_some(), profile.site == Site::Gemini);
        }
    }
}
