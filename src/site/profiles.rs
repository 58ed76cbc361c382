//! Static site profile table.
//!
//! Selector lists are ordered most specific first. Comma-separated entries
//! select user and assistant turns together in document order, which is what
//! the pairing engine needs.

use crate::patterns::{
    CHATGPT_NOISE_PATTERNS, CLAUDE_QUESTION_START, GEMINI_QUESTION_START, UNIVERSAL_QUESTION_START,
};
use crate::role::{RoleRules, TextFallback};

use super::{PairedLists, Site, SiteProfile};

/// Generic assistant containers, shared by sites without specific markup.
const GENERIC_ASSISTANT_CONTAINERS: &[&str] = &[
    ".assistant-message",
    ".ai-response",
    ".bot-message",
    ".response",
    ".markdown",
    ".prose",
];

/// All known sites, in lookup order.
pub static PROFILES: [&SiteProfile; 5] = [&CHATGPT, &CLAUDE, &GEMINI, &YOU_COM, &BING];

pub(super) static CHATGPT: SiteProfile = SiteProfile {
    site: Site::ChatGpt,
    hostnames: &["chatgpt.com", "chat.openai.com"],
    selectors: &[
        "[data-message-author-role]",
        "[data-testid^='conversation-turn']",
        "main .group.w-full.text-token-text-primary",
        "main .group.w-full",
        "main div.group",
        "main [class*='message']",
        "main article",
        "main [role='article']",
    ],
    message_tokens: &["message", "conversation-turn", "user", "assistant"],
    roles: RoleRules {
        user_class_tokens: &["user"],
        user_attr_tokens: &["user"],
        user_parent_tokens: &[],
        user_descendant_selectors: &["[data-message-author-role='user']"],
        user_closest_selectors: &["[data-message-author-role='user']"],
        assistant_class_tokens: &["assistant"],
        assistant_attr_tokens: &["data-message-author-role=assistant"],
        assistant_descendant_selectors: &["[data-message-author-role='assistant']"],
        assistant_closest_selectors: &["[data-message-author-role='assistant']"],
        text_fallback: None,
    },
    noise_patterns: CHATGPT_NOISE_PATTERNS,
    paired_lists: None,
    assistant_containers: &[
        "[data-message-author-role='assistant']",
        ".group.w-full.text-token-text-primary[data-testid]",
        ".markdown.prose",
    ],
};

pub(super) static CLAUDE: SiteProfile = SiteProfile {
    site: Site::Claude,
    hostnames: &["claude.ai"],
    selectors: &[
        "[data-testid='user-message'], .font-claude-message",
        "div[class*='font-user-message'], div[class*='font-claude-message']",
        "div[data-testid='conversation-turn']",
        "div[data-is-streaming]",
        "[data-testid*='message']",
        "[data-testid*='turn']",
        "[data-testid*='conversation']",
        "div[class*='message']",
        "div[role='article']",
        "div[role='region']",
        "div.prose, div[class*='prose']",
        "div[class*='markdown']",
        "div[class*='chat']",
        "div[class*='conversation']",
        "main > div > div",
    ],
    message_tokens: &["message", "user", "human", "Human", "claude", "Claude", "assistant", "turn"],
    roles: RoleRules {
        user_class_tokens: &["font-user-message", "user", "Human", "human"],
        user_attr_tokens: &["user", "User", "Human", "human"],
        user_parent_tokens: &["user", "Human"],
        user_descendant_selectors: &[
            "[class*='user']",
            "[class*='User']",
            "[class*='human']",
            "[class*='Human']",
        ],
        user_closest_selectors: &["[data-testid*='user']", "[class*='user']"],
        assistant_class_tokens: &["font-claude-message", "font-assistant-message"],
        assistant_attr_tokens: &["claude-message", "assistant"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &[".font-claude-message"],
        text_fallback: Some(TextFallback {
            max_len: 300,
            question_mark: true,
            openers: &CLAUDE_QUESTION_START,
        }),
    },
    noise_patterns: &[],
    paired_lists: None,
    assistant_containers: &["[data-is-streaming='false']", ".font-claude-message", ".prose"],
};

pub(super) static GEMINI: SiteProfile = SiteProfile {
    site: Site::Gemini,
    hostnames: &["gemini.google.com", "bard.google.com"],
    selectors: &[
        "user-query, model-response",
        "[data-test-id='user-query'], [data-test-id='bot-response'], [data-test-id='model-response']",
        "div.user-query, div.bot-response, div.model-response",
        "div[data-message-author-role]",
        "div[data-message-id]",
        "div[class*='conversation-turn']",
        "user-input-text, message-content, model-response-text",
        "div[class*='user-input'], div[class*='model-response']",
        "[data-testid*='message']",
        "[data-testid*='conversation']",
        "[data-testid*='turn']",
        "[role='article']",
        "[role='region']",
        "div[class*='message']",
        "div[class*='response']",
        "article > div",
    ],
    message_tokens: &["message", "user", "model", "gemini", "bard", "assistant", "response", "query"],
    roles: RoleRules {
        user_class_tokens: &["user", "User", "human", "Human"],
        user_attr_tokens: &["user", "User", "human", "Human"],
        user_parent_tokens: &["user", "User", "human", "Human"],
        user_descendant_selectors: &[
            "[data-test-id='user-query']",
            "[class*='user']",
            "[class*='human']",
            "user-input-text",
            "user-query",
        ],
        user_closest_selectors: &[
            "[data-testid*='user']",
            "[data-test-id*='user']",
            "[class*='user']",
            "user-query",
        ],
        assistant_class_tokens: &["model-response", "bot-response", "response-container"],
        assistant_attr_tokens: &["bot-response", "model-response", "data-message-author-role=assistant"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &["model-response"],
        text_fallback: Some(TextFallback {
            max_len: 300,
            question_mark: true,
            openers: &GEMINI_QUESTION_START,
        }),
    },
    noise_patterns: &[],
    paired_lists: Some(PairedLists {
        user_selectors: &["[data-test-id='user-query']", ".user-query", "user-query", "[class*='user']"],
        answer_selectors: &[
            "[data-test-id='bot-response']",
            ".bot-response",
            "model-response",
            "[class*='model-response']",
            "[class*='assistant']",
        ],
    }),
    assistant_containers: &[
        "[data-response-type='assistant']",
        ".model-response-text",
        ".response-container",
        "model-response",
    ],
};

pub(super) static YOU_COM: SiteProfile = SiteProfile {
    site: Site::YouCom,
    hostnames: &["you.com"],
    selectors: &[
        ".user-message, .bot-message, .ai-message",
        "[data-testid*='message']",
        ".chat-message",
        "[class*='message']",
    ],
    message_tokens: &["message", "user", "bot", "ai-"],
    roles: RoleRules {
        user_class_tokens: &["user", "human"],
        user_attr_tokens: &["user", "human"],
        user_parent_tokens: &[],
        user_descendant_selectors: &[],
        user_closest_selectors: &[],
        assistant_class_tokens: &["bot-message", "ai-message"],
        assistant_attr_tokens: &["bot", "assistant"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &[],
        text_fallback: None,
    },
    noise_patterns: &[],
    paired_lists: None,
    assistant_containers: GENERIC_ASSISTANT_CONTAINERS,
};

pub(super) static BING: SiteProfile = SiteProfile {
    site: Site::Bing,
    hostnames: &["bing.com"],
    selectors: &[
        "[data-author='user'], [data-author='bot']",
        ".ac-textBlock",
        "[class*='message']",
        "[class*='response']",
    ],
    message_tokens: &["message", "response", "user", "bot"],
    roles: RoleRules {
        user_class_tokens: &["user", "human"],
        user_attr_tokens: &["user"],
        user_parent_tokens: &[],
        user_descendant_selectors: &[],
        user_closest_selectors: &["[data-author='user']"],
        assistant_class_tokens: &["bot"],
        assistant_attr_tokens: &["data-author=bot"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &["[data-author='bot']"],
        text_fallback: None,
    },
    noise_patterns: &[],
    paired_lists: None,
    assistant_containers: GENERIC_ASSISTANT_CONTAINERS,
};

/// Cross-site profile used when no site profile matches or the site tier
/// produced nothing.
pub static UNIVERSAL: SiteProfile = SiteProfile {
    // Never looked up by hostname; `site` is unused for this profile.
    site: Site::ChatGpt,
    hostnames: &[],
    selectors: &[
        "[data-message-author-role]",
        "[data-testid*='message']",
        "[data-testid*='conversation']",
        "[data-testid*='turn']",
        "div[class*='message']",
        "div[class*='conversation']",
        "div[class*='chat']",
        "div[class*='font-user']",
        "div[class*='font-claude']",
        "div[class*='user']",
        "div[class*='human']",
        "div[class*='assistant']",
        "div[class*='claude']",
        "div[class*='model']",
        "div[class*='response']",
        ".prose",
        "[role='article']",
        "main > div",
    ],
    message_tokens: &["message", "user", "assistant", "human", "claude", "model", "response"],
    roles: RoleRules {
        user_class_tokens: &["user", "human", "Human", "font-user"],
        user_attr_tokens: &["data-message-author-role=user", "user", "human", "Human"],
        user_parent_tokens: &[],
        user_descendant_selectors: &["[data-message-author-role='user']"],
        user_closest_selectors: &["[data-testid*='user']"],
        assistant_class_tokens: &["assistant", "font-claude", "model-response", "bot"],
        assistant_attr_tokens: &["data-message-author-role=assistant"],
        assistant_descendant_selectors: &[],
        assistant_closest_selectors: &[],
        text_fallback: Some(TextFallback {
            max_len: 200,
            question_mark: false,
            openers: &UNIVERSAL_QUESTION_START,
        }),
    },
    noise_patterns: &[],
    paired_lists: None,
    assistant_containers: GENERIC_ASSISTANT_CONTAINERS,
};
