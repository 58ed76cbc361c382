use std::time::{Duration, Instant};

use rs_chat_navigator::{extract, extract_with_options, find_tables, Error, NoiseFilter, Options};

#[test]
fn extract_does_not_panic_on_malformed_html() {
    let inputs = [
        "<p>text<div>more",
        "<p><div></p></div>",
        "<html><body><main><div data-message-author-role=\"user\">unclosed",
        "<div class=\"test id=broken>",
        "<<<>>>",
        "",
    ];
    for html in inputs {
        let result = extract(html, "https://chatgpt.com/c/1");
        for pair in &result.pairs {
            assert!(!pair.question.is_empty() && !pair.answer.is_empty());
        }
        let _ = find_tables(html, Some("https://chatgpt.com/c/1"));
    }
}

#[test]
fn invalid_urls_fall_back_to_generic_tiers() {
    let html = r#"<div class="message user">How do I parse JSON?</div>
                  <div class="message assistant">Use serde_json::from_str.</div>"#;
    for url in ["", "not a url", "chatgpt.com", "https://"] {
        let result = extract(html, url);
        assert_eq!(result.site, None, "{url}");
        assert_eq!(result.pairs.len(), 1, "{url}");
    }
}

#[test]
fn invisible_fragments_are_counted_not_paired() {
    let html = "<html><body><main>\
        <div data-message-author-role=\"user\">How do I optimize performance?</div>\
        <div data-message-author-role=\"assistant\">\u{200B}\u{FEFF}\u{200B}\u{FEFF}\u{200B}\u{FEFF}</div>\
        <div data-message-author-role=\"assistant\">Use memoization.</div>\
        </main></body></html>";
    let result = extract(html, "https://chatgpt.com/c/1");

    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].answer, "Use memoization.");
    assert!(result.skipped_fragments >= 1);
}

#[test]
fn invalid_noise_rule_is_an_error() {
    let err = NoiseFilter::from_patterns(&["(unclosed"]).unwrap_err();
    assert!(matches!(err, Error::InvalidPattern(_)));
}

#[test]
fn custom_noise_rules_filter_fragments() {
    let html = r#"<main>
        <div data-message-author-role="user">How do I optimize performance?</div>
        <div data-message-author-role="assistant">INTERNAL banner text that should vanish</div>
        <div data-message-author-role="assistant">Use memoization.</div>
    </main>"#;
    let noise = NoiseFilter::default()
        .with_patterns(&["^INTERNAL"])
        .expect("valid pattern");
    let options = Options {
        url: Some("https://chatgpt.com/c/1".to_string()),
        noise_filter: noise,
        ..Options::default()
    };

    let result = extract_with_options(html, &options);
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].answer, "Use memoization.");
}

#[test]
fn deeply_nested_markup_is_handled() {
    let depth = 300;
    let mut html = String::new();
    for _ in 0..depth {
        html.push_str("<div>");
    }
    html.push_str("How deep does this go before anything breaks down here?");
    for _ in 0..depth {
        html.push_str("</div>");
    }
    let result = extract(&html, "");
    assert!(result.pairs.is_empty());
}

#[test]
fn large_conversation_completes_quickly() {
    let mut html = String::from("<html><body><main>");
    for i in 0..500 {
        html.push_str(&format!(
            "<div data-message-author-role=\"user\">Question number {i}: how does it work?</div>\
             <div data-message-author-role=\"assistant\">Answer number {i}: it works well.</div>"
        ));
    }
    html.push_str("</main></body></html>");

    let start = Instant::now();
    let result = extract(&html, "https://chatgpt.com/c/1");
    assert_eq!(result.pairs.len(), 500);
    assert!(start.elapsed() < Duration::from_secs(30));
}
