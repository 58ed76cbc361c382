//! Reads a chat page from stdin and prints the extracted pairs as JSON.
//!
//! Usage: `extract_stdin <page-url> < page.html`
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io::{self, Read};

use rs_chat_navigator::messaging::WirePair;
use rs_chat_navigator::{extract, ExtractionResult, Site, Strategy};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output {
    site: Option<Site>,
    strategy: Strategy,
    selector: Option<String>,
    conversations: Vec<WirePair>,
    skipped_fragments: usize,
    warnings: Vec<String>,
}

impl From<ExtractionResult> for Output {
    fn from(result: ExtractionResult) -> Self {
        Self {
            site: result.site,
            strategy: result.strategy,
            conversations: result.pairs.iter().map(WirePair::from).collect(),
            selector: result.selector,
            skipped_fragments: result.skipped_fragments,
            warnings: result.warnings,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let url = std::env::args().nth(1).unwrap_or_default();

    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let output = Output::from(extract(&html, &url));
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Failed to serialize output: {err}");
            std::process::exit(1);
        }
    }
}
