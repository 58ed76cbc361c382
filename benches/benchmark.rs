//! Performance benchmarks for rs-chat-navigator.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small ChatGPT-shaped page for the site tier
//! - Synthetic conversations of growing length
//! - The table format cascade on each input format

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_chat_navigator::{extract, extract_with_options, find_tables, table, Options};

const CHATGPT_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head><title>ChatGPT</title></head>
<body>
    <nav>
        <div>New chat</div>
        <div>Today</div>
        <div>Upgrade plan</div>
    </nav>
    <main>
        <div data-message-author-role="user">How do I optimize performance in Rust?</div>
        <div data-message-author-role="assistant">
            <p>Start by profiling. Then look at allocations in the hot path.</p>
            <pre><code>Tool,Purpose
perf,CPU sampling
heaptrack,Allocation tracking</code></pre>
        </div>
        <div data-message-author-role="user">What about async code?</div>
        <div data-message-author-role="assistant">
            <p>Avoid blocking calls inside tasks.</p>
            <p>| Runtime | Threads |
|---|---|
| current_thread | 1 |
| multi_thread | N |</p>
        </div>
    </main>
</body>
</html>
"#;

/// A page with `turns` question/answer pairs and no site markers.
fn synthetic_conversation(turns: usize) -> String {
    let mut html = String::from("<html><body><main>");
    for i in 0..turns {
        html.push_str(&format!(
            "<div class=\"message user-message\">How does step {i} of the migration work?</div>\
             <div class=\"message assistant-message\">Step {i} copies the rows, rebuilds the \
             indexes and then swaps the tables in a single transaction.</div>"
        ));
    }
    html.push_str("</main></body></html>");
    html
}

fn bench_extract_site(c: &mut Criterion) {
    c.bench_function("extract_chatgpt", |b| {
        b.iter(|| extract(black_box(CHATGPT_HTML), black_box("https://chatgpt.com/c/1")));
    });
}

fn bench_extract_universal(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("universal");

    for turns in [10, 50, 200] {
        let html = synthetic_conversation(turns);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract", turns), &html, |b, html| {
            b.iter(|| extract_with_options(black_box(html), black_box(&options)));
        });
    }

    group.finish();
}

fn bench_table_formats(c: &mut Criterion) {
    let inputs = [
        ("html", "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>"),
        ("markdown", "| A | B |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |"),
        ("tsv", "A\tB\n1\t2\n3\t4"),
        ("csv", "A,B\n1,2\n\"3,5\",4"),
        ("space_aligned", "Name    Score\nAlice   90\nBob     85"),
    ];

    let mut group = c.benchmark_group("extract_table");
    for (name, text) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| table::extract_table(black_box(text)));
        });
    }
    group.finish();
}

fn bench_find_tables(c: &mut Criterion) {
    c.bench_function("find_tables_chatgpt", |b| {
        b.iter(|| find_tables(black_box(CHATGPT_HTML), Some("https://chatgpt.com/c/1")));
    });
}

criterion_group!(
    benches,
    bench_extract_site,
    bench_extract_universal,
    bench_table_formats,
    bench_find_tables
);
criterion_main!(benches);
