//! Criterion benchmarks for the settings pipeline.
//!
//! Measures the cost of merging an on-disk document into a realistically
//! sized template and of re-rendering template comments on save.
//!
//! Run with:
//! ```bash
//! cargo bench --package viaconf-core --bench pipeline_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use viaconf_core::{decode, encode, merge, CommentStore, SettingsDocument, UnsupportedOptions};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Builds a template with `n` commented boolean options and one section.
fn make_template_text(n: usize) -> String {
    let mut text = String::from("# Bench settings\n\n{\n");
    for i in 0..n {
        text.push_str(&format!(" # Option {i}\n \"option-{i}\":true,\n"));
    }
    text.push_str(" \"section\":{\n  \"inner\":1\n },\n \"servers\":{}\n}\n");
    text
}

fn make_on_disk(n: usize) -> SettingsDocument {
    let mut doc = SettingsDocument::new();
    for i in (0..n).step_by(2) {
        doc.insert(format!("option-{i}"), json!(false));
    }
    doc.insert("obsolete".into(), json!(1));
    doc.insert("servers".into(), json!({"lobby": "1.16.4"}));
    doc
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_merge(c: &mut Criterion) {
    let template = decode(&make_template_text(100)).unwrap();
    let on_disk = make_on_disk(100);
    let unsupported: UnsupportedOptions = ["option-1", "option-3"].into_iter().collect();

    c.bench_function("merge_100_options", |b| {
        b.iter(|| merge(black_box(&template), black_box(&unsupported), black_box(&on_disk)))
    });
}

fn bench_render(c: &mut Criterion) {
    let text = make_template_text(100);
    let comments = CommentStore::parse(&text, '.', 1);
    let doc = decode(&text).unwrap();
    let json = encode(&doc).unwrap();
    let unsupported = UnsupportedOptions::new();

    c.bench_function("render_100_options", |b| {
        b.iter(|| comments.render(black_box(&json), black_box(&unsupported)))
    });
}

fn bench_parse_comments(c: &mut Criterion) {
    let text = make_template_text(100);
    c.bench_function("parse_comments_100_options", |b| {
        b.iter(|| CommentStore::parse(black_box(&text), '.', 1))
    });
}

criterion_group!(benches, bench_merge, bench_render, bench_parse_comments);
criterion_main!(benches);
