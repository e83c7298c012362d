//! Performance benchmarks for rs-interlink.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small article for microbenchmarks
//! - Synthetic articles of growing size for throughput
//! - The anchor scorer on a single paragraph

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_interlink::{place_links, place_links_with_options, AnchorScorer, Options, TargetPage};
use std::collections::HashSet;

const PARAGRAPH: &str = "Owners praise proven puppy training techniques. \
Groomers recommend essential dog grooming basics. \
Vets suggest complete canine nutrition strategies. \
Families value gentle senior care routines. \
Trainers share effective leash walking tips. \
Morning light filled the quiet street while neighbours chatted near the old corner bakery today. \
Later the rain arrived and everyone hurried home before the evening news began on radio.";

fn pages() -> Vec<TargetPage> {
    vec![
        TargetPage::new("Puppy Training Guide", "puppy-training-guide"),
        TargetPage::new("Dog Grooming Basics", "dog-grooming-basics"),
        TargetPage::new("Healthy Dog Nutrition", "healthy-dog-nutrition"),
        TargetPage::new("Senior Dog Care", "senior-dog-care"),
        TargetPage::new("Leash Walking Tips", "leash-walking-tips"),
    ]
}

fn article(paragraphs: usize) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<body>\n<nav><a href=\"/\">Home</a></nav>\n<article>\n<h1>Caring for Dogs</h1>\n",
    );
    for i in 0..paragraphs {
        if i % 5 == 0 {
            html.push_str("<h2>Everyday Care</h2>\n");
        }
        html.push_str("<p>");
        html.push_str(PARAGRAPH);
        html.push_str("</p>\n");
    }
    html.push_str("</article>\n<footer><p>Copyright 2026</p></footer>\n</body>\n</html>\n");
    html
}

fn bench_place_links_default(c: &mut Criterion) {
    let html = article(10);
    let pages = pages();
    c.bench_function("place_links_default", |b| {
        b.iter(|| place_links(black_box(&html), black_box(&pages)));
    });
}

fn bench_place_links_with_options(c: &mut Criterion) {
    let html = article(10);
    let pages = pages();
    let options = Options {
        base_url: "https://example.com".to_string(),
        min_words_between_links: 0,
        max_links_per_paragraph: 2,
        valid_slugs: Some(pages.iter().map(|p| p.slug.clone()).collect()),
        ..Options::default()
    };

    c.bench_function("place_links_with_options", |b| {
        b.iter(|| place_links_with_options(black_box(&html), black_box(&pages), black_box(&options)));
    });
}

/// Throughput over articles of increasing length.
fn bench_article_sizes(c: &mut Criterion) {
    let pages = pages();
    let mut group = c.benchmark_group("article_size");

    for paragraphs in [10, 50, 200] {
        let html = article(paragraphs);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("place_links", format!("{paragraphs} paragraphs")),
            &html,
            |b, html| {
                b.iter(|| place_links(black_box(html), black_box(&pages)));
            },
        );
    }

    group.finish();
}

fn bench_rank_anchors(c: &mut Criterion) {
    let scorer = AnchorScorer::default();
    let page = TargetPage::new("Senior Dog Care", "senior-dog-care");
    let used = HashSet::new();

    c.bench_function("rank_anchors", |b| {
        b.iter(|| scorer.rank_anchors(black_box(PARAGRAPH), black_box(&page), None, &used));
    });
}

criterion_group!(
    benches,
    bench_place_links_default,
    bench_place_links_with_options,
    bench_article_sizes,
    bench_rank_anchors
);
criterion_main!(benches);
