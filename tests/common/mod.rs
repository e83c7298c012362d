//! Shared fixtures for integration tests.
//!
//! Every generated paragraph holds exactly 60 words: five topic sentences,
//! one per catalogue page, followed by two filler sentences with no
//! descriptive vocabulary. Any page can therefore find an anchor in any
//! paragraph, and no anchor can span two sentences.

#![allow(dead_code)]

use rs_interlink::document::LinkDocument;
use rs_interlink::dom::{link_count, link_targets, text_content};
use rs_interlink::markup::{link_ancestry, tokenize, TokenKind};
use rs_interlink::selector::SkipList;
use rs_interlink::url_utils::normalize_slug;
use rs_interlink::{LinkResult, Options, TargetPage};

pub const TOPIC_SENTENCES: &str = "Owners praise proven puppy training techniques. \
Groomers recommend essential dog grooming basics. \
Vets suggest complete canine nutrition strategies. \
Families value gentle senior care routines. \
Trainers share effective leash walking tips.";

pub const FILLER_SENTENCES: &str = "Morning light filled the quiet street while neighbours chatted near the old corner bakery today. \
Later the rain arrived and everyone hurried home before the evening news began on radio.";

pub const PARAGRAPH_WORDS: usize = 60;

/// The five catalogue pages matching the topic sentences.
pub fn pages() -> Vec<TargetPage> {
    vec![
        TargetPage::new("Puppy Training Guide", "puppy-training-guide"),
        TargetPage::new("Dog Grooming Basics", "dog-grooming-basics"),
        TargetPage::new("Healthy Dog Nutrition", "healthy-dog-nutrition"),
        TargetPage::new("Senior Dog Care", "senior-dog-care"),
        TargetPage::new("Leash Walking Tips", "leash-walking-tips"),
    ]
}

pub fn paragraph_text() -> String {
    format!("{TOPIC_SENTENCES} {FILLER_SENTENCES}")
}

/// Filler-only text of `words` words, without any anchor material.
pub fn filler_text(words: usize) -> String {
    FILLER_SENTENCES
        .split_whitespace()
        .cycle()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `n` linkable paragraphs wrapped in an article.
pub fn article(n: usize) -> String {
    let body: String = (0..n)
        .map(|_| format!("\n  <p>{}</p>", paragraph_text()))
        .collect();
    format!("<article>\n  <h1>Caring for Dogs</h1>{body}\n</article>\n")
}

/// Stripping every injected `<a href="...">` wrapper gives back the input.
pub fn unwrap_placements(result: &LinkResult, options: &Options) -> String {
    let mut html = result.html.clone();
    for p in &result.placements {
        let mut open = format!("<a href=\"{}\"", p.target_url);
        for (name, value) in &options.link_attributes {
            open.push_str(&format!(" {name}=\"{value}\""));
        }
        open.push('>');
        let wrapped = format!("{open}{}</a>", p.anchor_text);
        assert!(html.contains(&wrapped), "missing wrapper {wrapped}");
        html = html.replacen(&wrapped, &p.anchor_text, 1);
    }
    html
}

/// Assert every invariant that must hold for any run.
pub fn assert_invariants(input: &str, result: &LinkResult, options: &Options) {
    let skip = SkipList::new(&options.skip_selectors);
    let original = LinkDocument::parse(input, &skip);

    // Anchors are verbatim source text.
    for p in &result.placements {
        let block = &original.blocks()[p.element_index];
        assert!(
            block.inner_markup.contains(&p.anchor_text),
            "anchor '{}' not in block {}",
            p.anchor_text,
            p.element_index
        );
    }

    // Registry membership.
    if let Some(valid) = &options.valid_slugs {
        for p in &result.placements {
            assert!(
                valid.iter().any(|v| normalize_slug(v) == normalize_slug(&p.target_slug)),
                "slug {} not in registry",
                p.target_slug
            );
        }
    }

    // Each target at most once.
    let mut slugs: Vec<&str> = result.placements.iter().map(|p| p.target_slug.as_str()).collect();
    slugs.sort_unstable();
    let before = slugs.len();
    slugs.dedup();
    assert_eq!(before, slugs.len(), "duplicate target slug");

    // No link nested inside another.
    let tokens = tokenize(&result.html);
    let ancestry = link_ancestry(&tokens);
    for (token, inside) in tokens.iter().zip(&ancestry) {
        if token.kind == TokenKind::StartTag && token.name == "a" {
            assert!(!inside, "nested link at {:?}", token.range);
        }
    }

    // Zone ceilings.
    assert!(result.zone_report.is_valid, "{:?}", result.zone_report.violations);
    for (name, count) in &result.zone_report.per_zone {
        assert!(count.count <= count.max, "{name} over ceiling");
    }

    // Spacing between consecutive placements.
    for pair in result.placements.windows(2) {
        assert!(
            pair[1].word_position >= pair[0].word_position + options.min_words_between_links,
            "spacing violated: {} then {}",
            pair[0].word_position,
            pair[1].word_position
        );
    }

    // Anchor length bounds, counted on decoded text.
    for p in &result.placements {
        let words = text_content(&p.anchor_text).split_whitespace().count();
        assert!(words >= options.min_anchor_words && words <= options.max_anchor_words);
        assert_eq!(words, p.word_count);
    }

    // Global budget.
    assert!(result.placements.len() <= options.total_target_links);

    // Pure wrapping.
    assert_eq!(unwrap_placements(result, options), input);
    if result.placements.is_empty() {
        assert_eq!(result.html, input);
    }
}

/// DOM view of a well-formed run: one new link per placement, each to its
/// target.
pub fn assert_dom_links(input: &str, result: &LinkResult) {
    assert_eq!(link_count(&result.html), link_count(input) + result.placements.len());
    let hrefs = link_targets(&result.html);
    for p in &result.placements {
        assert!(hrefs.contains(&p.target_url), "no link to {}", p.target_url);
    }
}
