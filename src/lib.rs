//! # rs-interlink
//!
//! Contextual internal-link placement for generated HTML articles.
//!
//! Given an article and a catalogue of pages on the same site, the engine
//! finds phrases that already exist in the article's paragraphs and wraps
//! them in links to topically matching pages, subject to per-zone quotas,
//! a minimum word spacing between links and anchor quality rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_interlink::{place_links_with_options, Options, TargetPage};
//!
//! let html = "<p>Owners who follow proven puppy training techniques see faster progress.</p>";
//! let pages = [TargetPage::new("Puppy Training", "puppy-training")];
//! let options = Options {
//!     base_url: "https://example.com".to_string(),
//!     min_paragraph_words: 5,
//!     avoid_first_paragraph: false,
//!     avoid_last_paragraph: false,
//!     ..Options::default()
//! };
//!
//! let result = place_links_with_options(html, &pages, &options);
//! assert_eq!(result.placements.len(), 1);
//! assert!(result.html.contains(r#"<a href="https://example.com/puppy-training/">"#));
//! ```
//!
//! ## Guarantees
//!
//! - **No fabricated text**: an anchor is always text that was already in the
//!   paragraph, wrapped as found.
//! - **No unknown targets**: with `valid_slugs` set, only listed slugs are
//!   ever linked; each page is linked at most once.
//! - **No link-in-link**: text already inside an `<a>` is never wrapped.
//! - **Byte-exact output**: everything outside the spliced ranges is
//!   unchanged, and a run that places nothing returns the input as is.

mod error;
mod options;
mod patterns;
mod result;

/// `dom_query` adapter for fragment text and link detection.
pub mod dom;

/// Block extraction and byte-exact reassembly.
pub mod document;

/// Paragraph eligibility filter.
pub mod eligibility;

/// Exact-match link injection.
pub mod injector;

/// Offset-preserving markup tokenizer.
pub mod markup;

/// Placement orchestration (run state and pipeline).
pub mod placement;

/// Zone distribution report.
pub mod report;

/// Anchor candidate scoring.
pub mod scoring;

/// Skip selectors for excluded sections.
pub mod selector;

/// Target pages, slug registry and page ordering.
pub mod target;

/// Text analysis utilities.
pub mod text;

/// URL utilities for slug normalisation and target URL synthesis.
pub mod url_utils;

/// Zone model.
pub mod zones;

// Public API - re-exports
pub use document::{BlockElement, LinkDocument};
pub use eligibility::select_eligible;
pub use error::{Error, Result};
pub use injector::{
    inject_exact, inject_exact_with_attributes, inject_validated, Injection, InjectionFailure, InjectionOutcome,
};
pub use options::{Options, DEFAULT_SKIP_SELECTORS};
pub use report::build_report;
pub use result::{LinkPlacement, LinkResult, LinkStats, ZoneCount, ZoneReport};
pub use scoring::{AnchorCandidate, AnchorScorer, AnchorValidation, Rejection};
pub use target::{PageOrder, SlugRegistry, TargetPage};
pub use zones::{assign_zone, default_zones, Zone, ZoneName};

/// Places internal links using default options.
///
/// Target URLs are root-relative (`/{slug}/`) since the default base URL is
/// empty. See [`place_links_with_options`].
///
/// # Example
///
/// ```rust
/// use rs_interlink::{place_links, TargetPage};
///
/// // The only paragraph is both first and last, so it is never linked.
/// let html = "<p>Short intro about dog grooming basics.</p>";
/// let result = place_links(html, &[TargetPage::new("Grooming Basics", "grooming-basics")]);
/// assert!(result.is_unchanged());
/// assert_eq!(result.html, html);
/// ```
#[must_use]
pub fn place_links(html: &str, pages: &[TargetPage]) -> LinkResult {
    place_links_with_options(html, pages, &Options::default())
}

/// Places internal links with custom options.
///
/// # Arguments
///
/// * `html` - The document or fragment to link
/// * `pages` - Candidate link destinations
/// * `options` - Thresholds, zones, base URL and slug registry
///
/// # Returns
///
/// The processed document with its placements, zone report and statistics.
/// This never fails: invalid options or unusable input return the document
/// unchanged with no placements.
#[must_use]
pub fn place_links_with_options(html: &str, pages: &[TargetPage], options: &Options) -> LinkResult {
    placement::pipeline::place_links(html, pages, options)
}
