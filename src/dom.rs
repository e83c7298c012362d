//! DOM Operations Adapter
//!
//! Thin layer over `dom_query` for the questions the engine asks of a markup
//! fragment: what its visible text is and whether it already holds a link.
//! Block boundaries themselves come from [`crate::markup`], which keeps byte
//! offsets into the source. The DOM is consulted for fragment content and,
//! through [`Matcher`], for skip-selector matching.

pub use dom_query::{Document, Matcher, Selection};
pub use tendril::StrTendril;

/// Parse a markup fragment into a document whose `<body>` holds it.
#[must_use]
pub fn parse_fragment(markup: &str) -> Document {
    Document::from(markup)
}

/// Visible text of a markup fragment with entities decoded.
///
/// Returns `StrTendril` for zero-copy passing. Use `.to_string()` only when
/// owned storage is needed.
#[must_use]
pub fn text_content(markup: &str) -> StrTendril {
    parse_fragment(markup).select("body").text()
}

/// Whether a markup fragment contains an `<a>` element.
#[must_use]
pub fn contains_link(markup: &str) -> bool {
    parse_fragment(markup).select("a").exists()
}

/// Number of `<a>` elements in a markup fragment.
#[must_use]
pub fn link_count(markup: &str) -> usize {
    parse_fragment(markup).select("a").length()
}

/// `href` values of every link in a fragment, in document order.
#[must_use]
pub fn link_targets(markup: &str) -> Vec<String> {
    parse_fragment(markup)
        .select("a[href]")
        .iter()
        .filter_map(|a| a.attr("href").map(|h| h.to_string()))
        .collect()
}
