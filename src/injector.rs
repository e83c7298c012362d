//! Exact-match link injection.
//!
//! An anchor is only ever placed by wrapping text that is already present:
//! the candidate's words are searched for case-sensitively at word
//! boundaries, and the substring actually matched is what ends up inside
//! the `<a>`. The match must lie within a single text run that is not
//! already inside a link.
//!
//! Candidates come from entity-decoded text while the search runs over raw
//! markup, so the pattern accepts the encoded forms too: `&nbsp;` between
//! words, `&rsquo;` or `&#39;` for an apostrophe, `&amp;` for `&`.

use std::fmt::Write as _;

use html_escape::encode_double_quoted_attribute;
use log::trace;
use regex::Regex;

use crate::markup::find_in_text;
use crate::target::SlugRegistry;
use crate::text::escape_regex;

/// Result of an injection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    /// New markup on success, the input unchanged otherwise.
    pub markup: String,
    /// Whether a link was spliced in.
    pub success: bool,
    /// The source text that was wrapped.
    pub matched: Option<String>,
    /// Why nothing was spliced.
    pub failure: Option<InjectionFailure>,
}

/// Why an injection did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionFailure {
    /// The anchor has no words.
    EmptyAnchor,
    /// The anchor does not occur in any text run.
    NotFound,
    /// The first occurrence is already inside a link.
    InsideLink,
    /// The slug is not in the valid-slug registry.
    UnknownSlug,
}

/// Outcome of [`inject_validated`]: the injection plus the URL that was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionOutcome {
    /// The injection attempt.
    pub injection: Injection,
    /// URL built for the slug, when it was known.
    pub url: Option<String>,
}

impl Injection {
    fn failed(markup: &str, failure: InjectionFailure) -> Self {
        Self {
            markup: markup.to_string(),
            success: false,
            matched: None,
            failure: Some(failure),
        }
    }
}

/// Whitespace between words, literal or as a no-break space entity.
const WORD_GAP: &str = r"(?:\s|&nbsp;|&#0*160;|&#[xX]0*[aA]0;)+";

/// Word-boundary pattern for an anchor. Inter-word whitespace matches any
/// whitespace run so line breaks in the source still match.
fn anchor_pattern(anchor_text: &str) -> Option<Regex> {
    let words: Vec<String> = anchor_text.split_whitespace().map(word_pattern).collect();
    if words.is_empty() {
        return None;
    }
    Regex::new(&format!(r"\b{}\b", words.join(WORD_GAP))).ok()
}

/// One decoded word as it may appear in markup.
fn word_pattern(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 2);
    let mut buf = [0_u8; 4];
    for c in word.chars() {
        match c {
            '\'' | '\u{2019}' => out.push_str(r"(?:'|\x{2019}|&rsquo;|&apos;|&#0*39;|&#0*8217;|&#[xX]0*27;|&#[xX]0*2019;)"),
            '&' => out.push_str(r"(?:&amp;|&#0*38;|&)"),
            '"' => out.push_str(r#"(?:"|&quot;|&#0*34;)"#),
            '<' => out.push_str(r"(?:&lt;|<)"),
            '>' => out.push_str(r"(?:&gt;|>)"),
            _ => out.push_str(&escape_regex(c.encode_utf8(&mut buf))),
        }
    }
    out
}

/// Wrap the first occurrence of `anchor_text` in `markup` with a link.
///
/// # Examples
///
/// ```
/// use rs_interlink::injector::inject_exact;
///
/// let out = inject_exact("Try these <em>easy</em> dog grooming basics today.", "dog grooming basics", "/grooming/");
/// assert!(out.success);
/// assert_eq!(out.markup, r#"Try these <em>easy</em> <a href="/grooming/">dog grooming basics</a> today."#);
///
/// // Case-sensitive: no fabricated capitalisation.
/// assert!(!inject_exact("dog grooming basics", "Dog Grooming Basics", "/g/").success);
/// ```
#[must_use]
pub fn inject_exact(markup: &str, anchor_text: &str, target_url: &str) -> Injection {
    inject_exact_with_attributes(markup, anchor_text, target_url, &[])
}

/// [`inject_exact`] with extra attributes written after `href`.
#[must_use]
pub fn inject_exact_with_attributes(
    markup: &str,
    anchor_text: &str,
    target_url: &str,
    attributes: &[(String, String)],
) -> Injection {
    let Some(pattern) = anchor_pattern(anchor_text) else {
        return Injection::failed(markup, InjectionFailure::EmptyAnchor);
    };

    let Some(found) = find_in_text(markup, &pattern) else {
        trace!("rs-interlink: '{anchor_text}' not found in markup");
        return Injection::failed(markup, InjectionFailure::NotFound);
    };
    if found.inside_link {
        trace!("rs-interlink: '{anchor_text}' already inside a link");
        return Injection::failed(markup, InjectionFailure::InsideLink);
    }

    let matched = &markup[found.range.clone()];
    let mut open = format!("<a href=\"{}\"", encode_double_quoted_attribute(target_url));
    for (name, value) in attributes {
        let _ = write!(open, " {name}=\"{}\"", encode_double_quoted_attribute(value));
    }
    open.push('>');

    let mut out = String::with_capacity(markup.len() + open.len() + 4);
    out.push_str(&markup[..found.range.start]);
    out.push_str(&open);
    out.push_str(matched);
    out.push_str("</a>");
    out.push_str(&markup[found.range.end..]);

    Injection {
        markup: out,
        success: true,
        matched: Some(matched.to_string()),
        failure: None,
    }
}

/// Check the slug against the registry, then inject.
///
/// An unknown slug fails before any text search. Known slugs link to
/// `{base_url}/{slug}/`.
#[must_use]
pub fn inject_validated(
    markup: &str,
    anchor_text: &str,
    slug: &str,
    base_url: &str,
    registry: &SlugRegistry,
) -> InjectionOutcome {
    let Some(url) = registry.build_url(base_url, slug) else {
        return InjectionOutcome {
            injection: Injection::failed(markup, InjectionFailure::UnknownSlug),
            url: None,
        };
    };

    InjectionOutcome {
        injection: inject_exact(markup, anchor_text, &url),
        url: Some(url),
    }
}
