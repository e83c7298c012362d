//! URL Utility Functions
//!
//! Slug normalisation and target URL synthesis. A link is only ever emitted
//! for a URL that passes [`is_linkable_url`].

use url::Url;

/// Normalise a slug for registry lookups: trimmed, lower-cased, with
/// leading and trailing slashes removed.
///
/// # Examples
///
/// ```
/// use rs_interlink::url_utils::normalize_slug;
///
/// assert_eq!(normalize_slug(" /Dog-Training-Tips/ "), "dog-training-tips");
/// ```
#[must_use]
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().trim_matches('/').trim().to_lowercase()
}

/// Check if a string is a valid absolute http(s) URL with a host.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Whether a URL may be written into an `href`.
///
/// Accepts absolute http(s) URLs with a host and root-relative paths
/// (`/guide/`). Rejects empty strings, other schemes, protocol-relative
/// URLs and anything containing whitespace, quotes or angle brackets.
#[must_use]
pub fn is_linkable_url(s: &str) -> bool {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>')) {
        return false;
    }

    if s.starts_with('/') {
        return !s.starts_with("//");
    }

    is_absolute_url(s).0
}

/// Synthesize a target URL as `{base}/{slug}/`.
///
/// Trailing slashes are stripped from `base_url` and surrounding slashes
/// from `slug`. The slug keeps its original case. Returns `None` when the
/// slug is empty or the result is not linkable.
///
/// # Examples
///
/// ```
/// use rs_interlink::url_utils::build_target_url;
///
/// assert_eq!(
///     build_target_url("https://example.com//", "/puppy-training/").as_deref(),
///     Some("https://example.com/puppy-training/")
/// );
/// assert_eq!(build_target_url("", "guide").as_deref(), Some("/guide/"));
/// assert!(build_target_url("https://example.com", "//").is_none());
/// ```
#[must_use]
pub fn build_target_url(base_url: &str, slug: &str) -> Option<String> {
    let slug = slug.trim().trim_matches('/');
    if slug.is_empty() {
        return None;
    }

    let base = base_url.trim().trim_end_matches('/');
    let url = format!("{base}/{slug}/");

    is_linkable_url(&url).then_some(url)
}

/// Comparison key for deciding whether two URLs point at the same page.
///
/// Absolute URLs go through `url` normalisation (scheme and host case,
/// default ports, dot segments); a trailing slash on the path is not
/// significant. Query and fragment are kept.
///
/// # Examples
///
/// ```
/// use rs_interlink::url_utils::url_dedup_key;
///
/// assert_eq!(url_dedup_key("HTTPS://Example.com:443/guide/"), url_dedup_key("https://example.com/guide"));
/// assert_ne!(url_dedup_key("/guide/"), url_dedup_key("/Guide/"));
/// ```
#[must_use]
pub fn url_dedup_key(url: &str) -> String {
    let url = url.trim();
    let normalized = match is_absolute_url(url) {
        (true, Some(parsed)) => parsed.to_string(),
        _ => url.to_string(),
    };

    let split = normalized.find(['?', '#']).unwrap_or(normalized.len());
    let (path, tail) = normalized.split_at(split);
    let path = path.trim_end_matches('/');
    format!("{path}{tail}")
}
