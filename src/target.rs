//! Target pages, the valid-slug registry and candidate ordering.

use std::collections::HashSet;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::url_utils::{build_target_url, is_linkable_url, normalize_slug, url_dedup_key};

/// A page that may receive an inbound link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPage {
    /// Page title; a source of key terms.
    pub title: String,
    /// URL path segment; a source of key terms and the dedup key.
    pub slug: String,
    /// Explicit URL. When absent it is derived from the base URL and slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TargetPage {
    /// Create a page without an explicit URL.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            url: None,
        }
    }

    /// Set an explicit URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The URL a link to this page would use, if it is linkable.
    #[must_use]
    pub fn resolve_url(&self, base_url: &str) -> Option<String> {
        match &self.url {
            Some(url) => {
                let url = url.trim();
                is_linkable_url(url).then(|| url.to_string())
            }
            None => build_target_url(base_url, &self.slug),
        }
    }
}

/// Slugs the caller knows to resolve.
///
/// Lookups are case-insensitive and ignore surrounding slashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugRegistry {
    slugs: HashSet<String>,
}

impl SlugRegistry {
    /// Build a registry from raw slugs.
    pub fn new<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            slugs: slugs
                .into_iter()
                .map(|s| normalize_slug(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Whether the slug is known.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        let slug = normalize_slug(slug);
        !slug.is_empty() && self.slugs.contains(&slug)
    }

    /// Number of known slugs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Build `{base}/{slug}/` for a known slug; `None` for unknown slugs.
    #[must_use]
    pub fn build_url(&self, base_url: &str, slug: &str) -> Option<String> {
        if !self.contains(slug) {
            debug!("rs-interlink: blocked slug '{slug}' not in registry");
            return None;
        }
        build_target_url(base_url, slug)
    }
}

/// Order in which candidate pages are tried for each element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOrder {
    /// As supplied by the caller.
    #[default]
    Given,
    /// Titles with more words first; ties keep the supplied order.
    Specificity,
    /// Reproducible shuffle from a seed.
    Seeded(u64),
}

impl PageOrder {
    /// Reorder pages in place.
    pub fn apply<T>(self, pages: &mut [T], title_of: impl Fn(&T) -> &str) {
        match self {
            Self::Given => {}
            Self::Specificity => {
                pages.sort_by_key(|p| std::cmp::Reverse(title_of(p).split_whitespace().count()));
            }
            Self::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                pages.shuffle(&mut rng);
            }
        }
    }
}

/// A page cleared for linking, with its final URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The page as supplied.
    pub page: TargetPage,
    /// URL written into the `href`.
    pub url: String,
}

/// Why a page was dropped before placement started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRejection {
    /// Slug is empty after normalisation.
    EmptySlug,
    /// Slug is not in the valid-slug registry.
    UnknownSlug,
    /// No linkable URL could be built or the supplied one is unsafe.
    UnlinkableUrl,
    /// The page is the article's own topic.
    SelfReference,
    /// Another page with the same slug came first.
    DuplicateSlug,
    /// Another page resolving to the same URL came first.
    DuplicateUrl,
}

/// Filter and order pages for a run.
///
/// Drops pages with empty or duplicate slugs, slugs missing from the
/// registry (when one is given), pages without a linkable URL, pages whose
/// URL an earlier page already resolved to, and pages that reference the
/// article's own keyword. The survivors are ordered by
/// `order`. Returns the survivors and the number of rejected pages.
#[must_use]
pub fn prepare_targets(
    pages: &[TargetPage],
    base_url: &str,
    registry: Option<&SlugRegistry>,
    current_keyword: Option<&str>,
    order: PageOrder,
) -> (Vec<ResolvedTarget>, usize) {
    let mut seen = Seen::default();
    let mut targets = Vec::with_capacity(pages.len());
    let mut rejected = 0;

    for page in pages {
        match resolve(page, base_url, registry, current_keyword, &mut seen) {
            Ok(target) => targets.push(target),
            Err(reason) => {
                debug!("rs-interlink: target '{}' rejected: {reason:?}", page.slug);
                rejected += 1;
            }
        }
    }

    order.apply(&mut targets, |t| t.page.title.as_str());
    (targets, rejected)
}

/// Slugs and URL keys of pages accepted so far.
#[derive(Default)]
struct Seen {
    slugs: HashSet<String>,
    urls: HashSet<String>,
}

fn resolve(
    page: &TargetPage,
    base_url: &str,
    registry: Option<&SlugRegistry>,
    current_keyword: Option<&str>,
    seen: &mut Seen,
) -> Result<ResolvedTarget, TargetRejection> {
    let slug = normalize_slug(&page.slug);
    if slug.is_empty() {
        return Err(TargetRejection::EmptySlug);
    }
    if registry.is_some_and(|r| !r.contains(&slug)) {
        return Err(TargetRejection::UnknownSlug);
    }
    if current_keyword.is_some_and(|k| is_self_reference(page, k)) {
        return Err(TargetRejection::SelfReference);
    }
    let url = page.resolve_url(base_url).ok_or(TargetRejection::UnlinkableUrl)?;
    if seen.slugs.contains(&slug) {
        return Err(TargetRejection::DuplicateSlug);
    }
    if !seen.urls.insert(url_dedup_key(&url)) {
        return Err(TargetRejection::DuplicateUrl);
    }
    seen.slugs.insert(slug);

    Ok(ResolvedTarget {
        page: page.clone(),
        url,
    })
}

/// Whether a page is about the article's own keyword.
///
/// True when the title equals the keyword (case-insensitive) or the slug
/// contains the keyword with spaces turned into hyphens.
#[must_use]
pub fn is_self_reference(page: &TargetPage, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    let hyphenated = keyword.split_whitespace().collect::<Vec<_>>().join("-");

    page.title.trim().to_lowercase() == keyword || page.slug.to_lowercase().contains(&hyphenated)
}
