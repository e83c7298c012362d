//! Configuration options for link placement.
//!
//! The `Options` struct controls every threshold of the engine. All fields
//! are public; start from `Options::default()` and override what you need,
//! or load a JSON document with [`Options::from_json`].

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::selector::SkipList;
use crate::target::{PageOrder, SlugRegistry};
use crate::url_utils::is_absolute_url;
use crate::zones::{default_zones, validate_zones, Zone};

/// Containers whose paragraphs never receive a link.
pub const DEFAULT_SKIP_SELECTORS: &[&str] = &[
    ".sota-faq-section",
    ".sota-references-section",
    ".sota-references-wrapper",
    "[class*=\"faq\"]",
    "[class*=\"reference\"]",
    "[class*=\"takeaway\"]",
    "[class*=\"toc\"]",
    "[itemtype*=\"FAQPage\"]",
    ".verification-footer-sota",
    ".sidebar",
    ".toc",
    "nav",
    "header",
    "footer",
    "aside",
    "blockquote",
    "table",
    "details",
    "figure",
];

/// Configuration options for link placement.
///
/// # Example
///
/// ```rust
/// use rs_interlink::Options;
///
/// let options = Options {
///     base_url: "https://example.com".to_string(),
///     total_target_links: 6,
///     min_words_between_links: 200,
///     ..Options::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Site root used to synthesize `{base_url}/{slug}/` for pages without
    /// an explicit URL. May be empty for root-relative links.
    ///
    /// Default: `""`
    pub base_url: String,

    /// Slugs known to resolve. When set, pages whose slug is not listed are
    /// never linked.
    ///
    /// Default: `None`
    pub valid_slugs: Option<Vec<String>>,

    /// Global ceiling on links placed in one document.
    ///
    /// Default: `12`
    pub total_target_links: usize,

    /// Shortest anchor, in words.
    ///
    /// Default: `4`
    pub min_anchor_words: usize,

    /// Longest anchor, in words.
    ///
    /// Default: `7`
    pub max_anchor_words: usize,

    /// Links a single paragraph may receive. Values above one only apply
    /// when `min_words_between_links` is zero.
    ///
    /// Default: `1`
    pub max_links_per_paragraph: usize,

    /// Words that must separate consecutive placements.
    ///
    /// Default: `150`
    pub min_words_between_links: usize,

    /// Shortest paragraph, in words, that may receive a link.
    ///
    /// Default: `50`
    pub min_paragraph_words: usize,

    /// CSS selectors for containers whose paragraphs are excluded.
    ///
    /// Default: [`DEFAULT_SKIP_SELECTORS`]
    pub skip_selectors: Vec<String>,

    /// Zone table with quotas and priorities.
    ///
    /// Default: [`default_zones`]
    pub zones: Vec<Zone>,

    /// Never link the first block of the document.
    ///
    /// Default: `true`
    pub avoid_first_paragraph: bool,

    /// Never link the last block of the document.
    ///
    /// Default: `true`
    pub avoid_last_paragraph: bool,

    /// Order in which target pages are tried.
    ///
    /// Default: [`PageOrder::Given`]
    pub page_order: PageOrder,

    /// The article's own keyword. Pages about it are not linked.
    ///
    /// Default: `None`
    pub current_keyword: Option<String>,

    /// Replacement for the built-in descriptive vocabulary.
    ///
    /// Default: `None`
    pub descriptive_words: Option<Vec<String>>,

    /// Minimum total anchor score (quality plus topical overlap).
    ///
    /// Default: `0.0`
    pub min_anchor_score: f64,

    /// Largest share of anchor words that may repeat the nearest heading.
    /// `None` disables the check.
    ///
    /// Default: `Some(0.4)`
    pub max_heading_overlap: Option<f64>,

    /// Extra attributes written on every generated `<a>` after `href`.
    ///
    /// Default: empty
    pub link_attributes: Vec<(String, String)>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            valid_slugs: None,
            total_target_links: 12,
            min_anchor_words: 4,
            max_anchor_words: 7,
            max_links_per_paragraph: 1,
            min_words_between_links: 150,
            min_paragraph_words: 50,
            skip_selectors: DEFAULT_SKIP_SELECTORS.iter().map(|s| (*s).to_string()).collect(),
            zones: default_zones(),
            avoid_first_paragraph: true,
            avoid_last_paragraph: true,
            page_order: PageOrder::Given,
            current_keyword: None,
            descriptive_words: None,
            min_anchor_score: 0.0,
            max_heading_overlap: Some(0.4),
            link_attributes: Vec::new(),
        }
    }
}

impl Options {
    /// Parse options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and any error from
    /// [`Options::validate`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_interlink::Options;
    ///
    /// let options = Options::from_json(r#"{"total_target_links": 3, "page_order": "specificity"}"#)?;
    /// assert_eq!(options.total_target_links, 3);
    /// assert_eq!(options.min_anchor_words, 4);
    /// # Ok::<(), rs_interlink::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check option ranges, the zone table and the base URL.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] when anchor bounds are zero or inverted,
    ///   `max_links_per_paragraph` is zero, `max_heading_overlap` is
    ///   outside `0.0..=1.0`, or a skip selector is blank or unparseable.
    /// - [`Error::InvalidZones`] from [`validate_zones`].
    /// - [`Error::InvalidBaseUrl`] when `base_url` is neither empty, a
    ///   root-relative path, nor an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.min_anchor_words == 0 {
            return Err(Error::InvalidConfig("min_anchor_words must be at least 1".to_string()));
        }
        if self.min_anchor_words > self.max_anchor_words {
            return Err(Error::InvalidConfig(format!(
                "min_anchor_words {} exceeds max_anchor_words {}",
                self.min_anchor_words, self.max_anchor_words
            )));
        }
        if self.max_links_per_paragraph == 0 {
            return Err(Error::InvalidConfig(
                "max_links_per_paragraph must be at least 1".to_string(),
            ));
        }
        if let Some(overlap) = self.max_heading_overlap {
            if !(0.0..=1.0).contains(&overlap) {
                return Err(Error::InvalidConfig(format!(
                    "max_heading_overlap {overlap} outside 0.0..=1.0"
                )));
            }
        }

        validate_zones(&self.zones)?;
        SkipList::try_new(&self.skip_selectors)?;

        let base = self.base_url.trim();
        if !(base.is_empty() || base.starts_with('/') && !base.starts_with("//") || is_absolute_url(base).0) {
            return Err(Error::InvalidBaseUrl(self.base_url.clone()));
        }

        Ok(())
    }

    /// The valid-slug registry, when one is configured.
    #[must_use]
    pub fn slug_registry(&self) -> Option<SlugRegistry> {
        self.valid_slugs.as_ref().map(SlugRegistry::new)
    }
}
