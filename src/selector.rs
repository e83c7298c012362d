//! Skip selectors for structurally excluded sections.
//!
//! Selectors are ordinary CSS, compiled and matched by `dom_query`, so
//! combinators (`.faq-wrap > p`, `main aside p`), attribute operators and
//! comma lists behave as they do in a browser. A block is excluded when it
//! or any of its ancestors matches.
//!
//! The block scan in [`crate::document`] works on byte offsets and never
//! builds a tree. The two meet through a marker attribute: the scanner
//! writes [`BLOCK_MARKER`] into each block start tag of a scratch copy of
//! the source, the copy is parsed once, and every marked element found in a
//! matched container is reported back by its marker value.

use std::collections::HashSet;

use log::{debug, warn};

use crate::dom::{self, Matcher, Selection};
use crate::error::{Error, Result};

/// Attribute written into block start tags of the scratch copy.
pub const BLOCK_MARKER: &str = "data-rs-interlink-block";

const MARKED: &str = "[data-rs-interlink-block]";

/// Validated skip selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    selectors: Vec<String>,
}

impl SkipList {
    /// Build a list, dropping blank selectors and ones that do not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_interlink::selector::SkipList;
    ///
    /// let skip = SkipList::new(&["nav", ".faq-wrap > p", "p["]);
    /// assert_eq!(skip.len(), 2);
    /// ```
    #[must_use]
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        let selectors = selectors
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| {
                if s.is_empty() {
                    return false;
                }
                let parses = Matcher::new(s).is_ok();
                if !parses {
                    warn!("rs-interlink: ignoring unparseable skip selector '{s}'");
                }
                parses
            })
            .map(str::to_string)
            .collect();
        Self { selectors }
    }

    /// Build a list, failing on the first blank or unparseable selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending selector.
    pub fn try_new<S: AsRef<str>>(selectors: &[S]) -> Result<Self> {
        for selector in selectors {
            let selector = selector.as_ref().trim();
            if selector.is_empty() {
                return Err(Error::InvalidConfig("skip selector must not be empty".to_string()));
            }
            if Matcher::new(selector).is_err() {
                return Err(Error::InvalidConfig(format!("invalid skip selector '{selector}'")));
            }
        }
        Ok(Self::new(selectors))
    }

    /// Number of selectors kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether no selector was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Marker values of blocks that match, or sit inside an element that
    /// matches, any selector.
    ///
    /// `marked` is markup whose block start tags carry [`BLOCK_MARKER`].
    #[must_use]
    pub fn excluded_blocks(&self, marked: &str) -> HashSet<usize> {
        let mut excluded = HashSet::new();
        if self.selectors.is_empty() {
            return excluded;
        }
        let joined = self.selectors.join(", ");
        let (Ok(containers), Ok(blocks)) = (Matcher::new(&joined), Matcher::new(MARKED)) else {
            return excluded;
        };

        let doc = dom::parse_fragment(marked);
        for container in doc.select_matcher(&containers).iter() {
            collect_marker(&container, &mut excluded);
            for block in container.select_matcher(&blocks).iter() {
                collect_marker(&block, &mut excluded);
            }
        }
        debug!("rs-interlink: {} blocks in skipped sections", excluded.len());
        excluded
    }
}

fn collect_marker(element: &Selection, into: &mut HashSet<usize>) {
    if let Some(value) = element.attr(BLOCK_MARKER).and_then(|v| v.parse().ok()) {
        into.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded(selectors: &[&str], marked: &str) -> Vec<usize> {
        let mut found: Vec<usize> = SkipList::new(selectors).excluded_blocks(marked).into_iter().collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn element_and_ancestor_matches_exclude() {
        let html = r#"<div class="faq"><p data-rs-interlink-block="1">q</p></div><p class="faq" data-rs-interlink-block="2">own</p><p data-rs-interlink-block="3">body</p>"#;
        assert_eq!(excluded(&[".faq"], html), vec![1, 2]);
    }

    #[test]
    fn child_combinator_reaches_direct_children_only() {
        let html = r#"<div class="faq-wrap"><p data-rs-interlink-block="1">a</p><section><p data-rs-interlink-block="2">b</p></section></div>"#;
        assert_eq!(excluded(&[".faq-wrap > p"], html), vec![1]);
    }

    #[test]
    fn descendant_combinator_with_compound_parts() {
        let html = r#"<div class="faq-wrap"><section><p data-rs-interlink-block="1">a</p></section></div><section class="faq-wrap"><p data-rs-interlink-block="2">b</p></section>"#;
        assert_eq!(excluded(&["div.faq-wrap p"], html), vec![1]);
    }

    #[test]
    fn attribute_operators_follow_css() {
        let html = r#"<div itemtype="https://schema.org/FAQPage"><p data-rs-interlink-block="1">a</p></div><div class="toc-box"><p data-rs-interlink-block="2">b</p></div><p data-rs-interlink-block="3">c</p>"#;
        assert_eq!(excluded(&[r#"[itemtype*="FAQPage"]"#, r#"[class^="toc"]"#], html), vec![1, 2]);
    }

    #[test]
    fn comma_lists_and_invalid_selectors() {
        let skip = SkipList::new(&["header, footer", "div p", "  ", "p[", ".ok"]);
        assert_eq!(skip.len(), 3);

        let err = SkipList::try_new(&["nav", "p["]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("p[")));
        assert!(SkipList::try_new(&["nav", "main > article p"]).is_ok());
    }

    #[test]
    fn empty_list_excludes_nothing() {
        let skip = SkipList::default();
        assert!(skip.is_empty());
        assert!(skip.excluded_blocks(r#"<nav><p data-rs-interlink-block="0">x</p></nav>"#).is_empty());
    }
}
