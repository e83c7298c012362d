//! Text analysis utilities.
//!
//! Pure functions over plain text and markup strings: word counting, tag
//! stripping, phrase extraction and the normalisations used to compare
//! anchors and target terms.

use std::collections::HashSet;

use crate::patterns::{FORBIDDEN_ANCHOR_STARTS, HTML_TAG, NON_TERM_CHARS, WHITESPACE_NORMALIZE};

/// Count whitespace-separated words.
///
/// # Examples
///
/// ```
/// use rs_interlink::text::count_words;
///
/// assert_eq!(count_words("  proven   training tips \n"), 3);
/// assert_eq!(count_words(""), 0);
/// ```
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse runs of whitespace into single spaces and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").into_owned()
}

/// Replace every tag with a space and collapse whitespace.
///
/// Entities are left as written; use [`crate::dom::text_content`] when
/// decoded text is needed.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    normalize_whitespace(&HTML_TAG.replace_all(html, " "))
}

/// Escape regex metacharacters so `text` matches literally.
#[inline]
#[must_use]
pub fn escape_regex(text: &str) -> String {
    regex::escape(text)
}

/// Lower-case and whitespace-normalise anchor text for duplicate detection.
#[must_use]
pub fn normalize_anchor(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

/// Reduce a word to its lower-case ASCII letters.
///
/// Used when comparing a word against the closed word sets, so that
/// "Training," and "training" compare equal.
#[must_use]
pub fn letters_only(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Reduce a word to lower-case letters and apostrophes.
#[must_use]
pub fn letters_and_apostrophes(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '\'')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Trim non-alphanumeric characters from both ends of a phrase.
#[must_use]
pub fn trim_non_alphanumeric(phrase: &str) -> &str {
    phrase.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Extract the key terms of a title or slug.
///
/// Lower-cases the text, replaces everything except `[a-z0-9\s-]` with
/// spaces, and keeps words longer than three characters that are not
/// stopwords. Order of first appearance is preserved and duplicates dropped.
///
/// # Examples
///
/// ```
/// use rs_interlink::text::extract_key_terms;
///
/// let terms = extract_key_terms("The Complete Guide to Puppy Training!");
/// assert_eq!(terms, vec!["complete", "guide", "puppy", "training"]);
/// ```
#[must_use]
pub fn extract_key_terms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_TERM_CHARS.replace_all(&lowered, " ");
    let mut seen = HashSet::new();

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !FORBIDDEN_ANCHOR_STARTS.contains(w))
        .filter(|w| seen.insert((*w).to_string()))
        .map(str::to_string)
        .collect()
}

/// Enumerate every phrase of `min_words..=max_words` words that occurs in
/// the tag-stripped text, skipping phrases that start or end on a common
/// stopword.
///
/// Phrases are returned shortest first, then by position.
#[must_use]
pub fn extract_exact_phrases(text: &str, min_words: usize, max_words: usize) -> Vec<String> {
    const EDGE_STOPWORDS: &[&str] = &[
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    ];

    let plain = strip_tags(text);
    let words: Vec<&str> = plain.split(' ').filter(|w| !w.is_empty()).collect();
    let mut phrases = Vec::new();

    if min_words == 0 || words.len() < min_words {
        return phrases;
    }

    for len in min_words..=max_words.min(words.len()) {
        for window in words.windows(len) {
            let first = window[0].to_lowercase();
            let last = window[len - 1].to_lowercase();
            if EDGE_STOPWORDS.contains(&first.as_str()) || EDGE_STOPWORDS.contains(&last.as_str()) {
                continue;
            }
            phrases.push(window.join(" "));
        }
    }

    phrases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_removes_markup_and_collapses() {
        assert_eq!(
            strip_tags("<p>Proven <strong>training</strong>\n tips</p>"),
            "Proven training tips"
        );
    }

    #[test]
    fn normalize_anchor_is_case_and_space_insensitive() {
        assert_eq!(normalize_anchor("  Proven  Training\nTips "), "proven training tips");
    }

    #[test]
    fn letters_only_drops_punctuation_and_digits() {
        assert_eq!(letters_only("Training,"), "training");
        assert_eq!(letters_only("SEO-2024"), "seo");
        assert_eq!(letters_and_apostrophes("Don't!"), "don't");
    }

    #[test]
    fn trim_non_alphanumeric_keeps_inner_punctuation() {
        assert_eq!(trim_non_alphanumeric("\"step-by-step guide.\""), "step-by-step guide");
        assert_eq!(trim_non_alphanumeric("..."), "");
    }

    #[test]
    fn key_terms_include_slug_words() {
        let terms = extract_key_terms("dog-grooming-basics");
        assert_eq!(terms, vec!["dog-grooming-basics"]);
        let terms = extract_key_terms(&"dog-grooming-basics".replace('-', " "));
        assert_eq!(terms, vec!["grooming", "basics"]);
    }

    #[test]
    fn key_terms_drop_stopwords_and_short_words() {
        let terms = extract_key_terms("How to Care for Your Dog: Tips and More");
        assert_eq!(terms, vec!["care", "tips"]);
    }

    #[test]
    fn exact_phrases_skip_stopword_edges() {
        let phrases = extract_exact_phrases("<p>the proven training tips work</p>", 2, 3);
        assert!(phrases.contains(&"proven training".to_string()));
        assert!(phrases.contains(&"training tips work".to_string()));
        assert!(!phrases.iter().any(|p| p.starts_with("the ")));
    }

    #[test]
    fn exact_phrases_empty_for_short_text() {
        assert!(extract_exact_phrases("one two", 3, 5).is_empty());
    }

    #[test]
    fn count_words_handles_mixed_whitespace() {
        assert_eq!(count_words("a\tb\nc  d"), 4);
    }
}
