//! Compiled regex patterns and closed word sets for anchor selection.
//!
//! All patterns are compiled once on first use via `LazyLock`.
//! Word sets are lower-case and compared against words reduced to letters
//! (and apostrophes where noted).

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Anchor Word Sets
// =============================================================================

/// Words an anchor may not start with: articles, conjunctions, prepositions,
/// pronouns, auxiliaries and quantifiers.
pub static FORBIDDEN_ANCHOR_STARTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
        "with", "by", "from", "as", "is", "was", "are", "were", "been", "be",
        "this", "that", "these", "those", "it", "its", "they", "their", "your",
        "our", "my", "his", "her", "we", "you", "i", "if", "so", "yet", "nor",
        "about", "into", "through", "during", "before", "after", "above", "below",
        "between", "under", "again", "further", "then", "once", "here", "there",
        "when", "where", "why", "how", "all", "each", "every", "both", "few",
        "more", "most", "other", "some", "such", "no", "not", "only", "same",
        "than", "too", "very", "just", "also", "now", "being", "having", "which",
        "who", "whom", "whose", "what", "while", "although", "because", "since",
    ]
    .into_iter()
    .collect()
});

/// Words that leave an anchor reading as an unfinished clause when last.
pub static FORBIDDEN_ANCHOR_ENDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
        "with", "by", "from", "as", "is", "was", "are", "were", "been", "be",
        "this", "that", "these", "those", "it", "its", "they", "their", "your",
        "will", "would", "could", "should", "may", "might", "must", "can", "have",
        "has", "had", "do", "does", "did", "being", "having", "if", "so", "yet",
        "than", "too", "very", "just", "also", "now", "quite", "rather", "really",
    ]
    .into_iter()
    .collect()
});

/// Generic phrases that never make an acceptable anchor.
pub const TOXIC_ANCHOR_PHRASES: &[&str] = &[
    "click here", "read more", "learn more", "find out", "check out",
    "this article", "this guide", "this post", "more info", "see more",
    "here", "link", "click", "read", "learn", "check", "see", "view",
];

/// Built-in descriptive vocabulary. An anchor must contain at least one.
pub static DESCRIPTIVE_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "guide", "tutorial", "tips", "strategies", "techniques", "methods", "steps",
        "practices", "approach", "framework", "system", "process", "checklist",
        "resources", "tools", "benefits", "solutions", "recommendations", "insights",
        "overview", "basics", "fundamentals", "essentials", "introduction", "advanced",
        "best", "complete", "comprehensive", "ultimate", "proven", "effective",
        "essential", "professional", "expert", "beginner", "training", "health",
        "nutrition", "grooming", "behavior", "care", "wellness", "diet", "exercise",
        "marketing", "seo", "content", "strategy", "optimization", "conversion",
        "growth", "revenue", "sales", "business", "advice", "secrets", "mistakes",
        "problems", "issues", "ways", "reasons", "facts", "myths", "signs",
        "examples", "templates", "ideas", "inspiration", "planning", "management",
    ]
    .into_iter()
    .collect()
});

// =============================================================================
// Anchor Regexes
// =============================================================================

/// Toxic phrases as a single word-bounded alternation.
///
/// Word boundaries keep "view" from matching "overview" and "read" from
/// matching "already".
pub static TOXIC_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TOXIC_ANCHOR_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("TOXIC_ANCHOR regex")
});

/// Trailing words that mark an anchor as a sentence fragment.
pub static SENTENCE_FRAGMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s+(is|are|was|were|will|would|could|should|can|may|might|must)$",
        r"(?i)\s+(and|or|but|that|which|who|when|where|why|how)$",
        r"(?i)\s+(the|a|an|very|really|quite|rather|so|too)$",
        r"(?i)\s+(have|has|had|do|does|did|being|having)$",
        r"(?i)\s+(if|although|because|since|while|unless)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("SENTENCE_FRAGMENTS regex"))
    .collect()
});

/// Phrasings that earn the power-pattern bonus.
pub static POWER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(complete|comprehensive|ultimate|definitive)\s+\w+\s+guide\b",
        r"(?i)\b(step[- ]by[- ]step|how[- ]to)\s+\w+",
        r"(?i)\b(best|top|proven|effective)\s+(practices|strategies|techniques|tips)",
        r"(?i)\b(beginner|advanced|expert)\s+\w+\s+(guide|tips|tutorial)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("POWER_PATTERNS regex"))
    .collect()
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Matches any markup tag.
pub static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML_TAG regex"));

/// Characters removed before key-term extraction.
pub static NON_TERM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("NON_TERM_CHARS regex"));

// =============================================================================
// Markup Tokenizer Patterns
// =============================================================================

/// Start or end tag anchored at the current position.
///
/// Groups: 1 = closing slash, 2 = tag name, 3 = raw attribute text, 4 = self-closing slash.
pub static TAG_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\A<(/?)([A-Za-z][A-Za-z0-9:-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
    )
    .expect("TAG_AT_START regex")
});

/// Comment, doctype, or processing instruction anchored at the current position.
pub static DECLARATION_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?:<!--[\s\S]*?-->|<![^>]*>|<\?[^>]*>)").expect("DECLARATION_AT_START regex")
});

/// One attribute inside a tag's attribute text.
///
/// Groups: 1 = name, 2/3/4 = double-quoted, single-quoted, or bare value.
pub static TAG_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("TAG_ATTRIBUTE regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toxic_anchor_respects_word_boundaries() {
        assert!(TOXIC_ANCHOR.is_match("click here for tips"));
        assert!(TOXIC_ANCHOR.is_match("Read More about it"));
        assert!(!TOXIC_ANCHOR.is_match("complete overview of training"));
        assert!(!TOXIC_ANCHOR.is_match("already proven strategies"));
    }

    #[test]
    fn sentence_fragments_match_trailing_auxiliaries() {
        assert!(SENTENCE_FRAGMENTS.iter().any(|r| r.is_match("training tips that")));
        assert!(SENTENCE_FRAGMENTS.iter().any(|r| r.is_match("proven strategies should")));
        assert!(!SENTENCE_FRAGMENTS.iter().any(|r| r.is_match("proven strategies work")));
    }

    #[test]
    fn power_patterns_detect_guides() {
        assert!(POWER_PATTERNS.iter().any(|r| r.is_match("complete puppy training guide")));
        assert!(POWER_PATTERNS.iter().any(|r| r.is_match("best practices for sales")));
        assert!(!POWER_PATTERNS.iter().any(|r| r.is_match("daily grooming routine")));
    }

    #[test]
    fn tag_at_start_parses_attributes() {
        let caps = TAG_AT_START
            .captures(r#"<a href="/x" class='y' data-z>text"#)
            .expect("tag should match");
        assert_eq!(&caps[1], "");
        assert_eq!(&caps[2], "a");
        assert!(caps[3].contains("href"));

        let closing = TAG_AT_START.captures("</P>").expect("closing tag");
        assert_eq!(&closing[1], "/");
        assert_eq!(&closing[2], "P");
    }

    #[test]
    fn whitespace_normalize_collapses_spaces() {
        let result = WHITESPACE_NORMALIZE.replace_all("hello \n\t world", " ");
        assert_eq!(result, "hello world");
    }
}
