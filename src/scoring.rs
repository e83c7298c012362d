//! Anchor candidate scoring.
//!
//! Finding an anchor is a two-stage filter-then-score pass over every window
//! of `min..=max` words in a block's text. The filter stage enforces
//! grammaticality (no function word at either edge, no fragments, no
//! boilerplate) and the score stage rewards descriptive, pattern-shaped
//! phrases. Topicality is scored separately against the target page's key
//! terms, and a phrase with no overlap is rejected whatever its quality.

use std::collections::HashSet;

use log::trace;

use crate::options::Options;
use crate::patterns::{
    DESCRIPTIVE_WORDS, FORBIDDEN_ANCHOR_ENDS, FORBIDDEN_ANCHOR_STARTS, POWER_PATTERNS,
    SENTENCE_FRAGMENTS, TOXIC_ANCHOR,
};
use crate::target::TargetPage;
use crate::text::{
    extract_key_terms, letters_and_apostrophes, letters_only, normalize_anchor,
    normalize_whitespace, trim_non_alphanumeric,
};

const BASE_SCORE: f64 = 50.0;
const IDEAL_LENGTH_MIN: usize = 4;
const IDEAL_LENGTH_MAX: usize = 6;
const IDEAL_LENGTH_BONUS: f64 = 20.0;
const SEVEN_WORD_BONUS: f64 = 10.0;
const DESCRIPTIVE_WORD_BONUS: f64 = 8.0;
const DESCRIPTIVE_BONUS_CAP: f64 = 24.0;
const POWER_PATTERN_BONUS: f64 = 15.0;
const QUALITY_CAP: f64 = 100.0;
const KEY_TERM_BONUS: f64 = 20.0;
const MIN_MEANINGFUL_WORDS: usize = 2;

/// Why a phrase cannot be an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after trimming punctuation.
    Empty,
    /// Fewer words than the minimum.
    TooShort,
    /// More words than the maximum.
    TooLong,
    /// Contains a boilerplate phrase such as "click here".
    Toxic,
    /// First word is a function word.
    ForbiddenStart,
    /// Last word leaves the clause unfinished.
    ForbiddenEnd,
    /// No descriptive word.
    NotDescriptive,
    /// Ends like a sentence fragment.
    SentenceFragment,
    /// Fewer than two meaningful words.
    TooFewMeaningfulWords,
    /// Crosses a sentence boundary.
    SpansSentences,
    /// Repeats too much of the nearest heading.
    HeadingOverlap,
    /// Same text already used for another link in this run.
    AlreadyUsed,
    /// Shares no key term with the target page.
    OffTopic,
    /// Total score is below the configured floor.
    BelowMinimumScore,
}

/// Outcome of checking a phrase's grammar and quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorValidation {
    /// Usable, with its quality score (0–100).
    Valid {
        /// Quality score.
        score: f64,
    },
    /// Not usable.
    Rejected(Rejection),
}

impl AnchorValidation {
    /// Whether the phrase passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Quality score; zero for rejected phrases.
    #[must_use]
    pub fn score(&self) -> f64 {
        match self {
            Self::Valid { score } => *score,
            Self::Rejected(_) => 0.0,
        }
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Valid { .. } => None,
            Self::Rejected(r) => Some(*r),
        }
    }
}

/// The best anchor found in a block for one target page.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorCandidate {
    /// Phrase exactly as it appears in the block text, edge punctuation
    /// trimmed.
    pub text: String,
    /// Words in the phrase.
    pub word_count: usize,
    /// Quality score plus key-term score.
    pub quality_score: f64,
    /// Index of the window's first word in the block text.
    pub start_word: usize,
    /// Page the anchor would link to.
    pub target: TargetPage,
}

/// Key terms of a page: its title terms followed by its slug terms, unique.
///
/// # Examples
///
/// ```
/// use rs_interlink::scoring::key_terms_for;
/// use rs_interlink::TargetPage;
///
/// let page = TargetPage::new("Puppy Training Guide", "crate-training-puppies");
/// assert_eq!(key_terms_for(&page), vec!["puppy", "training", "guide", "crate", "puppies"]);
/// ```
#[must_use]
pub fn key_terms_for(page: &TargetPage) -> Vec<String> {
    let mut terms = extract_key_terms(&page.title);
    for term in extract_key_terms(&page.slug.replace('-', " ")) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Scores and selects anchor phrases.
#[derive(Debug, Clone)]
pub struct AnchorScorer {
    min_words: usize,
    max_words: usize,
    descriptive_words: Option<HashSet<String>>,
    min_score: f64,
    max_heading_overlap: Option<f64>,
}

impl Default for AnchorScorer {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl AnchorScorer {
    /// Scorer for anchors of `min_words..=max_words` words with the built-in
    /// vocabulary, no score floor and no heading check.
    #[must_use]
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self {
            min_words,
            max_words,
            descriptive_words: None,
            min_score: 0.0,
            max_heading_overlap: None,
        }
    }

    /// Scorer configured from run options.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let scorer = Self::new(options.min_anchor_words, options.max_anchor_words)
            .with_min_score(options.min_anchor_score)
            .with_max_heading_overlap(options.max_heading_overlap);
        match &options.descriptive_words {
            Some(words) => scorer.with_descriptive_words(words),
            None => scorer,
        }
    }

    /// Replace the built-in descriptive vocabulary.
    #[must_use]
    pub fn with_descriptive_words<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.descriptive_words = Some(words.iter().map(|w| letters_only(w.as_ref())).collect());
        self
    }

    /// Reject candidates whose total score is below `min_score`.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Reject candidates sharing more than this fraction of their words
    /// with the nearest heading.
    #[must_use]
    pub fn with_max_heading_overlap(mut self, ratio: Option<f64>) -> Self {
        self.max_heading_overlap = ratio;
        self
    }

    fn is_descriptive(&self, word: &str) -> bool {
        let word = letters_only(word);
        match &self.descriptive_words {
            Some(set) => set.contains(&word),
            None => DESCRIPTIVE_WORDS.contains(word.as_str()),
        }
    }

    /// Check a phrase's grammar and quality, independent of any target.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_interlink::scoring::{AnchorScorer, Rejection};
    ///
    /// let scorer = AnchorScorer::new(4, 7);
    /// assert!(scorer.validate_anchor_text("proven puppy training techniques").is_valid());
    /// assert_eq!(
    ///     scorer.validate_anchor_text("click here for training tips").rejection(),
    ///     Some(Rejection::Toxic)
    /// );
    /// ```
    #[must_use]
    pub fn validate_anchor_text(&self, phrase: &str) -> AnchorValidation {
        match self.quality(phrase) {
            Ok(score) => AnchorValidation::Valid { score },
            Err(r) => AnchorValidation::Rejected(r),
        }
    }

    fn quality(&self, phrase: &str) -> Result<f64, Rejection> {
        let cleaned = normalize_whitespace(trim_non_alphanumeric(phrase));
        if cleaned.is_empty() {
            return Err(Rejection::Empty);
        }
        let words: Vec<&str> = cleaned.split(' ').collect();

        if words.len() < self.min_words {
            return Err(Rejection::TooShort);
        }
        if words.len() > self.max_words {
            return Err(Rejection::TooLong);
        }
        if TOXIC_ANCHOR.is_match(&cleaned) {
            return Err(Rejection::Toxic);
        }

        let first = letters_and_apostrophes(words[0]);
        if FORBIDDEN_ANCHOR_STARTS.contains(first.as_str()) {
            return Err(Rejection::ForbiddenStart);
        }
        let last = letters_and_apostrophes(words[words.len() - 1]);
        if FORBIDDEN_ANCHOR_ENDS.contains(last.as_str()) {
            return Err(Rejection::ForbiddenEnd);
        }

        let descriptive = words.iter().filter(|w| self.is_descriptive(w)).count();
        if descriptive == 0 {
            return Err(Rejection::NotDescriptive);
        }
        if SENTENCE_FRAGMENTS.iter().any(|re| re.is_match(&cleaned)) {
            return Err(Rejection::SentenceFragment);
        }

        let meaningful = words
            .iter()
            .filter(|w| !FORBIDDEN_ANCHOR_STARTS.contains(w.to_lowercase().as_str()) && w.chars().count() > 2)
            .count();
        if meaningful < MIN_MEANINGFUL_WORDS {
            return Err(Rejection::TooFewMeaningfulWords);
        }
        if words[..words.len() - 1]
            .iter()
            .any(|w| w.ends_with(['.', '!', '?', ';', ':']))
        {
            return Err(Rejection::SpansSentences);
        }

        let mut score = BASE_SCORE;
        score += length_bonus(words.len());
        let descriptive_bonus = (descriptive as f64 * DESCRIPTIVE_WORD_BONUS).min(DESCRIPTIVE_BONUS_CAP);
        score += descriptive_bonus;
        if POWER_PATTERNS.iter().any(|re| re.is_match(&cleaned)) {
            score += POWER_PATTERN_BONUS;
        }

        Ok(score.min(QUALITY_CAP))
    }

    /// Find the best anchor for `target` in a block's plain text.
    ///
    /// Every window of `min..=max` words is validated, checked against the
    /// nearest heading and the anchors already used in this run, then scored
    /// for overlap with the target's key terms. The highest total wins; ties
    /// go to the earlier start word, then to the shorter phrase.
    #[must_use]
    pub fn find_best_anchor(
        &self,
        text: &str,
        target: &TargetPage,
        nearby_heading: Option<&str>,
        used_anchors: &HashSet<String>,
    ) -> Option<AnchorCandidate> {
        self.rank_anchors(text, target, nearby_heading, used_anchors)
            .into_iter()
            .next()
    }

    /// Every acceptable anchor for `target`, best first, in the order
    /// [`AnchorScorer::find_best_anchor`] ranks them.
    #[must_use]
    pub fn rank_anchors(
        &self,
        text: &str,
        target: &TargetPage,
        nearby_heading: Option<&str>,
        used_anchors: &HashSet<String>,
    ) -> Vec<AnchorCandidate> {
        let plain = normalize_whitespace(text);
        let words: Vec<&str> = plain.split(' ').filter(|w| !w.is_empty()).collect();
        if self.min_words == 0 || words.len() < self.min_words {
            return Vec::new();
        }

        let terms = key_terms_for(target);
        if terms.is_empty() {
            return Vec::new();
        }
        let heading_words: Option<HashSet<String>> = nearby_heading.map(|h| {
            h.split_whitespace()
                .map(letters_only)
                .filter(|w| !w.is_empty())
                .collect()
        });

        let mut ranked = Vec::new();
        for len in self.min_words..=self.max_words.min(words.len()) {
            for (start, window) in words.windows(len).enumerate() {
                let joined = window.join(" ");
                let phrase = trim_non_alphanumeric(&joined);

                match self.score_window(phrase, &terms, heading_words.as_ref(), used_anchors) {
                    Ok(score) => ranked.push((len, AnchorCandidate {
                        text: phrase.to_string(),
                        word_count: phrase.split_whitespace().count(),
                        quality_score: score,
                        start_word: start,
                        target: target.clone(),
                    })),
                    Err(reason) => {
                        trace!("rs-interlink: '{phrase}' rejected for '{}': {reason:?}", target.slug);
                    }
                }
            }
        }

        ranked.sort_by(|(la, a), (lb, b)| {
            b.quality_score
                .total_cmp(&a.quality_score)
                .then(a.start_word.cmp(&b.start_word))
                .then(la.cmp(lb))
        });
        ranked.into_iter().map(|(_, c)| c).collect()
    }

    fn score_window(
        &self,
        phrase: &str,
        terms: &[String],
        heading_words: Option<&HashSet<String>>,
        used_anchors: &HashSet<String>,
    ) -> Result<f64, Rejection> {
        let quality = self.quality(phrase)?;

        if used_anchors.contains(&normalize_anchor(phrase)) {
            return Err(Rejection::AlreadyUsed);
        }
        if let (Some(max), Some(heading)) = (self.max_heading_overlap, heading_words) {
            if heading_overlap(phrase, heading) > max {
                return Err(Rejection::HeadingOverlap);
            }
        }

        let lower = phrase.to_lowercase();
        let matched = terms.iter().filter(|t| lower.contains(t.as_str())).count();
        if matched == 0 {
            return Err(Rejection::OffTopic);
        }

        let total = quality + matched as f64 * KEY_TERM_BONUS;
        if total < self.min_score {
            return Err(Rejection::BelowMinimumScore);
        }
        Ok(total)
    }
}

/// Share of a phrase's words that also appear in the heading.
fn heading_overlap(phrase: &str, heading: &HashSet<String>) -> f64 {
    if heading.is_empty() {
        return 0.0;
    }
    let words: Vec<String> = phrase
        .split_whitespace()
        .map(letters_only)
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }
    let shared = words.iter().filter(|w| heading.contains(*w)).count();
    shared as f64 / words.len() as f64
}

/// Fixed length bands, independent of the configured anchor bounds.
fn length_bonus(words: usize) -> f64 {
    match words {
        IDEAL_LENGTH_MIN..=IDEAL_LENGTH_MAX => IDEAL_LENGTH_BONUS,
        7 => SEVEN_WORD_BONUS,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> AnchorScorer {
        AnchorScorer::new(4, 7)
    }

    fn page() -> TargetPage {
        TargetPage::new("Puppy Training Guide", "puppy-training-guide")
    }

    #[test]
    fn validation_rejects_function_word_edges() {
        let s = scorer();
        assert_eq!(
            s.validate_anchor_text("the proven puppy training tips").rejection(),
            Some(Rejection::ForbiddenStart)
        );
        assert_eq!(
            s.validate_anchor_text("proven puppy training tips should").rejection(),
            Some(Rejection::ForbiddenEnd)
        );
    }

    #[test]
    fn validation_rejects_vacuous_and_boundary_phrases() {
        let s = scorer();
        assert_eq!(
            s.validate_anchor_text("dogs enjoy long walks outside").rejection(),
            Some(Rejection::NotDescriptive)
        );
        assert_eq!(
            s.validate_anchor_text("daily care matters. Puppy training").rejection(),
            Some(Rejection::SpansSentences)
        );
        assert_eq!(
            s.validate_anchor_text("view proven training tips").rejection(),
            Some(Rejection::Toxic)
        );
        assert_eq!(s.validate_anchor_text("...").rejection(), Some(Rejection::Empty));
        assert_eq!(s.validate_anchor_text("training tips").rejection(), Some(Rejection::TooShort));
    }

    #[test]
    fn overview_is_not_toxic() {
        assert!(scorer().validate_anchor_text("complete overview of grooming basics").is_valid());
    }

    #[test]
    fn quality_score_components() {
        let s = scorer();
        // 50 + 20 (length) + 24 (proven, training, tips) + 15 (power pattern), capped.
        assert!((s.validate_anchor_text("proven tips for puppy training").score() - 100.0).abs() < f64::EPSILON);
        // 50 + 10 (seven words) + 8 (grooming).
        let seven = s.validate_anchor_text("weekly grooming keeps your dog coat shiny");
        assert!((seven.score() - 68.0).abs() < f64::EPSILON, "{seven:?}");
    }

    #[test]
    fn length_bonus_bands_ignore_configured_bounds() {
        let wide = AnchorScorer::new(3, 9);
        let score = |phrase: &str| wide.validate_anchor_text(phrase).score();
        // 50 + 8 (grooming) + length band.
        assert!((score("weekly grooming routine") - 58.0).abs() < f64::EPSILON);
        assert!((score("weekly grooming keeps coats shiny") - 78.0).abs() < f64::EPSILON);
        assert!((score("weekly grooming keeps your dog coat shiny") - 68.0).abs() < f64::EPSILON);
        assert!((score("weekly grooming keeps your older dog coat shiny") - 58.0).abs() < f64::EPSILON);
        assert!((score("weekly grooming keeps your older dog coat shiny indoors") - 58.0).abs() < f64::EPSILON);
    }

    #[test]
    fn best_anchor_requires_topical_overlap() {
        let s = scorer();
        let text = "Regular grooming sessions keep every coat healthy and clean.";
        assert!(s.find_best_anchor(text, &page(), None, &HashSet::new()).is_none());
    }

    #[test]
    fn best_anchor_prefers_higher_score_then_earlier_start() {
        let s = scorer();
        let text = "Owners who follow proven puppy training techniques see results. \
                    Consistent puppy training guide sessions help too.";
        let candidate = s.find_best_anchor(text, &page(), None, &HashSet::new()).expect("anchor");
        assert!(text.contains(&candidate.text));
        assert!(candidate.word_count >= 4 && candidate.word_count <= 7);
        assert!(candidate.text.to_lowercase().contains("puppy"));
        assert!(candidate.quality_score > 100.0);
    }

    #[test]
    fn used_anchor_texts_are_skipped() {
        let s = scorer();
        let text = "Start with proven puppy training techniques today.";
        let first = s.find_best_anchor(text, &page(), None, &HashSet::new()).expect("anchor");
        let used: HashSet<String> = [normalize_anchor(&first.text)].into_iter().collect();
        if let Some(second) = s.find_best_anchor(text, &page(), None, &used) {
            assert_ne!(normalize_anchor(&second.text), normalize_anchor(&first.text));
        }
    }

    #[test]
    fn heading_overlap_rejects_echoed_headings() {
        let s = scorer().with_max_heading_overlap(Some(0.4));
        let text = "Read about puppy training guide basics here.";
        let heading = "Puppy Training Guide Basics";
        assert!(s.find_best_anchor(text, &page(), Some(heading), &HashSet::new()).is_none());
        assert!(s.find_best_anchor(text, &page(), None, &HashSet::new()).is_some());
    }

    #[test]
    fn min_score_floor_applies_to_total() {
        let strict = scorer().with_min_score(500.0);
        let text = "Start with proven puppy training techniques today.";
        assert!(strict.find_best_anchor(text, &page(), None, &HashSet::new()).is_none());
    }

    #[test]
    fn custom_descriptive_vocabulary_replaces_builtin() {
        let s = scorer().with_descriptive_words(&["kibble"]);
        assert_eq!(
            s.validate_anchor_text("proven puppy training tips").rejection(),
            Some(Rejection::NotDescriptive)
        );
        assert!(s.validate_anchor_text("grain free kibble brands").is_valid());
    }

    #[test]
    fn ranking_prefers_score_then_position() {
        let text = "Owners praise proven puppy training techniques.";
        let ranked = scorer().rank_anchors(text, &page(), None, &HashSet::new());

        assert_eq!(ranked[0].text, "Owners praise proven puppy training techniques");
        assert!((ranked[0].quality_score - 134.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].text, "praise proven puppy training techniques");
        assert!(ranked
            .windows(2)
            .all(|w| w[0].quality_score >= w[1].quality_score));
    }

    #[test]
    fn anchor_text_keeps_source_punctuation_inside() {
        let s = scorer();
        let page = TargetPage::new("Step-by-Step Crate Training", "crate-training");
        let text = "Follow our step-by-step crate training checklist, then relax.";
        let candidate = s.find_best_anchor(text, &page, None, &HashSet::new()).expect("anchor");
        assert!(text.contains(&candidate.text));
        assert!(!candidate.text.ends_with(','));
    }
}
