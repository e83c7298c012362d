//! Per-run placement state.
//!
//! `RunState` holds everything that changes while one document is processed:
//! zone counters, the spacing-gate word positions, the dedup sets and the
//! placements made so far. It is built fresh for every document and consumed
//! when the run finishes, so nothing carries over between documents.

use std::collections::HashSet;

use log::trace;

use crate::document::BlockElement;
use crate::result::{LinkPlacement, LinkStats};
use crate::scoring::AnchorCandidate;
use crate::target::ResolvedTarget;
use crate::text::normalize_anchor;
use crate::url_utils::normalize_slug;
use crate::zones::{Zone, ZoneName};

/// Where the orchestrator is in its scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Not started.
    Idle,
    /// Walking the eligible blocks of a zone.
    ProcessingZone(ZoneName),
    /// Deciding whether a block gets a link.
    ProcessingElement(usize),
    /// Looking for an anchor for one page in one block.
    TryingCandidate {
        /// Block index.
        element: usize,
        /// Page slug.
        slug: String,
    },
    /// A link was placed in the block.
    Placed(usize),
    /// The block was passed over.
    Skipped(usize),
    /// Finished.
    Done,
}

/// Mutable state of one placement run.
#[derive(Debug, Clone)]
pub struct RunState {
    zones: Vec<Zone>,
    total_words_processed: usize,
    last_link_word_position: Option<usize>,
    used_slugs: HashSet<String>,
    used_anchor_texts: HashSet<String>,
    placements: Vec<LinkPlacement>,
    stats: LinkStats,
    phase: Phase,
}

impl RunState {
    /// Fresh state over a copy of the zone table with zeroed counters.
    #[must_use]
    pub fn new(zones: &[Zone]) -> Self {
        Self {
            zones: zones.iter().map(Zone::reset).collect(),
            total_words_processed: 0,
            last_link_word_position: None,
            used_slugs: HashSet::new(),
            used_anchor_texts: HashSet::new(),
            placements: Vec::new(),
            stats: LinkStats::default(),
            phase: Phase::Idle,
        }
    }

    /// Zones with their current counts.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Whether the zone at `zone` can take another link.
    #[must_use]
    pub fn zone_has_capacity(&self, zone: usize) -> bool {
        self.zones.get(zone).is_some_and(Zone::has_capacity)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Move to another phase.
    pub fn enter(&mut self, phase: Phase) {
        trace!("rs-interlink: {:?} -> {phase:?}", self.phase);
        self.phase = phase;
    }

    /// Links placed so far.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.placements.len()
    }

    /// Words of the blocks visited so far.
    #[must_use]
    pub fn total_words_processed(&self) -> usize {
        self.total_words_processed
    }

    /// Gate position of the most recent link, if any.
    #[must_use]
    pub fn last_link_word_position(&self) -> Option<usize> {
        self.last_link_word_position
    }

    /// Whether enough words have passed since the last link.
    ///
    /// Always true before the first link.
    #[must_use]
    pub fn spacing_allows(&self, min_words_between_links: usize) -> bool {
        self.last_link_word_position
            .is_none_or(|last| self.total_words_processed.saturating_sub(last) >= min_words_between_links)
    }

    /// Count a visited block's words.
    pub fn advance(&mut self, word_count: usize) {
        self.total_words_processed += word_count;
    }

    /// Pass over a block because of the spacing gate.
    pub fn skip_for_spacing(&mut self, element: usize, word_count: usize) {
        self.stats.skipped_by_spacing += 1;
        self.enter(Phase::Skipped(element));
        self.advance(word_count);
    }

    /// Whether a page with this slug was already linked.
    #[must_use]
    pub fn is_slug_used(&self, slug: &str) -> bool {
        self.used_slugs.contains(&normalize_slug(slug))
    }

    /// Normalised anchor texts already used.
    #[must_use]
    pub fn used_anchor_texts(&self) -> &HashSet<String> {
        &self.used_anchor_texts
    }

    /// Run statistics, for the orchestrator to update.
    pub fn stats_mut(&mut self) -> &mut LinkStats {
        &mut self.stats
    }

    /// Record a link about to be spliced into `block`.
    ///
    /// Returns `None`, recording nothing, when the zone is already at its
    /// ceiling. Otherwise the zone count, dedup sets and spacing position are
    /// updated and the placement is returned.
    pub fn record_placement(
        &mut self,
        zone: usize,
        block: &BlockElement,
        anchor_text: &str,
        candidate: &AnchorCandidate,
        target: &ResolvedTarget,
    ) -> Option<&LinkPlacement> {
        let zone_ref = self.zones.get_mut(zone)?;
        if !zone_ref.try_record_link() {
            return None;
        }
        let zone_name = zone_ref.name;

        let word_position = self.total_words_processed + block.word_count / 2;
        self.last_link_word_position = Some(word_position);
        self.used_slugs.insert(normalize_slug(&target.page.slug));
        self.used_anchor_texts.insert(normalize_anchor(&candidate.text));
        self.stats.links_placed += 1;

        self.placements.push(LinkPlacement {
            element_index: block.index,
            zone: zone_name,
            anchor_text: anchor_text.to_string(),
            target_slug: target.page.slug.clone(),
            target_url: target.url.clone(),
            word_count: candidate.word_count,
            quality_score: candidate.quality_score,
            word_position,
        });
        self.enter(Phase::Placed(block.index));
        self.placements.last()
    }

    /// Finish the run, returning zones, placements and statistics.
    #[must_use]
    pub fn finish(mut self) -> (Vec<Zone>, Vec<LinkPlacement>, LinkStats) {
        self.enter(Phase::Done);
        (self.zones, self.placements, self.stats)
    }
}
