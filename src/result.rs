//! Result types for link placement output.
//!
//! This module defines the structured output of a run: the processed
//! document, the placements made, the zone distribution report and run
//! statistics.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::zones::ZoneName;

/// A successful splice.
///
/// Recorded once per placed link and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPlacement {
    /// Document-order index of the block that received the link.
    pub element_index: usize,

    /// Zone the block belongs to.
    pub zone: ZoneName,

    /// Visible link text, exactly as it appears in the source.
    pub anchor_text: String,

    /// Slug of the linked page.
    pub target_slug: String,

    /// `href` written into the document.
    pub target_url: String,

    /// Number of words in the anchor.
    pub word_count: usize,

    /// Total anchor score (quality plus topical overlap).
    pub quality_score: f64,

    /// Word offset assigned to the link by the spacing gate.
    pub word_position: usize,
}

/// Link count of one zone against its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    /// Links placed.
    pub count: usize,
    /// Aspirational minimum.
    pub min: usize,
    /// Hard ceiling.
    pub max: usize,
}

/// Distribution of placed links across zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneReport {
    /// `false` when any zone exceeds its ceiling.
    pub is_valid: bool,

    /// One message per zone over its ceiling.
    pub violations: Vec<String>,

    /// Zones below their minimum. Informational only.
    pub underfilled: Vec<ZoneName>,

    /// Counts keyed by zone.
    pub per_zone: BTreeMap<ZoneName, ZoneCount>,
}

impl ZoneReport {
    /// One line per zone, `NAME: count/min-max`, flagged when under-filled
    /// or over the ceiling.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (name, c) in &self.per_zone {
            let flag = if c.count > c.max {
                " (over)"
            } else if c.count < c.min {
                " (under)"
            } else {
                ""
            };
            let _ = writeln!(out, "{name}: {}/{}-{}{flag}", c.count, c.min, c.max);
        }
        out
    }

    /// Total links across all zones.
    #[must_use]
    pub fn total(&self) -> usize {
        self.per_zone.values().map(|c| c.count).sum()
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Block elements found in the document.
    pub total_elements: usize,
    /// Blocks that passed the eligibility filter.
    pub eligible_elements: usize,
    /// Target pages that survived preparation.
    pub targets_considered: usize,
    /// Target pages dropped before placement (bad slug, unknown slug,
    /// duplicate, unlinkable URL, self reference).
    pub targets_rejected: usize,
    /// Elements passed over by the spacing gate.
    pub skipped_by_spacing: usize,
    /// Elements where no page produced a usable anchor.
    pub elements_without_anchor: usize,
    /// Anchors that were found but could not be spliced.
    pub failed_injections: usize,
    /// Links placed.
    pub links_placed: usize,
}

/// Result of a link placement run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkResult {
    /// The processed document. Byte-identical to the input outside the
    /// spliced ranges.
    pub html: String,

    /// Placements in the order they were made.
    pub placements: Vec<LinkPlacement>,

    /// Zone distribution.
    pub zone_report: ZoneReport,

    /// Run statistics.
    pub stats: LinkStats,
}

impl LinkResult {
    /// A result that returns `html` untouched.
    #[must_use]
    pub fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_string(),
            zone_report: ZoneReport {
                is_valid: true,
                ..ZoneReport::default()
            },
            ..Self::default()
        }
    }

    /// Whether no link was placed.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.placements.is_empty()
    }

    /// Serialize the result to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
