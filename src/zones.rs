//! Zone model.
//!
//! A document is divided into percentage bands by block position. Each band
//! carries a `[min, max]` link quota and a processing priority. Zones are
//! processed by ascending priority rather than by position so the most
//! valuable band (the middle of the article) is filled first when the link
//! budget is smaller than the sum of all quotas.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of a document zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneName {
    /// Opening 0–10%.
    Intro,
    /// 10–30%.
    EarlyBody,
    /// 30–60%.
    MidBody,
    /// 60–80%.
    LateBody,
    /// Closing 80–100%.
    FaqConclusion,
}

impl ZoneName {
    /// Upper-case name used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "INTRO",
            Self::EarlyBody => "EARLY_BODY",
            Self::MidBody => "MID_BODY",
            Self::LateBody => "LATE_BODY",
            Self::FaqConclusion => "FAQ_CONCLUSION",
        }
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A percentage band of the document with its link quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identity.
    pub name: ZoneName,
    /// Inclusive lower bound, percent of document position.
    pub start_percent: f64,
    /// Exclusive upper bound, percent of document position.
    pub end_percent: f64,
    /// Aspirational minimum; under-filling is informational.
    pub min_links: usize,
    /// Hard ceiling.
    pub max_links: usize,
    /// Processing order, lower first.
    pub priority: u32,
    #[serde(skip)]
    current_count: usize,
}

impl Zone {
    /// Create a zone with a zero link count.
    #[must_use]
    pub fn new(
        name: ZoneName,
        start_percent: f64,
        end_percent: f64,
        min_links: usize,
        max_links: usize,
        priority: u32,
    ) -> Self {
        Self {
            name,
            start_percent,
            end_percent,
            min_links,
            max_links,
            priority,
            current_count: 0,
        }
    }

    /// Links placed in this zone during the current run.
    #[must_use]
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    /// Whether the zone can take another link.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.current_count < self.max_links
    }

    /// Count a placed link. Refuses, returning `false`, at the ceiling.
    pub fn try_record_link(&mut self) -> bool {
        if self.has_capacity() {
            self.current_count += 1;
            true
        } else {
            false
        }
    }

    /// Copy of the zone with its count reset, for a fresh run.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            current_count: 0,
            ..self.clone()
        }
    }

    #[cfg(test)]
    pub(crate) fn force_count(&mut self, count: usize) {
        self.current_count = count;
    }

    fn contains(&self, percent: f64) -> bool {
        percent >= self.start_percent && percent < self.end_percent
    }
}

/// The five-zone table used by default.
///
/// | zone | range | links | priority |
/// |------|-------|-------|----------|
/// | INTRO | 0–10 | 0–1 | 5 |
/// | EARLY_BODY | 10–30 | 2–3 | 3 |
/// | MID_BODY | 30–60 | 3–4 | 1 |
/// | LATE_BODY | 60–80 | 2–3 | 2 |
/// | FAQ_CONCLUSION | 80–100 | 1–3 | 4 |
#[must_use]
pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new(ZoneName::Intro, 0.0, 10.0, 0, 1, 5),
        Zone::new(ZoneName::EarlyBody, 10.0, 30.0, 2, 3, 3),
        Zone::new(ZoneName::MidBody, 30.0, 60.0, 3, 4, 1),
        Zone::new(ZoneName::LateBody, 60.0, 80.0, 2, 3, 2),
        Zone::new(ZoneName::FaqConclusion, 80.0, 100.0, 1, 3, 4),
    ]
}

/// Index of the zone holding the element at `element_index`.
///
/// Position is `element_index / total_elements * 100`. The first zone whose
/// half-open range contains the position wins; anything left over (the 100%
/// edge, gaps in a custom table) falls to the last zone.
///
/// An empty zone table yields index 0; [`validate_zones`] rejects such
/// tables before a run starts.
///
/// # Examples
///
/// ```
/// use rs_interlink::zones::{assign_zone, default_zones, ZoneName};
///
/// let zones = default_zones();
/// assert_eq!(zones[assign_zone(0, 10, &zones)].name, ZoneName::Intro);
/// assert_eq!(zones[assign_zone(4, 10, &zones)].name, ZoneName::MidBody);
/// assert_eq!(zones[assign_zone(9, 10, &zones)].name, ZoneName::FaqConclusion);
/// ```
#[must_use]
pub fn assign_zone(element_index: usize, total_elements: usize, zones: &[Zone]) -> usize {
    if total_elements == 0 {
        return 0;
    }
    let percent = element_index as f64 / total_elements as f64 * 100.0;

    zones
        .iter()
        .position(|z| z.contains(percent))
        .unwrap_or_else(|| zones.len().saturating_sub(1))
}

/// Zone indices in processing order: ascending priority, stable on ties.
#[must_use]
pub fn processing_order(zones: &[Zone]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..zones.len()).collect();
    order.sort_by_key(|&i| zones[i].priority);
    order
}

/// Check that a zone table is usable.
///
/// # Errors
///
/// Returns [`Error::InvalidZones`] when the table is empty, a name appears
/// twice, a zone has an empty range or `min_links > max_links`, or the
/// ranges (sorted by start) do not cover `[0, 100)` contiguously.
pub fn validate_zones(zones: &[Zone]) -> Result<()> {
    if zones.is_empty() {
        return Err(Error::InvalidZones("no zones configured".to_string()));
    }

    let mut names = HashSet::with_capacity(zones.len());
    for zone in zones {
        if !names.insert(zone.name) {
            return Err(Error::InvalidZones(format!("{} configured more than once", zone.name)));
        }
        if zone.min_links > zone.max_links {
            return Err(Error::InvalidZones(format!(
                "{}: min_links {} exceeds max_links {}",
                zone.name, zone.min_links, zone.max_links
            )));
        }
        if zone.start_percent.is_nan()
            || zone.end_percent.is_nan()
            || zone.start_percent >= zone.end_percent
        {
            return Err(Error::InvalidZones(format!(
                "{}: empty range {}..{}",
                zone.name, zone.start_percent, zone.end_percent
            )));
        }
    }

    let mut sorted: Vec<&Zone> = zones.iter().collect();
    sorted.sort_by(|a, b| a.start_percent.total_cmp(&b.start_percent));

    let mut expected = 0.0_f64;
    for zone in &sorted {
        if (zone.start_percent - expected).abs() > f64::EPSILON {
            return Err(Error::InvalidZones(format!(
                "{} starts at {} but previous coverage ends at {}",
                zone.name, zone.start_percent, expected
            )));
        }
        expected = zone.end_percent;
    }
    if expected < 100.0 {
        return Err(Error::InvalidZones(format!(
            "zones end at {expected}, coverage must reach 100"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zones_are_valid() {
        assert!(validate_zones(&default_zones()).is_ok());
    }

    #[test]
    fn assignment_follows_half_open_ranges() {
        let zones = default_zones();
        let names: Vec<ZoneName> = (0..10).map(|i| zones[assign_zone(i, 10, &zones)].name).collect();
        assert_eq!(
            names,
            vec![
                ZoneName::Intro,
                ZoneName::EarlyBody,
                ZoneName::EarlyBody,
                ZoneName::MidBody,
                ZoneName::MidBody,
                ZoneName::MidBody,
                ZoneName::LateBody,
                ZoneName::LateBody,
                ZoneName::FaqConclusion,
                ZoneName::FaqConclusion,
            ]
        );
    }

    #[test]
    fn out_of_range_position_falls_to_last_zone() {
        let zones = default_zones();
        assert_eq!(assign_zone(10, 10, &zones), zones.len() - 1);
        assert_eq!(assign_zone(3, 0, &zones), 0);
    }

    #[test]
    fn processing_order_is_by_priority() {
        let zones = default_zones();
        let order: Vec<ZoneName> = processing_order(&zones).into_iter().map(|i| zones[i].name).collect();
        assert_eq!(
            order,
            vec![
                ZoneName::MidBody,
                ZoneName::LateBody,
                ZoneName::EarlyBody,
                ZoneName::FaqConclusion,
                ZoneName::Intro,
            ]
        );
    }

    #[test]
    fn record_link_never_exceeds_ceiling() {
        let mut zone = Zone::new(ZoneName::MidBody, 0.0, 100.0, 0, 2, 1);
        assert!(zone.try_record_link());
        assert!(zone.try_record_link());
        assert!(!zone.try_record_link());
        assert_eq!(zone.current_count(), 2);
        assert_eq!(zone.reset().current_count(), 0);
    }

    #[test]
    fn validate_rejects_gaps_and_inverted_quotas() {
        let gap = vec![
            Zone::new(ZoneName::Intro, 0.0, 10.0, 0, 1, 1),
            Zone::new(ZoneName::MidBody, 20.0, 100.0, 0, 1, 2),
        ];
        assert!(matches!(validate_zones(&gap), Err(Error::InvalidZones(_))));

        let inverted = vec![Zone::new(ZoneName::MidBody, 0.0, 100.0, 3, 1, 1)];
        assert!(matches!(validate_zones(&inverted), Err(Error::InvalidZones(_))));

        let short = vec![Zone::new(ZoneName::MidBody, 0.0, 90.0, 0, 1, 1)];
        assert!(validate_zones(&short).is_err());

        assert!(validate_zones(&[]).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let split_mid = vec![
            Zone::new(ZoneName::MidBody, 0.0, 50.0, 0, 2, 1),
            Zone::new(ZoneName::MidBody, 50.0, 100.0, 0, 2, 2),
        ];
        let err = validate_zones(&split_mid).unwrap_err();
        assert!(matches!(err, Error::InvalidZones(msg) if msg.contains("MID_BODY")));
    }

    #[test]
    fn zone_names_serialize_screaming_snake() {
        let json = serde_json::to_string(&ZoneName::FaqConclusion).expect("serialize");
        assert_eq!(json, "\"FAQ_CONCLUSION\"");
        assert_eq!(ZoneName::EarlyBody.to_string(), "EARLY_BODY");
    }
}
