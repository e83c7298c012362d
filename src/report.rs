//! Zone distribution report.

use std::collections::BTreeMap;

use log::warn;

use crate::result::{ZoneCount, ZoneReport};
use crate::zones::Zone;

/// Summarise link counts per zone.
///
/// A zone over its ceiling is a violation and makes the report invalid.
/// A zone under its minimum is listed in `underfilled` but does not.
///
/// # Examples
///
/// ```
/// use rs_interlink::report::build_report;
/// use rs_interlink::zones::default_zones;
///
/// let report = build_report(&default_zones());
/// assert!(report.is_valid);
/// assert_eq!(report.underfilled.len(), 4);
/// ```
#[must_use]
pub fn build_report(zones: &[Zone]) -> ZoneReport {
    let mut per_zone = BTreeMap::new();
    let mut violations = Vec::new();
    let mut underfilled = Vec::new();

    for zone in zones {
        let count = zone.current_count();
        per_zone.insert(
            zone.name,
            ZoneCount {
                count,
                min: zone.min_links,
                max: zone.max_links,
            },
        );

        if count > zone.max_links {
            let message = format!("{}: exceeds maximum ({count}/{})", zone.name, zone.max_links);
            warn!("rs-interlink: {message}");
            violations.push(message);
        } else if count < zone.min_links {
            underfilled.push(zone.name);
        }
    }

    ZoneReport {
        is_valid: violations.is_empty(),
        violations,
        underfilled,
        per_zone,
    }
}
