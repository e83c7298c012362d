//! Placement pipeline.
//!
//! Orchestrates one run: target preparation, block extraction, eligibility,
//! zone assignment, the priority-ordered scan with its spacing gate, anchor
//! search and injection, then the report and the reassembled document.

use log::{debug, info, trace, warn};

use crate::document::{BlockElement, LinkDocument};
use crate::eligibility::select_eligible;
use crate::injector::inject_exact_with_attributes;
use crate::options::Options;
use crate::report::build_report;
use crate::result::LinkResult;
use crate::scoring::AnchorScorer;
use crate::selector::SkipList;
use crate::target::{prepare_targets, ResolvedTarget, TargetPage};
use crate::zones::{assign_zone, processing_order};

use super::state::{Phase, RunState};

/// Place internal links into `html`.
///
/// Never fails. Invalid options, an empty document or an empty page list
/// return the input unchanged with no placements. When nothing is placed the
/// returned HTML is the input, byte for byte.
#[must_use]
pub fn place_links(html: &str, pages: &[TargetPage], options: &Options) -> LinkResult {
    if let Err(e) = options.validate() {
        warn!("rs-interlink: invalid options, returning document unchanged: {e}");
        return LinkResult::unchanged(html);
    }
    if html.trim().is_empty() || pages.is_empty() {
        debug!("rs-interlink: nothing to link");
        return LinkResult::unchanged(html);
    }

    let registry = options.slug_registry();
    let (targets, rejected) = prepare_targets(
        pages,
        &options.base_url,
        registry.as_ref(),
        options.current_keyword.as_deref(),
        options.page_order,
    );

    let skip = SkipList::new(&options.skip_selectors);
    let mut doc = LinkDocument::parse(html, &skip);
    let total_elements = doc.blocks().len();
    let eligible = select_eligible(doc.blocks(), options);

    let mut state = RunState::new(&options.zones);
    {
        let stats = state.stats_mut();
        stats.total_elements = total_elements;
        stats.eligible_elements = eligible.len();
        stats.targets_considered = targets.len();
        stats.targets_rejected = rejected;
    }
    debug!(
        "rs-interlink: {total_elements} blocks, {} eligible, {} targets ({rejected} rejected)",
        eligible.len(),
        targets.len()
    );

    let membership: Vec<usize> = eligible
        .iter()
        .map(|&i| assign_zone(i, total_elements, state.zones()))
        .collect();
    let scorer = AnchorScorer::from_options(options);

    if !targets.is_empty() {
        scan(&mut doc, &eligible, &membership, &targets, &scorer, options, &mut state);
    }

    let (zones, placements, stats) = state.finish();
    let zone_report = build_report(&zones);
    info!(
        "rs-interlink: placed {}/{} links",
        placements.len(),
        options.total_target_links
    );

    let html = if placements.is_empty() {
        html.to_string()
    } else {
        doc.render()
    };

    LinkResult {
        html,
        placements,
        zone_report,
        stats,
    }
}

/// Walk zones by priority and their eligible blocks in document order.
fn scan(
    doc: &mut LinkDocument<'_>,
    eligible: &[usize],
    membership: &[usize],
    targets: &[ResolvedTarget],
    scorer: &AnchorScorer,
    options: &Options,
    state: &mut RunState,
) {
    let budget = options.total_target_links;

    'zones: for zone in processing_order(state.zones()) {
        if state.placed() >= budget {
            break;
        }
        let zone_name = state.zones()[zone].name;
        state.enter(Phase::ProcessingZone(zone_name));

        let members = eligible
            .iter()
            .zip(membership)
            .filter(|(_, &z)| z == zone)
            .map(|(&i, _)| i);

        for index in members {
            if !state.zone_has_capacity(zone) {
                debug!("rs-interlink: {zone_name} is full");
                break;
            }
            if state.placed() >= budget {
                break 'zones;
            }

            let Some(block) = doc.blocks_mut().get_mut(index) else {
                continue;
            };
            let word_count = block.word_count;

            if !state.spacing_allows(options.min_words_between_links) {
                state.skip_for_spacing(index, word_count);
                continue;
            }

            state.enter(Phase::ProcessingElement(index));
            if fill_block(block, zone, targets, scorer, options, state) == 0 {
                state.stats_mut().elements_without_anchor += 1;
                state.enter(Phase::Skipped(index));
            }
            state.advance(word_count);
        }
    }
}

/// Place up to the per-block limit of links in one block.
///
/// More than one link per block is only attempted when no spacing is
/// required, since any positive gap cannot be met inside a single block.
fn fill_block(
    block: &mut BlockElement,
    zone: usize,
    targets: &[ResolvedTarget],
    scorer: &AnchorScorer,
    options: &Options,
    state: &mut RunState,
) -> usize {
    let limit = if options.min_words_between_links == 0 {
        options.max_links_per_paragraph
    } else {
        1
    };

    let mut placed = 0;
    while placed < limit
        && state.zone_has_capacity(zone)
        && state.placed() < options.total_target_links
        && place_one(block, zone, targets, scorer, options, state)
    {
        placed += 1;
    }
    placed
}

/// Try each unused page in order; the first anchor that splices wins.
///
/// A page's anchors are tried best first. Lower-ranked ones only matter when
/// a better phrase cannot be spliced, for example because it now overlaps a
/// link placed earlier in the same block.
fn place_one(
    block: &mut BlockElement,
    zone: usize,
    targets: &[ResolvedTarget],
    scorer: &AnchorScorer,
    options: &Options,
    state: &mut RunState,
) -> bool {
    for target in targets {
        if state.is_slug_used(&target.page.slug) {
            continue;
        }
        state.enter(Phase::TryingCandidate {
            element: block.index,
            slug: target.page.slug.clone(),
        });

        let ranked = scorer.rank_anchors(
            &block.raw_text,
            &target.page,
            block.nearby_heading.as_deref(),
            state.used_anchor_texts(),
        );
        if ranked.is_empty() {
            continue;
        }

        let spliced = ranked.iter().find_map(|candidate| {
            let injection = inject_exact_with_attributes(
                &block.inner_markup,
                &candidate.text,
                &target.url,
                &options.link_attributes,
            );
            if injection.success {
                injection.matched.map(|matched| (candidate, matched, injection.markup))
            } else {
                trace!(
                    "rs-interlink: could not splice '{}' into block {}: {:?}",
                    candidate.text, block.index, injection.failure
                );
                None
            }
        });
        let Some((candidate, matched, markup)) = spliced else {
            state.stats_mut().failed_injections += 1;
            continue;
        };

        let Some(placement) = state.record_placement(zone, block, &matched, candidate, target) else {
            return false;
        };
        debug!(
            "rs-interlink: {} block {}: '{}' -> {}",
            placement.zone, placement.element_index, placement.anchor_text, placement.target_url
        );
        block.inner_markup = markup;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::{Zone, ZoneName};

    fn filler(n: usize) -> String {
        vec!["filler"; n].join(" ")
    }

    #[test]
    fn invalid_options_leave_document_unchanged() {
        let html = "<p>anything</p>";
        let options = Options {
            min_anchor_words: 9,
            max_anchor_words: 3,
            ..Options::default()
        };
        let result = place_links(html, &[TargetPage::new("Guide", "guide")], &options);
        assert_eq!(result.html, html);
        assert!(result.placements.is_empty());
    }

    #[test]
    fn single_block_receives_link() {
        let html = format!(
            "<p>{} Owners rely on proven puppy training techniques every day. {}</p>",
            filler(30),
            filler(30)
        );
        let options = Options {
            avoid_first_paragraph: false,
            avoid_last_paragraph: false,
            ..Options::default()
        };
        let pages = [TargetPage::new("Puppy Training", "puppy-training")];
        let result = place_links(&html, &pages, &options);

        assert_eq!(result.placements.len(), 1);
        let placement = &result.placements[0];
        assert_eq!(placement.target_url, "/puppy-training/");
        assert!(result.html.contains(&format!(
            "<a href=\"/puppy-training/\">{}</a>",
            placement.anchor_text
        )));
        assert_eq!(result.stats.links_placed, 1);
    }

    #[test]
    fn multiple_links_per_block_need_zero_spacing() {
        let html = format!(
            "<p>{} Start with proven puppy training techniques, then add advanced grooming basics routines. {}</p>",
            filler(30),
            filler(30)
        );
        let pages = [
            TargetPage::new("Puppy Training", "puppy-training"),
            TargetPage::new("Grooming Basics", "grooming-basics"),
        ];
        let base = Options {
            avoid_first_paragraph: false,
            avoid_last_paragraph: false,
            max_links_per_paragraph: 2,
            zones: vec![Zone::new(ZoneName::MidBody, 0.0, 100.0, 0, 4, 1)],
            ..Options::default()
        };

        let spaced = place_links(&html, &pages, &base);
        assert_eq!(spaced.placements.len(), 1);

        let packed = place_links(
            &html,
            &pages,
            &Options {
                min_words_between_links: 0,
                ..base
            },
        );
        assert_eq!(packed.placements.len(), 2);
        assert_eq!(packed.placements[0].element_index, packed.placements[1].element_index);
    }
}
