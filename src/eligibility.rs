//! Paragraph eligibility.

use crate::document::BlockElement;
use crate::options::Options;

/// Why a block may not receive a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    /// Fewer words than `min_paragraph_words`.
    TooShort,
    /// Already linked.
    HasLink,
    /// Inside a skipped container.
    Excluded,
    /// First block of the document.
    First,
    /// Last block of the document.
    Last,
}

/// Check one block against the eligibility rules.
///
/// `total` is the number of blocks in the document.
///
/// # Errors
///
/// Returns the first rule the block fails.
pub fn check_block(block: &BlockElement, total: usize, options: &Options) -> Result<(), Ineligible> {
    if options.avoid_first_paragraph && block.index == 0 {
        return Err(Ineligible::First);
    }
    if options.avoid_last_paragraph && block.index + 1 == total {
        return Err(Ineligible::Last);
    }
    if block.is_excluded_section {
        return Err(Ineligible::Excluded);
    }
    if block.has_existing_link {
        return Err(Ineligible::HasLink);
    }
    if block.word_count < options.min_paragraph_words {
        return Err(Ineligible::TooShort);
    }
    Ok(())
}

/// Document-order indices of the blocks that may receive a link.
#[must_use]
pub fn select_eligible(blocks: &[BlockElement], options: &Options) -> Vec<usize> {
    blocks
        .iter()
        .filter(|b| check_block(b, blocks.len(), options).is_ok())
        .map(|b| b.index)
        .collect()
}
