//! Block extraction and byte-exact reassembly.
//!
//! A document is scanned once with the offset tokenizer. Every `<p>` and
//! `<li>` becomes a [`BlockElement`] holding the byte range of its content
//! and a mutable copy of that content. Rendering copies the source verbatim
//! and substitutes each block's current markup for its range, so a document
//! whose blocks were not touched renders to exactly the input.
//!
//! Blocks never overlap: when one block contains another (an `<li>` wrapping
//! a `<p>`), only the innermost is kept.
//!
//! Skip selectors need a real tree. When any are configured, block start
//! tags are tagged with [`BLOCK_MARKER`] in a scratch copy of the source and
//! [`SkipList::excluded_blocks`] answers from the parsed copy.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::ops::Range;

use log::debug;

use crate::dom;
use crate::markup::{tokenize, Token, TokenKind};
use crate::selector::{SkipList, BLOCK_MARKER};
use crate::text::count_words;

/// Tags that form linkable blocks.
pub const BLOCK_TAGS: &[&str] = &["p", "li"];

/// Headings whose text is offered to the scorer as context.
const CONTEXT_HEADINGS: &[&str] = &["h2", "h3", "h4"];

/// Start tags that implicitly close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements an implicit `<p>` close does not reach past.
const PARAGRAPH_SCOPE: &[&str] = &["button", "table", "td", "th", "caption", "template", "object"];

/// Elements an implicit `<li>` close does not reach past.
const LIST_SCOPE: &[&str] = &["ul", "ol", "menu"];

/// A paragraph or list item of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockElement {
    /// Document-order position among all blocks. Never changes.
    pub index: usize,
    /// `p` or `li`.
    pub tag: String,
    /// Visible text with entities decoded.
    pub raw_text: String,
    /// Current markup of the block's content; written back on render.
    pub inner_markup: String,
    /// Words in `raw_text`.
    pub word_count: usize,
    /// Already holds a link, or sits inside one.
    pub has_existing_link: bool,
    /// Inside a container matched by a skip selector.
    pub is_excluded_section: bool,
    /// Text of the closest preceding `h2`-`h4`.
    pub nearby_heading: Option<String>,
    range: Range<usize>,
}

impl BlockElement {
    /// Byte range of the block's content in the source.
    #[must_use]
    pub fn inner_range(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// A source document split into blocks.
#[derive(Debug, Clone)]
pub struct LinkDocument<'a> {
    source: &'a str,
    blocks: Vec<BlockElement>,
}

struct OpenElement {
    name: String,
    content_start: usize,
    block: Option<PendingBlock>,
}

struct PendingBlock {
    start_tag: usize,
    in_link: bool,
    heading: Option<String>,
}

struct ClosedBlock {
    tag: String,
    range: Range<usize>,
    start_tag: usize,
    in_link: bool,
    heading: Option<String>,
}

#[derive(Default)]
struct Scanner {
    stack: Vec<OpenElement>,
    closed: Vec<ClosedBlock>,
    heading: Option<String>,
}

impl Scanner {
    /// Pop elements down to and including `depth`, ending each at `end`.
    fn close_to(&mut self, depth: usize, end: usize, source: &str) {
        while self.stack.len() > depth {
            let Some(open) = self.stack.pop() else {
                break;
            };
            let range = open.content_start..end.max(open.content_start);

            if let Some(block) = open.block {
                self.closed.push(ClosedBlock {
                    tag: open.name,
                    range,
                    start_tag: block.start_tag,
                    in_link: block.in_link,
                    heading: block.heading,
                });
            } else if CONTEXT_HEADINGS.contains(&open.name.as_str()) {
                let text = dom::text_content(&source[range]);
                let text = text.trim();
                if !text.is_empty() {
                    self.heading = Some(text.to_string());
                }
            }
        }
    }

    /// Depth of the innermost open `name`, not looking past `scope`.
    fn find_in_scope(&self, name: &str, scope: &[&str]) -> Option<usize> {
        for (depth, open) in self.stack.iter().enumerate().rev() {
            if open.name == name {
                return Some(depth);
            }
            if scope.contains(&open.name.as_str()) {
                return None;
            }
        }
        None
    }
}

impl<'a> LinkDocument<'a> {
    /// Scan `source` for blocks.
    ///
    /// Never fails: unbalanced markup closes what it can, and anything left
    /// open ends at the end of the input.
    #[must_use]
    pub fn parse(source: &'a str, skip: &SkipList) -> Self {
        let tokens = tokenize(source);
        let mut scanner = Scanner::default();

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::StartTag => {
                    let name = token.name.as_str();
                    if CLOSES_PARAGRAPH.contains(&name) {
                        if let Some(depth) = scanner.find_in_scope("p", PARAGRAPH_SCOPE) {
                            scanner.close_to(depth, token.range.start, source);
                        }
                    }
                    if name == "li" {
                        if let Some(depth) = scanner.find_in_scope("li", LIST_SCOPE) {
                            scanner.close_to(depth, token.range.start, source);
                        }
                    }
                    if !token.opens_element() {
                        continue;
                    }

                    let block = BLOCK_TAGS.contains(&name).then(|| PendingBlock {
                        start_tag: i,
                        in_link: scanner.stack.iter().any(|o| o.name == "a"),
                        heading: scanner.heading.clone(),
                    });
                    scanner.stack.push(OpenElement {
                        name: token.name.clone(),
                        content_start: token.range.end,
                        block,
                    });
                }
                TokenKind::EndTag => {
                    if let Some(depth) = scanner.stack.iter().rposition(|o| o.name == token.name) {
                        scanner.close_to(depth, token.range.start, source);
                    }
                }
                TokenKind::Text | TokenKind::RawText | TokenKind::Declaration => {}
            }
        }
        scanner.close_to(0, source.len(), source);

        let excluded = if skip.is_empty() {
            HashSet::new()
        } else {
            skip.excluded_blocks(&mark_blocks(source, &tokens, &scanner.closed))
        };
        let blocks = build_blocks(source, scanner.closed, &excluded);
        debug!("rs-interlink: found {} blocks", blocks.len());

        Self { source, blocks }
    }

    /// The source the document was parsed from.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Blocks in document order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockElement] {
        &self.blocks
    }

    /// Mutable access to the blocks, for splicing.
    pub fn blocks_mut(&mut self) -> &mut [BlockElement] {
        &mut self.blocks
    }

    /// Reassemble the document from the source and the current block markup.
    #[must_use]
    pub fn render(&self) -> String {
        let extra: usize = self
            .blocks
            .iter()
            .map(|b| b.inner_markup.len().saturating_sub(b.range.len()))
            .sum();
        let mut out = String::with_capacity(self.source.len() + extra);
        let mut pos = 0;

        for block in &self.blocks {
            out.push_str(&self.source[pos..block.range.start]);
            out.push_str(&block.inner_markup);
            pos = block.range.end;
        }
        out.push_str(&self.source[pos..]);
        out
    }
}

/// Copy of `source` with each block start tag carrying its token index in
/// [`BLOCK_MARKER`].
fn mark_blocks(source: &str, tokens: &[Token], closed: &[ClosedBlock]) -> String {
    let mut starts: Vec<usize> = closed.iter().map(|b| b.start_tag).collect();
    starts.sort_unstable();

    let mut out = String::with_capacity(source.len() + starts.len() * (BLOCK_MARKER.len() + 8));
    let mut pos = 0;
    for i in starts {
        let tag = &tokens[i].range;
        let insert = if source[tag.clone()].ends_with('>') { tag.end - 1 } else { tag.end };
        out.push_str(&source[pos..insert]);
        let _ = write!(out, " {BLOCK_MARKER}=\"{i}\"");
        pos = insert;
    }
    out.push_str(&source[pos..]);
    out
}

/// Keep innermost blocks only, in document order, and fill in their content.
fn build_blocks(source: &str, mut closed: Vec<ClosedBlock>, excluded: &HashSet<usize>) -> Vec<BlockElement> {
    closed.sort_by_key(|b| b.range.start);

    let innermost: Vec<ClosedBlock> = {
        let mut keep = Vec::with_capacity(closed.len());
        let mut iter = closed.into_iter().peekable();
        while let Some(block) = iter.next() {
            let contains_next = iter
                .peek()
                .is_some_and(|next| next.range.start < block.range.end);
            if !contains_next {
                keep.push(block);
            }
        }
        keep
    };

    innermost
        .into_iter()
        .enumerate()
        .map(|(index, block)| {
            let inner_markup = source[block.range.clone()].to_string();
            let raw_text = dom::text_content(&inner_markup).to_string();
            let has_link = dom::contains_link(&inner_markup);

            BlockElement {
                index,
                tag: block.tag,
                word_count: count_words(&raw_text),
                raw_text,
                has_existing_link: has_link || block.in_link,
                is_excluded_section: excluded.contains(&block.start_tag),
                nearby_heading: block.heading,
                inner_markup,
                range: block.range,
            }
        })
        .collect()
}
