//! Offset-preserving markup tokenizer.
//!
//! Splits an HTML string into text, tag and declaration tokens while keeping
//! the byte range of each in the source. The engine never re-serialises a
//! tree: every edit is a byte-range splice, so anything outside the spliced
//! range stays byte-identical.
//!
//! The tokenizer is deliberately lenient. A `<` that does not open a valid
//! tag is text; unclosed elements are simply never popped. It does not decode
//! entities (see [`crate::dom`] for that).

use std::ops::Range;

use regex::Regex;

use crate::patterns::{DECLARATION_AT_START, TAG_ATTRIBUTE, TAG_AT_START};

/// Elements that never have content or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text rather than markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Kind of a markup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Character data between tags.
    Text,
    /// Content of a raw-text element such as `<script>`.
    RawText,
    /// `<name ...>` or `<name ... />`.
    StartTag,
    /// `</name>`.
    EndTag,
    /// Comment, doctype or processing instruction.
    Declaration,
}

/// One token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Byte range in the tokenized string.
    pub range: Range<usize>,
    /// Lower-case tag name; empty for non-tag tokens.
    pub name: String,
    /// Attributes with lower-case names, in source order.
    pub attributes: Vec<(String, String)>,
    /// `<name ... />` syntax.
    pub self_closing: bool,
}

impl Token {
    fn text(kind: TokenKind, range: Range<usize>) -> Self {
        Self {
            kind,
            range,
            name: String::new(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// Value of an attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether this start tag opens an element that will be closed later.
    #[must_use]
    pub fn opens_element(&self) -> bool {
        self.kind == TokenKind::StartTag && !self.self_closing && !is_void(&self.name)
    }
}

/// Whether `name` is a void element.
#[must_use]
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Tokenize `html` into contiguous tokens covering the whole string.
///
/// # Examples
///
/// ```
/// use rs_interlink::markup::{tokenize, TokenKind};
///
/// let tokens = tokenize(r#"<p class="x">Hi <b>there</b></p>"#);
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![
///     TokenKind::StartTag, TokenKind::Text, TokenKind::StartTag,
///     TokenKind::Text, TokenKind::EndTag, TokenKind::EndTag,
/// ]);
/// assert_eq!(tokens[0].attr("class"), Some("x"));
/// ```
#[must_use]
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let lt = pos + offset;
        let rest = &html[lt..];

        if let Some(m) = DECLARATION_AT_START.find(rest) {
            push_text(&mut tokens, text_start, lt);
            tokens.push(Token::text(TokenKind::Declaration, lt..lt + m.end()));
            pos = lt + m.end();
            text_start = pos;
            continue;
        }

        let Some(caps) = TAG_AT_START.captures(rest) else {
            // Stray '<' is text.
            pos = lt + 1;
            continue;
        };

        push_text(&mut tokens, text_start, lt);
        let end = lt + caps.get(0).map_or(1, |m| m.end());
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str()).to_ascii_lowercase();
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());
        let attributes = caps
            .get(3)
            .map(|m| parse_attributes(m.as_str()))
            .unwrap_or_default();

        let kind = if closing { TokenKind::EndTag } else { TokenKind::StartTag };
        let raw_text = kind == TokenKind::StartTag
            && !self_closing
            && RAW_TEXT_ELEMENTS.contains(&name.as_str());
        let close_pattern = format!("</{name}");

        tokens.push(Token {
            kind,
            range: lt..end,
            name,
            attributes,
            self_closing,
        });
        pos = end;
        text_start = pos;

        if raw_text {
            let raw_end = html[pos..]
                .to_ascii_lowercase()
                .find(&close_pattern)
                .map_or(html.len(), |i| pos + i);
            if raw_end > pos {
                tokens.push(Token::text(TokenKind::RawText, pos..raw_end));
            }
            pos = raw_end;
            text_start = pos;
        }
    }

    push_text(&mut tokens, text_start, html.len());
    tokens
}

fn push_text(tokens: &mut Vec<Token>, start: usize, end: usize) {
    if end > start {
        tokens.push(Token::text(TokenKind::Text, start..end));
    }
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    TAG_ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

/// For every token, whether it sits inside an open `<a>` element.
///
/// Tracks a simple open-element stack: start tags push, end tags pop back to
/// the nearest element of the same name (unmatched end tags are ignored).
#[must_use]
pub fn link_ancestry(tokens: &[Token]) -> Vec<bool> {
    let mut stack: Vec<&str> = Vec::new();
    let mut inside = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind {
            TokenKind::StartTag => {
                inside.push(stack.contains(&"a"));
                if token.opens_element() {
                    stack.push(token.name.as_str());
                }
            }
            TokenKind::EndTag => {
                if let Some(i) = stack.iter().rposition(|n| *n == token.name) {
                    stack.truncate(i);
                }
                inside.push(stack.contains(&"a"));
            }
            _ => inside.push(stack.contains(&"a")),
        }
    }

    inside
}

/// First occurrence of a pattern in the visible text of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// Byte range of the match in the fragment.
    pub range: Range<usize>,
    /// Whether the text containing the match is already inside a link.
    pub inside_link: bool,
}

/// Find the first match of `pattern` lying entirely inside one text token.
///
/// Matches that fall in tag names, attribute values, comments or raw-text
/// elements, or that straddle a tag, are not occurrences and are skipped.
#[must_use]
pub fn find_in_text(markup: &str, pattern: &Regex) -> Option<TextMatch> {
    let tokens = tokenize(markup);
    let ancestry = link_ancestry(&tokens);

    for m in pattern.find_iter(markup) {
        let Some(i) = tokens.iter().position(|t| t.range.contains(&m.start())) else {
            continue;
        };
        let token = &tokens[i];
        if token.kind == TokenKind::Text && m.end() <= token.range.end {
            return Some(TextMatch {
                range: m.range(),
                inside_link: ancestry[i],
            });
        }
    }

    None
}
