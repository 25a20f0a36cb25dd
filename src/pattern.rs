//! Context and rewrite patterns.
//!
//! Patterns are written in `regex` syntax with one addition: an unescaped `#`
//! outside a character class is a word boundary, meaning the edge of the text
//! or a neighbouring whitespace character. Each pattern is compiled once,
//! anchored to the side of the span it inspects:
//!
//! - a left context must match text ending exactly at the span start,
//! - a right context must match text starting exactly at the span end.
//!
//! The `find` side of a rewrite rule is compiled together with its right
//! context, so the engine settles on a find match whose context holds.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use smol_str::SmolStr;

use crate::error::PatternError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Inner,
}

impl Side {
    fn boundary(self) -> &'static str {
        match self {
            Side::Left => r"(?:^|\s)",
            Side::Right => r"(?:\s|$)",
            Side::Inner => r"(?:^|\s|$)",
        }
    }
}

/// Replaces each `#` word boundary in `source` with its regex form for `side`.
fn expand_boundaries(source: &str, side: Side) -> String {
    let mut out = String::with_capacity(source.len() + 8);
    let mut chars = source.chars().peekable();
    let mut depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' => {
                depth += 1;
                out.push(c);
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                // `]` right after the opening bracket is a literal.
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if depth > 0 => {
                depth -= 1;
                out.push(c);
            }
            '#' if depth == 0 => out.push_str(side.boundary()),
            _ => out.push(c),
        }
    }
    out
}

/// A compiled left or right context.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: SmolStr,
    regex: Regex,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for Pattern {}

impl Pattern {
    /// Compiles a context that must end where the span starts.
    pub fn left(source: &str, case_insensitive: bool) -> Result<Pattern, PatternError> {
        let expanded = expand_boundaries(source, Side::Left);
        Self::build(source, &format!("(?:{expanded})$"), case_insensitive)
    }

    /// Compiles a context that must start where the span ends.
    pub fn right(source: &str, case_insensitive: bool) -> Result<Pattern, PatternError> {
        let expanded = expand_boundaries(source, Side::Right);
        Self::build(source, &format!("^(?:{expanded})"), case_insensitive)
    }

    fn build(
        source: &str,
        anchored: &str,
        case_insensitive: bool,
    ) -> Result<Pattern, PatternError> {
        let regex = RegexBuilder::new(anchored)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Pattern {
            source: SmolStr::new(source),
            regex,
        })
    }

    /// The text this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when a left context matches the end of `before`.
    pub fn matches_before(&self, before: &str) -> bool {
        self.regex.is_match(before)
    }

    /// True when a right context matches the start of `after`.
    pub fn matches_after(&self, after: &str) -> bool {
        self.regex.is_match(after)
    }
}

/// The `find` pattern of a rewrite rule fused with its right context.
#[derive(Debug, Clone)]
pub struct FindPattern {
    source: SmolStr,
    regex: Regex,
    nullable: bool,
}

impl PartialEq for FindPattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for FindPattern {}

impl FindPattern {
    pub fn compile(find: &str, right: Option<&str>) -> Result<FindPattern, PatternError> {
        let find_re = expand_boundaries(find, Side::Inner);
        let right_re = right.map(|r| expand_boundaries(r, Side::Right)).unwrap_or_default();
        let regex = Regex::new(&format!("({find_re})(?:{right_re})"))?;
        let nullable = Regex::new(&format!("^(?:{find_re})$"))?.is_match("");
        Ok(FindPattern {
            source: SmolStr::new(find),
            regex,
            nullable,
        })
    }

    /// The find text, without its right context.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the find side accepts the empty string.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Byte range of the leftmost find match at or after `pos` whose right
    /// context holds. `text` before `pos` is still visible to `#`.
    pub(crate) fn find_at(&self, text: &str, pos: usize) -> Option<Range<usize>> {
        let caps = self.regex.captures_at(text, pos)?;
        caps.get(1).map(|m| m.range())
    }
}
