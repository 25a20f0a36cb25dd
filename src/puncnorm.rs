//! Punctuation normalization.
//!
//! Maps typographic variants (curly quotes, modifier-letter apostrophes, dash
//! variants, full-width forms) onto one canonical glyph each. The table is
//! generated by build.rs from `data/puncnorm.json`.

use std::borrow::Cow;

// Include the phf map generated by build.rs.
mod puncnorm_table {
    include!(concat!(env!("OUT_DIR"), "/puncnorm_table.rs"));
}

/// Canonical replacement for `c`, or `None` if `c` is not a known variant.
#[inline]
pub fn canonical(c: char) -> Option<char> {
    // ASCII is canonical except for the backtick.
    if c.is_ascii() && c != '`' {
        return None;
    }
    puncnorm_table::PUNCNORM.get(&c).copied()
}

/// Whether `c` is the ASCII apostrophe or one of its variants.
pub fn is_apostrophe(c: char) -> bool {
    c == '\'' || canonical(c) == Some('\'')
}

/// `c` after normalization.
#[inline]
pub fn normalize_char(c: char) -> char {
    canonical(c).unwrap_or(c)
}

/// Normalizes every punctuation variant in `text`.
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| canonical(c).is_none()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().map(normalize_char).collect())
}
