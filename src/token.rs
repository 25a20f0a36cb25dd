//! Structured output units.

use std::fmt;

use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

use crate::matcher::{Match, Segmenter};
use crate::puncnorm;

/// Coarse category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Letter,
    Punctuation,
    Unknown,
}

impl Category {
    /// Category of a single character from its Unicode general category.
    pub fn of(c: char) -> Category {
        let gc = GeneralCategory::of(c);
        if gc.is_letter() {
            Category::Letter
        } else if gc.is_punctuation() {
            Category::Punctuation
        } else {
            Category::Unknown
        }
    }

    /// One-letter tag: `L`, `P` or `U`.
    pub fn tag(self) -> char {
        match self {
            Category::Letter => 'L',
            Category::Punctuation => 'P',
            Category::Unknown => 'U',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One matched span of the input.
///
/// Concatenating `orthographic` over a token sequence reproduces the input
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub category: Category,
    /// First character of `orthographic` is uppercase.
    pub is_upper_initial: bool,
    /// The consumed input, original casing.
    pub orthographic: SmolStr,
    pub phoneme: SmolStr,
}

impl Token {
    pub fn as_tuple(&self) -> (Category, bool, &str, &str) {
        (
            self.category,
            self.is_upper_initial,
            self.orthographic.as_str(),
            self.phoneme.as_str(),
        )
    }

    /// Builds the token for `m`.
    ///
    /// A rule match is a `Letter` unless punctuation normalization rewrote
    /// part of the span and the normalized span is all punctuation. A
    /// pass-through token carries its (normalized) character as phoneme and
    /// takes its category from Unicode, except that apostrophes are letters
    /// when normalization is off.
    pub(crate) fn build(segmenter: &Segmenter<'_>, m: &Match<'_>) -> Token {
        let orthographic: SmolStr = segmenter.original(m).iter().copied().collect();
        let is_upper_initial = orthographic.chars().next().is_some_and(char::is_uppercase);

        let (category, phoneme) = match m.rule {
            Some(rule) => {
                let reclassified = segmenter.remapped(m)
                    && segmenter
                        .canonical(m)
                        .all(|c| Category::of(c) == Category::Punctuation);
                let category = if reclassified {
                    Category::Punctuation
                } else {
                    Category::Letter
                };
                (category, SmolStr::new(rule.phoneme()))
            }
            None => {
                let canonical: SmolStr = segmenter.canonical(m).collect();
                let keep_apostrophe = !segmenter.normalizes_punctuation();
                let category = match canonical.chars().next() {
                    // Without normalization an apostrophe stays part of the word.
                    Some(c) if keep_apostrophe && puncnorm::is_apostrophe(c) => Category::Letter,
                    Some(c) => Category::of(c),
                    None => Category::Unknown,
                };
                (category, canonical)
            }
        };

        Token {
            category,
            is_upper_initial,
            orthographic,
            phoneme,
        }
    }
}
