//! Error types raised while constructing a language table.
//!
//! Transcoding itself never fails; every error here is reported once, when a
//! table is built.

use smol_str::SmolStr;

/// A context or rewrite pattern that failed to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PatternError {
    /// Rejected by the regex compiler
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Errors detected while building a [`LanguageTable`](crate::LanguageTable).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// A grapheme rule with nothing to match
    #[error("grapheme rule {order}: empty pattern")]
    EmptyPattern { order: usize },

    /// Two grapheme rules with identical pattern and contexts
    #[error("grapheme rule {order}: duplicates rule {first} for pattern {pattern:?}")]
    DuplicateRule {
        order: usize,
        first: usize,
        pattern: SmolStr,
    },

    /// A context or find pattern failed to compile
    #[error("invalid pattern {pattern:?}: {error}")]
    Pattern {
        pattern: SmolStr,
        #[source]
        error: PatternError,
    },

    /// A rewrite rule whose find pattern accepts the empty string
    #[error("rewrite rule {index}: pattern {pattern:?} can match the empty string")]
    EmptyFind { index: usize, pattern: SmolStr },

    /// A translation replacement with unequal sides
    #[error("rewrite rule {index}: translation maps {from} characters onto {to}")]
    TranslateLength { index: usize, from: usize, to: usize },
}
