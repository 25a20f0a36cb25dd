//! Rule-based orthography to IPA transduction.
//!
//! A [`LanguageTable`] holds ordered grapheme rules (pattern, optional
//! left/right context, phoneme) and an ordered cascade of phonological
//! rewrite rules. A [`Transliterator`] owns one table and exposes two
//! operations:
//!
//! - [`Transliterator::word_to_tokens`]: the full token sequence, one
//!   [`Token`] per matched span, with postprocessed phonemes.
//! - [`Transliterator::transliterate`]: the concatenated phoneme string.
//!
//! Both are total: characters no rule covers are passed through unchanged,
//! and the orthographic fields of the tokens always reassemble the input.
//!
//! ```
//! use epitran_rs::{PostRuleSpec, Replace, TableBuilder, Transliterator, Variant};
//!
//! let builder = TableBuilder::new()
//!     .map("g", "ɡ")
//!     .map("e", "e")
//!     .map("l", "l")
//!     .map("b", "b")
//!     .post(PostRuleSpec::new("[bdɡ]", Replace::translate("bdɡ", "ptk")).right("#"));
//!
//! let default = Transliterator::new(builder.build().unwrap());
//! assert_eq!(default.transliterate("gelb", false), "ɡelp");
//!
//! let np = Transliterator::new(builder.build_variant(&Variant::NoPostprocessing).unwrap());
//! assert_eq!(np.transliterate("gelb", false), "ɡelb");
//! ```

mod error;
mod ligatures;
mod matcher;
mod pattern;
mod postprocess;
pub mod puncnorm;
mod table;
mod token;

pub use error::{PatternError, TableError};
pub use ligatures::ligaturize;
pub use matcher::{Match, Matches, Segmenter};
pub use pattern::{FindPattern, Pattern};
pub use postprocess::Cascade;
pub use table::{
    GraphemeRule, LanguageTable, PostRule, PostRuleSpec, Replace, Scope, TableBuilder, Variant,
};
pub use token::{Category, Token};

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Canonicalize punctuation variants before matching.
    pub normalize_punctuation: bool,
    /// Fold tie-bar affricates into ligatures after postprocessing.
    pub ligatures: bool,
}

/// Transducer for one language table.
///
/// The table is immutable, so a `Transliterator` can be shared between
/// threads and used concurrently.
#[derive(Debug, Clone)]
pub struct Transliterator {
    table: LanguageTable,
}

impl Transliterator {
    pub fn new(table: LanguageTable) -> Self {
        Transliterator { table }
    }

    pub fn table(&self) -> &LanguageTable {
        &self.table
    }

    /// Segments `word` into tokens and postprocesses their phonemes.
    pub fn word_to_tokens(&self, word: &str, normalize_punctuation: bool) -> Vec<Token> {
        self.word_to_tokens_with(
            word,
            &Options {
                normalize_punctuation,
                ..Options::default()
            },
        )
    }

    /// Like [`word_to_tokens`](Self::word_to_tokens), with ligatures folded
    /// inside each token's phoneme when `options.ligatures` is set. An
    /// affricate split across two tokens is left as it is.
    pub fn word_to_tokens_with(&self, word: &str, options: &Options) -> Vec<Token> {
        let mut tokens = self.postprocessed(word, options.normalize_punctuation);
        if options.ligatures {
            for token in &mut tokens {
                if let std::borrow::Cow::Owned(folded) = ligaturize(&token.phoneme) {
                    token.phoneme = folded.into();
                }
            }
        }
        tokens
    }

    fn postprocessed(&self, text: &str, normalize_punctuation: bool) -> Vec<Token> {
        let segmenter = Segmenter::new(&self.table, text, normalize_punctuation);
        let mut tokens: Vec<Token> = segmenter
            .matches()
            .map(|m| Token::build(&segmenter, &m))
            .collect();

        // Word-scoped rules split on whitespace, so several words can share one pass.
        self.table.cascade().apply_tokens(&mut tokens);
        tokens
    }

    /// Transcribes `text` to a phoneme string.
    pub fn transliterate(&self, text: &str, normalize_punctuation: bool) -> String {
        self.transliterate_with(
            text,
            &Options {
                normalize_punctuation,
                ..Options::default()
            },
        )
    }

    pub fn transliterate_with(&self, text: &str, options: &Options) -> String {
        // Fast path: nothing to segment.
        if text.is_empty() {
            return String::new();
        }
        let tokens = self.postprocessed(text, options.normalize_punctuation);
        let mut out = String::with_capacity(text.len() * 2);
        for token in &tokens {
            out.push_str(&token.phoneme);
        }
        // Folded on the joined string so affricates spanning tokens are caught.
        if options.ligatures {
            ligaturize(&out).into_owned()
        } else {
            out
        }
    }
}
