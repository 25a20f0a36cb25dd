//! Segmenting matcher.
//!
//! At each cursor position the matcher tries every span length from the
//! table's lookahead window down to one character. The first length with a
//! rule whose contexts hold wins, so length always outranks context. Within
//! a length, the table's index order (context-constrained first, then
//! declaration order) decides. If nothing matches, one character is passed
//! through unchanged.
//!
//! Contexts are evaluated on the case-folded input, composed to NFC, so a
//! decomposed accent satisfies a context written with the composed letter.

use std::borrow::Cow;

use smol_str::SmolStr;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::puncnorm;
use crate::table::{GraphemeRule, LanguageTable};

/// Lowercase form of `c` used for rule lookup.
pub(crate) fn fold_char(c: char) -> SmolStr {
    match c {
        c if c.is_ascii() => SmolStr::new(c.to_ascii_lowercase().encode_utf8(&mut [0; 4])),
        // Dotted capital I folds to a plain `i`, without a combining dot above.
        'İ' => SmolStr::new("i"),
        c => c.to_lowercase().collect(),
    }
}

fn compose(text: String) -> String {
    if is_nfc_quick(text.chars()) == IsNormalized::Yes {
        text
    } else {
        text.nfc().collect()
    }
}

/// One input character as the matcher sees it.
#[derive(Debug, Clone)]
struct Fold {
    /// After punctuation normalization, case preserved.
    canonical: char,
    /// `canonical` lowercased; may be longer than one character.
    folded: SmolStr,
    remapped: bool,
}

impl Fold {
    fn new(c: char, normalize_punctuation: bool) -> Fold {
        let remap = if normalize_punctuation { puncnorm::canonical(c) } else { None };
        let canonical = remap.unwrap_or(c);
        Fold {
            canonical,
            folded: fold_char(canonical),
            remapped: remap.is_some(),
        }
    }

    /// Whether composition can join this character to the one before it.
    fn continues_cluster(&self) -> bool {
        self.folded
            .chars()
            .next()
            .is_some_and(|c| canonical_combining_class(c) != 0)
    }
}

/// The span consumed by one matching step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    /// Character offset of the span.
    pub start: usize,
    /// Span length in characters.
    pub len: usize,
    /// The selected rule; `None` for pass-through.
    pub rule: Option<&'t GraphemeRule>,
}

/// Prepared input text bound to a table.
#[derive(Debug)]
pub struct Segmenter<'t> {
    table: &'t LanguageTable,
    chars: Vec<char>,
    folds: Vec<Fold>,
    /// Folded text composed cluster by cluster, as contexts see it.
    view: String,
    /// Byte offset into `view` of each character boundary that falls
    /// between clusters.
    offsets: Vec<Option<usize>>,
    normalize_punctuation: bool,
}

impl<'t> Segmenter<'t> {
    pub fn new(table: &'t LanguageTable, text: &str, normalize_punctuation: bool) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let folds: Vec<Fold> = chars
            .iter()
            .map(|&c| Fold::new(c, normalize_punctuation))
            .collect();

        let mut view = String::with_capacity(text.len());
        let mut offsets = vec![None; chars.len() + 1];
        let mut cluster = String::new();
        for (i, fold) in folds.iter().enumerate() {
            if i == 0 || !fold.continues_cluster() {
                view.push_str(&compose(std::mem::take(&mut cluster)));
                offsets[i] = Some(view.len());
            }
            cluster.push_str(&fold.folded);
        }
        view.push_str(&compose(cluster));
        offsets[chars.len()] = Some(view.len());

        Segmenter {
            table,
            chars,
            folds,
            view,
            offsets,
            normalize_punctuation,
        }
    }

    /// Input length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn normalizes_punctuation(&self) -> bool {
        self.normalize_punctuation
    }

    /// Best match at `cursor`.
    pub fn match_at(&self, cursor: usize) -> Match<'t> {
        let remaining = self.chars.len().saturating_sub(cursor);
        let window = self.table.window().min(remaining);
        let before = self.view_before(cursor.min(self.chars.len()));

        for len in (1..=window).rev() {
            let end = cursor + len;
            let key = self.composed(cursor, end);
            let mut candidates = self
                .table
                .candidates(&key, self.normalize_punctuation)
                .peekable();
            if candidates.peek().is_none() {
                continue;
            }
            let after = self.view_after(end);
            if let Some(rule) = candidates.find(|rule| rule.context_holds(&before, &after)) {
                log::trace!("{:?} at {} -> {:?}", key, cursor, rule.phoneme());
                return Match {
                    start: cursor,
                    len,
                    rule: Some(rule),
                };
            }
        }

        Match {
            start: cursor,
            len: remaining.min(1),
            rule: None,
        }
    }

    /// Successive matches covering the whole input.
    pub fn matches(&self) -> Matches<'_, 't> {
        Matches {
            segmenter: self,
            cursor: 0,
        }
    }

    /// Case-folded NFC text of `start..end`; the lookup key of a span.
    fn composed(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for fold in &self.folds[start..end] {
            text.push_str(&fold.folded);
        }
        compose(text)
    }

    /// Composed folded text before character `i`.
    fn view_before(&self, i: usize) -> Cow<'_, str> {
        match self.offsets[i] {
            Some(offset) => Cow::Borrowed(&self.view[..offset]),
            None => Cow::Owned(self.composed(0, i)),
        }
    }

    /// Composed folded text from character `i` on.
    fn view_after(&self, i: usize) -> Cow<'_, str> {
        match self.offsets[i] {
            Some(offset) => Cow::Borrowed(&self.view[offset..]),
            None => Cow::Owned(self.composed(i, self.folds.len())),
        }
    }

    /// Original characters of a match.
    pub(crate) fn original(&self, m: &Match<'_>) -> &[char] {
        &self.chars[m.start..m.start + m.len]
    }

    /// Characters of a match after punctuation normalization.
    pub(crate) fn canonical(&self, m: &Match<'_>) -> impl Iterator<Item = char> + '_ {
        self.folds[m.start..m.start + m.len].iter().map(|f| f.canonical)
    }

    /// Whether normalization changed any character of a match.
    pub(crate) fn remapped(&self, m: &Match<'_>) -> bool {
        self.folds[m.start..m.start + m.len].iter().any(|f| f.remapped)
    }
}

/// Iterator returned by [`Segmenter::matches`].
#[derive(Debug)]
pub struct Matches<'s, 't> {
    segmenter: &'s Segmenter<'t>,
    cursor: usize,
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        if self.cursor >= self.segmenter.len() {
            return None;
        }
        let m = self.segmenter.match_at(self.cursor);
        self.cursor += m.len;
        Some(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableBuilder;

    fn spans(table: &LanguageTable, text: &str, normalize: bool) -> Vec<(String, Option<String>)> {
        let segmenter = Segmenter::new(table, text, normalize);
        segmenter
            .matches()
            .map(|m| {
                let orth: String = segmenter.original(&m).iter().collect();
                (orth, m.rule.map(|r| r.phoneme().to_string()))
            })
            .collect()
    }

    #[test]
    fn longest_match_wins() {
        let table = TableBuilder::new()
            .map("o", "ɒ")
            .map("oʻ", "o")
            .map("s", "s")
            .map("sch", "ʃ")
            .build()
            .unwrap();
        let got = spans(&table, "oʻsch", false);
        assert_eq!(got[0], ("oʻ".to_string(), Some("o".to_string())));
        assert_eq!(got[1], ("sch".to_string(), Some("ʃ".to_string())));
    }

    #[test]
    fn length_outranks_context() {
        let table = TableBuilder::new()
            .map_in_context("e", "ə", "", "r#")
            .map("er", "ɐ")
            .map("r", "r")
            .build()
            .unwrap();
        assert_eq!(spans(&table, "er", false)[0].1.as_deref(), Some("ɐ"));
    }

    #[test]
    fn context_rule_outranks_free_rule() {
        let table = TableBuilder::new()
            .map("c", "k")
            .map_in_context("c", "θ", "", "[ei]")
            .map("e", "e")
            .map("a", "a")
            .build()
            .unwrap();
        let got: Vec<_> = spans(&table, "ceca", false)
            .into_iter()
            .map(|(_, p)| p.unwrap())
            .collect();
        assert_eq!(got, ["θ", "e", "k", "a"]);
    }

    #[test]
    fn declaration_order_breaks_ties() {
        let table = TableBuilder::new()
            .map_in_context("a", "first", "#", "")
            .map_in_context("a", "second", "", "#")
            .build()
            .unwrap();
        assert_eq!(spans(&table, "a", false)[0].1.as_deref(), Some("first"));
    }

    #[test]
    fn case_folding_keeps_original() {
        let table = TableBuilder::new().map("sch", "ʃ").build().unwrap();
        let got = spans(&table, "SCH", false);
        assert_eq!(got, [("SCH".to_string(), Some("ʃ".to_string()))]);
    }

    #[test]
    fn unmatched_character_passes_through() {
        let table = TableBuilder::new().map("a", "a").build().unwrap();
        let got = spans(&table, "a#b", false);
        assert_eq!(got[1], ("#".to_string(), None));
        assert_eq!(got[2], ("b".to_string(), None));
    }

    #[test]
    fn decomposed_input_reaches_composed_pattern() {
        let table = TableBuilder::new().map("é", "e").build().unwrap();
        let got = spans(&table, "e\u{301}", false);
        assert_eq!(got, [("e\u{301}".to_string(), Some("e".to_string()))]);
    }

    #[test]
    fn contexts_see_composed_input() {
        let table = TableBuilder::new()
            .map("c", "k")
            .map_in_context("c", "θ", "", "[éí]")
            .map("é", "e")
            .build()
            .unwrap();
        let composed = spans(&table, "cé", false);
        let decomposed = spans(&table, "ce\u{301}", false);
        assert_eq!(composed[0].1.as_deref(), Some("θ"));
        assert_eq!(decomposed[0].1.as_deref(), Some("θ"));
        assert_eq!(decomposed[1], ("e\u{301}".to_string(), Some("e".to_string())));
    }

    #[test]
    fn left_context_sees_composed_input() {
        let table = TableBuilder::new()
            .map("a", "a")
            .map_in_context("s", "z", "[á]", "")
            .map("s", "s")
            .build()
            .unwrap();
        assert_eq!(spans(&table, "a\u{301}s", false)[2].1.as_deref(), Some("z"));
    }

    #[test]
    fn uppercase_context_literals_match_any_case() {
        let table = TableBuilder::new()
            .map("c", "k")
            .map_in_context("c", "s", "", "[EI]")
            .map("e", "e")
            .build()
            .unwrap();
        assert_eq!(spans(&table, "ce", false)[0].1.as_deref(), Some("s"));
        assert_eq!(spans(&table, "CE", false)[0].1.as_deref(), Some("s"));
    }

    #[test]
    fn dotted_capital_i_folds_to_i() {
        assert_eq!(fold_char('İ'), "i");
        assert_eq!(fold_char('I'), "i");
        let table = TableBuilder::new().map("i", "i").build().unwrap();
        assert_eq!(spans(&table, "İ", false), [("İ".to_string(), Some("i".to_string()))]);
    }

    #[test]
    fn normalization_selects_canonical_rule() {
        let table = TableBuilder::new().map("'", "").build().unwrap();
        assert_eq!(spans(&table, "’", false)[0].1, None);
        assert_eq!(spans(&table, "’", true)[0].1.as_deref(), Some(""));
    }

    #[test]
    fn empty_input_has_no_matches() {
        let table = TableBuilder::new().map("a", "a").build().unwrap();
        assert!(spans(&table, "", false).is_empty());
        assert_eq!(Segmenter::new(&table, "", false).match_at(0).len, 0);
    }
}
