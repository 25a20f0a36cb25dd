//! Postprocessing cascade.
//!
//! Each enabled rewrite rule runs exactly once, in declared order, as a single
//! left-to-right pass over the output of the previous rule. Matches do not
//! overlap, and contexts are evaluated against the string the pass started
//! from. There is no fixpoint iteration.
//!
//! Every phoneme character is tagged with the index of the token it came
//! from, so a rewritten string can be split back into per-token phonemes.

use smol_str::SmolStr;

use crate::table::{PostRule, Replace, Scope};
use crate::token::Token;

/// The enabled rewrite rules of a table.
#[derive(Debug, Clone)]
pub struct Cascade<'t> {
    rules: Vec<&'t PostRule>,
}

impl<'t> Cascade<'t> {
    pub(crate) fn new(rules: Vec<&'t PostRule>) -> Self {
        Cascade { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrites a phoneme string.
    pub fn apply(&self, phonemes: &str) -> String {
        if self.is_empty() {
            return phonemes.to_string();
        }
        let mut channel = Channel::default();
        channel.copy(phonemes, &vec![0; phonemes.chars().count()]);
        for rule in &self.rules {
            channel = channel.rewrite(rule);
        }
        channel.text
    }

    /// Rewrites the phoneme channel of `tokens` in place. Orthography,
    /// category and case flag are untouched.
    pub fn apply_tokens(&self, tokens: &mut [Token]) {
        if self.is_empty() {
            return;
        }
        let mut channel = Channel::default();
        for (i, token) in tokens.iter().enumerate() {
            for c in token.phoneme.chars() {
                channel.push(c, i);
            }
        }
        for rule in &self.rules {
            channel = channel.rewrite(rule);
        }

        let mut phonemes = vec![String::new(); tokens.len()];
        for (c, owner) in channel.text.chars().zip(channel.owners) {
            phonemes[owner].push(c);
        }
        for (token, phoneme) in tokens.iter_mut().zip(phonemes) {
            token.phoneme = SmolStr::from(phoneme);
        }
    }
}

/// Phoneme text with the token index that owns each character.
#[derive(Debug, Default)]
struct Channel {
    text: String,
    owners: Vec<usize>,
}

impl Channel {
    fn with_capacity(text: usize, chars: usize) -> Self {
        Channel {
            text: String::with_capacity(text),
            owners: Vec::with_capacity(chars),
        }
    }

    #[inline]
    fn push(&mut self, c: char, owner: usize) {
        self.text.push(c);
        self.owners.push(owner);
    }

    /// Appends `text` unchanged; returns its length in characters.
    fn copy(&mut self, text: &str, owners: &[usize]) -> usize {
        let mut n = 0;
        for (c, &owner) in text.chars().zip(owners) {
            self.push(c, owner);
            n += 1;
        }
        n
    }

    fn rewrite(&self, rule: &PostRule) -> Channel {
        let mut out = Channel::with_capacity(self.text.len(), self.owners.len());
        match rule.scope() {
            Scope::Text => rewrite_span(rule, &self.text, &self.owners, &mut out),
            Scope::Word => {
                let mut at = 0;
                for (space, run) in runs(&self.text) {
                    let n = run.chars().count();
                    let owners = &self.owners[at..at + n];
                    if space {
                        out.copy(run, owners);
                    } else {
                        rewrite_span(rule, run, owners, &mut out);
                    }
                    at += n;
                }
            }
        }
        out
    }
}

/// Splits `text` into alternating whitespace and non-whitespace runs.
fn runs(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let space = rest.chars().next()?.is_whitespace();
        let end = rest
            .find(|c: char| c.is_whitespace() != space)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some((space, run))
    })
}

fn rewrite_span(rule: &PostRule, text: &str, owners: &[usize], out: &mut Channel) {
    let mut pos = 0;
    let mut at = 0;
    while let Some(range) = rule.next_match(text, pos) {
        at += out.copy(&text[pos..range.start], &owners[at..]);
        let matched = &text[range.clone()];
        let n = matched.chars().count();
        log::trace!("rewrite {:?} at {}: {:?}", rule.find().source(), range.start, matched);
        emit(rule.replace(), matched, &owners[at..at + n], out);
        at += n;
        pos = range.end;
    }
    out.copy(&text[pos..], &owners[at..]);
}

fn emit(replace: &Replace, matched: &str, owners: &[usize], out: &mut Channel) {
    match replace {
        Replace::Literal(s) => {
            // Literal output belongs to the token of the first matched character.
            let owner = owners[0];
            for c in s.chars() {
                out.push(c, owner);
            }
        }
        Replace::Translate { .. } => {
            for (c, &owner) in matched.chars().zip(owners) {
                out.push(replace.map_char(c), owner);
            }
        }
    }
}
