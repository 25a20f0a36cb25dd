//! Language tables shared by the integration tests.
//!
//! These are small hand-written tables, enough to cover the words the tests
//! transcribe. They are not complete orthographies.
#![allow(dead_code)]

use epitran_rs::{PostRuleSpec, Replace, TableBuilder, Transliterator, Variant};

/// Consonant followed by a vowel: the open-syllable context for long vowels.
const GERMAN_OPEN: &str = "[bdfgɡhklmnprstvwz][aeiouäöü]";
const DUTCH_OPEN: &str = "[bcdfgɡhjklmnpqrstvwxz][aeiouy]";

fn german_builder() -> TableBuilder {
    TableBuilder::new()
        .map("a", "a")
        .map_in_context("a", "aː", "", GERMAN_OPEN)
        .map("ah", "aː")
        .map("ä", "ɛ")
        .map("äh", "eː")
        .map("b", "b")
        .map("c", "k")
        .map("ch", "x")
        .map("ck", "k")
        .map("d", "d")
        .map("e", "e")
        .map_in_context("e", "eː", "", GERMAN_OPEN)
        .map_in_context("e", "ə", "", "#")
        .map_in_context("er", "ər", "", "#")
        .map_in_context("en", "ən", "", "#")
        .map("ei", "aj")
        .map("eu", "ɔʏ")
        .map("f", "f")
        .map("g", "ɡ")
        .map("ɡ", "ɡ")
        .map("h", "h")
        .map("i", "i")
        .map("ie", "iː")
        .map("j", "j")
        .map("k", "k")
        .map("l", "l")
        .map("m", "m")
        .map("mm", "m")
        .map("n", "n")
        .map("ng", "ŋ")
        .map("nk", "ŋk")
        .map("o", "o")
        .map("ö", "ø")
        .map("p", "p")
        .map("qu", "kv")
        .map("r", "r")
        .map("s", "s")
        .map_in_context("s", "z", "#", "[aeiouäöü]")
        .map("ss", "s")
        .map("ß", "s")
        .map("sch", "ʃ")
        .map("t", "t")
        .map("tsch", "t͡ʃ")
        .map("tz", "t͡s")
        .map("tzsch", "t͡ʃ")
        .map("u", "u")
        .map("ü", "y")
        .map("v", "f")
        .map("w", "v")
        .map("x", "ks")
        .map("y", "y")
        .map("z", "t͡s")
        .post(
            PostRuleSpec::new("[bdɡvzʒ]", Replace::translate("bdɡvzʒ", "ptkfsʃ"))
                .right("#|[bdɡvzʒptkfsʃxç]")
                .group("devoicing"),
        )
}

pub fn german() -> Transliterator {
    Transliterator::new(german_builder().build().expect("german table"))
}

/// German without postprocessing (the "-np" variant).
pub fn german_np() -> Transliterator {
    Transliterator::new(
        german_builder()
            .build_variant(&Variant::NoPostprocessing)
            .expect("german-np table"),
    )
}

pub fn spanish() -> Transliterator {
    let table = TableBuilder::new()
        .map("a", "a")
        .map("á", "a")
        .map("b", "b")
        .map("c", "k")
        .map_in_context("c", "s", "", "[eiéí]")
        .map("ch", "t͡ʃ")
        .map("d", "d")
        .map("e", "e")
        .map("é", "e")
        .map("f", "f")
        .map("g", "ɡ")
        .map_in_context("g", "x", "", "[eiéí]")
        .map_in_context("gu", "ɡ", "", "[eiéí]")
        .map("h", "")
        .map("i", "i")
        .map_in_context("i", "j", "", "[aeouáéóú]")
        .map("í", "i")
        .map("j", "x")
        .map("k", "k")
        .map("l", "l")
        .map("ll", "ʝ")
        .map("m", "m")
        .map("n", "n")
        .map("ñ", "ɲ")
        .map("o", "o")
        .map("ó", "o")
        .map("p", "p")
        .map("qu", "k")
        .map("r", "ɾ")
        .map_in_context("r", "r", "#", "")
        .map("rr", "r")
        .map("s", "s")
        .map("t", "t")
        .map("u", "u")
        .map_in_context("u", "w", "", "[aeioáéíó]")
        .map("ú", "u")
        .map("ü", "w")
        .map("v", "b")
        .map("x", "ks")
        .map("y", "ʝ")
        .map("z", "s")
        .build()
        .expect("spanish table");
    Transliterator::new(table)
}

fn turkish_builder() -> TableBuilder {
    TableBuilder::new()
        .map("a", "a")
        .map("b", "b")
        .map("c", "d͡ʒ")
        .map("ç", "t͡ʃ")
        .map("d", "d")
        .map("e", "e")
        .map("f", "f")
        .map("g", "ɡ")
        .map("ğ", "ː")
        .map("h", "h")
        .map("ı", "ɯ")
        .map("i", "i")
        .map("j", "ʒ")
        .map("k", "k")
        .map("l", "l")
        .map("m", "m")
        .map("n", "n")
        .map("o", "o")
        .map("ö", "œ")
        .map("p", "p")
        .map("r", "ɾ")
        .map("s", "s")
        .map("ş", "ʃ")
        .map("t", "t")
        .map("u", "u")
        .map("ü", "y")
        .map("v", "v")
        .map("y", "j")
        .map("z", "z")
}

/// Turkish with no rule for apostrophes: they pass through.
pub fn turkish() -> Transliterator {
    Transliterator::new(turkish_builder().build().expect("turkish table"))
}

/// Turkish with the suffix apostrophe elided.
pub fn turkish_eliding() -> Transliterator {
    Transliterator::new(
        turkish_builder()
            .map("'", "")
            .build()
            .expect("turkish table with elision"),
    )
}

pub fn uzbek() -> Transliterator {
    let table = TableBuilder::new()
        .map("a", "a")
        .map("b", "b")
        .map("ch", "t͡ʃ")
        .map("d", "d̪")
        .map("e", "e")
        .map("ë", "ja")
        .map("f", "ɸ")
        .map("g", "ɡ")
        .map("gʻ", "ʁ")
        .map("g'", "ʁ")
        .map("h", "h")
        .map("i", "i")
        .map("j", "d͡ʒ")
        .map("k", "k")
        .map("l", "l")
        .map("m", "m")
        .map("n", "n")
        .map("ng", "ŋ")
        .map("o", "ɒ")
        .map("oʻ", "o")
        .map("o'", "o")
        .map("p", "p")
        .map("q", "q")
        .map("r", "r")
        .map("s", "s")
        .map("sh", "ʃ")
        .map("t", "t̪")
        .map("u", "u")
        .map("v", "v")
        .map("x", "χ")
        .map("y", "j")
        .map("z", "z")
        .map("ʼ", "ʔ")
        .build()
        .expect("uzbek table");
    Transliterator::new(table)
}

pub fn dutch() -> Transliterator {
    let table = TableBuilder::new()
        .map("a", "ɑ")
        .map_in_context("a", "aː", "", DUTCH_OPEN)
        .map("aa", "aː")
        .map("b", "b")
        .map("c", "k")
        .map("ch", "x")
        .map("d", "d")
        .map("e", "ɛ")
        .map_in_context("e", "eː", "", DUTCH_OPEN)
        .map("ee", "eː")
        .map("ei", "ɛj")
        .map("eu", "øː")
        .map("f", "f")
        .map("g", "ɣ")
        .map("h", "h")
        .map("i", "ɪ")
        .map("ie", "i")
        .map("ij", "ɛj")
        .map("j", "j")
        .map("k", "k")
        .map("l", "l")
        .map("m", "m")
        .map("n", "n")
        .map("ng", "ŋ")
        .map("nk", "ŋk")
        .map("o", "ɔ")
        .map_in_context("o", "oː", "", DUTCH_OPEN)
        .map("oe", "u")
        .map("oo", "oː")
        .map("ou", "ʌu")
        .map("p", "p")
        .map("r", "r")
        .map("s", "s")
        .map("sch", "sx")
        .map_in_context("sch", "s", "", "#")
        .map("t", "t")
        .map("u", "ʏ")
        .map_in_context("u", "y", "", DUTCH_OPEN)
        .map("ui", "œy")
        .map("uu", "y")
        .map("v", "v")
        .map("w", "ʋ")
        .map("z", "z")
        .post(
            PostRuleSpec::new("[bdvzɣ]", Replace::translate("bdvzɣ", "ptfsx"))
                .right("#")
                .group("devoicing"),
        )
        .build()
        .expect("dutch table");
    Transliterator::new(table)
}

/// Phonemes of `word_to_tokens` joined together.
pub fn assemble(t: &Transliterator, word: &str) -> String {
    t.word_to_tokens(word, false)
        .iter()
        .map(|tok| tok.phoneme.as_str())
        .collect()
}
