//! Folding of tie-bar affricates into single-glyph ligatures.

use std::borrow::Cow;

use phf::phf_map;

const TIE: char = '\u{361}';

static LIGATURES: phf::Map<&'static str, char> = phf_map! {
    "t͡s" => 'ʦ',
    "t͡ʃ" => 'ʧ',
    "t͡ɕ" => 'ʨ',
    "d͡z" => 'ʣ',
    "d͡ʒ" => 'ʤ',
    "d͡ʑ" => 'ʥ',
};

/// Replaces every known `X͡Y` affricate in `phonemes` with its ligature.
pub fn ligaturize(phonemes: &str) -> Cow<'_, str> {
    if !phonemes.contains(TIE) {
        return Cow::Borrowed(phonemes);
    }
    let chars: Vec<char> = phonemes.chars().collect();
    let mut out = String::with_capacity(phonemes.len());
    let mut key = String::with_capacity(8);
    let mut i = 0;
    while i < chars.len() {
        if chars.get(i + 1) == Some(&TIE) && i + 2 < chars.len() {
            key.clear();
            key.extend(&chars[i..i + 3]);
            if let Some(&lig) = LIGATURES.get(key.as_str()) {
                out.push(lig);
                i += 3;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_affricates() {
        assert_eq!(ligaturize("niːt͡ʃə"), "niːʧə");
        assert_eq!(ligaturize("d͡ʒat͡s"), "ʤaʦ");
    }

    #[test]
    fn leaves_unknown_ties() {
        assert_eq!(ligaturize("k͡p"), "k͡p");
        assert!(matches!(ligaturize("vasər"), Cow::Borrowed(_)));
    }
}
