//! Reading normalization.
//!
//! ATOK exports readings in half-width or full-width katakana, while every
//! other format expects hiragana. Readings are NFKC normalized first, which
//! folds half-width katakana (including separate voicing marks) into
//! full-width forms, then shifted from the katakana block to hiragana.

use unicode_normalization::UnicodeNormalization;

/// Offset between a katakana code point and its hiragana counterpart.
const KANA_OFFSET: u32 = 0x60;

/// Normalizes a reading to full-width hiragana.
///
/// Characters without a hiragana counterpart (ー, ヷ..ヺ, latin, digits) are
/// kept as NFKC produced them.
pub fn normalize_kana(text: &str) -> String {
    text.nfkc().map(to_hiragana).collect()
}

fn to_hiragana(c: char) -> char {
    match c {
        // ァ..ヶ and the iteration marks ヽ ヾ
        '\u{30A1}'..='\u{30F6}' | '\u{30FD}' | '\u{30FE}' => {
            char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
        }
        _ => c,
    }
}
