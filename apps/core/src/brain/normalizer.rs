//! Text normalization.
//!
//! Every comparison in the brain works on normalized text: lowercase,
//! Vietnamese diacritics folded to base Latin letters, punctuation turned
//! into spaces and whitespace collapsed.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds `text` into the canonical matching form.
///
/// Precomposed and combining-mark spellings of the same word produce the
/// same output, and the function is idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => c,
            _ => ' ',
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true when `haystack` contains `needle` as a run of whole tokens.
///
/// Both arguments must already be normalized.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() || haystack.is_empty() {
        return false;
    }
    format!(" {} ", haystack).contains(&format!(" {} ", needle))
}
