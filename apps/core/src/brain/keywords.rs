//! Token helpers shared by the classifier, the scorer and the matcher.
//!
//! All functions expect text that already went through [`normalize`](super::normalizer::normalize),
//! so tokens are plain ASCII separated by single spaces.

use std::collections::HashSet;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Longest consonant cluster a real syllable carries ("ngh", "str").
const MAX_CONSONANT_RUN: usize = 3;

/// Longest vowel cluster a real syllable carries ("uye", "oai").
const MAX_VOWEL_RUN: usize = 3;

/// Tokens used by the overlap score: single characters carry no signal.
pub fn overlap_tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().filter(|t| t.len() > 1).collect()
}

/// Tokens used by the word-overlap bonus (length > 2).
pub fn significant_tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().filter(|t| t.len() > 2).collect()
}

/// Set form of [`significant_tokens`].
pub fn significant_token_set(normalized: &str) -> HashSet<&str> {
    significant_tokens(normalized).into_iter().collect()
}

/// A token looks like a word rather than keyboard mash.
///
/// It must be longer than one character, contain one of `a e i o u`, and
/// must not stack more consonants or vowels than a syllable can hold.
/// `y` counts as a vowel for the run check, as in Vietnamese spelling.
pub fn is_meaningful_token(token: &str) -> bool {
    if token.len() <= 1 || !token.contains(VOWELS) {
        return false;
    }

    let mut consonant_run = 0;
    let mut vowel_run = 0;
    for c in token.chars() {
        if !c.is_ascii_alphabetic() {
            consonant_run = 0;
            vowel_run = 0;
        } else if VOWELS.contains(&c) || c == 'y' {
            vowel_run += 1;
            consonant_run = 0;
        } else {
            consonant_run += 1;
            vowel_run = 0;
        }
        if consonant_run > MAX_CONSONANT_RUN || vowel_run > MAX_VOWEL_RUN {
            return false;
        }
    }
    true
}

/// Fraction of tokens that are meaningful, `None` when there are no tokens.
pub fn meaningful_ratio(normalized: &str) -> Option<f32> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    let meaningful = tokens.iter().filter(|t| is_meaningful_token(t)).count();
    Some(meaningful as f32 / tokens.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_tokens_drop_single_chars() {
        assert_eq!(overlap_tokens("a gia b hoc"), vec!["gia", "hoc"]);
        assert!(overlap_tokens("").is_empty());
    }

    #[test]
    fn test_significant_tokens() {
        assert_eq!(significant_tokens("co lop hoc online"), vec!["lop", "hoc", "online"]);
    }

    #[test]
    fn test_vietnamese_syllables_are_meaningful() {
        for token in ["nghieng", "nguoi", "khuyen", "truong", "hoc", "la", "topik"] {
            assert!(is_meaningful_token(token), "expected meaningful: {}", token);
        }
    }

    #[test]
    fn test_keyboard_mash_is_not_meaningful() {
        for token in ["asdfghjkl", "qwertyuiop", "zzzz", "x", "123"] {
            assert!(!is_meaningful_token(token), "expected noise: {}", token);
        }
    }

    #[test]
    fn test_meaningful_ratio() {
        assert_eq!(meaningful_ratio(""), None);
        assert_eq!(meaningful_ratio("asdfghjkl qwertyuiop"), Some(0.0));
        assert_eq!(meaningful_ratio("hoc phi"), Some(1.0));
    }
}
