//! Similarity scoring between two free-form texts.
//!
//! The score is the maximum of several layers, each tolerant to a different
//! kind of variation:
//! 1. identical normalized text
//! 2. shared intent pattern
//! 3. token overlap (exact and partial token matches)
//! 4. whole-phrase containment
//! 5. thesaurus link (synonym substitution)

use super::intent::IntentPatterns;
use super::keywords::overlap_tokens;
use super::normalizer::{contains_phrase, normalize};
use super::thesaurus::Thesaurus;
use crate::config::MatcherConfig;
use crate::error::AppError;

pub struct SimilarityScorer {
    intents: IntentPatterns,
    thesaurus: Thesaurus,
    substring_score: f32,
    thesaurus_score: f32,
    thesaurus_multiplier: f32,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        let config = MatcherConfig::default();
        Self::with_tables(IntentPatterns::default(), Thesaurus::default(), &config)
    }
}

impl SimilarityScorer {
    /// Builds a scorer from configuration, compiling its intent table.
    pub fn new(config: &MatcherConfig) -> Result<Self, AppError> {
        let intents = IntentPatterns::from_specs(&config.intents)?;
        let thesaurus = Thesaurus::new(&config.thesaurus);
        Ok(Self::with_tables(intents, thesaurus, config))
    }

    pub fn with_tables(intents: IntentPatterns, thesaurus: Thesaurus, config: &MatcherConfig) -> Self {
        Self {
            intents,
            thesaurus,
            substring_score: config.substring_score,
            thesaurus_score: config.thesaurus_score,
            thesaurus_multiplier: config.thesaurus_multiplier,
        }
    }

    /// Similarity of two raw texts, in `[0, 1]`.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if !a.is_empty() && a == b {
            return 1.0;
        }
        self.similarity_normalized(&normalize(a), &normalize(b))
    }

    /// Same as [`similarity`](Self::similarity) for texts that are already normalized.
    pub fn similarity_normalized(&self, a: &str, b: &str) -> f32 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }
        if self.intents.shared(a, b).is_some() {
            return 1.0;
        }

        let mut score = token_overlap(a, b);

        if contains_phrase(a, b) || contains_phrase(b, a) {
            score = score.max(self.substring_score);
        }

        if self.thesaurus.linking_key(a, b).is_some() {
            score = score.max((self.thesaurus_score * self.thesaurus_multiplier).min(1.0));
        }

        score.min(1.0)
    }
}

/// Token overlap of `b` against `a`, normalized by the token count of `a`.
///
/// Every pair of tokens is compared: equal tokens count as exact matches,
/// tokens where one contains the other count as partial matches.
fn token_overlap(a: &str, b: &str) -> f32 {
    let tokens_a = overlap_tokens(a);
    let tokens_b = overlap_tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let mut exact = 0usize;
    let mut partial = 0usize;
    for ta in &tokens_a {
        for tb in &tokens_b {
            if ta == tb {
                exact += 1;
            } else if ta.contains(tb) || tb.contains(ta) {
                partial += 1;
            }
        }
    }

    let count = tokens_a.len() as f32;
    (2.0 * exact as f32 / count + 0.5 * partial as f32 / count).min(1.0)
}
