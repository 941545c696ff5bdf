//! Best-match selection over the active FAQ corpus.

use super::keywords::{significant_token_set, significant_tokens};
use super::normalizer::normalize;
use super::similarity::SimilarityScorer;
use crate::config::MatcherConfig;
use crate::error::AppError;
use crate::models::Faq;
use serde::Serialize;
use tracing::debug;

/// The selected record and its combined score.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub faq: Faq,
    pub score: f32,
}

/// Per-record score breakdown, kept for debug logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub question: f32,
    pub keyword: f32,
    pub answer: f32,
    pub overlap_bonus: f32,
    pub total: f32,
}

pub struct FaqMatcher {
    scorer: SimilarityScorer,
    min_score: f32,
    question_weight: f32,
    keyword_weight: f32,
    answer_weight: f32,
    answer_blend: f32,
    priority_boost: f32,
    priority_boost_min: i64,
    overlap_bonus: f32,
}

impl Default for FaqMatcher {
    fn default() -> Self {
        Self::with_scorer(SimilarityScorer::default(), &MatcherConfig::default())
    }
}

impl FaqMatcher {
    pub fn new(config: &MatcherConfig) -> Result<Self, AppError> {
        Ok(Self::with_scorer(SimilarityScorer::new(config)?, config))
    }

    pub fn with_scorer(scorer: SimilarityScorer, config: &MatcherConfig) -> Self {
        Self {
            scorer,
            min_score: config.min_score,
            question_weight: config.question_weight,
            keyword_weight: config.keyword_weight,
            answer_weight: config.answer_weight,
            answer_blend: config.answer_blend,
            priority_boost: config.priority_boost,
            priority_boost_min: config.priority_boost_min,
            overlap_bonus: config.overlap_bonus,
        }
    }

    /// Scores `message` against every active record and returns the best one
    /// reaching the minimum score.
    ///
    /// A later record only replaces the current best when its score is
    /// strictly higher, so on ties the earliest record in `faqs` wins.
    pub fn find_best_match(&self, message: &str, faqs: &[Faq]) -> Option<MatchResult> {
        let normalized = normalize(message);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(&Faq, f32)> = None;
        for faq in faqs.iter().filter(|f| f.is_active) {
            let breakdown = self.score(&normalized, faq);
            let best_score = best.map(|(_, s)| s).unwrap_or(0.0);
            if breakdown.total > best_score && breakdown.total >= self.min_score {
                best = Some((faq, breakdown.total));
            }
        }

        match best {
            Some((faq, score)) => {
                debug!("Best FAQ match {} ({:.3}): {}", faq.id, score, faq.question);
                Some(MatchResult {
                    faq: faq.clone(),
                    score,
                })
            }
            None => {
                debug!("No FAQ reached the minimum score {:.2}", self.min_score);
                None
            }
        }
    }

    /// Combined score of one record for an already normalized message.
    pub fn score(&self, normalized_message: &str, faq: &Faq) -> ScoreBreakdown {
        let scorer = &self.scorer;
        let question_norm = normalize(&faq.question);

        let question = scorer.similarity_normalized(normalized_message, &question_norm);
        let keyword = faq
            .keywords
            .iter()
            .map(|k| scorer.similarity_normalized(normalized_message, &normalize(k)))
            .fold(0.0_f32, f32::max);
        let answer = scorer.similarity_normalized(normalized_message, &normalize(&faq.answer))
            * self.answer_weight;

        let mut total = (question * self.question_weight)
            .max(keyword * self.keyword_weight)
            .max(answer * self.answer_blend);

        if faq.priority >= self.priority_boost_min {
            total *= self.priority_boost;
        }

        let user_tokens = significant_tokens(normalized_message);
        let faq_tokens = significant_token_set(&question_norm);
        let common = user_tokens.iter().filter(|t| faq_tokens.contains(*t)).count();
        let overlap_bonus = common as f32 / user_tokens.len().max(1) as f32 * self.overlap_bonus;
        total += overlap_bonus;

        ScoreBreakdown {
            question,
            keyword,
            answer,
            overlap_bonus,
            total,
        }
    }
}
