//! Reply construction.
//!
//! Turns a classification (and an optional match) into the structured reply
//! sent back to the chat widget, including follow-up suggestions drawn from
//! the corpus.

use super::classifier::MessageKind;
use super::matcher::MatchResult;
use crate::models::{Faq, FaqCategory};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Mutex;

const EMPTY_MESSAGE: &str =
    "Bạn chưa nhập câu hỏi. Hãy gõ câu hỏi về khóa học, học phí hoặc lịch học để mình hỗ trợ nhé!";
const NUMERIC_MESSAGE: &str =
    "Mình chỉ nhận được một dãy số. Bạn có thể mô tả rõ hơn câu hỏi của mình không?";
const SYMBOL_MESSAGE: &str = "Tin nhắn chỉ gồm ký tự đặc biệt. Bạn hãy nhập câu hỏi bằng chữ nhé!";
const RANDOM_TEXT_MESSAGE: &str =
    "Xin lỗi, mình chưa hiểu ý bạn. Bạn có thể diễn đạt lại câu hỏi rõ hơn không?";

const WELCOME_MESSAGES: &[&str] = &[
    "Xin chào! Mình là trợ lý tư vấn của trung tâm. Bạn cần hỗ trợ gì về các khóa học tiếng Hàn?",
    "Chào bạn! Mình có thể giúp bạn tìm hiểu về học phí, lịch học, lớp học và chứng chỉ.",
    "Xin chào! Bạn đang quan tâm đến khóa học nào? Mình luôn sẵn sàng hỗ trợ.",
];

const GOODBYE_MESSAGE: &str =
    "Cảm ơn bạn đã quan tâm! Nếu còn thắc mắc, bạn cứ nhắn cho mình bất cứ lúc nào nhé.";
const NO_MATCH_MESSAGE: &str = "Xin lỗi, mình chưa tìm thấy câu trả lời phù hợp. Bạn có thể hỏi theo cách khác \
     hoặc liên hệ hotline của trung tâm để được tư vấn trực tiếp.";
const ERROR_MESSAGE: &str = "Xin lỗi, hệ thống đang gặp sự cố. Bạn vui lòng thử lại sau ít phút.";

/// Used when the corpus is empty or unavailable.
pub const FALLBACK_SUGGESTIONS: &[&str] = &[
    "Học phí các khóa học là bao nhiêu?",
    "Mỗi lớp học có bao nhiêu học viên?",
    "Lịch học các lớp như thế nào?",
    "Có chứng chỉ hoàn thành không?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    EdgeCase,
    Greeting,
    Goodbye,
    FaqAnswer,
    NoMatch,
    Error,
}

/// Structured reply of the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FaqCategory>,
    /// Id of the answered record, for helpfulness feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faq_id: Option<String>,
    /// Which edge case triggered an `edge_case` reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_case: Option<MessageKind>,
    pub suggestions: Vec<String>,
}

/// Random source used for suggestions and welcome messages.
pub type RandomSource = Box<dyn RngCore + Send>;

pub struct ResponseBuilder {
    rng: Mutex<RandomSource>,
    suggestion_count: usize,
}

impl ResponseBuilder {
    /// Builder backed by an entropy-seeded generator.
    pub fn new(suggestion_count: usize) -> Self {
        Self::with_rng(suggestion_count, Box::new(StdRng::from_entropy()))
    }

    /// Builder with an injected random source, for deterministic tests.
    pub fn with_rng(suggestion_count: usize, rng: RandomSource) -> Self {
        Self {
            rng: Mutex::new(rng),
            suggestion_count,
        }
    }

    /// Builds the reply for a classified message.
    ///
    /// `matched` is only looked at for [`MessageKind::Question`].
    pub fn build(&self, kind: MessageKind, matched: Option<&MatchResult>, corpus: &[Faq]) -> ChatReply {
        if kind.is_edge_case() {
            return self.edge_case_reply(kind, corpus);
        }
        match kind {
            MessageKind::Greeting => ChatReply {
                kind: ReplyKind::Greeting,
                message: self.welcome_message(),
                category: None,
                faq_id: None,
                edge_case: None,
                suggestions: self.suggestions(corpus, None),
            },
            MessageKind::Goodbye => ChatReply {
                kind: ReplyKind::Goodbye,
                message: GOODBYE_MESSAGE.to_string(),
                category: None,
                faq_id: None,
                edge_case: None,
                suggestions: Vec::new(),
            },
            _ => match matched {
                Some(result) => ChatReply {
                    kind: ReplyKind::FaqAnswer,
                    message: format!("**{}**\n\n{}", result.faq.question, result.faq.answer),
                    category: Some(result.faq.category),
                    faq_id: Some(result.faq.id.clone()),
                    edge_case: None,
                    suggestions: self.suggestions(corpus, Some(&result.faq.id)),
                },
                None => ChatReply {
                    kind: ReplyKind::NoMatch,
                    message: NO_MATCH_MESSAGE.to_string(),
                    category: None,
                    faq_id: None,
                    edge_case: None,
                    suggestions: self.suggestions(corpus, None),
                },
            },
        }
    }

    fn edge_case_reply(&self, kind: MessageKind, corpus: &[Faq]) -> ChatReply {
        let message = match kind {
            MessageKind::Empty => EMPTY_MESSAGE,
            MessageKind::NumericOnly => NUMERIC_MESSAGE,
            MessageKind::SymbolOnly => SYMBOL_MESSAGE,
            _ => RANDOM_TEXT_MESSAGE,
        };
        ChatReply {
            kind: ReplyKind::EdgeCase,
            message: message.to_string(),
            category: None,
            faq_id: None,
            edge_case: Some(kind),
            suggestions: self.suggestions(corpus, None),
        }
    }

    /// Generic apology used when something unexpected went wrong.
    pub fn error_reply(&self, corpus: &[Faq]) -> ChatReply {
        ChatReply {
            kind: ReplyKind::Error,
            message: ERROR_MESSAGE.to_string(),
            category: None,
            faq_id: None,
            edge_case: None,
            suggestions: self.suggestions(corpus, None),
        }
    }

    /// Up to `suggestion_count` distinct questions of active records, in random
    /// order, never including `exclude_id`. Falls back to a fixed list when
    /// nothing is available.
    pub fn suggestions(&self, corpus: &[Faq], exclude_id: Option<&str>) -> Vec<String> {
        let mut seen = HashSet::new();
        let candidates: Vec<&str> = corpus
            .iter()
            .filter(|f| f.is_active && Some(f.id.as_str()) != exclude_id)
            .map(|f| f.question.as_str())
            .filter(|q| seen.insert(*q))
            .collect();

        if candidates.is_empty() {
            return FALLBACK_SUGGESTIONS
                .iter()
                .take(self.suggestion_count)
                .map(|s| s.to_string())
                .collect();
        }

        let amount = self.suggestion_count.min(candidates.len());
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        index::sample(&mut *rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i].to_string())
            .collect()
    }

    fn welcome_message(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        WELCOME_MESSAGES
            .choose(&mut *rng)
            .unwrap_or(&WELCOME_MESSAGES[0])
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(seed: u64) -> ResponseBuilder {
        ResponseBuilder::with_rng(4, Box::new(StdRng::seed_from_u64(seed)))
    }

    fn corpus(n: usize) -> Vec<Faq> {
        (0..n)
            .map(|i| Faq::new(format!("Câu hỏi {}?", i), "Trả lời.", FaqCategory::Other))
            .collect()
    }

    #[test]
    fn test_suggestions_are_distinct() {
        let builder = builder(7);
        let faqs = corpus(10);
        let suggestions = builder.suggestions(&faqs, None);
        assert_eq!(suggestions.len(), 4);
        let unique: HashSet<_> = suggestions.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_suggestions_exclude_matched_record() {
        let builder = builder(1);
        let faqs = corpus(5);
        for _ in 0..20 {
            let suggestions = builder.suggestions(&faqs, Some(&faqs[2].id));
            assert!(!suggestions.contains(&faqs[2].question));
            assert_eq!(suggestions.len(), 4);
        }
    }

    #[test]
    fn test_same_seed_same_suggestions() {
        let faqs = corpus(12);
        assert_eq!(
            builder(42).suggestions(&faqs, None),
            builder(42).suggestions(&faqs, None)
        );
    }

    #[test]
    fn test_small_and_empty_corpus() {
        let builder = builder(3);
        assert_eq!(builder.suggestions(&corpus(2), None).len(), 2);

        let fallback = builder.suggestions(&[], None);
        assert_eq!(fallback, FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>());

        let inactive: Vec<Faq> = corpus(3).into_iter().map(Faq::inactive).collect();
        assert_eq!(builder.suggestions(&inactive, None).len(), 4);
    }

    #[test]
    fn test_edge_case_replies() {
        let builder = builder(5);
        let mut messages = HashSet::new();
        for kind in [
            MessageKind::Empty,
            MessageKind::NumericOnly,
            MessageKind::SymbolOnly,
            MessageKind::RandomText,
        ] {
            let reply = builder.build(kind, None, &corpus(6));
            assert_eq!(reply.kind, ReplyKind::EdgeCase);
            assert_eq!(reply.edge_case, Some(kind));
            assert_eq!(reply.suggestions.len(), 4);
            messages.insert(reply.message);
        }
        // one guidance message per kind
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_goodbye_has_no_suggestions() {
        let reply = builder(5).build(MessageKind::Goodbye, None, &corpus(6));
        assert_eq!(reply.kind, ReplyKind::Goodbye);
        assert!(reply.suggestions.is_empty());
    }

    #[test]
    fn test_greeting_uses_a_welcome_message() {
        let reply = builder(9).build(MessageKind::Greeting, None, &corpus(6));
        assert_eq!(reply.kind, ReplyKind::Greeting);
        assert!(WELCOME_MESSAGES.contains(&reply.message.as_str()));
    }

    #[test]
    fn test_faq_answer_reply() {
        let faqs = corpus(6);
        let matched = MatchResult {
            faq: faqs[0].clone(),
            score: 1.3,
        };
        let reply = builder(2).build(MessageKind::Question, Some(&matched), &faqs);
        assert_eq!(reply.kind, ReplyKind::FaqAnswer);
        assert_eq!(reply.category, Some(FaqCategory::Other));
        assert_eq!(reply.faq_id.as_deref(), Some(faqs[0].id.as_str()));
        assert!(reply.message.starts_with("**Câu hỏi 0?**"));
        assert!(!reply.suggestions.contains(&faqs[0].question));
    }

    #[test]
    fn test_reply_json_shape() {
        let reply = builder(2).build(MessageKind::Question, None, &[]);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "no_match");
        assert!(json.get("category").is_none());
        assert_eq!(json["suggestions"].as_array().unwrap().len(), 4);
    }
}
