//! Message classification.
//!
//! Decides whether an incoming message is worth matching against the FAQ
//! corpus, or is an edge case, a greeting or a farewell. Rules run in a
//! fixed order and the first hit wins: the noise checks come before the
//! greeting checks so "123" is never taken for a greeting.

use super::keywords::meaningful_ratio;
use super::normalizer::{contains_phrase, normalize};
use crate::config::MatcherConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification tag of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Empty,
    NumericOnly,
    SymbolOnly,
    RandomText,
    Greeting,
    Goodbye,
    Question,
}

impl MessageKind {
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Empty => "empty",
            MessageKind::NumericOnly => "numeric_only",
            MessageKind::SymbolOnly => "symbol_only",
            MessageKind::RandomText => "random_text",
            MessageKind::Greeting => "greeting",
            MessageKind::Goodbye => "goodbye",
            MessageKind::Question => "question",
        }
    }

    /// Kinds answered with a guidance message instead of an FAQ lookup.
    pub fn is_edge_case(&self) -> bool {
        matches!(
            self,
            MessageKind::Empty | MessageKind::NumericOnly | MessageKind::SymbolOnly | MessageKind::RandomText
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub struct MessageClassifier {
    greetings: Vec<String>,
    farewells: Vec<String>,
    greeting_max_len: usize,
    random_text_ratio: f32,
}

impl Default for MessageClassifier {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl MessageClassifier {
    pub fn new(config: &MatcherConfig) -> Self {
        let normalize_list = |list: &[String]| {
            list.iter()
                .map(|s| normalize(s))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        };
        Self {
            greetings: normalize_list(&config.greetings),
            farewells: normalize_list(&config.farewells),
            greeting_max_len: config.greeting_max_len,
            random_text_ratio: config.random_text_ratio,
        }
    }

    /// Classifies a raw user message.
    pub fn classify(&self, raw: &str) -> MessageKind {
        if raw.trim().is_empty() {
            return MessageKind::Empty;
        }

        let normalized = normalize(raw);

        if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) {
            return MessageKind::NumericOnly;
        }

        if !raw.chars().any(char::is_alphanumeric) {
            return MessageKind::SymbolOnly;
        }

        match meaningful_ratio(&normalized) {
            // Letters outside the Latin script fold away entirely.
            None => return MessageKind::RandomText,
            Some(ratio) if ratio < self.random_text_ratio => return MessageKind::RandomText,
            Some(_) => {}
        }

        if self.is_in_list(&normalized, &self.greetings) {
            return MessageKind::Greeting;
        }

        if self.is_in_list(&normalized, &self.farewells) {
            return MessageKind::Goodbye;
        }

        MessageKind::Question
    }

    fn is_in_list(&self, normalized: &str, list: &[String]) -> bool {
        list.iter().any(|phrase| {
            normalized == phrase
                || (normalized.len() < self.greeting_max_len && contains_phrase(normalized, phrase))
        })
    }
}
