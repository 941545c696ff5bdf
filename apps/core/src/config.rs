//! Runtime configuration.
//!
//! `AppConfig` comes from the environment (with `.env` support). The matcher
//! tuning lives in `MatcherConfig`, which has built-in defaults and can be
//! overridden from a JSON file named by `MATCHER_CONFIG`.

use crate::brain::intent::{default_intent_specs, IntentPatternSpec};
use crate::brain::thesaurus::{default_thesaurus_entries, ThesaurusEntry};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use validator::Validate;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/faq.sqlite";

const DEFAULT_GREETINGS: &[&str] = &[
    "xin chao",
    "chao",
    "chao ban",
    "chao anh",
    "chao chi",
    "chao em",
    "alo",
    "hello",
    "hi",
    "hey",
    "good morning",
];

const DEFAULT_FAREWELLS: &[&str] = &[
    "tam biet",
    "hen gap lai",
    "cam on",
    "cam on ban",
    "cam on nhieu",
    "bye",
    "goodbye",
    "thank you",
    "thanks",
];

/// Tuning knobs of the FAQ pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum combined score a candidate needs to be returned.
    #[validate(range(min = 0.0, max = 10.0))]
    pub min_score: f32,
    pub question_weight: f32,
    pub keyword_weight: f32,
    /// Applied to the raw answer similarity before `answer_blend`.
    #[validate(range(min = 0.0, max = 1.0))]
    pub answer_weight: f32,
    pub answer_blend: f32,
    #[validate(range(min = 1.0, max = 3.0))]
    pub priority_boost: f32,
    #[validate(range(min = 1, max = 5))]
    pub priority_boost_min: i64,
    pub overlap_bonus: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub substring_score: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub thesaurus_score: f32,
    #[validate(range(min = 1.0, max = 2.0))]
    pub thesaurus_multiplier: f32,
    /// Below this share of meaningful tokens a message is noise.
    #[validate(range(min = 0.0, max = 1.0))]
    pub random_text_ratio: f32,
    /// Greetings/farewells embedded in longer text only count below this length.
    pub greeting_max_len: usize,
    #[validate(range(min = 1, max = 20))]
    pub suggestion_count: usize,
    pub greetings: Vec<String>,
    pub farewells: Vec<String>,
    pub thesaurus: Vec<ThesaurusEntry>,
    pub intents: Vec<IntentPatternSpec>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: 0.12,
            question_weight: 1.2,
            keyword_weight: 1.0,
            answer_weight: 0.4,
            answer_blend: 0.8,
            priority_boost: 1.15,
            priority_boost_min: 4,
            overlap_bonus: 0.2,
            substring_score: 0.7,
            thesaurus_score: 0.95,
            thesaurus_multiplier: 1.05,
            random_text_ratio: 0.3,
            greeting_max_len: 20,
            suggestion_count: 4,
            greetings: DEFAULT_GREETINGS.iter().map(|s| s.to_string()).collect(),
            farewells: DEFAULT_FAREWELLS.iter().map(|s| s.to_string()).collect(),
            thesaurus: default_thesaurus_entries(),
            intents: default_intent_specs(),
        }
    }
}

impl MatcherConfig {
    /// Loads overrides from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let config: MatcherConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Seed the durable store from the fixture corpus when it is empty.
    pub seed_faqs: bool,
    pub request_timeout: Duration,
    /// Upper bound on each store call made while answering a chat message.
    pub store_timeout: Duration,
    pub matcher: MatcherConfig,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT must be a valid number, got '{}'", raw)))?,
            Err(_) => 8080,
        };

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        };

        let seed_faqs = match env::var("SEED_FAQS") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| AppError::Config(format!("SEED_FAQS must be a boolean, got '{}'", raw)))?,
            Err(_) => true,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                AppError::Config(format!("REQUEST_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?),
            Err(_) => Duration::from_secs(10),
        };

        let store_timeout = match env::var("STORE_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|_| {
                AppError::Config(format!("STORE_TIMEOUT_MS must be a number, got '{}'", raw))
            })?),
            Err(_) => Duration::from_millis(2000),
        };
        if store_timeout.is_zero() || store_timeout >= request_timeout {
            return Err(AppError::Config(format!(
                "STORE_TIMEOUT_MS ({:?}) must be positive and below the request timeout ({:?})",
                store_timeout, request_timeout
            )));
        }

        let matcher = match env::var("MATCHER_CONFIG") {
            Ok(path) => {
                info!("Loading matcher configuration from {}", path);
                MatcherConfig::from_file(&path)?
            }
            Err(_) => MatcherConfig::default(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            log_format,
            seed_faqs,
            request_timeout,
            store_timeout,
            matcher,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
