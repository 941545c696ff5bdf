//! Chat orchestration.
//!
//! Glues the pipeline together: classify, load the corpus, match, record the
//! view and build the reply. Store failures never reach the caller: reads
//! fall back to the fixture corpus and counter writes are best-effort. Every
//! store call is bounded by the store timeout, so a hung database degrades to
//! the fallback instead of stalling the request.

use super::classifier::{MessageClassifier, MessageKind};
use super::matcher::FaqMatcher;
use super::response::{ChatReply, RandomSource, ResponseBuilder};
use crate::config::MatcherConfig;
use crate::error::AppError;
use crate::models::Faq;
use crate::store::{FaqStore, FixtureFaqStore, StoreKind};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Where the corpus of one request came from.
enum Corpus {
    Primary(Vec<Faq>),
    Fallback(Vec<Faq>),
}

pub struct FaqAssistant {
    store: Arc<dyn FaqStore>,
    fallback: Arc<dyn FaqStore>,
    classifier: MessageClassifier,
    matcher: FaqMatcher,
    responses: ResponseBuilder,
    store_timeout: Duration,
}

impl FaqAssistant {
    pub fn new(store: Arc<dyn FaqStore>, config: &MatcherConfig) -> Result<Self, AppError> {
        Ok(Self {
            store,
            fallback: Arc::new(FixtureFaqStore::new()),
            classifier: MessageClassifier::new(config),
            matcher: FaqMatcher::new(config)?,
            responses: ResponseBuilder::new(config.suggestion_count),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        })
    }

    /// Same as [`new`](Self::new) with an injected random source for suggestions.
    pub fn with_rng(
        store: Arc<dyn FaqStore>,
        config: &MatcherConfig,
        rng: RandomSource,
    ) -> Result<Self, AppError> {
        let mut assistant = Self::new(store, config)?;
        assistant.responses = ResponseBuilder::with_rng(config.suggestion_count, rng);
        Ok(assistant)
    }

    /// Replaces the corpus used when the primary store cannot be read.
    pub fn with_fallback(mut self, fallback: Arc<dyn FaqStore>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn FaqStore> {
        &self.store
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Answers one chat message. Never fails.
    #[instrument(skip(self, message), fields(chars = message.chars().count()))]
    pub async fn respond(&self, message: &str) -> ChatReply {
        let kind = self.classifier.classify(message);
        debug!("Message classified as {}", kind);

        if kind == MessageKind::Goodbye {
            return self.responses.build(kind, None, &[]);
        }

        let corpus = match self.load_corpus().await {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("No FAQ corpus available: {}", e);
                return self.responses.error_reply(&[]);
            }
        };
        let (faqs, durable) = match corpus {
            Corpus::Primary(faqs) => (faqs, self.store.kind() == StoreKind::Durable),
            Corpus::Fallback(faqs) => (faqs, false),
        };

        if kind != MessageKind::Question {
            return self.responses.build(kind, None, &faqs);
        }

        let matched = self.matcher.find_best_match(message, &faqs);
        if let Some(result) = &matched {
            info!("Answered with FAQ {} (score {:.3})", result.faq.id, result.score);
            if durable {
                let counted = self.bounded(self.store.increment_view_count(&result.faq.id)).await;
                if let Err(e) = counted {
                    warn!("Could not record a view of FAQ {}: {}", result.faq.id, e);
                }
            }
        }

        self.responses.build(kind, matched.as_ref(), &faqs)
    }

    /// The apology reply, for callers whose `respond` did not complete.
    pub fn error_reply(&self) -> ChatReply {
        self.responses.error_reply(&[])
    }

    async fn load_corpus(&self) -> Result<Corpus, AppError> {
        match self.bounded(self.store.find_active()).await {
            Ok(faqs) => Ok(Corpus::Primary(faqs)),
            Err(e) => {
                warn!("FAQ store read failed, using fixture corpus: {}", e);
                Ok(Corpus::Fallback(self.bounded(self.fallback.find_active()).await?))
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        timeout(self.store_timeout, call).await?
    }
}
