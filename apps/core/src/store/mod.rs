//! FAQ persistence.
//!
//! The brain only talks to [`FaqStore`]. Two implementations exist: the
//! durable SQLite store and a read-only in-process copy of the fixture
//! corpus. [`select_store`] picks one at startup.

pub mod fixture;
pub mod fixtures;
pub mod sqlite;

use crate::brain::normalizer::{contains_phrase, normalize};
use crate::error::AppError;
use crate::models::{CategoryCount, Faq, FaqCategory, FaqSuggestion};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub use fixture::FixtureFaqStore;
pub use sqlite::SqliteFaqStore;

/// Which implementation backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Durable,
    Fixture,
}

#[async_trait]
pub trait FaqStore: Send + Sync + 'static {
    fn kind(&self) -> StoreKind;

    /// Active records in insertion order.
    async fn find_active(&self) -> Result<Vec<Faq>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Faq, AppError>;

    /// Validates and upserts a record.
    async fn save(&self, faq: &Faq) -> Result<Faq, AppError>;

    /// Returns the updated count.
    async fn increment_view_count(&self, id: &str) -> Result<i64, AppError>;

    /// Returns the updated count.
    async fn increment_helpful_count(&self, id: &str) -> Result<i64, AppError>;

    /// Active records of one category, highest priority first.
    async fn find_by_category(&self, category: FaqCategory) -> Result<Vec<Faq>, AppError>;

    /// Up to `limit` random active questions, never including `exclude_id`.
    async fn sample_random(
        &self,
        limit: usize,
        exclude_id: Option<&str>,
    ) -> Result<Vec<FaqSuggestion>, AppError>;

    /// Diacritic-insensitive text search over question, keywords and answer.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Faq>, AppError>;

    /// Most viewed active records.
    async fn popular(&self, limit: usize) -> Result<Vec<Faq>, AppError>;

    /// Active record count for every category, in display order.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, AppError>;
}

/// Opens the durable store, falling back to the fixture store when the
/// database cannot be initialised.
pub async fn select_store(database_url: &str, seed: bool) -> Arc<dyn FaqStore> {
    match SqliteFaqStore::connect(database_url).await {
        Ok(store) => {
            if seed {
                match store.seed_if_empty().await {
                    Ok(0) => {}
                    Ok(n) => info!("Seeded {} FAQ records", n),
                    Err(e) => warn!("Seeding the FAQ store failed: {}", e),
                }
            }
            info!("Using durable FAQ store");
            Arc::new(store)
        }
        Err(e) => {
            warn!("FAQ database unavailable ({}), using the read-only fixture store", e);
            Arc::new(FixtureFaqStore::new())
        }
    }
}

/// Ranks `faqs` against `query`. Question hits come before keyword hits,
/// which come before answer hits; input order is kept within a rank.
pub(crate) fn search_faqs(faqs: Vec<Faq>, query: &str, limit: usize) -> Vec<Faq> {
    let needle = normalize(query);
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, Faq)> = faqs
        .into_iter()
        .filter(|f| f.is_active)
        .filter_map(|faq| {
            let rank = if contains_phrase(&normalize(&faq.question), &needle) {
                0
            } else if faq
                .keywords
                .iter()
                .any(|k| contains_phrase(&normalize(k), &needle))
            {
                1
            } else if contains_phrase(&normalize(&faq.answer), &needle) {
                2
            } else {
                return None;
            };
            Some((rank, faq))
        })
        .collect();

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().take(limit).map(|(_, faq)| faq).collect()
}

/// Expands raw `(label, count)` pairs into a full, ordered category listing.
pub(crate) fn complete_category_counts<I>(counts: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (FaqCategory, i64)>,
{
    let counts: Vec<(FaqCategory, i64)> = counts.into_iter().collect();
    FaqCategory::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: counts
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, n)| n)
                .sum(),
        })
        .collect()
}
