//! Test Module
//!
//! Cross-module test suites for the FAQ assistant backend.
//!
//! ## Test Categories
//! - `brain_tests`: normalizer, classifier, similarity and matcher over the fixture corpus
//! - `store_tests`: SQLite store operations, seeding and store selection
//! - `assistant_tests`: end-to-end chat scenarios, fallback and view counting
//! - `server_tests`: HTTP routes through the axum router
//!
//! `FaultyStore` stands in for a database that fails, hangs or panics.

pub mod store_tests;

use crate::error::AppError;
use crate::models::{CategoryCount, Faq, FaqCategory, FaqSuggestion};
use crate::store::{FaqStore, SqliteFaqStore, StoreKind};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fresh in-memory durable store seeded with the fixture corpus.
pub(crate) async fn seeded_store() -> SqliteFaqStore {
    let store = SqliteFaqStore::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    store.seed_if_empty().await.expect("Failed to seed");
    assert_eq!(store.kind(), StoreKind::Durable);
    store
}

/// How a [`FaultyStore`] call goes wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    Fail,
    Hang,
    Panic,
}

/// Durable-looking store whose calls all go wrong the same way; counts
/// attempted writes. A `corpus`, when present, is served by `find_active`.
pub(crate) struct FaultyStore {
    pub writes: AtomicUsize,
    fault: Fault,
    corpus: Option<Vec<Faq>>,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        Self {
            writes: AtomicUsize::new(0),
            fault,
            corpus: None,
        }
    }

    /// Reads of the active corpus succeed; every other call goes wrong.
    pub fn serving(corpus: Vec<Faq>, fault: Fault) -> Self {
        Self {
            corpus: Some(corpus),
            ..Self::new(fault)
        }
    }

    async fn unavailable<T>(&self) -> Result<T, AppError> {
        match self.fault {
            Fault::Fail => Err(AppError::Internal("database is down".to_string())),
            Fault::Hang => std::future::pending().await,
            Fault::Panic => panic!("corrupted database page"),
        }
    }

    async fn write<T>(&self) -> Result<T, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.unavailable().await
    }
}

#[async_trait]
impl FaqStore for FaultyStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Durable
    }

    async fn find_active(&self) -> Result<Vec<Faq>, AppError> {
        match &self.corpus {
            Some(faqs) => Ok(faqs.clone()),
            None => self.unavailable().await,
        }
    }

    async fn find_by_id(&self, _id: &str) -> Result<Faq, AppError> {
        self.unavailable().await
    }

    async fn save(&self, _faq: &Faq) -> Result<Faq, AppError> {
        self.write().await
    }

    async fn increment_view_count(&self, _id: &str) -> Result<i64, AppError> {
        self.write().await
    }

    async fn increment_helpful_count(&self, _id: &str) -> Result<i64, AppError> {
        self.write().await
    }

    async fn find_by_category(&self, _category: FaqCategory) -> Result<Vec<Faq>, AppError> {
        self.unavailable().await
    }

    async fn sample_random(
        &self,
        _limit: usize,
        _exclude_id: Option<&str>,
    ) -> Result<Vec<FaqSuggestion>, AppError> {
        self.unavailable().await
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Faq>, AppError> {
        self.unavailable().await
    }

    async fn popular(&self, _limit: usize) -> Result<Vec<Faq>, AppError> {
        self.unavailable().await
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, AppError> {
        self.unavailable().await
    }
}
