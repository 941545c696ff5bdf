use super::fixtures::fixture_faqs;
use super::{complete_category_counts, search_faqs, FaqStore, StoreKind};
use crate::error::AppError;
use crate::models::{CategoryCount, Faq, FaqCategory, FaqSuggestion};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Immutable in-process corpus. Reads work, writes fail with
/// [`AppError::ReadOnly`].
#[derive(Clone)]
pub struct FixtureFaqStore {
    faqs: Arc<Vec<Faq>>,
}

impl Default for FixtureFaqStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureFaqStore {
    /// Store over the built-in corpus.
    pub fn new() -> Self {
        Self::with_faqs(fixture_faqs())
    }

    pub fn with_faqs(faqs: Vec<Faq>) -> Self {
        Self {
            faqs: Arc::new(faqs),
        }
    }

    fn active(&self) -> impl Iterator<Item = &Faq> {
        self.faqs.iter().filter(|f| f.is_active)
    }
}

#[async_trait]
impl FaqStore for FixtureFaqStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Fixture
    }

    async fn find_active(&self) -> Result<Vec<Faq>, AppError> {
        Ok(self.active().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Faq, AppError> {
        self.faqs
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("FAQ {}", id)))
    }

    async fn save(&self, _faq: &Faq) -> Result<Faq, AppError> {
        Err(AppError::ReadOnly)
    }

    async fn increment_view_count(&self, _id: &str) -> Result<i64, AppError> {
        Err(AppError::ReadOnly)
    }

    async fn increment_helpful_count(&self, _id: &str) -> Result<i64, AppError> {
        Err(AppError::ReadOnly)
    }

    async fn find_by_category(&self, category: FaqCategory) -> Result<Vec<Faq>, AppError> {
        let mut faqs: Vec<Faq> = self
            .active()
            .filter(|f| f.category == category)
            .cloned()
            .collect();
        // stable, so insertion order is kept within a priority
        faqs.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(faqs)
    }

    async fn sample_random(
        &self,
        limit: usize,
        exclude_id: Option<&str>,
    ) -> Result<Vec<FaqSuggestion>, AppError> {
        let candidates: Vec<&Faq> = self
            .active()
            .filter(|f| Some(f.id.as_str()) != exclude_id)
            .collect();
        let mut rng = rand::thread_rng();
        Ok(candidates
            .choose_multiple(&mut rng, limit)
            .map(|f| FaqSuggestion::from(*f))
            .collect())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Faq>, AppError> {
        Ok(search_faqs(self.active().cloned().collect(), query, limit))
    }

    async fn popular(&self, limit: usize) -> Result<Vec<Faq>, AppError> {
        let mut faqs: Vec<Faq> = self.active().cloned().collect();
        faqs.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then(b.helpful_count.cmp(&a.helpful_count))
                .then(b.priority.cmp(&a.priority))
        });
        faqs.truncate(limit);
        Ok(faqs)
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, AppError> {
        Ok(complete_category_counts(self.active().map(|f| (f.category, 1))))
    }
}
