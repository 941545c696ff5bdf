use super::fixtures::fixture_faqs;
use super::{complete_category_counts, search_faqs, FaqStore, StoreKind};
use crate::database;
use crate::error::AppError;
use crate::models::{CategoryCount, Faq, FaqCategory, FaqSuggestion};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tracing::warn;

/// Durable store backed by the `faqs` table.
#[derive(Clone)]
pub struct SqliteFaqStore {
    pool: SqlitePool,
}

impl SqliteFaqStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `database_url` and applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        Ok(Self::new(database::init_db(database_url).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Loads the fixture corpus when the table is empty. Returns the number
    /// of inserted records.
    pub async fn seed_if_empty(&self) -> Result<usize, AppError> {
        self.seed_with(&fixture_faqs()).await
    }

    /// Inserts `faqs` into an empty table in one transaction: either every
    /// record lands or none does.
    pub async fn seed_with(&self, faqs: &[Faq]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        if database::count_faqs(&mut *tx).await? > 0 {
            return Ok(0);
        }
        for faq in faqs {
            database::upsert_faq(&mut *tx, faq).await?;
        }
        tx.commit().await?;
        Ok(faqs.len())
    }
}

#[async_trait]
impl FaqStore for SqliteFaqStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Durable
    }

    async fn find_active(&self) -> Result<Vec<Faq>, AppError> {
        database::find_active_faqs(&self.pool).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Faq, AppError> {
        database::get_faq(&self.pool, id).await
    }

    async fn save(&self, faq: &Faq) -> Result<Faq, AppError> {
        database::upsert_faq(&self.pool, faq).await
    }

    async fn increment_view_count(&self, id: &str) -> Result<i64, AppError> {
        database::increment_view_count(&self.pool, id).await
    }

    async fn increment_helpful_count(&self, id: &str) -> Result<i64, AppError> {
        database::increment_helpful_count(&self.pool, id).await
    }

    async fn find_by_category(&self, category: FaqCategory) -> Result<Vec<Faq>, AppError> {
        database::find_faqs_by_category(&self.pool, category).await
    }

    async fn sample_random(
        &self,
        limit: usize,
        exclude_id: Option<&str>,
    ) -> Result<Vec<FaqSuggestion>, AppError> {
        database::sample_faq_questions(&self.pool, limit, exclude_id).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Faq>, AppError> {
        // Diacritic folding is not available in SQLite, so filter in process.
        let faqs = database::find_active_faqs(&self.pool).await?;
        Ok(search_faqs(faqs, query, limit))
    }

    async fn popular(&self, limit: usize) -> Result<Vec<Faq>, AppError> {
        database::popular_faqs(&self.pool, limit).await
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, AppError> {
        let raw = database::count_active_by_category(&self.pool).await?;
        let parsed = raw.into_iter().filter_map(|(label, count)| {
            label
                .parse::<FaqCategory>()
                .map(|category| (category, count))
                .map_err(|e| warn!("Ignoring stored category '{}': {}", label, e))
                .ok()
        });
        Ok(complete_category_counts(parsed))
    }
}
