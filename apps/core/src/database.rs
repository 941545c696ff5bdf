use crate::error::AppError;
use crate::models::{Faq, FaqCategory, FaqRow, FaqSuggestion};
use chrono::Utc;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Executor;
use sqlx::types::Json;
use std::str::FromStr;
use tracing::{info, warn};
use validator::Validate;

const FAQ_COLUMNS: &str = "id, question, answer, category, keywords, priority, is_active, \
                           view_count, helpful_count, created_at, updated_at";

/// Opens (creating if needed) the database and applies migrations.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:");
    if !in_memory {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating database directory: {:?}", parent);
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    // Every connection to an in-memory database is a separate database,
    // so keep exactly one alive for the lifetime of the pool.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

fn into_faqs(rows: Vec<FaqRow>) -> Vec<Faq> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            Faq::try_from(row)
                .map_err(|e| warn!("Skipping invalid FAQ row {}: {}", id, e))
                .ok()
        })
        .collect()
}

// --- FAQ reads ---

/// Active records in insertion order.
pub async fn find_active_faqs(pool: &SqlitePool) -> Result<Vec<Faq>, AppError> {
    let sql = format!(
        "SELECT {} FROM faqs WHERE is_active = 1 ORDER BY rowid ASC",
        FAQ_COLUMNS
    );
    let rows = sqlx::query_as::<_, FaqRow>(&sql).fetch_all(pool).await?;
    Ok(into_faqs(rows))
}

pub async fn get_faq(pool: &SqlitePool, id: &str) -> Result<Faq, AppError> {
    let sql = format!("SELECT {} FROM faqs WHERE id = ?", FAQ_COLUMNS);
    let row = sqlx::query_as::<_, FaqRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("FAQ {}", id)))?;
    Faq::try_from(row)
}

pub async fn find_faqs_by_category(
    pool: &SqlitePool,
    category: FaqCategory,
) -> Result<Vec<Faq>, AppError> {
    let sql = format!(
        "SELECT {} FROM faqs WHERE is_active = 1 AND category = ? ORDER BY priority DESC, rowid ASC",
        FAQ_COLUMNS
    );
    let rows = sqlx::query_as::<_, FaqRow>(&sql)
        .bind(category.label())
        .fetch_all(pool)
        .await?;
    Ok(into_faqs(rows))
}

pub async fn popular_faqs(pool: &SqlitePool, limit: usize) -> Result<Vec<Faq>, AppError> {
    let sql = format!(
        "SELECT {} FROM faqs WHERE is_active = 1 \
         ORDER BY view_count DESC, helpful_count DESC, priority DESC, rowid ASC LIMIT ?",
        FAQ_COLUMNS
    );
    let rows = sqlx::query_as::<_, FaqRow>(&sql)
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;
    Ok(into_faqs(rows))
}

pub async fn sample_faq_questions(
    pool: &SqlitePool,
    limit: usize,
    exclude_id: Option<&str>,
) -> Result<Vec<FaqSuggestion>, AppError> {
    let suggestions = sqlx::query_as::<_, FaqSuggestion>(
        r#"
        SELECT id, question
        FROM faqs
        WHERE is_active = 1 AND id != ?
        ORDER BY RANDOM()
        LIMIT ?
        "#,
    )
    .bind(exclude_id.unwrap_or(""))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;
    Ok(suggestions)
}

/// Active record count per stored category label.
pub async fn count_active_by_category(pool: &SqlitePool) -> Result<Vec<(String, i64)>, AppError> {
    let counts = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT category, COUNT(*)
        FROM faqs
        WHERE is_active = 1
        GROUP BY category
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(counts)
}

pub async fn count_faqs<'e, E>(executor: E) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM faqs")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

// --- FAQ writes ---

/// Inserts or replaces a record, keeping its position in insertion order.
///
/// Runs on a pool or inside a transaction.
pub async fn upsert_faq<'e, E>(executor: E, faq: &Faq) -> Result<Faq, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    faq.validate()?;
    let now = Utc::now().timestamp();
    let created_at = if faq.created_at > 0 { faq.created_at } else { now };

    let sql = format!(
        r#"
        INSERT INTO faqs (id, question, answer, category, keywords, priority, is_active,
                          view_count, helpful_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            question = excluded.question,
            answer = excluded.answer,
            category = excluded.category,
            keywords = excluded.keywords,
            priority = excluded.priority,
            is_active = excluded.is_active,
            view_count = excluded.view_count,
            helpful_count = excluded.helpful_count,
            updated_at = excluded.updated_at
        RETURNING {}
        "#,
        FAQ_COLUMNS
    );

    let row = sqlx::query_as::<_, FaqRow>(&sql)
        .bind(&faq.id)
        .bind(&faq.question)
        .bind(&faq.answer)
        .bind(faq.category.label())
        .bind(Json(&faq.keywords))
        .bind(faq.priority)
        .bind(faq.is_active)
        .bind(faq.view_count)
        .bind(faq.helpful_count)
        .bind(created_at)
        .bind(now)
        .fetch_one(executor)
        .await?;
    Faq::try_from(row)
}

pub async fn increment_view_count(pool: &SqlitePool, id: &str) -> Result<i64, AppError> {
    let updated: Option<(i64,)> = sqlx::query_as(
        r#"
        UPDATE faqs
        SET view_count = view_count + 1, updated_at = ?
        WHERE id = ?
        RETURNING view_count
        "#,
    )
    .bind(Utc::now().timestamp())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    updated
        .map(|(count,)| count)
        .ok_or_else(|| AppError::NotFound(format!("FAQ {}", id)))
}

pub async fn increment_helpful_count(pool: &SqlitePool, id: &str) -> Result<i64, AppError> {
    let updated: Option<(i64,)> = sqlx::query_as(
        r#"
        UPDATE faqs
        SET helpful_count = helpful_count + 1, updated_at = ?
        WHERE id = ?
        RETURNING helpful_count
        "#,
    )
    .bind(Utc::now().timestamp())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    updated
        .map(|(count,)| count)
        .ok_or_else(|| AppError::NotFound(format!("FAQ {}", id)))
}
