//! Store Module Tests
//!
//! SQLite-backed store operations, seeding and store selection.

use super::seeded_store;
use crate::database;
use crate::error::AppError;
use crate::models::{Faq, FaqCategory};
use crate::store::fixtures::fixture_faqs;
use crate::store::{select_store, FaqStore, SqliteFaqStore, StoreKind};
use tempfile::tempdir;

#[cfg(test)]
mod seeding_tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_only_once() {
        let store = seeded_store().await;
        assert_eq!(store.seed_if_empty().await.unwrap(), 0);
        assert_eq!(
            database::count_faqs(store.pool()).await.unwrap(),
            fixture_faqs().len() as i64
        );
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_table_empty() {
        let store = SqliteFaqStore::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        let mut faqs = fixture_faqs();
        faqs[2].priority = 9;

        let result = store.seed_with(&faqs).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(database::count_faqs(store.pool()).await.unwrap(), 0);

        // the rolled-back attempt does not block a later seed
        assert_eq!(store.seed_if_empty().await.unwrap(), fixture_faqs().len());
    }

    #[tokio::test]
    async fn test_find_active_keeps_insertion_order() {
        let store = seeded_store().await;
        let ids: Vec<String> = store
            .find_active()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        let expected: Vec<String> = fixture_faqs().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("nested").join("faq.sqlite");
        let url = format!("sqlite://{}", db_path.display());

        let store = select_store(&url, true).await;
        assert_eq!(store.kind(), StoreKind::Durable);
        assert!(db_path.exists());
        assert_eq!(store.find_active().await.unwrap().len(), fixture_faqs().len());
    }

    #[tokio::test]
    async fn test_unusable_database_falls_back_to_fixtures() {
        let dir = tempdir().expect("Failed to create temp dir");
        // a directory cannot be opened as a database file
        let url = format!("sqlite://{}", dir.path().display());

        let store = select_store(&url, true).await;
        assert_eq!(store.kind(), StoreKind::Fixture);
        assert!(!store.find_active().await.unwrap().is_empty());
    }
}

#[cfg(test)]
mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_save_round_trip() {
        let store = seeded_store().await;
        let faq = Faq::new("Có bãi giữ xe không?", "Có, miễn phí.", FaqCategory::Other)
            .with_keywords(["gửi xe", "parking"])
            .with_priority(2);

        let saved = store.save(&faq).await.expect("Failed to save");
        assert_eq!(saved.id, faq.id);
        assert_eq!(saved.keywords, vec!["gửi xe", "parking"]);

        let fetched = store.find_by_id(&faq.id).await.unwrap();
        assert_eq!(fetched.question, faq.question);
        assert_eq!(fetched.category, FaqCategory::Other);
        assert_eq!(fetched.priority, 2);
    }

    #[tokio::test]
    async fn test_save_updates_existing_record() {
        let store = seeded_store().await;
        let mut faq = store.find_by_id("faq-dia-chi").await.unwrap();
        faq.answer = "Trung tâm đã chuyển về cơ sở mới.".to_string();
        store.save(&faq).await.unwrap();

        let fetched = store.find_by_id("faq-dia-chi").await.unwrap();
        assert_eq!(fetched.answer, faq.answer);
        assert_eq!(
            database::count_faqs(store.pool()).await.unwrap(),
            fixture_faqs().len() as i64
        );
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_priority() {
        let store = seeded_store().await;
        let faq = Faq::new("Q?", "A.", FaqCategory::Other).with_priority(9);
        assert!(matches!(store.save(&faq).await, Err(AppError::Validation(_))));
        assert!(matches!(
            store.find_by_id(&faq.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_inactive_records_are_not_listed() {
        let store = seeded_store().await;
        let hidden = store.find_by_id("faq-lien-he").await.unwrap().inactive();
        store.save(&hidden).await.unwrap();

        let active = store.find_active().await.unwrap();
        assert!(active.iter().all(|f| f.id != "faq-lien-he"));
        assert_eq!(active.len(), fixture_faqs().len() - 1);
    }
}

#[cfg(test)]
mod counter_tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_counters() {
        let store = seeded_store().await;
        assert_eq!(store.increment_view_count("faq-si-so").await.unwrap(), 1);
        assert_eq!(store.increment_view_count("faq-si-so").await.unwrap(), 2);
        assert_eq!(store.increment_helpful_count("faq-si-so").await.unwrap(), 1);

        let faq = store.find_by_id("faq-si-so").await.unwrap();
        assert_eq!(faq.view_count, 2);
        assert_eq!(faq.helpful_count, 1);
    }

    #[tokio::test]
    async fn test_increment_unknown_record() {
        let store = seeded_store().await;
        assert!(matches!(
            store.increment_helpful_count("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.increment_view_count("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_popular_follows_views() {
        let store = seeded_store().await;
        for _ in 0..3 {
            store.increment_view_count("faq-online").await.unwrap();
        }
        store.increment_view_count("faq-hoc-thu").await.unwrap();

        let popular = store.popular(2).await.unwrap();
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].id, "faq-online");
        assert_eq!(popular[1].id, "faq-hoc-thu");
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_category() {
        let store = seeded_store().await;
        let tuition = store.find_by_category(FaqCategory::Tuition).await.unwrap();
        assert_eq!(tuition.len(), 3);
        assert!(tuition.iter().all(|f| f.category == FaqCategory::Tuition));
        assert_eq!(tuition[0].id, "faq-hoc-phi");
    }

    #[tokio::test]
    async fn test_category_counts() {
        let store = seeded_store().await;
        let counts = store.category_counts().await.unwrap();
        assert_eq!(counts.len(), FaqCategory::ALL.len());
        let total: i64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, fixture_faqs().len() as i64);
        let tuition = counts
            .iter()
            .find(|c| c.category == FaqCategory::Tuition)
            .unwrap();
        assert_eq!(tuition.count, 3);
    }

    #[tokio::test]
    async fn test_sample_random() {
        let store = seeded_store().await;
        let sample = store.sample_random(4, Some("faq-hoc-phi")).await.unwrap();
        assert_eq!(sample.len(), 4);
        assert!(sample.iter().all(|s| s.id != "faq-hoc-phi"));

        let all = store.sample_random(100, None).await.unwrap();
        assert_eq!(all.len(), fixture_faqs().len());
    }

    #[tokio::test]
    async fn test_search_is_diacritic_insensitive() {
        let store = seeded_store().await;
        let results = store.search("chung chi", 10).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "faq-chung-chi");

        let results = store.search("CHỨNG CHỈ", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(store.search("xyzxyz", 10).await.unwrap().is_empty());
    }
}
