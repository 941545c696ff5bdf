use crate::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// The fixed set of FAQ categories shown on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaqCategory {
    #[serde(rename = "Học phí")]
    Tuition,
    #[serde(rename = "Khóa học")]
    Course,
    #[serde(rename = "Lớp học")]
    Class,
    #[serde(rename = "Lịch học")]
    Schedule,
    #[serde(rename = "Chứng chỉ")]
    Certificate,
    #[serde(rename = "Giảng viên")]
    Instructor,
    #[serde(rename = "Đăng ký")]
    Enrollment,
    #[serde(rename = "Chính sách")]
    Policy,
    #[serde(rename = "Khác")]
    Other,
}

impl FaqCategory {
    pub const ALL: [FaqCategory; 9] = [
        FaqCategory::Tuition,
        FaqCategory::Course,
        FaqCategory::Class,
        FaqCategory::Schedule,
        FaqCategory::Certificate,
        FaqCategory::Instructor,
        FaqCategory::Enrollment,
        FaqCategory::Policy,
        FaqCategory::Other,
    ];

    /// Display label, also the value stored in the `category` column.
    pub fn label(&self) -> &'static str {
        match self {
            FaqCategory::Tuition => "Học phí",
            FaqCategory::Course => "Khóa học",
            FaqCategory::Class => "Lớp học",
            FaqCategory::Schedule => "Lịch học",
            FaqCategory::Certificate => "Chứng chỉ",
            FaqCategory::Instructor => "Giảng viên",
            FaqCategory::Enrollment => "Đăng ký",
            FaqCategory::Policy => "Chính sách",
            FaqCategory::Other => "Khác",
        }
    }
}

impl fmt::Display for FaqCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FaqCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FaqCategory::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| AppError::Validation(format!("Unknown FAQ category: {}", wanted)))
    }
}

fn default_priority() -> i64 {
    1
}

fn default_active() -> bool {
    true
}

/// A stored question/answer pair with its matching metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    /// Opaque unique identifier.
    pub id: String,
    #[validate(length(min = 1))]
    pub question: String,
    /// Answer body. May contain simple markup.
    #[validate(length(min = 1))]
    pub answer: String,
    pub category: FaqCategory,
    /// Synonyms and trigger phrases, in curator order.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 1 to 5, higher wins ties.
    #[validate(range(min = 1, max = 5))]
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub helpful_count: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Faq {
    /// Creates an active record with a fresh id and default counters.
    pub fn new(question: impl Into<String>, answer: impl Into<String>, category: FaqCategory) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            category,
            keywords: Vec::new(),
            priority: default_priority(),
            is_active: true,
            view_count: 0,
            helpful_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Raw `faqs` row as stored in SQLite.
#[derive(Debug, FromRow)]
pub struct FaqRow {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub keywords: Json<Vec<String>>,
    pub priority: i64,
    pub is_active: bool,
    pub view_count: i64,
    pub helpful_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<FaqRow> for Faq {
    type Error = AppError;

    fn try_from(row: FaqRow) -> Result<Self, Self::Error> {
        let faq = Faq {
            id: row.id,
            question: row.question,
            answer: row.answer,
            category: row.category.parse()?,
            keywords: row.keywords.0,
            priority: row.priority,
            is_active: row.is_active,
            view_count: row.view_count,
            helpful_count: row.helpful_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        faq.validate()?;
        Ok(faq)
    }
}

/// Lightweight projection used for follow-up suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FaqSuggestion {
    pub id: String,
    pub question: String,
}

impl From<&Faq> for FaqSuggestion {
    fn from(faq: &Faq) -> Self {
        Self {
            id: faq.id.clone(),
            question: faq.question.clone(),
        }
    }
}

/// Number of active records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: FaqCategory,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_label() {
        for category in FaqCategory::ALL {
            assert_eq!(category.label().parse::<FaqCategory>().unwrap(), category);
        }
        assert!("Thể thao".parse::<FaqCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&FaqCategory::Tuition).unwrap();
        assert_eq!(json, "\"Học phí\"");
    }

    #[test]
    fn test_priority_out_of_range_is_invalid() {
        let faq = Faq::new("Q?", "A.", FaqCategory::Other).with_priority(6);
        assert!(faq.validate().is_err());

        let faq = Faq::new("Q?", "A.", FaqCategory::Other).with_priority(0);
        assert!(faq.validate().is_err());

        let faq = Faq::new("Q?", "A.", FaqCategory::Other).with_priority(5);
        assert!(faq.validate().is_ok());
    }

    #[test]
    fn test_row_with_unknown_category_is_rejected() {
        let row = FaqRow {
            id: "x".to_string(),
            question: "Q?".to_string(),
            answer: "A.".to_string(),
            category: "Bóng đá".to_string(),
            keywords: Json(vec![]),
            priority: 1,
            is_active: true,
            view_count: 0,
            helpful_count: 0,
            created_at: 0,
            updated_at: 0,
        };
        assert!(Faq::try_from(row).is_err());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let faq: Faq = serde_json::from_str(
            r#"{"id":"a","question":"Q?","answer":"A.","category":"Lớp học"}"#,
        )
        .unwrap();
        assert_eq!(faq.priority, 1);
        assert!(faq.is_active);
        assert_eq!(faq.view_count, 0);
        assert!(faq.keywords.is_empty());
    }
}
