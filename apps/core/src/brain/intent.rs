//! Question intents recognised with regex patterns.
//!
//! Each pattern captures a canonical way of asking a common question
//! (price, installments, class size, ...). Two texts that hit the same
//! pattern are treated as the same question. Patterns run against
//! normalized text, so they are written without diacritics.

use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Built-in intent table: (name, pattern).
const DEFAULT_INTENTS: &[(&str, &str)] = &[
    (
        "price",
        r"\b(gia|hoc phi|chi phi|muc phi)\b.*\bbao nhieu\b|\bbao nhieu tien\b|\b(price|cost|tuition)\b",
    ),
    (
        "installment",
        r"\b(tra gop|chia nho|tung dot|nhieu lan|installment)\b",
    ),
    (
        "class_size",
        r"\b(si so|bao nhieu (hoc vien|hoc sinh|nguoi)|so luong hoc vien|class size)\b",
    ),
    (
        "refund",
        r"\b(hoan tien|hoan lai|hoan hoc phi|tra lai tien|refund)\b",
    ),
    (
        "certificate",
        r"\b(chung chi|bang cap|chung nhan|certificate)\b",
    ),
    (
        "schedule",
        r"\b(lich hoc|thoi khoa bieu|gio hoc|ca hoc|schedule)\b",
    ),
    (
        "duration",
        r"\b(bao lau|may thang|thoi gian hoc|keo dai)\b",
    ),
    (
        "enrollment",
        r"\b(dang ky|ghi danh|nhap hoc|register|enroll)\b",
    ),
    ("online", r"\b(online|truc tuyen|tu xa)\b"),
    (
        "payment",
        r"\b(thanh toan|chuyen khoan|tien mat|vi dien tu|payment)\b",
    ),
    ("trial", r"\b(hoc thu|buoi thu|trial)\b"),
    (
        "instructor",
        r"\b(giang vien|giao vien|thay co|nguoi day|teacher)\b",
    ),
    ("address", r"\b(dia chi|o dau|co so|address)\b"),
    (
        "contact",
        r"\b(lien he|hotline|so dien thoai|email|goi dien)\b",
    ),
];

/// Serializable form of one intent pattern, used by the matcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPatternSpec {
    pub name: String,
    pub pattern: String,
}

/// The built-in intent table in configuration form.
pub fn default_intent_specs() -> Vec<IntentPatternSpec> {
    DEFAULT_INTENTS
        .iter()
        .map(|(name, pattern)| IntentPatternSpec {
            name: name.to_string(),
            pattern: pattern.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone)]
struct IntentPattern {
    name: String,
    regex: Regex,
}

/// Ordered list of compiled intent patterns.
#[derive(Debug, Clone)]
pub struct IntentPatterns {
    patterns: Vec<IntentPattern>,
}

// Compile the built-in table once.
// NOTE: expect() is acceptable here, the table is a compile-time constant covered by tests.
static BUILTIN: LazyLock<IntentPatterns> = LazyLock::new(|| {
    IntentPatterns::from_specs(&default_intent_specs()).expect("Invalid built-in intent pattern")
});

impl Default for IntentPatterns {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl IntentPatterns {
    /// Compiles a configured pattern table, keeping its order.
    pub fn from_specs(specs: &[IntentPatternSpec]) -> Result<Self, AppError> {
        let patterns = specs
            .iter()
            .map(|spec| {
                Regex::new(&spec.pattern)
                    .map(|regex| IntentPattern {
                        name: spec.name.clone(),
                        regex,
                    })
                    .map_err(|e| AppError::Config(format!("Intent '{}': {}", spec.name, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// First intent that both texts match.
    pub fn shared(&self, a: &str, b: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(a) && p.regex.is_match(b))
            .map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::normalizer::normalize;

    fn intent_of(text: &str) -> Option<String> {
        let normalized = normalize(text);
        IntentPatterns::default()
            .shared(&normalized, &normalized)
            .map(str::to_string)
    }

    #[test]
    fn test_builtin_table_compiles() {
        let patterns = IntentPatterns::default();
        assert_eq!(patterns.patterns.len(), DEFAULT_INTENTS.len());
    }

    #[test]
    fn test_price_intent() {
        for text in [
            "Giá khóa học bao nhiêu?",
            "Học phí tiếng Hàn là bao nhiêu?",
            "Mất bao nhiêu tiền một khóa?",
        ] {
            assert_eq!(intent_of(text).as_deref(), Some("price"), "{}", text);
        }
        // "giao" must not trigger "gia"
        assert_eq!(intent_of("giao trinh bao nhieu trang"), None);
    }

    #[test]
    fn test_class_size_and_certificate() {
        assert_eq!(
            intent_of("Một lớp học có bao nhiêu học viên?").as_deref(),
            Some("class_size")
        );
        assert_eq!(
            intent_of("Sau khi học xong có được cấp chứng chỉ không?").as_deref(),
            Some("certificate")
        );
    }

    #[test]
    fn test_service_intents() {
        let cases = [
            ("Thanh toán bằng chuyển khoản được không?", "payment"),
            ("Học thử có mất phí không?", "trial"),
            ("Giáo viên có phải người Hàn không?", "instructor"),
            ("Địa chỉ trung tâm ở đâu?", "address"),
            ("Số điện thoại của trung tâm là gì?", "contact"),
            ("Trung tâm có dạy online không?", "online"),
        ];
        for (text, intent) in cases {
            assert_eq!(intent_of(text).as_deref(), Some(intent), "{}", text);
        }
    }

    #[test]
    fn test_shared_intent_is_symmetric() {
        let patterns = IntentPatterns::default();
        let a = normalize("Có hỗ trợ trả góp không?");
        let b = normalize("Tôi muốn chia nhỏ học phí");
        assert_eq!(patterns.shared(&a, &b), Some("installment"));
        assert_eq!(patterns.shared(&b, &a), Some("installment"));
        assert_eq!(patterns.shared(&a, "xin chao"), None);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let specs = vec![IntentPatternSpec {
            name: "broken".to_string(),
            pattern: "(oops".to_string(),
        }];
        assert!(matches!(
            IntentPatterns::from_specs(&specs),
            Err(AppError::Config(_))
        ));
    }
}
