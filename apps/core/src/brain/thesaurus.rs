//! Curated key → synonyms table.
//!
//! Lets "giá bao nhiêu" find "học phí bao nhiêu" without a trained model.
//! Keys and synonyms are stored normalized and matched as whole-token phrases.

use super::normalizer::{contains_phrase, normalize};
use serde::{Deserialize, Serialize};

const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    (
        "gia",
        &["hoc phi", "chi phi", "bao nhieu tien", "gia ca", "muc phi", "price", "cost", "fee", "tuition"],
    ),
    (
        "hoc phi",
        &["gia", "chi phi", "bao nhieu tien", "muc phi", "tuition", "fee"],
    ),
    (
        "tra gop",
        &["chia nho", "nhieu lan", "tung dot", "gop", "installment"],
    ),
    (
        "si so",
        &["bao nhieu hoc vien", "bao nhieu nguoi", "so luong hoc vien", "so hoc vien", "class size"],
    ),
    (
        "hoan tien",
        &["tra lai tien", "hoan hoc phi", "lay lai tien", "hoan lai", "refund"],
    ),
    (
        "chung chi",
        &["bang cap", "chung nhan", "van bang", "certificate"],
    ),
    (
        "lich hoc",
        &["thoi khoa bieu", "gio hoc", "ca hoc", "buoi hoc", "hoc vao", "schedule"],
    ),
    (
        "khoa hoc",
        &["chuong trinh", "cap do", "course"],
    ),
    (
        "giao vien",
        &["giang vien", "thay co", "nguoi day", "teacher"],
    ),
    (
        "dang ky",
        &["ghi danh", "nhap hoc", "register", "enroll"],
    ),
    (
        "hoc thu",
        &["hoc mien phi", "buoi thu", "trial"],
    ),
    ("online", &["truc tuyen", "tu xa", "zoom"]),
    ("dia chi", &["o dau", "co so", "vi tri", "address"]),
];

/// One thesaurus row as it appears in the matcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesaurusEntry {
    pub key: String,
    pub synonyms: Vec<String>,
}

/// The built-in table in configuration form.
pub fn default_thesaurus_entries() -> Vec<ThesaurusEntry> {
    DEFAULT_ENTRIES
        .iter()
        .map(|(key, synonyms)| ThesaurusEntry {
            key: key.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Thesaurus {
    entries: Vec<ThesaurusEntry>,
}

impl Default for Thesaurus {
    fn default() -> Self {
        Self::new(&default_thesaurus_entries())
    }
}

impl Thesaurus {
    /// Builds the table, normalizing keys and synonyms and dropping blanks.
    pub fn new(entries: &[ThesaurusEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|entry| ThesaurusEntry {
                key: normalize(&entry.key),
                synonyms: entry
                    .synonyms
                    .iter()
                    .map(|s| normalize(s))
                    .filter(|s| !s.is_empty())
                    .collect(),
            })
            .filter(|entry| !entry.key.is_empty())
            .collect();
        Self { entries }
    }

    /// Key of the first entry where one text holds the key and the other a synonym.
    ///
    /// Both texts must be normalized.
    pub fn linking_key(&self, a: &str, b: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| {
                (contains_phrase(a, &entry.key) && Self::has_synonym(entry, b))
                    || (contains_phrase(b, &entry.key) && Self::has_synonym(entry, a))
            })
            .map(|entry| entry.key.as_str())
    }

    fn has_synonym(entry: &ThesaurusEntry, text: &str) -> bool {
        entry.synonyms.iter().any(|s| contains_phrase(text, s))
    }
}
