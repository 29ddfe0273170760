use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's learning record. `id` and `date` both carry the canonical
/// `YYYY-MM-DD` key; entries created through the normal flow keep them equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningEntry {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
}

impl LearningEntry {
    pub fn new(date: NaiveDate, content: impl Into<String>, tags: Vec<String>) -> Self {
        let key = date.format("%Y-%m-%d").to_string();
        Self {
            id: key.clone(),
            content: content.into(),
            tags,
            date: key,
        }
    }

    /// The calendar day this entry belongs to, when `date` is well-formed.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
