use crate::domain::LearningEntry;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

pub const ENTRY_KEY_PREFIX: &str = "learning-entry-";
pub const STREAK_KEY: &str = "learning-streak";
pub const NOTIFICATIONS_KEY: &str = "notifications-enabled";

/// Storage key for a given calendar day, e.g. `learning-entry-2024-01-05`.
pub fn entry_key(date: NaiveDate) -> String {
    format!("{}{}", ENTRY_KEY_PREFIX, date.format("%Y-%m-%d"))
}

/// Inverse of [`entry_key`]: `None` for scalar keys and anything else that
/// does not follow the entry naming convention.
pub fn parse_entry_key(key: &str) -> Option<NaiveDate> {
    key.strip_prefix(ENTRY_KEY_PREFIX)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored value under '{key}' is not a well-formed entry")]
    CorruptEntry { key: String },

    #[error("could not parse snapshot file: {reason}")]
    ImportParse { reason: String },

    #[error("could not encode {what} as JSON")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Durable key-value persistence for entries and the two scalar settings.
///
/// Implementations are single-writer within one process; concurrent writers
/// from other processes are last-write-wins with no conflict detection.
pub trait EntryStore {
    /// Serialize and store `entry` under its date key, silently overwriting
    /// any existing value. Content validation is the caller's job.
    fn put(&mut self, date: NaiveDate, entry: &LearningEntry) -> Result<(), StoreError>;

    /// The entry for `date`, or `None`. A value that no longer parses is
    /// reported as [`StoreError::CorruptEntry`]; callers are expected to
    /// treat that as absent rather than abort.
    fn get(&self, date: NaiveDate) -> Result<Option<LearningEntry>, StoreError>;

    /// Every valid entry, newest first. Individually corrupt records are
    /// skipped (and logged), never an error.
    fn list_all(&self) -> Result<Vec<LearningEntry>, StoreError>;

    /// Remove every entry and the cached streak. Irreversible; interactive
    /// confirmation lives with the caller, not here.
    fn delete_all_entries(&mut self) -> Result<(), StoreError>;

    fn streak(&self) -> Result<u32, StoreError>;
    fn set_streak(&mut self, streak: u32) -> Result<(), StoreError>;

    fn notifications_enabled(&self) -> Result<bool, StoreError>;
    fn set_notifications_enabled(&mut self, enabled: bool) -> Result<(), StoreError>;

    /// Flat key-to-raw-value mapping of every entry key plus the streak
    /// scalar. The notification preference stays local.
    fn export_snapshot(&self) -> Result<BTreeMap<String, String>, StoreError>;

    /// Write every pair verbatim, overwriting same-named keys, then rebuild
    /// any derived state. Values are not validated here; a malformed entry
    /// surfaces later as corrupt on read.
    fn import_snapshot(&mut self, snapshot: &BTreeMap<String, String>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_keys_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let key = entry_key(date);
        assert_eq!(key, "learning-entry-2024-01-05");
        assert_eq!(parse_entry_key(&key), Some(date));
    }

    #[test]
    fn scalar_and_malformed_keys_are_not_entry_keys() {
        assert_eq!(parse_entry_key(STREAK_KEY), None);
        assert_eq!(parse_entry_key(NOTIFICATIONS_KEY), None);
        assert_eq!(parse_entry_key("learning-entry-not-a-date"), None);
        assert_eq!(parse_entry_key("learning-entry-"), None);
    }
}
