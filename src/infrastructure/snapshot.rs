use crate::infrastructure::store::{EntryStore, StoreError};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Backup file name convention: embeds the export date.
pub fn default_export_path(today: NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "learn-tracker-backup-{}.json",
        today.format("%Y-%m-%d")
    ))
}

/// Write the store's snapshot to `path` as pretty-printed JSON. Returns the
/// number of exported keys.
pub fn export_to_file(store: &dyn EntryStore, path: &Path) -> Result<usize, StoreError> {
    let snapshot = store.export_snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot).map_err(|e| StoreError::Encode {
        what: "snapshot".to_string(),
        source: e,
    })?;
    fs::write(path, json)?;
    Ok(snapshot.len())
}

/// Read `path` and apply every top-level string value to the store verbatim.
/// A file that does not parse as a JSON object applies nothing; top-level
/// non-string values are dropped. Returns the number of applied keys.
pub fn import_from_file(store: &mut dyn EntryStore, path: &Path) -> Result<usize, StoreError> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| StoreError::ImportParse {
        reason: e.to_string(),
    })?;
    let Value::Object(object) = value else {
        return Err(StoreError::ImportParse {
            reason: "top-level value is not an object".to_string(),
        });
    };

    let mut snapshot = BTreeMap::new();
    for (key, value) in object {
        if let Value::String(s) = value {
            snapshot.insert(key, s);
        }
    }

    store.import_snapshot(&snapshot)?;
    Ok(snapshot.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LearningEntry;
    use crate::infrastructure::test_utils::test_harness::TestStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn export_path_embeds_the_date() {
        assert_eq!(
            default_export_path(date("2024-06-10")),
            PathBuf::from("learn-tracker-backup-2024-06-10.json")
        );
    }

    #[test]
    fn file_round_trip_restores_entries_and_streak() {
        let mut source = TestStore::new();
        source.seed_entry(date("2024-03-01"), "traits as seams", &["rust"]);
        source.seed_entry(date("2024-03-02"), "error contexts", &["rust", "errors"]);
        source.store_mut().set_streak(2).unwrap();

        let file = source.data_dir().join("backup.json");
        let exported = export_to_file(source.store(), &file).unwrap();
        assert_eq!(exported, 3);

        let mut target = TestStore::new();
        let imported = import_from_file(target.store_mut(), &file).unwrap();
        assert_eq!(imported, 3);
        assert_eq!(
            target.store().list_all().unwrap(),
            source.store().list_all().unwrap()
        );
        assert_eq!(target.store().streak().unwrap(), 2);
    }

    #[test]
    fn unparseable_files_apply_nothing() {
        let mut harness = TestStore::new();
        harness.seed_entry(date("2024-03-01"), "keep me", &[]);

        let file = harness.data_dir().join("broken.json");
        fs::write(&file, "{ definitely not json").unwrap();

        let err = import_from_file(harness.store_mut(), &file).unwrap_err();
        assert!(matches!(err, StoreError::ImportParse { .. }));
        assert_eq!(harness.store().list_all().unwrap().len(), 1);
    }

    #[test]
    fn top_level_arrays_are_rejected() {
        let mut harness = TestStore::new();
        let file = harness.data_dir().join("array.json");
        fs::write(&file, "[1, 2, 3]").unwrap();

        let err = import_from_file(harness.store_mut(), &file).unwrap_err();
        assert!(matches!(err, StoreError::ImportParse { .. }));
    }

    #[test]
    fn non_string_values_are_ignored() {
        let mut harness = TestStore::new();
        let day = date("2024-03-01");
        let entry = LearningEntry::new(day, "restored", vec![]);

        let file = harness.data_dir().join("mixed.json");
        let body = format!(
            r#"{{"learning-entry-2024-03-01": {}, "learning-streak": 9, "junk": null}}"#,
            serde_json::to_string(&serde_json::to_string(&entry).unwrap()).unwrap()
        );
        fs::write(&file, body).unwrap();

        let applied = import_from_file(harness.store_mut(), &file).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(harness.store().get(day).unwrap(), Some(entry));
        // The numeric streak value was dropped, not written.
        assert_eq!(harness.store().streak().unwrap(), 0);
    }
}
