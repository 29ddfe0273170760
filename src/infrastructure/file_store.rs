use crate::domain::LearningEntry;
use crate::infrastructure::store::{
    ENTRY_KEY_PREFIX, EntryStore, NOTIFICATIONS_KEY, STREAK_KEY, StoreError, entry_key,
    parse_entry_key,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File-backed key-value store: one file per key in `data_dir`, file name
/// equal to the key, file body equal to the raw value string. Entries are
/// additionally held in a sorted in-memory index built once at open, so reads
/// never rescan the directory.
pub struct FileStore {
    data_dir: PathBuf,
    index: BTreeMap<NaiveDate, LearningEntry>,
    corrupt: BTreeSet<String>,
}

impl FileStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let mut store = Self {
            data_dir,
            index: BTreeMap::new(),
            corrupt: BTreeSet::new(),
        };
        store.rebuild_index()?;
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Re-scan the data directory into the index, skipping (and remembering)
    /// records that fail to parse. Keys outside the entry naming convention
    /// are left alone.
    fn rebuild_index(&mut self) -> Result<(), StoreError> {
        self.index.clear();
        self.corrupt.clear();

        for dirent in fs::read_dir(&self.data_dir)? {
            let dirent = dirent?;
            let file_name = dirent.file_name();
            let Some(key) = file_name.to_str() else {
                continue;
            };
            let Some(date) = parse_entry_key(key) else {
                continue;
            };

            let raw = fs::read_to_string(dirent.path())?;
            match parse_entry(key, &raw) {
                Ok(entry) => {
                    self.index.insert(date, entry);
                }
                Err(_) => {
                    log::warn!("skipping corrupt entry under '{key}'");
                    self.corrupt.insert(key.to_string());
                }
            }
        }

        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove_key(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_entry(key: &str, raw: &str) -> Result<LearningEntry, StoreError> {
    let entry: LearningEntry = serde_json::from_str(raw).map_err(|_| StoreError::CorruptEntry {
        key: key.to_string(),
    })?;

    // A record without content or a date was never a saved entry.
    if entry.content.is_empty() || entry.date.is_empty() {
        return Err(StoreError::CorruptEntry {
            key: key.to_string(),
        });
    }

    Ok(entry)
}

impl EntryStore for FileStore {
    fn put(&mut self, date: NaiveDate, entry: &LearningEntry) -> Result<(), StoreError> {
        let key = entry_key(date);
        let raw = serde_json::to_string(entry).map_err(|e| StoreError::Encode {
            what: format!("entry '{key}'"),
            source: e,
        })?;

        self.write_raw(&key, &raw)?;
        self.corrupt.remove(&key);
        self.index.insert(date, entry.clone());
        Ok(())
    }

    fn get(&self, date: NaiveDate) -> Result<Option<LearningEntry>, StoreError> {
        if let Some(entry) = self.index.get(&date) {
            return Ok(Some(entry.clone()));
        }

        let key = entry_key(date);
        if self.corrupt.contains(&key) {
            return Err(StoreError::CorruptEntry { key });
        }
        Ok(None)
    }

    fn list_all(&self) -> Result<Vec<LearningEntry>, StoreError> {
        Ok(self.index.values().rev().cloned().collect())
    }

    fn delete_all_entries(&mut self) -> Result<(), StoreError> {
        for dirent in fs::read_dir(&self.data_dir)? {
            let dirent = dirent?;
            let file_name = dirent.file_name();
            let Some(key) = file_name.to_str() else {
                continue;
            };
            if key.starts_with(ENTRY_KEY_PREFIX) || key == STREAK_KEY {
                self.remove_key(key)?;
            }
        }

        self.index.clear();
        self.corrupt.clear();
        Ok(())
    }

    fn streak(&self) -> Result<u32, StoreError> {
        let Some(raw) = self.read_raw(STREAK_KEY)? else {
            return Ok(0);
        };
        match raw.trim().parse() {
            Ok(streak) => Ok(streak),
            Err(_) => {
                log::warn!("streak scalar '{}' is not a number, treating as 0", raw.trim());
                Ok(0)
            }
        }
    }

    fn set_streak(&mut self, streak: u32) -> Result<(), StoreError> {
        self.write_raw(STREAK_KEY, &streak.to_string())
    }

    fn notifications_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.read_raw(NOTIFICATIONS_KEY)?.as_deref() == Some("true"))
    }

    fn set_notifications_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.write_raw(NOTIFICATIONS_KEY, if enabled { "true" } else { "false" })
    }

    fn export_snapshot(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let mut snapshot = BTreeMap::new();

        for dirent in fs::read_dir(&self.data_dir)? {
            let dirent = dirent?;
            let file_name = dirent.file_name();
            let Some(key) = file_name.to_str() else {
                continue;
            };
            if key.starts_with(ENTRY_KEY_PREFIX) {
                snapshot.insert(key.to_string(), fs::read_to_string(dirent.path())?);
            }
        }

        if let Some(streak) = self.read_raw(STREAK_KEY)? {
            snapshot.insert(STREAK_KEY.to_string(), streak);
        }

        Ok(snapshot)
    }

    fn import_snapshot(&mut self, snapshot: &BTreeMap<String, String>) -> Result<(), StoreError> {
        for (key, value) in snapshot {
            // Keys double as file names; anything that cannot be one is dropped.
            if key.is_empty() || key == "." || key == ".." || key.chars().any(std::path::is_separator)
            {
                log::warn!("ignoring snapshot key '{key}' that is not a valid store key");
                continue;
            }
            self.write_raw(key, value)?;
        }
        self.rebuild_index()
    }
}
