use crate::domain::{LearningEntry, all_tags, compute_streak};
use crate::infrastructure::{EntryStore, HookRegistry, SaveContext};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    pub total_entries: usize,
    pub distinct_tags: usize,
    pub streak: u32,
}

/// Coordinator over the entry store: validates saves, keeps the cached streak
/// in step with the stored entries, and notifies registered save hooks. Holds
/// no entry state of its own.
pub struct Journal {
    store: Box<dyn EntryStore>,
    hooks: HookRegistry,
}

impl Journal {
    pub fn new(store: Box<dyn EntryStore>) -> Self {
        Self::with_hooks(store, HookRegistry::new())
    }

    pub fn with_hooks(store: Box<dyn EntryStore>, hooks: HookRegistry) -> Self {
        Self { store, hooks }
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// The entry for `date`, treating a corrupt record as absent.
    pub fn entry(&self, date: NaiveDate) -> Result<Option<LearningEntry>> {
        match self.store.get(date) {
            Ok(entry) => Ok(entry),
            Err(e) => {
                log::warn!("treating unreadable entry for {date} as absent: {e}");
                Ok(None)
            }
        }
    }

    /// Persist `content` under `date`, overwriting any existing entry for the
    /// same day, then recompute the streak and notify hooks. Blank content is
    /// rejected; drafts are never persisted.
    pub fn save_entry(
        &mut self,
        date: NaiveDate,
        content: &str,
        tags: Vec<String>,
    ) -> Result<LearningEntry> {
        if content.trim().is_empty() {
            bail!("nothing to save: entry content is empty");
        }

        let entry = LearningEntry::new(date, content, tags);
        let previous_streak = self.store.streak().context("failed to read streak")?;
        self.store
            .put(date, &entry)
            .with_context(|| format!("failed to save entry for {date}"))?;
        let streak = self.recompute_streak(date)?;

        let context = SaveContext {
            date,
            previous_streak,
            streak,
        };
        self.hooks.notify(&context, &entry);

        Ok(entry)
    }

    /// Full backward walk from `today` over the stored entries; the result is
    /// persisted as the cached scalar and returned.
    pub fn recompute_streak(&mut self, today: NaiveDate) -> Result<u32> {
        let logged: BTreeSet<NaiveDate> = self
            .store
            .list_all()
            .context("failed to enumerate entries")?
            .iter()
            .filter_map(LearningEntry::day)
            .collect();

        let streak = compute_streak(today, |day| logged.contains(&day));
        self.store
            .set_streak(streak)
            .context("failed to persist streak")?;
        Ok(streak)
    }

    pub fn streak(&self) -> Result<u32> {
        self.store.streak().context("failed to read streak")
    }

    /// All valid entries, newest first.
    pub fn snapshot(&self) -> Result<Vec<LearningEntry>> {
        self.store.list_all().context("failed to enumerate entries")
    }

    pub fn stats(&self) -> Result<JournalStats> {
        let entries = self.snapshot()?;
        Ok(JournalStats {
            total_entries: entries.len(),
            distinct_tags: all_tags(&entries).len(),
            streak: self.streak()?,
        })
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.store
            .delete_all_entries()
            .context("failed to clear entries")
    }

    pub fn notifications_enabled(&self) -> Result<bool> {
        self.store
            .notifications_enabled()
            .context("failed to read notification preference")
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) -> Result<()> {
        self.store
            .set_notifications_enabled(enabled)
            .context("failed to persist notification preference")
    }

    pub fn store(&self) -> &dyn EntryStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn EntryStore {
        self.store.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FileStore, SaveHook};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn journal(dir: &TempDir) -> Journal {
        let store = FileStore::open(dir.path().join("data")).unwrap();
        Journal::new(Box::new(store))
    }

    #[test]
    fn saving_then_loading_returns_the_saved_entry() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);
        let day = date("2024-03-15");

        let saved = journal
            .save_entry(day, "iterators are lazy", vec!["rust".into()])
            .unwrap();
        assert_eq!(journal.entry(day).unwrap(), Some(saved));
    }

    #[test]
    fn blank_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);
        let day = date("2024-03-15");

        assert!(journal.save_entry(day, "   \n", vec![]).is_err());
        assert_eq!(journal.entry(day).unwrap(), None);
    }

    #[test]
    fn every_save_recomputes_the_streak_from_scratch() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);

        journal.save_entry(date("2024-03-14"), "day one", vec![]).unwrap();
        assert_eq!(journal.streak().unwrap(), 1);

        journal.save_entry(date("2024-03-15"), "day two", vec![]).unwrap();
        assert_eq!(journal.streak().unwrap(), 2);

        // A save after a gap resets rather than extends.
        journal.save_entry(date("2024-03-17"), "after a gap", vec![]).unwrap();
        assert_eq!(journal.streak().unwrap(), 1);
    }

    struct StreakProbe(Arc<AtomicU32>);

    impl SaveHook for StreakProbe {
        fn on_entry_saved(&self, context: &SaveContext, _entry: &LearningEntry) -> Result<()> {
            self.0.store(context.streak, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "Streak Probe"
        }
    }

    #[test]
    fn hooks_observe_the_recomputed_streak() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);
        let seen = Arc::new(AtomicU32::new(0));
        let id = journal.hooks_mut().register(StreakProbe(seen.clone()));

        journal.save_entry(date("2024-03-15"), "observed", vec![]).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        journal.hooks_mut().unregister(id);
        journal.save_entry(date("2024-03-16"), "unobserved", vec![]).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_all_resets_entries_and_streak() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);
        journal.save_entry(date("2024-03-15"), "gone soon", vec![]).unwrap();
        journal.set_notifications_enabled(true).unwrap();

        journal.clear_all().unwrap();

        assert!(journal.snapshot().unwrap().is_empty());
        assert_eq!(journal.streak().unwrap(), 0);
        assert!(journal.notifications_enabled().unwrap());
    }

    #[test]
    fn stats_count_entries_and_distinct_tags() {
        let dir = TempDir::new().unwrap();
        let mut journal = journal(&dir);
        journal
            .save_entry(date("2024-03-14"), "a", vec!["rust".into(), "async".into()])
            .unwrap();
        journal
            .save_entry(date("2024-03-15"), "b", vec!["rust".into()])
            .unwrap();

        let stats = journal.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.distinct_tags, 2);
        assert_eq!(stats.streak, 2);
    }
}
