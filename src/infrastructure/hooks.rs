use crate::domain::LearningEntry;
use anyhow::Result;
use chrono::NaiveDate;

/// Context handed to save hooks after an entry and its recomputed streak have
/// been persisted.
#[derive(Debug, Clone)]
pub struct SaveContext {
    pub date: NaiveDate,
    pub previous_streak: u32,
    pub streak: u32,
}

/// Observer of entry saves. Surfaces that cache the streak (or mirror writes
/// elsewhere) register one of these and drop it again on teardown.
pub trait SaveHook: Send + Sync {
    /// Called after an entry has been successfully persisted.
    fn on_entry_saved(&self, context: &SaveContext, entry: &LearningEntry) -> Result<()>;

    /// Human-readable name for this hook.
    fn name(&self) -> &str;
}

/// Handle returned by [`HookRegistry::register`]; used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u64);

pub struct HookRegistry {
    hooks: Vec<(HookId, Box<dyn SaveHook>)>,
    next_id: u64,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register<H>(&mut self, hook: H) -> HookId
    where
        H: SaveHook + 'static,
    {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, Box::new(hook)));
        id
    }

    pub fn unregister(&mut self, id: HookId) {
        self.hooks.retain(|(hook_id, _)| *hook_id != id);
    }

    /// Notify every registered hook. The save has already succeeded, so a
    /// failing hook is logged and the rest still run.
    pub fn notify(&self, context: &SaveContext, entry: &LearningEntry) {
        for (_, hook) in &self.hooks {
            if let Err(e) = hook.on_entry_saved(context, entry) {
                log::warn!("save hook '{}' failed: {e:#}", hook.name());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHook(Arc<AtomicUsize>);

    impl SaveHook for CountingHook {
        fn on_entry_saved(&self, _context: &SaveContext, _entry: &LearningEntry) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "Counting"
        }
    }

    struct FailingHook;

    impl SaveHook for FailingHook {
        fn on_entry_saved(&self, _context: &SaveContext, _entry: &LearningEntry) -> Result<()> {
            bail!("boom")
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    fn sample_save() -> (SaveContext, LearningEntry) {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let context = SaveContext {
            date,
            previous_streak: 1,
            streak: 2,
        };
        (context, LearningEntry::new(date, "x", vec![]))
    }

    #[test]
    fn registered_hooks_observe_saves_until_unregistered() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        let id = registry.register(CountingHook(count.clone()));

        let (context, entry) = sample_save();
        registry.notify(&context, &entry);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        registry.unregister(id);
        assert!(registry.is_empty());
        registry.notify(&context, &entry);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn a_failing_hook_does_not_stop_the_others() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        registry.register(FailingHook);
        registry.register(CountingHook(count.clone()));

        let (context, entry) = sample_save();
        registry.notify(&context, &entry);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
