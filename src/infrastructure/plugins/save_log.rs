use crate::domain::LearningEntry;
use crate::infrastructure::{SaveContext, SaveHook};
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Plugin that appends one audit line per save to `save_log.txt` in the
/// journal directory.
pub struct SaveLogHook {
    journal_dir: PathBuf,
}

impl SaveLogHook {
    pub fn new(journal_dir: impl Into<PathBuf>) -> Self {
        Self {
            journal_dir: journal_dir.into(),
        }
    }
}

impl SaveHook for SaveLogHook {
    fn on_entry_saved(&self, context: &SaveContext, entry: &LearningEntry) -> Result<()> {
        std::fs::create_dir_all(&self.journal_dir)?;
        let log_path = self.journal_dir.join("save_log.txt");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        writeln!(
            file,
            "[{}] Entry saved for {} - streak {} -> {} - {} characters, {} tags",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            context.date,
            context.previous_streak,
            context.streak,
            entry.content.chars().count(),
            entry.tags.len(),
        )?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Save Log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn appends_one_line_per_save() {
        let dir = TempDir::new().unwrap();
        let hook = SaveLogHook::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = LearningEntry::new(date, "shadowing", vec!["rust".into()]);
        let context = SaveContext {
            date,
            previous_streak: 0,
            streak: 1,
        };

        hook.on_entry_saved(&context, &entry).unwrap();
        hook.on_entry_saved(&context, &entry).unwrap();

        let log = std::fs::read_to_string(dir.path().join("save_log.txt")).unwrap();
        assert_eq!(log.lines().count(), 2);
        assert!(log.contains("Entry saved for 2024-03-15"));
        assert!(log.contains("streak 0 -> 1"));
    }
}
