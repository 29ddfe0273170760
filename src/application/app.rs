use crate::application::cli::Toggle;
use crate::application::{Config, EntryRenderer, HistoryView, Theme};
use crate::domain::{Journal, LearningEntry, filter_entries};
use crate::infrastructure::{FileStore, HookRegistry, SaveLogHook, snapshot};
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use crossterm::tty::IsTty;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

pub struct LearnTrackerApp {
    pub journal: Journal,
    config: Config,
    theme: Theme,
}

impl LearnTrackerApp {
    pub fn new() -> Result<Self> {
        Self::with_default_plugins()
    }

    pub fn with_default_plugins() -> Result<Self> {
        let config = Config::from_env();
        let mut hooks = HookRegistry::new();
        hooks.register(SaveLogHook::new(config.journal_dir.clone()));
        Self::build(config, hooks)
    }

    fn build(config: Config, hooks: HookRegistry) -> Result<Self> {
        let store = FileStore::open(config.data_dir.clone())
            .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
        let journal = Journal::with_hooks(Box::new(store), hooks);
        let theme = Theme::by_name(&config.theme);

        Ok(Self {
            journal,
            config,
            theme,
        })
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn renderer(&self) -> EntryRenderer {
        EntryRenderer::new(self.theme.clone())
    }

    /// Record today's entry, overwriting an earlier save from the same day.
    /// Without `--message` the entry is composed in `$EDITOR`, pre-filled
    /// with today's existing content.
    pub fn record_entry(&mut self, message: Option<String>, tags: Vec<String>) -> Result<()> {
        let today = Self::today();
        let existing = self.journal.entry(today)?;

        let content = match message {
            Some(message) => message,
            None => self.compose_in_editor(existing.as_ref())?,
        };

        // Repeated --tag flags deduplicate; with none given, the existing
        // entry's tags carry over.
        let tags = if tags.is_empty() {
            existing.map(|e| e.tags).unwrap_or_default()
        } else {
            dedup_tags(tags)
        };

        self.journal.save_entry(today, &content, tags)?;
        println!("Entry saved for {}", today.format("%Y-%m-%d"));
        self.renderer().render_streak(self.journal.streak()?);
        Ok(())
    }

    fn compose_in_editor(&self, existing: Option<&LearningEntry>) -> Result<String> {
        let mut draft = tempfile::Builder::new()
            .prefix("learn-entry-")
            .suffix(".md")
            .tempfile()
            .context("failed to create draft file")?;

        if let Some(entry) = existing {
            draft.write_all(entry.content.as_bytes())?;
            draft.flush()?;
        }

        let status = Command::new(&self.config.editor)
            .arg(draft.path())
            .status()
            .with_context(|| format!("failed to launch editor '{}'", self.config.editor))?;
        if !status.success() {
            bail!("editor exited with error: {}", status);
        }

        let content = std::fs::read_to_string(draft.path())?;
        Ok(content.trim_end().to_string())
    }

    pub fn show_today(&mut self) -> Result<()> {
        let today = Self::today();
        let renderer = self.renderer();

        match self.journal.entry(today)? {
            Some(entry) => renderer.render_entry(&entry, today),
            None => {
                println!("No entry for today yet.");
                println!("Start by adding what you learned: learn-tracker new");
            }
        }

        // The cached scalar goes stale at day rollover, so displaying views
        // recompute rather than trust it.
        let streak = self.journal.recompute_streak(today)?;
        println!();
        renderer.render_streak(streak);
        Ok(())
    }

    pub fn show_streak(&mut self) -> Result<()> {
        let streak = self.journal.recompute_streak(Self::today())?;
        self.renderer().render_streak(streak);
        Ok(())
    }

    pub fn show_stats(&mut self) -> Result<()> {
        self.journal.recompute_streak(Self::today())?;
        let stats = self.journal.stats()?;
        let reminders = if self.journal.notifications_enabled()? {
            "on"
        } else {
            "off"
        };

        println!("Total entries:  {}", stats.total_entries);
        println!("Distinct tags:  {}", stats.distinct_tags);
        println!("Current streak: {} days", stats.streak);
        println!("Reminders:      {}", reminders);
        println!("Data directory: {}", self.config.data_dir.display());
        Ok(())
    }

    /// Browse past entries. Interactive unless filters were given on the
    /// command line, `--plain` was passed, or stdout is not a terminal.
    pub fn browse_history(
        &mut self,
        search: Option<String>,
        tag: Option<String>,
        plain: bool,
    ) -> Result<()> {
        let today = Self::today();
        let entries = self.journal.snapshot()?;
        let search = search.unwrap_or_default();
        let tag = tag.unwrap_or_default();

        let interactive =
            !plain && search.is_empty() && tag.is_empty() && IsTty::is_tty(&std::io::stdout());
        if interactive {
            let mut view = HistoryView::new(entries, today, self.theme.clone())?;
            view.run()?;
            return Ok(());
        }

        let filtered = filter_entries(&entries, &search, &tag);
        self.renderer().render_history(&filtered, entries.len(), today);
        Ok(())
    }

    pub fn export(&self, path: Option<PathBuf>) -> Result<()> {
        let path = path.unwrap_or_else(|| snapshot::default_export_path(Self::today()));
        let keys = snapshot::export_to_file(self.journal.store(), &path)
            .with_context(|| format!("failed to export to {}", path.display()))?;
        println!("Exported {} keys to {}", keys, path.display());
        Ok(())
    }

    pub fn import(&mut self, path: PathBuf) -> Result<()> {
        let keys = snapshot::import_from_file(self.journal.store_mut(), &path)
            .with_context(|| format!("failed to import from {}", path.display()))?;
        println!("Imported {} keys from {}", keys, path.display());
        Ok(())
    }

    pub fn clear_all(&mut self, yes: bool) -> Result<()> {
        if !yes && !confirm("Delete all learning entries? This cannot be undone.")? {
            println!("Nothing deleted.");
            return Ok(());
        }

        self.journal.clear_all()?;
        println!("All data has been cleared.");
        Ok(())
    }

    pub fn set_notifications(&mut self, state: Option<Toggle>) -> Result<()> {
        if let Some(toggle) = state {
            self.journal
                .set_notifications_enabled(toggle == Toggle::On)?;
        }

        let reminders = if self.journal.notifications_enabled()? {
            "on"
        } else {
            "off"
        };
        println!("Daily reminders: {}", reminders);
        Ok(())
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_flags_deduplicate_and_drop_blanks() {
        let tags = vec![
            "rust".to_string(),
            " rust ".to_string(),
            "".to_string(),
            "async".to_string(),
        ];
        assert_eq!(dedup_tags(tags), vec!["rust", "async"]);
    }
}
