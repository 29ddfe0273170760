use super::theme::Theme;
use crate::domain::{LearningEntry, format_entry_date, format_relative_age};
use chrono::NaiveDate;

/// Plain terminal output for entries, used by the non-interactive commands
/// and as the fallback when stdout is not a TTY.
pub struct EntryRenderer {
    theme: Theme,
}

impl EntryRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render_entry(&self, entry: &LearningEntry, today: NaiveDate) {
        let headline = entry
            .day()
            .map(|day| format_entry_date(day, today))
            .unwrap_or_else(|| entry.date.clone());

        println!("=== {} ===", self.theme.colors.header.colorize_bold(&headline));
        println!();
        println!("{}", entry.content);

        if !entry.tags.is_empty() {
            let tags: Vec<String> = entry
                .tags
                .iter()
                .map(|tag| self.theme.colors.tag.colorize(&format!("[{tag}]")))
                .collect();
            println!();
            println!("{}", tags.join(" "));
        }

        if let Some(day) = entry.day() {
            println!();
            println!(
                "{}",
                self.theme.colors.dimmed.colorize(&format!(
                    "Saved on {} ({})",
                    entry.date,
                    format_relative_age(day, today)
                ))
            );
        }
    }

    pub fn render_streak(&self, streak: u32) {
        if streak > 0 {
            println!(
                "{}",
                self.theme
                    .colors
                    .streak
                    .colorize_bold(&format!("{streak}-day learning streak"))
            );
        } else {
            println!(
                "{}",
                self.theme
                    .colors
                    .dimmed
                    .colorize("No streak yet - log something today")
            );
        }
    }

    pub fn render_history(&self, entries: &[&LearningEntry], total: usize, today: NaiveDate) {
        if entries.is_empty() {
            println!("No entries found.");
            return;
        }

        for entry in entries {
            self.render_entry(entry, today);
            println!();
        }

        println!(
            "{}",
            self.theme
                .colors
                .dimmed
                .colorize(&format!("Showing {} of {} entries", entries.len(), total))
        );
    }
}
