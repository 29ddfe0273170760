use crate::application::LearnTrackerApp;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "learn-tracker")]
#[command(about = "Track your daily learning and keep the streak alive")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record today's entry (opens $EDITOR unless --message is given)
    New {
        /// Entry content; skips the editor
        #[arg(short, long)]
        message: Option<String>,
        /// Tag for the entry; repeat for several
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },
    /// Show today's entry and the current streak
    Show,
    /// Browse past entries with search and tag filtering
    History {
        /// Case-insensitive text to match in content or tags
        #[arg(short, long)]
        search: Option<String>,
        /// Exact tag to filter by
        #[arg(short, long)]
        tag: Option<String>,
        /// Print a plain listing instead of the interactive view
        #[arg(long)]
        plain: bool,
    },
    /// Print the current streak
    Streak,
    /// Show journal totals
    Stats,
    /// Write a backup snapshot of all entries and the streak
    Export {
        /// Target file (defaults to learn-tracker-backup-<date>.json)
        path: Option<PathBuf>,
    },
    /// Apply a backup snapshot over the current store
    Import { path: PathBuf },
    /// Delete every entry and the streak counter
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show or set the daily reminder preference
    Notify { state: Option<Toggle> },
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();
        let mut app = LearnTrackerApp::new()?;

        match cli.command {
            Some(Commands::New { message, tags }) => app.record_entry(message, tags),
            Some(Commands::History { search, tag, plain }) => app.browse_history(search, tag, plain),
            Some(Commands::Streak) => app.show_streak(),
            Some(Commands::Stats) => app.show_stats(),
            Some(Commands::Export { path }) => app.export(path),
            Some(Commands::Import { path }) => app.import(path),
            Some(Commands::Clear { yes }) => app.clear_all(yes),
            Some(Commands::Notify { state }) => app.set_notifications(state),
            Some(Commands::Show) | None => app.show_today(),
        }
    }
}
