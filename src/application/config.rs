use std::path::PathBuf;

pub struct Config {
    pub journal_dir: PathBuf,
    pub data_dir: PathBuf,
    pub editor: String,
    pub theme: String,
}

impl Config {
    pub fn from_env() -> Self {
        let journal_dir = std::env::var("LEARN_TRACKER_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("learn-tracker")
            });

        let data_dir = journal_dir.join("data");

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
        let theme = std::env::var("LEARN_TRACKER_THEME").unwrap_or_else(|_| "dark".to_string());

        Self {
            journal_dir,
            data_dir,
            editor,
            theme,
        }
    }
}
