use super::theme::Theme;
use crate::domain::{
    LearningEntry, all_tags, filter_entries, format_entry_date, format_relative_age,
};
use chrono::NaiveDate;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use std::io::{self, Stdout, stdout};

/// Interactive browser over all stored entries: type to search, Tab to cycle
/// the tag filter, arrows to pick an entry for the detail pane.
pub struct HistoryView {
    /// All entries, newest first; filtering happens per draw over this set
    entries: Vec<LearningEntry>,
    /// Aggregate tag set backing the Tab filter cycle
    tags: Vec<String>,
    /// Live search term
    search: String,
    /// 0 = all tags, i > 0 = tags[i - 1]
    tag_index: usize,
    /// Selection within the filtered list
    selected: usize,
    today: NaiveDate,
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Whether we should exit
    should_exit: bool,
    /// Theme for styling
    theme: Theme,
}

impl HistoryView {
    pub fn new(entries: Vec<LearningEntry>, today: NaiveDate, theme: Theme) -> io::Result<Self> {
        // First check if we're in a proper terminal
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode().map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to enable raw mode: {}", e),
            )
        })?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode(); // Clean up on failure
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to enter alternate screen: {}", e),
            )
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to create terminal: {}", e),
            )
        })?;

        let tags = all_tags(&entries);

        Ok(Self {
            entries,
            tags,
            search: String::new(),
            tag_index: 0,
            selected: 0,
            today,
            terminal,
            should_exit: false,
            theme,
        })
    }

    fn selected_tag(&self) -> &str {
        if self.tag_index == 0 {
            ""
        } else {
            &self.tags[self.tag_index - 1]
        }
    }

    fn filtered_len(&self) -> usize {
        filter_entries(&self.entries, &self.search, self.selected_tag()).len()
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Handle keyboard input. Printable keys feed the search box, so exits
    /// and navigation live on control keys.
    fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            // Ctrl+C and Ctrl+D
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.should_exit = true;
            }

            // Escape clears active filters first, then exits
            (KeyCode::Esc, _) => {
                if self.search.is_empty() && self.tag_index == 0 {
                    self.should_exit = true;
                } else {
                    self.search.clear();
                    self.tag_index = 0;
                    self.selected = 0;
                }
            }

            // Selection
            (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
            }
            (KeyCode::Down, _) => {
                self.selected += 1;
                self.clamp_selection();
            }
            (KeyCode::PageUp, _) => {
                self.selected = self.selected.saturating_sub(10);
            }
            (KeyCode::PageDown, _) => {
                self.selected += 10;
                self.clamp_selection();
            }
            (KeyCode::Home, _) => {
                self.selected = 0;
            }

            // Cycle the tag filter
            (KeyCode::Tab, _) => {
                self.tag_index = (self.tag_index + 1) % (self.tags.len() + 1);
                self.selected = 0;
            }
            (KeyCode::BackTab, _) => {
                self.tag_index = (self.tag_index + self.tags.len()) % (self.tags.len() + 1);
                self.selected = 0;
            }

            // Search input
            (KeyCode::Backspace, _) => {
                self.search.pop();
                self.selected = 0;
            }
            (KeyCode::Char(c), modifiers)
                if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
            {
                self.search.push(c);
                self.selected = 0;
            }

            _ => {}
        }
    }

    /// Calculate centered area with both horizontal and vertical centering
    fn calculate_centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
        let width = std::cmp::min(available.width, needed_width);
        let height = std::cmp::min(available.height, needed_height);

        let left_margin = if available.width > width {
            (available.width - width) / 2
        } else {
            0
        };

        let top_margin = if available.height > height {
            (available.height - height) / 2
        } else {
            0
        };

        Rect {
            x: available.x + left_margin,
            y: available.y + top_margin,
            width,
            height,
        }
    }

    /// One-line summary of the active filters (static version for drawing)
    fn create_filter_bar_static(search: &str, selected_tag: &str, theme: &Theme) -> Paragraph<'static> {
        let tag_label = if selected_tag.is_empty() {
            "All".to_string()
        } else {
            selected_tag.to_string()
        };

        let line = Line::from(vec![
            Span::styled("Search: ", theme.colors.dimmed.to_ratatui()),
            Span::styled(format!("{}_", search), theme.colors.accent.to_ratatui()),
            Span::raw("   "),
            Span::styled("Tag: ", theme.colors.dimmed.to_ratatui()),
            Span::styled(tag_label, theme.colors.tag.to_ratatui()),
        ]);

        Paragraph::new(vec![line]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.colors.border.to_ratatui())
                .title("Search & Filter")
                .title_style(theme.colors.header.to_ratatui()),
        )
    }

    /// Create a table row for one entry (static version)
    fn create_entry_row_static(
        entry: &LearningEntry,
        is_selected: bool,
        today: NaiveDate,
        theme: &Theme,
    ) -> Row<'static> {
        let day = entry.day();

        let date_label = match day {
            Some(d) if d == today => "Today".to_string(),
            Some(d) if today.pred_opt() == Some(d) => "Yesterday".to_string(),
            _ => entry.date.clone(),
        };
        let age = day
            .map(|d| format_relative_age(d, today))
            .unwrap_or_default();

        let first_line = entry.content.lines().next().unwrap_or_default();
        let mut preview: String = first_line.chars().take(60).collect();
        if first_line.chars().count() > 60 {
            preview.push('…');
        }

        let date_style = if day == Some(today) {
            theme.colors.today.to_ratatui_with_modifier(Modifier::BOLD)
        } else {
            theme.colors.normal_text.to_ratatui()
        };

        let cells = vec![
            Cell::from(date_label).style(date_style),
            Cell::from(age).style(theme.colors.dimmed.to_ratatui()),
            Cell::from(preview).style(theme.colors.normal_text.to_ratatui()),
            Cell::from(entry.tags.join(", ")).style(theme.colors.tag.to_ratatui()),
        ];

        let mut row = Row::new(cells);
        if is_selected {
            row = row.style(theme.colors.selected.to_ratatui());
        }
        row
    }

    /// Create the entry list table (static version for drawing)
    fn create_entry_table_static(
        visible: &[&LearningEntry],
        selected_offset: Option<usize>,
        total_filtered: usize,
        today: NaiveDate,
        theme: &Theme,
    ) -> Table<'static> {
        let header = Row::new(vec![
            Cell::from("Date").style(theme.colors.header.to_ratatui()),
            Cell::from("Age").style(theme.colors.header.to_ratatui()),
            Cell::from("Entry").style(theme.colors.header.to_ratatui()),
            Cell::from("Tags").style(theme.colors.header.to_ratatui()),
        ])
        .height(1);

        let rows: Vec<Row> = visible
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Self::create_entry_row_static(entry, selected_offset == Some(i), today, theme)
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Min(24),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.colors.border.to_ratatui())
                .title(format!("Learning History ({} entries)", total_filtered))
                .title_style(theme.colors.header.to_ratatui())
                .title_alignment(Alignment::Center),
        )
        .column_spacing(1)
    }

    /// Create the detail pane for the selected entry (static version)
    fn create_detail_static(
        entry: Option<&LearningEntry>,
        today: NaiveDate,
        theme: &Theme,
    ) -> Paragraph<'static> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.colors.border.to_ratatui())
            .title("Entry")
            .title_style(theme.colors.header.to_ratatui());

        let entry = match entry {
            Some(entry) => entry,
            None => {
                return Paragraph::new(vec![Line::from(vec![Span::styled(
                    "No entries match your filters".to_string(),
                    theme.colors.dimmed.to_ratatui(),
                )])])
                .block(block)
                .alignment(Alignment::Left);
            }
        };

        let mut lines = Vec::new();

        if let Some(day) = entry.day() {
            lines.push(Line::from(vec![Span::styled(
                format_entry_date(day, today),
                theme.colors.header.to_ratatui_with_modifier(Modifier::BOLD),
            )]));
            lines.push(Line::default());
        }

        for text in entry.content.lines() {
            lines.push(Line::from(vec![Span::styled(
                text.to_string(),
                theme.colors.normal_text.to_ratatui(),
            )]));
        }

        if !entry.tags.is_empty() {
            lines.push(Line::default());
            let mut spans = vec![Span::styled(
                "Tags: ".to_string(),
                theme.colors.dimmed.to_ratatui(),
            )];
            for tag in &entry.tags {
                spans.push(Span::styled(
                    format!("[{}] ", tag),
                    theme.colors.tag.to_ratatui(),
                ));
            }
            lines.push(Line::from(spans));
        }

        if let Some(day) = entry.day() {
            lines.push(Line::default());
            lines.push(Line::from(vec![Span::styled(
                format!("Saved on {} ({})", entry.date, format_relative_age(day, today)),
                theme.colors.dimmed.to_ratatui(),
            )]));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left)
    }

    /// Create the status and key-help footer (static version)
    fn create_status_static(
        shown: usize,
        total: usize,
        theme: &Theme,
    ) -> Paragraph<'static> {
        let lines = vec![
            Line::from(vec![Span::styled(
                format!("Showing {} of {} entries", shown, total),
                theme.colors.normal_text.to_ratatui(),
            )]),
            Line::from(vec![Span::styled(
                "type=Search • Tab=Tag filter • ↑↓=Select • PgUp/PgDn=Jump • Esc=Clear/Quit",
                theme.colors.dimmed.to_ratatui(),
            )]),
        ];

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Center)
    }

    /// Run the history view loop
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            if self.should_exit {
                break;
            }

            // Capture the state we need for drawing
            let filtered = filter_entries(&self.entries, &self.search, {
                if self.tag_index == 0 {
                    ""
                } else {
                    &self.tags[self.tag_index - 1]
                }
            });
            let selected = self.selected.min(filtered.len().saturating_sub(1));
            let total = self.entries.len();
            let search = self.search.clone();
            let selected_tag = if self.tag_index == 0 {
                String::new()
            } else {
                self.tags[self.tag_index - 1].clone()
            };
            let today = self.today;
            let theme = &self.theme;

            self.terminal.draw(|frame| {
                let size = frame.area();

                const FILTER_HEIGHT: u16 = 3;
                const DETAIL_HEIGHT: u16 = 12;
                const STATUS_HEIGHT: u16 = 2;
                const MAX_WIDTH: u16 = 100;

                let needed_width = std::cmp::min(size.width.saturating_sub(4).max(40), MAX_WIDTH);
                let centered_area =
                    Self::calculate_centered_area(size, needed_width, size.height);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(FILTER_HEIGHT),
                        Constraint::Min(6),
                        Constraint::Length(DETAIL_HEIGHT),
                        Constraint::Length(STATUS_HEIGHT),
                    ])
                    .split(centered_area);

                // Slice the filtered list to the rows that fit, keeping the
                // selection visible at the bottom edge when scrolling down.
                let visible_rows = (chunks[1].height.saturating_sub(3) as usize).max(1);
                let start = selected.saturating_sub(visible_rows - 1);
                let end = std::cmp::min(start + visible_rows, filtered.len());
                let visible = &filtered[start..end];
                let selected_offset = if filtered.is_empty() {
                    None
                } else {
                    Some(selected - start)
                };

                let filter_bar = Self::create_filter_bar_static(&search, &selected_tag, theme);
                frame.render_widget(filter_bar, chunks[0]);

                let table = Self::create_entry_table_static(
                    visible,
                    selected_offset,
                    filtered.len(),
                    today,
                    theme,
                );
                frame.render_widget(table, chunks[1]);

                let detail =
                    Self::create_detail_static(filtered.get(selected).copied(), today, theme);
                frame.render_widget(detail, chunks[2]);

                let status = Self::create_status_static(filtered.len(), total, theme);
                frame.render_widget(status, chunks[3]);
            })?;

            // Handle events with timeout to prevent blocking indefinitely
            match poll(std::time::Duration::from_millis(100))? {
                true => match event::read()? {
                    Event::Key(key) => {
                        self.handle_key_event(key);
                    }
                    Event::Resize(_, _) => {
                        continue;
                    }
                    _ => {
                        continue;
                    }
                },
                false => {
                    continue;
                }
            }
        }

        // Ensure proper cleanup before returning
        self.cleanup()?;
        Ok(())
    }

    /// Explicit cleanup method
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for HistoryView {
    fn drop(&mut self) {
        // Fallback cleanup if explicit cleanup wasn't called
        let _ = self.cleanup();
    }
}
