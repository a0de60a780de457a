//! Application state management for partslip.
//!
//! `App` owns the configuration, the loaded `Schedule`, the rendered messages
//! and all UI state. Sheet loads run on a spawned tokio task and report back
//! through an mpsc channel that the draw loop polls.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use partslip_core::{MessageRenderer, RenderedMessage, Schedule, SheetClient, SheetSource};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::utils::format::count_label;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for the sheet URL input.
const MAX_URL_LENGTH: usize = 2048;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Current UI focus area (list panel or message panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringUrl,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Result sent back from a background load, tagged with the load that
/// produced it so superseded loads can be dropped.
enum LoadResult {
    Loaded {
        generation: u64,
        url: String,
        schedule: Schedule,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    /// Where the config is saved after a successful load; `None` disables saving.
    pub config_path: Option<PathBuf>,
    client: SheetClient,
    renderer: MessageRenderer,

    // UI State
    pub state: AppState,
    pub focus: Focus,
    pub selection: usize,
    pub detail_scroll: u16,

    // URL form state
    pub url_input: String,
    pub url_error: Option<String>,
    url_before_edit: Option<String>,

    // Loaded data, replaced wholesale on every load
    pub schedule: Option<Schedule>,
    pub messages: Vec<RenderedMessage>,
    pub copied: HashSet<usize>,

    // Load state
    pub loading: bool,
    load_generation: u64,
    pub load_error: Option<String>,
    pub status_message: Option<String>,

    // Text waiting to be written to the clipboard by the draw loop
    pending_copy: Option<String>,

    load_rx: mpsc::Receiver<LoadResult>,
    load_tx: mpsc::Sender<LoadResult>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = SheetClient::new(config.request_timeout())?;
        let renderer = config.renderer();
        let url_input = config.initial_sheet_url().unwrap_or_default();
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        debug!(has_url = !url_input.is_empty(), "App created");

        Ok(Self {
            config,
            config_path: Config::config_path().ok(),
            client,
            renderer,

            state: AppState::Normal,
            focus: Focus::List,
            selection: 0,
            detail_scroll: 0,

            url_input,
            url_error: None,
            url_before_edit: None,

            schedule: None,
            messages: Vec::new(),
            copied: HashSet::new(),

            loading: false,
            load_generation: 0,
            load_error: None,
            status_message: None,

            pending_copy: None,

            load_rx: rx,
            load_tx: tx,
        })
    }

    // =========================================================================
    // URL Entry
    // =========================================================================

    /// Show the URL overlay, keeping the current URL to restore on cancel.
    pub fn start_url_entry(&mut self) {
        self.state = AppState::EnteringUrl;
        self.url_error = None;
        self.url_before_edit = Some(self.url_input.clone());
    }

    /// Leave the URL overlay without applying the edit.
    pub fn cancel_url_entry(&mut self) {
        if let Some(previous) = self.url_before_edit.take() {
            self.url_input = previous;
        }
        self.state = AppState::Normal;
        self.url_error = None;
    }

    pub fn push_url_char(&mut self, c: char) {
        if can_add_url_char(self.url_input.chars().count(), c) {
            self.url_input.push(c);
        }
    }

    /// Paste text into the URL field, dropping newlines and control characters.
    pub fn paste_url(&mut self, text: &str) {
        for c in text.chars() {
            self.push_url_char(c);
        }
    }

    /// Validate the entered URL and start loading it. A load already in
    /// flight is superseded.
    pub fn submit_url(&mut self) {
        match SheetSource::parse(&self.url_input) {
            Ok(source) => {
                self.state = AppState::Normal;
                self.url_error = None;
                self.url_before_edit = None;
                self.start_load(source);
            }
            Err(e) => {
                debug!(error = %e, "Rejected sheet URL");
                self.url_error = Some(e.user_message());
            }
        }
    }

    // =========================================================================
    // Background Loading
    // =========================================================================

    /// Reload the current URL, or ask for one if none is set.
    pub fn reload(&mut self) {
        if self.loading {
            return;
        }
        match SheetSource::parse(&self.url_input) {
            Ok(source) => self.start_load(source),
            Err(_) => self.start_url_entry(),
        }
    }

    /// Begin a new load generation. Results from earlier generations are
    /// ignored once this is called.
    fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.loading = true;
        self.load_error = None;
        self.status_message = None;
        self.load_generation
    }

    fn start_load(&mut self, source: SheetSource) {
        let generation = self.begin_load();
        let url = self.url_input.trim().to_string();
        info!(%source, generation, "Starting background load");

        let client = self.client.clone();
        let options = self.config.load_options();
        let tx = self.load_tx.clone();

        tokio::spawn(async move {
            let result = match client.load(&source, &options).await {
                Ok(schedule) => LoadResult::Loaded {
                    generation,
                    url,
                    schedule,
                },
                Err(e) => {
                    error!(error = %e, "Sheet load failed");
                    LoadResult::Failed {
                        generation,
                        message: e.user_message(),
                    }
                }
            };
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send load result - channel closed");
            }
        });
    }

    /// Check for completed background loads and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        let generation = match &result {
            LoadResult::Loaded { generation, .. } | LoadResult::Failed { generation, .. } => {
                *generation
            }
        };
        if generation != self.load_generation {
            debug!(generation, current = self.load_generation, "Dropping superseded load result");
            return;
        }

        self.loading = false;
        match result {
            LoadResult::Loaded { url, schedule, .. } => {
                self.apply_schedule(schedule);
                self.remember_url(url);
            }
            LoadResult::Failed { message, .. } => {
                self.load_error = Some(message);
            }
        }
    }

    /// Replace the loaded schedule and everything derived from it.
    pub fn apply_schedule(&mut self, schedule: Schedule) {
        self.messages = self.renderer.render_all(&schedule.records);
        info!(count = self.messages.len(), "Rendered messages");

        self.status_message = if schedule.is_empty() {
            Some("No assignments found".to_string())
        } else {
            Some(format!("Loaded {}", count_label(schedule.len(), "assignment")))
        };
        self.schedule = Some(schedule);
        self.selection = 0;
        self.detail_scroll = 0;
        self.copied.clear();
        self.load_error = None;
    }

    /// Save the URL a successful load actually came from.
    fn remember_url(&mut self, url: String) {
        if self.config.sheet_url.as_deref() == Some(url.as_str()) {
            return;
        }
        self.config.sheet_url = Some(url);
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Selection & Copy
    // =========================================================================

    pub fn selected_message(&self) -> Option<&RenderedMessage> {
        self.messages.get(self.selection)
    }

    pub fn select_next(&mut self, step: usize) {
        if self.messages.is_empty() {
            return;
        }
        self.selection = (self.selection + step).min(self.messages.len() - 1);
        self.detail_scroll = 0;
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
        self.detail_scroll = 0;
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
        self.detail_scroll = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.messages.len().saturating_sub(1);
        self.detail_scroll = 0;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::List => Focus::Detail,
            Focus::Detail => Focus::List,
        };
    }

    /// Queue the selected message for the clipboard and mark it copied.
    pub fn copy_selected(&mut self) {
        let Some(message) = self.selected_message() else {
            return;
        };
        let (title, body) = (message.title.clone(), message.body.clone());
        self.pending_copy = Some(body);
        self.copied.insert(self.selection);
        self.status_message = Some(format!("Copied to clipboard: {}", title));
        debug!(selection = self.selection, "Message queued for clipboard");
    }

    pub fn take_pending_copy(&mut self) -> Option<String> {
        self.pending_copy.take()
    }

    pub fn loaded_age(&self) -> Option<String> {
        self.schedule.as_ref().map(Schedule::age_display)
    }

    /// Drop the one-shot status message so the status bar falls back to
    /// the load state.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Left side of the status bar.
    pub fn status_text(&self) -> String {
        if self.loading {
            return "Loading assignments...".to_string();
        }
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        if let Some(ref error) = self.load_error {
            return format!("Error: {}", error);
        }
        match (&self.schedule, self.loaded_age()) {
            (Some(schedule), Some(age)) => format!(
                "{} loaded {}",
                count_label(schedule.len(), "assignment"),
                age
            ),
            _ => "Not loaded".to_string(),
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a URL character should be accepted
pub fn can_add_url_char(current_len: usize, c: char) -> bool {
    current_len < MAX_URL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use partslip_core::load_text;

    const SHEET: &str = "JANUARY 5-11,JANUARY 12-18\n3 HXQ,4 Alice / Bob\n5 Chen,\n";
    const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/abc123/edit";

    fn app() -> App {
        let mut app = App::new(Config::default()).expect("app builds");
        app.config_path = None;
        app
    }

    fn loaded_app() -> App {
        let mut app = app();
        let schedule = load_text(SHEET, &app.config.load_options()).expect("loads");
        app.apply_schedule(schedule);
        app
    }

    fn schedule(text: &str) -> Schedule {
        load_text(text, &Config::default().load_options()).expect("loads")
    }

    #[test]
    fn test_apply_schedule_renders_messages() {
        let app = loaded_app();
        assert_eq!(app.messages.len(), 3);
        assert_eq!(app.messages[0].title, "[弟兄] #3 HXQ");
        assert_eq!(app.messages[2].title, "[姊妹] #4 Alice & Bob");
        assert_eq!(app.status_message.as_deref(), Some("Loaded 3 assignments"));
        assert_eq!(app.loaded_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_apply_empty_schedule() {
        let mut app = app();
        app.apply_schedule(Schedule::new(Vec::new()));
        assert!(app.messages.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("No assignments found"));
        assert!(app.selected_message().is_none());
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = loaded_app();
        app.select_prev(1);
        assert_eq!(app.selection, 0);
        app.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(app.selection, 2);
        app.select_first();
        assert_eq!(app.selection, 0);
        app.select_last();
        assert_eq!(app.selection, 2);

        let mut empty = self::app();
        empty.select_next(1);
        assert_eq!(empty.selection, 0);
    }

    #[test]
    fn test_copy_selected_marks_and_queues() {
        let mut app = loaded_app();
        app.select_next(1);
        app.copy_selected();

        assert!(app.copied.contains(&1));
        let copied = app.take_pending_copy().expect("queued");
        assert!(copied.contains("亲爱的Chen弟兄"));
        assert!(app.take_pending_copy().is_none());
    }

    #[test]
    fn test_reload_replaces_schedule_wholesale() {
        let mut app = loaded_app();
        app.copy_selected();
        app.select_last();

        app.apply_schedule(schedule("MAY 4\n6 Only"));

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.selection, 0);
        assert!(app.copied.is_empty());
    }

    #[test]
    fn test_url_entry_rejects_invalid() {
        let mut app = app();
        app.url_input.clear();
        app.start_url_entry();
        app.paste_url("not a url");
        assert_eq!(app.url_input, "notaurl");

        app.submit_url();
        assert_eq!(app.state, AppState::EnteringUrl);
        assert!(app.url_error.is_some());
        assert!(!app.loading);
    }

    #[test]
    fn test_cancel_url_entry_restores_previous_url() {
        let mut app = app();
        app.url_input = SHEET_URL.to_string();
        app.start_url_entry();
        app.url_input.truncate(10);
        app.push_url_char('x');

        app.cancel_url_entry();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.url_input, SHEET_URL);
    }

    #[test]
    fn test_saves_loaded_url_not_current_input() {
        let dir = std::env::temp_dir().join(format!("partslip-app-{}", std::process::id()));
        let path = dir.join("config.json");
        let mut app = app();
        app.config_path = Some(path.clone());

        let generation = app.begin_load();
        // User starts typing a new URL while the load is in flight
        app.start_url_entry();
        app.url_input = "https://docs.goo".to_string();

        app.process_load_result(LoadResult::Loaded {
            generation,
            url: SHEET_URL.to_string(),
            schedule: schedule(SHEET),
        });

        assert_eq!(app.config.sheet_url.as_deref(), Some(SHEET_URL));
        let saved = Config::load_from(&path).expect("saved config loads");
        assert_eq!(saved.sheet_url.as_deref(), Some(SHEET_URL));
        assert_eq!(app.url_input, "https://docs.goo");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut app = app();
        let first = app.begin_load();
        let second = app.begin_load();

        app.process_load_result(LoadResult::Loaded {
            generation: second,
            url: "https://example.com/b".to_string(),
            schedule: schedule("MAY 4\n6 Newer"),
        });
        app.process_load_result(LoadResult::Loaded {
            generation: first,
            url: "https://example.com/a".to_string(),
            schedule: schedule(SHEET),
        });

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].title, "[弟兄] #6 Newer");
        assert_eq!(app.config.sheet_url.as_deref(), Some("https://example.com/b"));
    }

    #[test]
    fn test_stale_result_keeps_loading_flag() {
        let mut app = app();
        let first = app.begin_load();
        app.begin_load();

        app.process_load_result(LoadResult::Failed {
            generation: first,
            message: "boom".to_string(),
        });
        assert!(app.loading);
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_process_failed_load() {
        let mut app = app();
        let generation = app.begin_load();
        app.process_load_result(LoadResult::Failed {
            generation,
            message: "No data found in the sheet".to_string(),
        });
        assert!(!app.loading);
        assert_eq!(app.load_error.as_deref(), Some("No data found in the sheet"));
        assert_eq!(app.status_text(), "Error: No data found in the sheet");
    }

    #[test]
    fn test_status_text_falls_back_to_load_age() {
        let mut app = app();
        assert_eq!(app.status_text(), "Not loaded");

        app.begin_load();
        assert_eq!(app.status_text(), "Loading assignments...");
        app.loading = false;

        app.apply_schedule(schedule("MAY 4\n6 Only"));
        assert_eq!(app.status_text(), "Loaded 1 assignment");

        app.clear_status();
        assert_eq!(app.status_text(), "1 assignment loaded just now");
    }

    #[test]
    fn test_can_add_url_char() {
        assert!(can_add_url_char(0, 'h'));
        assert!(can_add_url_char(MAX_URL_LENGTH - 1, '/'));
        assert!(!can_add_url_char(MAX_URL_LENGTH, 'a'));
        assert!(!can_add_url_char(0, '\n'));
        assert!(!can_add_url_char(0, ' '));
    }
}
