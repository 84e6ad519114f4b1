//! TUI application state and event handling.
//!
//! The `App` owns all interactive state and runs the main loop via `run()`:
//! poll keyboard input, drain asynchronous results (search completions,
//! reindex completions) from the app event channel, redraw when dirty.
//!
//! Two kinds of background work never block the loop:
//! - every input change issues a query through the [`QuerySerializer`];
//!   stale results are discarded on arrival by identifier comparison
//! - Ctrl+R runs a synchronization pass on a worker thread and reports back
//!   with an [`AppEvent::ReindexFinished`]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::debug;

use super::events::{Action, poll_event};
use super::query::QuerySerializer;
use super::rendering::{RenderState, render_ui};
use super::{AppEvent, editor, resume_terminal, suspend_terminal};
use crate::indexer::Indexer;
use crate::models::SearchHit;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Cap on typed query length.
const MAX_QUERY_LEN: usize = 256;
/// Preview scroll step for Ctrl+K / Ctrl+J.
const PREVIEW_SCROLL_STEP: u16 = 5;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// An open note preview (right pane).
#[derive(Debug, Clone)]
pub struct Preview {
    pub path: PathBuf,
    pub content: String,
    pub scroll: u16,
}

pub struct App {
    indexer: Arc<Indexer>,
    serializer: QuerySerializer,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
    editor_cmd: String,

    query: String,
    hits: Vec<SearchHit>,
    selected: usize,
    preview: Option<Preview>,

    reindexing: bool,
    searching: bool,
    query_error: Option<String>,
    status_message: Option<StatusMessage>,

    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(indexer: Arc<Indexer>, editor_cmd: String) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let serializer = QuerySerializer::new(indexer.engine(), events_tx.clone());

        Self {
            indexer,
            serializer,
            events_tx,
            events_rx,
            editor_cmd,
            query: String::new(),
            hits: Vec::new(),
            selected: 0,
            preview: None,
            reindexing: false,
            searching: false,
            query_error: None,
            status_message: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // Initial browse-by-recency view before any keystroke.
        self.submit_query();

        while !self.should_quit {
            self.expire_status();
            self.drain_app_events();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100)
            {
                terminal.draw(|f| {
                    let state = RenderState {
                        query: &self.query,
                        hits: &self.hits,
                        selected: self.selected,
                        preview: self.preview.as_ref(),
                        reindexing: self.reindexing,
                        searching: self.searching,
                        query_error: self.query_error.as_deref(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            if action == Action::OpenEditor {
                // Needs the terminal for suspend/restore, so it cannot go
                // through handle_action.
                self.open_editor(terminal)?;
            } else {
                self.handle_action(action);
            }
        }

        Ok(())
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn expire_status(&mut self) {
        if let Some(message) = &self.status_message
            && Instant::now() >= message.expires_at
        {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Issue a query for the current input through the serializer.
    fn submit_query(&mut self) {
        self.serializer.issue(&self.query);
        self.searching = true;
        self.needs_redraw = true;
    }

    fn drain_app_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// Apply one asynchronous completion (extracted for testing).
    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchCompleted { query_id, outcome } => {
                if !self.serializer.is_current(query_id) {
                    debug!(
                        query_id,
                        latest = self.serializer.latest(),
                        "discarding superseded search result"
                    );
                    return;
                }
                self.searching = false;
                match outcome {
                    Ok(results) => {
                        self.hits = results.hits;
                        self.selected = 0;
                        self.query_error = None;
                    }
                    Err(e) => {
                        // Keep the previous hits; just mark the query failed.
                        self.query_error = Some(e.to_string());
                    }
                }
                self.needs_redraw = true;
            }
            AppEvent::ReindexFinished(result) => {
                self.reindexing = false;
                match result {
                    Ok(summary) => {
                        let mut text =
                            format!("✓ Indexed {}, removed {}", summary.indexed, summary.removed);
                        if summary.skipped > 0 {
                            text.push_str(&format!(", skipped {}", summary.skipped));
                        }
                        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
                    }
                    Err(e) => {
                        self.set_status(
                            format!("✗ Reindex failed: {e}"),
                            MessageType::Error,
                            STATUS_ERROR_DURATION_MS,
                        );
                    }
                }
                // Refresh the visible list against the rebuilt index.
                self.submit_query();
            }
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Input(c) => {
                if self.query.len() < MAX_QUERY_LEN {
                    self.query.push(c);
                    self.selected = 0;
                    self.submit_query();
                }
            }
            Action::DeleteChar => {
                if self.query.pop().is_some() {
                    self.selected = 0;
                    self.submit_query();
                }
            }
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::OpenPreview => self.open_preview(),
            Action::Back => {
                if self.preview.is_some() {
                    self.preview = None;
                    self.needs_redraw = true;
                } else if !self.query.is_empty() {
                    self.query.clear();
                    self.selected = 0;
                    self.submit_query();
                } else {
                    self.should_quit = true;
                }
            }
            Action::Refresh => self.start_reindex(),
            Action::PreviewScrollUp => self.scroll_preview(-(PREVIEW_SCROLL_STEP as i32)),
            Action::PreviewScrollDown => self.scroll_preview(PREVIEW_SCROLL_STEP as i32),
            Action::OpenEditor => {}
            Action::None => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.hits.is_empty() {
            self.selected = 0;
            return;
        }

        let old = self.selected;
        let new = (self.selected as isize + delta).max(0) as usize;
        self.selected = new.min(self.hits.len() - 1);

        if old != self.selected {
            self.needs_redraw = true;
        }
    }

    fn open_preview(&mut self) {
        let Some(hit) = self.hits.get(self.selected) else {
            return;
        };
        match fs::read_to_string(&hit.path) {
            Ok(content) => {
                self.preview = Some(Preview { path: hit.path.clone(), content, scroll: 0 });
            }
            Err(e) => {
                self.set_status(
                    format!("✗ Cannot read {}: {e}", hit.path.display()),
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                );
            }
        }
        self.needs_redraw = true;
    }

    fn scroll_preview(&mut self, delta: i32) {
        if let Some(preview) = &mut self.preview {
            preview.scroll = preview.scroll.saturating_add_signed(delta as i16);
            self.needs_redraw = true;
        }
    }

    /// Kick off a synchronization pass on a worker thread. At most one runs
    /// at a time; completion arrives as an app event.
    fn start_reindex(&mut self) {
        if self.reindexing {
            return;
        }
        self.reindexing = true;
        self.needs_redraw = true;

        let indexer = Arc::clone(&self.indexer);
        let events = self.events_tx.clone();
        thread::spawn(move || {
            let result = indexer.reindex();
            let _ = events.send(AppEvent::ReindexFinished(result));
        });
    }

    /// Hand the selected note to the external editor: release the index
    /// handle, suspend the terminal, run the editor, then restore both.
    fn open_editor<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let Some(hit) = self.hits.get(self.selected) else {
            return Ok(());
        };
        let path = hit.path.clone();

        self.indexer.close_index()?;
        suspend_terminal()?;

        let edit_result = editor::run_editor(&self.editor_cmd, &path);

        resume_terminal()?;
        terminal.clear()?;
        self.indexer.open_index()?;

        if let Err(e) = edit_result {
            self.set_status(
                format!("✗ Editor failed: {e}"),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            );
        }
        self.needs_redraw = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;
    use crate::config::Config;
    use crate::engine::{DocumentIndex, EngineError, SearchEngine};
    use crate::models::SearchResults;
    use crate::storage::SnapshotStore;

    fn test_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes");
        std::fs::create_dir_all(&notes).unwrap();

        let config = Config {
            root_path: notes,
            extensions: vec![".md".to_string()],
            editor: "true".to_string(),
        };
        let engine: Arc<dyn SearchEngine> =
            Arc::new(DocumentIndex::open_at(dir.path().join("documents.json")).unwrap());
        let store = SnapshotStore::new(dir.path().join("snapshot.json"));
        let indexer = Arc::new(Indexer::new(&config, engine, store));

        let app = App::new(indexer, "true".to_string());
        (dir, app)
    }

    fn fake_hit(path: &str) -> SearchHit {
        SearchHit {
            path: PathBuf::from(path),
            fragment: String::new(),
            highlights: Vec::new(),
            mod_time: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_app_state() {
        let (_dir, app) = test_app();
        assert_eq!(app.query, "");
        assert_eq!(app.selected, 0);
        assert!(!app.should_quit);
        assert!(app.hits.is_empty());
    }

    #[test]
    fn test_input_appends_and_issues_a_query() {
        let (_dir, mut app) = test_app();

        app.handle_action(Action::Input('a'));
        app.handle_action(Action::Input('b'));

        assert_eq!(app.query, "ab");
        assert_eq!(app.serializer.latest(), 2);
        assert!(app.searching);
    }

    #[test]
    fn test_delete_char() {
        let (_dir, mut app) = test_app();
        app.query = "abc".to_string();

        app.handle_action(Action::DeleteChar);
        assert_eq!(app.query, "ab");

        // Deleting from an empty query issues nothing.
        app.query.clear();
        let before = app.serializer.latest();
        app.handle_action(Action::DeleteChar);
        assert_eq!(app.serializer.latest(), before);
    }

    #[test]
    fn test_move_selection_clamps_to_bounds() {
        let (_dir, mut app) = test_app();
        app.hits = vec![fake_hit("/a.md"), fake_hit("/b.md"), fake_hit("/c.md")];

        app.move_selection(1);
        assert_eq!(app.selected, 1);
        app.move_selection(10);
        assert_eq!(app.selected, 2);
        app.move_selection(-10);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_back_closes_preview_then_clears_then_quits() {
        let (_dir, mut app) = test_app();
        app.query = "abc".to_string();
        app.preview =
            Some(Preview { path: PathBuf::from("/a.md"), content: String::new(), scroll: 0 });

        app.handle_action(Action::Back);
        assert!(app.preview.is_none());
        assert_eq!(app.query, "abc");

        app.handle_action(Action::Back);
        assert_eq!(app.query, "");
        assert!(!app.should_quit);

        app.handle_action(Action::Back);
        assert!(app.should_quit);
    }

    #[test]
    fn test_stale_search_result_is_discarded() {
        let (_dir, mut app) = test_app();
        app.handle_action(Action::Input('a'));
        app.handle_action(Action::Input('b'));
        assert_eq!(app.serializer.latest(), 2);

        app.handle_app_event(AppEvent::SearchCompleted {
            query_id: 1,
            outcome: Ok(SearchResults { hits: vec![fake_hit("/stale.md")] }),
        });

        assert!(app.hits.is_empty(), "stale result must not mutate state");
        assert!(app.searching, "stale result must not clear the pending flag");
    }

    #[test]
    fn test_current_search_result_is_applied() {
        let (_dir, mut app) = test_app();
        app.handle_action(Action::Input('a'));

        app.handle_app_event(AppEvent::SearchCompleted {
            query_id: app.serializer.latest(),
            outcome: Ok(SearchResults { hits: vec![fake_hit("/fresh.md")] }),
        });

        assert_eq!(app.hits.len(), 1);
        assert!(!app.searching);
        assert!(app.query_error.is_none());
    }

    #[test]
    fn test_failed_search_keeps_previous_hits() {
        let (_dir, mut app) = test_app();
        app.hits = vec![fake_hit("/old.md")];
        app.handle_action(Action::Input('a'));

        app.handle_app_event(AppEvent::SearchCompleted {
            query_id: app.serializer.latest(),
            outcome: Err(EngineError::Closed),
        });

        assert_eq!(app.hits.len(), 1);
        assert!(app.query_error.is_some());
    }

    #[test]
    fn test_reindex_completion_sets_status_and_reissues_query() {
        let (_dir, mut app) = test_app();
        app.reindexing = true;
        let before = app.serializer.latest();

        app.handle_app_event(AppEvent::ReindexFinished(Ok(
            crate::indexer::ReindexSummary { indexed: 4, removed: 1, skipped: 0 },
        )));

        assert!(!app.reindexing);
        assert!(app.status_message.is_some());
        assert_eq!(app.serializer.latest(), before + 1);
    }

    #[test]
    fn test_refresh_is_ignored_while_reindexing() {
        let (_dir, mut app) = test_app();
        app.reindexing = true;

        // Must not spawn a second pass; reindexing stays set and no panic.
        app.handle_action(Action::Refresh);
        assert!(app.reindexing);
    }

    #[test]
    fn test_preview_scroll_saturates_at_zero() {
        let (_dir, mut app) = test_app();
        app.preview =
            Some(Preview { path: PathBuf::from("/a.md"), content: String::new(), scroll: 2 });

        app.handle_action(Action::PreviewScrollUp);
        assert_eq!(app.preview.as_ref().unwrap().scroll, 0);

        app.handle_action(Action::PreviewScrollDown);
        assert_eq!(app.preview.as_ref().unwrap().scroll, 5);
    }

    #[test]
    fn test_query_length_is_capped() {
        let (_dir, mut app) = test_app();
        app.query = "x".repeat(MAX_QUERY_LEN);
        let before = app.serializer.latest();

        app.handle_action(Action::Input('y'));
        assert_eq!(app.query.len(), MAX_QUERY_LEN);
        assert_eq!(app.serializer.latest(), before);
    }
}
