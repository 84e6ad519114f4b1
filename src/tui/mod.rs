// TUI module for interactive search
mod app;
mod editor;
mod events;
mod layout;
mod rendering;
mod timestamps;

pub mod query;

use std::io;
use std::sync::Arc;

use anyhow::Result;
pub use app::App;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Config;
use crate::engine::EngineError;
use crate::indexer::{Indexer, ReindexSummary};
use crate::models::SearchResults;

/// Asynchronous completions delivered into the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A search finished. `query_id` decides whether the outcome is still
    /// current or superseded.
    SearchCompleted { query_id: u64, outcome: Result<SearchResults, EngineError> },
    /// A background synchronization pass finished.
    ReindexFinished(anyhow::Result<ReindexSummary>),
}

/// Run the interactive TUI
pub fn run_interactive(indexer: Arc<Indexer>, config: &Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(indexer, config.editor.clone());

    // Run event loop
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Hand the terminal back to a child process (the external editor).
fn suspend_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Reclaim the terminal after the child process exits.
fn resume_terminal() -> Result<()> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Ok(())
}
