//! Command-line entry points: the interactive TUI (default), `reindex`,
//! and `stats`.

pub mod commands;

pub use commands::run;
