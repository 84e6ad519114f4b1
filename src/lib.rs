//! notefind - incrementally indexed full-text search over a notes tree
//!
//! The crate keeps a search index synchronized with a directory of text
//! files and serves search-as-you-type queries against it:
//!
//! - Scanning the notes root and diffing it against the stored snapshot to
//!   decide what to re-index, delete, or leave untouched
//! - Applying the resulting plan concurrently against the search engine and
//!   persisting the new snapshot once the batch settles
//! - Tagging interactive queries with increasing identifiers so slow,
//!   superseded results are discarded instead of clobbering newer ones
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use notefind::config::Config;
//! use notefind::engine::{DocumentIndex, SearchEngine, SearchRequest};
//! use notefind::indexer::Indexer;
//! use notefind::storage::SnapshotStore;
//!
//! let config = Config::load(None, None)?;
//! let engine: Arc<dyn SearchEngine> = Arc::new(DocumentIndex::open_at("documents.json")?);
//! let indexer = Indexer::new(&config, engine, SnapshotStore::open_default()?);
//!
//! let summary = indexer.reindex()?;
//! println!("indexed {} documents", summary.indexed);
//!
//! let results = indexer.search(&SearchRequest::from_input("meeting notes"))?;
//! println!("{} hits", results.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod indexer;
pub mod models;
pub mod storage;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use engine::{DocumentIndex, SearchEngine, SearchRequest};
pub use indexer::{Indexer, ReindexPlan, ReindexSummary, plan_reindex, scan_tree};
pub use models::{FileRecord, IndexedDocument, SearchHit, SearchResults, Snapshot};
pub use storage::SnapshotStore;
