//! Search engine collaborator boundary.
//!
//! The rest of the crate depends on the [`SearchEngine`] trait, not on any
//! particular index format. [`DocumentIndex`] is the shipped implementation:
//! a persistent document store with a token/prefix matcher and fragment
//! highlighting.
//!
//! Lifecycle: `open` is create-if-absent and, like `close`, safe to call in
//! sequence any number of times. Every other operation on a closed handle is
//! a caller error surfaced as [`EngineError::Closed`] - handles are never
//! reopened implicitly. The explicit open/close pair exists so the handle
//! can be released while an external program (the editor) needs access to
//! the on-disk index files.

pub mod document_index;
pub mod query;

use std::path::Path;

use thiserror::Error;

pub use document_index::DocumentIndex;
pub use query::{Query, SearchRequest, TokenQuery};

use crate::models::{IndexedDocument, SearchResults};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("index is closed")]
    Closed,
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index persistence error: {0}")]
    Persist(#[from] serde_json::Error),
}

/// Contract the index synchronizer and query path are written against.
///
/// Implementations must support concurrent document-level `index`/`delete`
/// calls; the synchronizer fans its mutations out in parallel.
pub trait SearchEngine: Send + Sync {
    /// Acquire the index handle, creating the index if absent. Idempotent.
    fn open(&self) -> Result<(), EngineError>;

    /// Flush and release the index handle. Idempotent. Already-committed
    /// content must survive the close.
    fn close(&self) -> Result<(), EngineError>;

    fn is_open(&self) -> bool;

    /// Submit or overwrite the document keyed by its path.
    fn index(&self, document: IndexedDocument) -> Result<(), EngineError>;

    /// Remove the document keyed by `path`. Removing an absent document is
    /// not an error.
    fn delete(&self, path: &Path) -> Result<(), EngineError>;

    /// Persist pending mutations.
    fn flush(&self) -> Result<(), EngineError>;

    /// Run one query and return ranked hits with highlighted fragments.
    fn search(&self, request: &SearchRequest) -> Result<SearchResults, EngineError>;
}
