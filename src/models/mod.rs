//! Data models shared across the indexer, engine, and front end:
//!
//! - [`FileRecord`] / [`Snapshot`] - the persisted record of indexed files
//! - [`IndexedDocument`] - the unit submitted to the search engine
//! - [`SearchHit`] / [`SearchResults`] - ranked, highlighted query results

pub mod search;
pub mod snapshot;

pub use search::{IndexedDocument, SearchHit, SearchResults};
pub use snapshot::{FileRecord, Snapshot};
