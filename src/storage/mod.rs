//! Durable state under the platform cache directory.
//!
//! Two files live there, owned by different components:
//! - `snapshot.json` - the synchronizer's record of indexed files
//! - `index/documents.json` - the search engine's document store
//!
//! The snapshot is deliberately separate from the engine's own persistence:
//! it is the contract describing what the engine was last told to contain,
//! and it is only ever rewritten after a full pass settles.

pub mod snapshot_store;

pub use snapshot_store::{SnapshotStore, data_dir};
