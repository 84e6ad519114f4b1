//! Index synchronization: apply a reindex plan against the search engine.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, ensure};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::planner::plan_reindex;
use super::scanner::scan_tree;
use crate::config::Config;
use crate::engine::{EngineError, SearchEngine, SearchRequest};
use crate::models::{FileRecord, IndexedDocument, SearchResults};
use crate::storage::SnapshotStore;

/// Counts reported after a synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReindexSummary {
    /// Documents submitted or overwritten.
    pub indexed: usize,
    /// Documents removed from the index.
    pub removed: usize,
    /// Per-item failures (vanished or unreadable files, engine rejections).
    pub skipped: usize,
}

enum Op<'a> {
    Remove(&'a FileRecord),
    Submit(&'a FileRecord),
}

/// Keeps the search engine synchronized with the notes tree.
///
/// One `reindex` call is one pass: scan, diff against the stored snapshot,
/// fan the resulting mutations out concurrently, wait for all of them, then
/// persist the new snapshot. The snapshot write happens exactly once per
/// pass, after the batch settles, never incrementally.
pub struct Indexer {
    root: PathBuf,
    extensions: Vec<String>,
    engine: Arc<dyn SearchEngine>,
    store: SnapshotStore,
}

impl Indexer {
    pub fn new(config: &Config, engine: Arc<dyn SearchEngine>, store: SnapshotStore) -> Self {
        Self {
            root: config.root_path.clone(),
            extensions: config.extensions.clone(),
            engine,
            store,
        }
    }

    /// Shared handle to the underlying engine.
    pub fn engine(&self) -> Arc<dyn SearchEngine> {
        Arc::clone(&self.engine)
    }

    /// Run one synchronization pass.
    ///
    /// Individual documents that cannot be read or submitted are skipped and
    /// counted; they never abort the pass. Calling this with a closed index
    /// handle is a caller error.
    pub fn reindex(&self) -> Result<ReindexSummary> {
        ensure!(self.engine.is_open(), "index is closed");

        let old = self.store.load().context("Failed to load stored snapshot")?;
        let current = scan_tree(&self.root, &self.extensions);
        let plan = plan_reindex(&old, &current);

        debug!(
            deleted = plan.deleted.len(),
            modified = plan.modified.len(),
            created = plan.created.len(),
            unchanged = current.len() - plan.modified.len() - plan.created.len(),
            "computed reindex plan"
        );

        let indexed = AtomicUsize::new(0);
        let removed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        let ops: Vec<Op> = plan
            .deleted
            .iter()
            .map(Op::Remove)
            .chain(plan.submissions().map(Op::Submit))
            .collect();

        // Fan-out with an implicit join barrier: the pass is not finished
        // until every operation has settled.
        ops.par_iter().for_each(|op| match op {
            Op::Remove(record) => match self.engine.delete(&record.path) {
                Ok(()) => {
                    removed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    warn!(path = %record.path.display(), error = %e, "delete failed");
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
            },
            Op::Submit(record) => match fs::read_to_string(&record.path) {
                Ok(body) => {
                    let document = IndexedDocument {
                        path: record.path.clone(),
                        body,
                        mod_time: record.mod_time,
                    };
                    match self.engine.index(document) {
                        Ok(()) => {
                            indexed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            warn!(path = %record.path.display(), error = %e, "index failed");
                            skipped.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                Err(e) => {
                    // Vanished or unreadable between scan and read.
                    debug!(path = %record.path.display(), error = %e, "skipping document");
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
            },
        });

        self.engine.flush().context("Failed to flush index")?;
        self.store.save(&current).context("Failed to persist snapshot")?;

        let summary = ReindexSummary {
            indexed: indexed.into_inner(),
            removed: removed.into_inner(),
            skipped: skipped.into_inner(),
        };
        info!(
            indexed = summary.indexed,
            removed = summary.removed,
            skipped = summary.skipped,
            "reindex pass complete"
        );
        Ok(summary)
    }

    /// Run one query against the current index state. Errors are
    /// recoverable; callers decide how to surface them.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults, EngineError> {
        self.engine.search(request)
    }

    /// Reacquire the index handle (e.g. after an external editor exits).
    pub fn open_index(&self) -> Result<()> {
        self.engine.open().context("Failed to open index")
    }

    /// Release the index handle so an external program can access the index
    /// files exclusively.
    pub fn close_index(&self) -> Result<()> {
        self.engine.close().context("Failed to close index")
    }
}
