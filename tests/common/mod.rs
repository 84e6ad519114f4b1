//! Shared fixtures for integration tests.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use notefind::config::Config;
use notefind::engine::{DocumentIndex, SearchEngine, SearchRequest};
use notefind::indexer::Indexer;
use notefind::storage::SnapshotStore;
use tempfile::TempDir;

/// A notes tree in a tempdir plus an indexer wired to it. Cache files
/// (document store, snapshot) live next to the tree, isolated per test.
pub struct NotesFixture {
    pub dir: TempDir,
    pub notes_root: PathBuf,
    pub indexer: Arc<Indexer>,
    pub store: SnapshotStore,
}

impl NotesFixture {
    /// Paths of the hits for `input`, in rank order.
    pub fn search_paths(&self, input: &str) -> Vec<PathBuf> {
        self.indexer
            .search(&SearchRequest::from_input(input))
            .expect("search failed")
            .hits
            .into_iter()
            .map(|h| h.path)
            .collect()
    }

    pub fn write_note(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.notes_root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, body).unwrap();
        path
    }

    /// Rebuild the engine and indexer from the on-disk state, as a process
    /// restart would.
    pub fn reopen(&mut self) {
        let config = Config {
            root_path: self.notes_root.clone(),
            extensions: vec![".md".to_string()],
            editor: "true".to_string(),
        };
        let engine: Arc<dyn SearchEngine> =
            Arc::new(DocumentIndex::open_at(self.dir.path().join("documents.json")).unwrap());
        self.indexer = Arc::new(Indexer::new(&config, engine, self.store.clone()));
    }
}

pub struct NotesTreeBuilder {
    notes: Vec<(String, String)>,
    extensions: Vec<String>,
}

impl NotesTreeBuilder {
    pub fn new() -> Self {
        Self { notes: Vec::new(), extensions: vec![".md".to_string()] }
    }

    pub fn with_note(mut self, rel: &str, body: &str) -> Self {
        self.notes.push((rel.to_string(), body.to_string()));
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn build(self) -> NotesFixture {
        let dir = TempDir::new().unwrap();
        let notes_root = dir.path().join("notes");
        fs::create_dir_all(&notes_root).unwrap();

        for (rel, body) in &self.notes {
            let path = notes_root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, body).unwrap();
        }

        let config = Config {
            root_path: notes_root.clone(),
            extensions: self.extensions,
            editor: "true".to_string(),
        };
        let engine: Arc<dyn SearchEngine> =
            Arc::new(DocumentIndex::open_at(dir.path().join("documents.json")).unwrap());
        let store = SnapshotStore::new(dir.path().join("snapshot.json"));
        let indexer = Arc::new(Indexer::new(&config, engine, store.clone()));

        NotesFixture { dir, notes_root, indexer, store }
    }
}
