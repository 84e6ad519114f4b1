//! Snapshot persistence: load/save with atomic writes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Snapshot;

const SNAPSHOT_FILENAME: &str = "snapshot.json";

/// Get the platform cache directory for notefind data, creating it if
/// missing.
///
/// - macOS: `~/Library/Caches/notefind/`
/// - Linux: `~/.cache/notefind/`
/// - Windows: `%LOCALAPPDATA%\notefind\`
pub fn data_dir() -> Result<PathBuf> {
    let cache_base = dirs::cache_dir().context("Failed to get platform cache directory")?;
    let dir = cache_base.join("notefind");

    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create cache directory")?;
    }

    Ok(dir)
}

/// Persists the last-known `{path, mod_time}` set between synchronization
/// passes.
///
/// The store is the durable record of what the index was last told to
/// contain. It is read at process start and overwritten wholesale, exactly
/// once, at the end of each successful pass.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default cache location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(SNAPSHOT_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored snapshot. A missing file is an empty prior snapshot,
    /// not an error; a present but corrupted file is an error.
    pub fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored snapshot, starting empty");
            return Ok(Snapshot::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot file {}", self.path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).context("Failed to parse snapshot JSON")?;

        Ok(snapshot)
    }

    /// Overwrite the stored snapshot atomically (temp file + rename).
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
        }

        let temp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
        fs::write(&temp, json).context("Failed to write snapshot temp file")?;
        fs::rename(&temp, &self.path).context("Failed to rename snapshot temp file")?;

        debug!(records = snapshot.len(), path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
