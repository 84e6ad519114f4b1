use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed file: its path and the modification time it was last seen
/// with. Equality of `mod_time` alone decides "unchanged" — content is not
/// hashed, so a rewrite that preserves the timestamp is not detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub mod_time: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, mod_time: DateTime<Utc>) -> Self {
        Self { path: path.into(), mod_time }
    }
}

/// The set of files the index was last told to contain, keyed by path.
///
/// Persisted wholesale after each successful synchronization pass and read
/// back at startup. Serializes as a plain sequence of records; ordering is
/// not meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub records: Vec<FileRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Path-keyed view for O(n) comparisons.
    pub fn by_path(&self) -> HashMap<&Path, &FileRecord> {
        self.records.iter().map(|r| (r.path.as_path(), r)).collect()
    }
}

impl FromIterator<FileRecord> for Snapshot {
    fn from_iter<T: IntoIterator<Item = FileRecord>>(iter: T) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_by_path_keys_every_record() {
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let snapshot = Snapshot::new(vec![
            FileRecord::new("/notes/a.md", t),
            FileRecord::new("/notes/b.md", t),
        ]);

        let map = snapshot.by_path();
        assert_eq!(map.len(), 2);
        assert_eq!(map[Path::new("/notes/a.md")].mod_time, t);
    }

    #[test]
    fn test_snapshot_serializes_as_record_sequence() {
        let t = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let snapshot = Snapshot::new(vec![FileRecord::new("/notes/a.md", t)]);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.starts_with('['), "expected a top-level array: {json}");

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records, snapshot.records);
    }
}
