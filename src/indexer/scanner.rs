//! Tree scanner: the current `{path, mod_time}` set of the notes root.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::{FileRecord, Snapshot};

/// Walk `root` recursively and stat every file whose extension is in
/// `extensions`.
///
/// Errors on individual entries (unreadable directories, stat failures,
/// files vanishing mid-walk) drop that entry and never abort the scan; the
/// result always covers the reachable, readable subtree. Output order is
/// not meaningful - downstream comparison is set-based.
pub fn scan_tree(root: &Path, extensions: &[String]) -> Snapshot {
    let mut records = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_allowed_extension(entry.path(), extensions) {
            continue;
        }

        let Some(modified) = entry.metadata().ok().and_then(|m| m.modified().ok()) else {
            debug!(path = %entry.path().display(), "stat failed, dropping");
            continue;
        };

        records.push(FileRecord::new(entry.path().to_path_buf(), DateTime::<Utc>::from(modified)));
    }

    Snapshot::new(records)
}

/// Case-sensitive match on the full suffix including the leading dot, so a
/// configured ".md" matches `note.md` but not `note.MD`.
fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match name.rfind('.') {
        Some(i) => extensions.iter().any(|ext| ext == &name[i..]),
        None => false,
    }
}
