//! Reindex planning: diff the stored snapshot against the current scan.

use crate::models::{FileRecord, Snapshot};

/// The delete/modify/create partition for one synchronization pass.
///
/// The three sets are disjoint by construction: a path appears in at most
/// one of them, and paths present in both snapshots with an equal mod time
/// appear in none. Transient - lives only for the duration of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexPlan {
    /// In the old snapshot, absent from the current one.
    pub deleted: Vec<FileRecord>,
    /// In both, with differing mod times. Carries the *current* mod time,
    /// since that is what gets re-submitted.
    pub modified: Vec<FileRecord>,
    /// In the current snapshot, absent from the old one.
    pub created: Vec<FileRecord>,
}

impl ReindexPlan {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.modified.is_empty() && self.created.is_empty()
    }

    /// Records that need their body read and (re-)submitted.
    pub fn submissions(&self) -> impl Iterator<Item = &FileRecord> {
        self.modified.iter().chain(self.created.iter())
    }
}

/// Compute the plan from `old` (what the index contains) and `current`
/// (what the tree contains now). Path-keyed maps keep this O(n).
pub fn plan_reindex(old: &Snapshot, current: &Snapshot) -> ReindexPlan {
    let old_by_path = old.by_path();
    let current_by_path = current.by_path();

    let mut plan = ReindexPlan::default();

    for record in old.iter() {
        match current_by_path.get(record.path.as_path()) {
            None => plan.deleted.push(record.clone()),
            Some(cur) if cur.mod_time != record.mod_time => plan.modified.push((*cur).clone()),
            Some(_) => {}
        }
    }

    for record in current.iter() {
        if !old_by_path.contains_key(record.path.as_path()) {
            plan.created.push(record.clone());
        }
    }

    plan
}
