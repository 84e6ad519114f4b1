use std::ops::Range;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The unit submitted to the search engine: one on-disk file that survived
/// the extension filter, keyed by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub path: PathBuf,
    pub body: String,
    pub mod_time: DateTime<Utc>,
}

/// One ranked hit: the matched document plus a display fragment of its body.
///
/// `highlights` are byte ranges into `fragment` marking matched terms; they
/// are sorted, non-overlapping, and aligned to char boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: PathBuf,
    pub fragment: String,
    pub highlights: Vec<Range<usize>>,
    pub mod_time: DateTime<Utc>,
}

/// The ranked result set for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
