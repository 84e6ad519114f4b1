//! Persistent document store with a token/prefix matcher.
//!
//! Documents live in memory behind an `RwLock` while the handle is open and
//! are persisted as a single JSON file under the cache directory. Mutations
//! mark the state dirty; `flush` and `close` write it out atomically.

use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use super::query::{Query, SearchRequest, TokenQuery};
use super::{EngineError, SearchEngine};
use crate::models::{IndexedDocument, SearchHit, SearchResults};

/// Fragment window size in bytes (clamped to char boundaries).
const FRAGMENT_SIZE: usize = 160;
/// Bytes of context kept before the first match in a fragment.
const FRAGMENT_LEAD: usize = 40;

struct IndexState {
    documents: HashMap<PathBuf, IndexedDocument>,
    dirty: bool,
}

/// The shipped [`SearchEngine`] implementation.
///
/// `state` is `None` while the handle is closed; every operation except
/// `open`/`close`/`is_open` requires it to be `Some`.
pub struct DocumentIndex {
    store_path: PathBuf,
    state: RwLock<Option<IndexState>>,
}

impl DocumentIndex {
    /// Open (create-if-absent) the index stored at `store_path`.
    pub fn open_at(store_path: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let index = Self { store_path: store_path.into(), state: RwLock::new(None) };
        index.open()?;
        Ok(index)
    }

    fn load_documents(path: &Path) -> Result<HashMap<PathBuf, IndexedDocument>, EngineError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)?;
        let documents: Vec<IndexedDocument> = serde_json::from_str(&content)?;
        Ok(documents.into_iter().map(|d| (d.path.clone(), d)).collect())
    }

    fn persist(&self, state: &IndexState) -> Result<(), EngineError> {
        if let Some(parent) = self.store_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut documents: Vec<&IndexedDocument> = state.documents.values().collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        let temp = self.store_path.with_extension("json.tmp");
        fs::write(&temp, serde_json::to_string(&documents)?)?;
        fs::rename(&temp, &self.store_path)?;

        debug!(documents = documents.len(), "document store persisted");
        Ok(())
    }
}

impl SearchEngine for DocumentIndex {
    fn open(&self) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        if guard.is_none() {
            let documents = Self::load_documents(&self.store_path)?;
            debug!(documents = documents.len(), path = %self.store_path.display(), "index opened");
            *guard = Some(IndexState { documents, dirty: false });
        }
        Ok(())
    }

    fn close(&self) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        if let Some(state) = guard.as_ref()
            && state.dirty
        {
            self.persist(state)?;
        }
        *guard = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.read().is_some()
    }

    fn index(&self, document: IndexedDocument) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(EngineError::Closed)?;
        state.documents.insert(document.path.clone(), document);
        state.dirty = true;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(EngineError::Closed)?;
        if state.documents.remove(path).is_some() {
            state.dirty = true;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), EngineError> {
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or(EngineError::Closed)?;
        if state.dirty {
            self.persist(state)?;
            state.dirty = false;
        }
        Ok(())
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResults, EngineError> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(EngineError::Closed)?;

        let hits = match &request.query {
            Query::MatchAll => {
                let mut hits: Vec<SearchHit> = state
                    .documents
                    .values()
                    .map(|doc| SearchHit {
                        path: doc.path.clone(),
                        fragment: leading_fragment(&doc.body),
                        highlights: Vec::new(),
                        mod_time: doc.mod_time,
                    })
                    .collect();
                hits.sort_by(|a, b| {
                    b.mod_time.cmp(&a.mod_time).then_with(|| a.path.cmp(&b.path))
                });
                hits.truncate(request.size);
                hits
            }
            Query::Tokens(tokens) => {
                let mut scored: Vec<(usize, SearchHit)> = state
                    .documents
                    .values()
                    .filter_map(|doc| match_document(doc, tokens, request.highlight))
                    .collect();
                scored.sort_by(|a, b| {
                    b.0.cmp(&a.0)
                        .then_with(|| b.1.mod_time.cmp(&a.1.mod_time))
                        .then_with(|| a.1.path.cmp(&b.1.path))
                });
                scored.into_iter().map(|(_, hit)| hit).take(request.size).collect()
            }
        };

        Ok(SearchResults { hits })
    }
}

/// Match one document against a token disjunction. Returns the match count
/// (the ranking score) and the hit, or `None` when no token matches.
fn match_document(
    doc: &IndexedDocument,
    tokens: &[TokenQuery],
    highlight: bool,
) -> Option<(usize, SearchHit)> {
    let mut matches: Vec<Range<usize>> = Vec::new();

    for (start, word) in words(&doc.body) {
        let lowered = word.to_lowercase();
        let matched = tokens.iter().any(|token| {
            if token.prefix { lowered.starts_with(&token.text) } else { lowered == token.text }
        });
        if matched {
            matches.push(start..start + word.len());
        }
    }

    if matches.is_empty() {
        return None;
    }

    let score = matches.len();
    let (fragment, highlights) = build_fragment(&doc.body, &matches, highlight);
    Some((
        score,
        SearchHit { path: doc.path.clone(), fragment, highlights, mod_time: doc.mod_time },
    ))
}

/// Alphanumeric word runs of `body` with their byte offsets. Matching works
/// on the original text so highlight ranges stay aligned.
fn words(body: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;

    for (i, c) in body.char_indices() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            out.push((s, &body[s..i]));
        }
    }
    if let Some(s) = start {
        out.push((s, &body[s..]));
    }

    out
}

/// Cut a fragment window around the first match and re-base the highlight
/// ranges onto it. Matches that straddle the window edge are not
/// highlighted.
fn build_fragment(
    body: &str,
    matches: &[Range<usize>],
    highlight: bool,
) -> (String, Vec<Range<usize>>) {
    let first = matches[0].start;

    let mut start = first.saturating_sub(FRAGMENT_LEAD);
    while !body.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + FRAGMENT_SIZE).min(body.len());
    while !body.is_char_boundary(end) {
        end += 1;
    }

    let fragment = body[start..end].to_string();
    let highlights = if highlight {
        matches
            .iter()
            .filter(|r| r.start >= start && r.end <= end)
            .map(|r| r.start - start..r.end - start)
            .collect()
    } else {
        Vec::new()
    };

    (fragment, highlights)
}

fn leading_fragment(body: &str) -> String {
    let mut end = FRAGMENT_SIZE.min(body.len());
    while !body.is_char_boundary(end) {
        end += 1;
    }
    body[..end].to_string()
}
