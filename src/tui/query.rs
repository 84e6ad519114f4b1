//! Query serialization for the interactive session.
//!
//! Every input change issues a new query; queries run concurrently against
//! an index that may itself be mid-rebuild, so their results can complete
//! and arrive out of order. The serializer tags each issuance with a
//! monotonically increasing identifier and the session applies a delivered
//! result only when its identifier still equals the latest issued one -
//! last-writer-wins over *issuance* order, not completion order.
//!
//! Superseded in-flight queries are never cancelled; they run to completion
//! and are discarded on arrival. Wasted work is bounded because queries
//! against a local index are fast.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::engine::{SearchEngine, SearchRequest};

use super::AppEvent;

/// Session-owned query issuance state. The counter lives and dies with the
/// interactive session; there is no ambient global.
pub struct QuerySerializer {
    engine: Arc<dyn SearchEngine>,
    events: Sender<AppEvent>,
    next_id: u64,
}

impl QuerySerializer {
    pub fn new(engine: Arc<dyn SearchEngine>, events: Sender<AppEvent>) -> Self {
        Self { engine, events, next_id: 0 }
    }

    /// Issue a search for `text` without blocking. The outcome arrives later
    /// as an [`AppEvent::SearchCompleted`] carrying the returned identifier.
    pub fn issue(&mut self, text: &str) -> u64 {
        self.next_id += 1;
        let query_id = self.next_id;

        let request = SearchRequest::from_input(text);
        let engine = Arc::clone(&self.engine);
        let events = self.events.clone();
        thread::spawn(move || {
            let outcome = engine.search(&request);
            // The session may already be gone; a dead channel is fine.
            let _ = events.send(AppEvent::SearchCompleted { query_id, outcome });
        });

        query_id
    }

    /// Latest identifier issued so far.
    pub fn latest(&self) -> u64 {
        self.next_id
    }

    /// Whether a delivered result may be applied: true only for the latest
    /// issued query. Anything older must be discarded without state changes.
    pub fn is_current(&self, query_id: u64) -> bool {
        query_id == self.next_id
    }
}
