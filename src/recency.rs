//! Tab activation recency log.
//!
//! Activations are prepended as they arrive and never deduplicated on the hot
//! path. Readers take a raw snapshot (duplicates included) and skip ids they
//! have already seen. The owning process calls [`RecencyLog::compact`] on a
//! fixed period to bound how much of that skipping is wasted work.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::models::TabId;

/// Log shared between the activation feed, the compaction task and rpc handlers
pub type SharedRecencyLog = Arc<Mutex<RecencyLog>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationEvent {
    pub tab_id: TabId,
}

#[derive(Debug, Clone, Default)]
pub struct RecencyLog {
    events: VecDeque<ActivationEvent>,
}

impl RecencyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from ids ordered most-recent-first
    pub fn from_recent(ids: impl IntoIterator<Item = TabId>) -> Self {
        Self { events: ids.into_iter().map(|tab_id| ActivationEvent { tab_id }).collect() }
    }

    pub fn into_shared(self) -> SharedRecencyLog {
        Arc::new(Mutex::new(self))
    }

    pub fn record_activation(&mut self, tab_id: TabId) {
        self.events.push_front(ActivationEvent { tab_id });
        trace!(tab_id, len = self.events.len(), "recorded activation");
    }

    /// Raw ids, most recent first. May contain duplicates.
    pub fn snapshot(&self) -> Vec<TabId> {
        self.events.iter().map(|event| event.tab_id).collect()
    }

    /// Drop every occurrence of an id except the most recent one.
    ///
    /// Returns the number of events removed.
    pub fn compact(&mut self) -> usize {
        let before = self.events.len();
        if before <= 1 {
            return 0;
        }

        let mut seen = HashSet::with_capacity(before);
        self.events.retain(|event| seen.insert(event.tab_id));

        let removed = before - self.events.len();
        if removed > 0 {
            debug!(before, after = self.events.len(), "compacted recency log");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
