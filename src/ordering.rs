//! Most-recently-used ordering of live tabs.
//!
//! # Algorithm
//!
//! 1. Index the live tabs by id, all unplaced.
//! 2. Walk the raw recency snapshot, skipping its first entry (the tab the
//!    user is switching away from). Each live, unplaced id is appended.
//! 3. Append every tab still unplaced, in directory order.
//!
//! The id index is only used for lookups; output order comes from the recency
//! snapshot and the directory order, never from hash iteration.

use std::collections::HashMap;

use crate::directory::TabDirectory;
use crate::host::{HostError, TabHost};
use crate::models::{TabId, TabSnapshot};
use crate::recency::SharedRecencyLog;

/// Order `live` by `recent` (raw snapshot, most recent first, duplicates allowed).
///
/// Every live id appears exactly once in the output; ids in `recent` that are
/// no longer live are ignored. If the host reports the same id twice only the
/// first entry is kept.
pub fn order_tabs(recent: &[TabId], live: Vec<TabSnapshot>) -> Vec<TabSnapshot> {
    let mut slots: HashMap<TabId, usize> = HashMap::with_capacity(live.len());
    for (idx, tab) in live.iter().enumerate() {
        slots.entry(tab.id).or_insert(idx);
    }

    let mut placed = vec![false; live.len()];
    let mut order = Vec::with_capacity(live.len());

    for id in recent.iter().skip(1) {
        if let Some(&idx) = slots.get(id)
            && !placed[idx]
        {
            placed[idx] = true;
            order.push(idx);
        }
    }

    for (idx, tab) in live.iter().enumerate() {
        if !placed[idx] && slots.get(&tab.id) == Some(&idx) {
            placed[idx] = true;
            order.push(idx);
        }
    }

    let mut live: Vec<Option<TabSnapshot>> = live.into_iter().map(Some).collect();
    order.into_iter().filter_map(|idx| live[idx].take()).collect()
}

/// Recency log + directory, producing the switcher's tab list
#[derive(Debug)]
pub struct OrderingService<H> {
    log: SharedRecencyLog,
    directory: TabDirectory<H>,
}

impl<H> Clone for OrderingService<H> {
    fn clone(&self) -> Self {
        Self { log: self.log.clone(), directory: self.directory.clone() }
    }
}

impl<H: TabHost> OrderingService<H> {
    pub fn new(log: SharedRecencyLog, directory: TabDirectory<H>) -> Self {
        Self { log, directory }
    }

    pub async fn ordered_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
        let live = self.directory.refresh().await?;
        // Snapshot after the refresh so activations during the await count
        let recent = self.log.lock().snapshot();
        Ok(order_tabs(&recent, live))
    }
}
