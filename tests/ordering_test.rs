//! Recency log and ordering behaviour across the public API
mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{ids, sample_tabs};
use tabhop::background::SwitcherHost;
use tabhop::host::MemoryTabHost;
use tabhop::models::{TabId, TabSnapshot};
use tabhop::ordering::order_tabs;
use tabhop::recency::RecencyLog;

/// Deterministic pseudo-random ids in `0..modulo`
fn id_stream(seed: u64, modulo: u64) -> impl FnMut() -> TabId {
    let mut state = seed;
    move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) % modulo + 1
    }
}

#[test]
fn test_compact_is_idempotent() {
    let mut next = id_stream(7, 12);
    let mut log = RecencyLog::new();
    for _ in 0..200 {
        log.record_activation(next());
    }

    log.compact();
    let once = log.snapshot();
    assert_eq!(log.compact(), 0);
    assert_eq!(log.snapshot(), once);
}

#[test]
fn test_compact_keeps_first_occurrences_in_order() {
    for seed in 0..20 {
        let mut next = id_stream(seed, 9);
        let mut log = RecencyLog::new();
        for _ in 0..60 {
            log.record_activation(next());
        }
        let raw = log.snapshot();
        log.compact();

        let mut seen = HashSet::new();
        let expected: Vec<TabId> = raw.into_iter().filter(|id| seen.insert(*id)).collect();
        assert_eq!(log.snapshot(), expected);
    }
}

#[test]
fn test_snapshot_taken_before_compaction_stays_valid() {
    let mut log = RecencyLog::from_recent([3, 1, 3, 2, 1]);
    let before = log.snapshot();
    log.compact();
    assert_eq!(before, vec![3, 1, 3, 2, 1]);
    assert_eq!(log.snapshot(), vec![3, 1, 2]);
}

#[test]
fn test_every_live_tab_exactly_once() {
    let tabs = sample_tabs();
    let live: HashSet<TabId> = ids(&tabs).into_iter().collect();

    for seed in 0..30 {
        let mut next = id_stream(seed, 10);
        let recent: Vec<TabId> = (0..25).map(|_| next()).collect();
        let ordered = ids(&order_tabs(&recent, tabs.clone()));

        assert_eq!(ordered.len(), live.len());
        assert_eq!(ordered.iter().copied().collect::<HashSet<_>>(), live);
    }
}

#[test]
fn test_current_tab_is_not_promoted() {
    // Most recent first: 3 is the tab being switched away from
    let ordered = order_tabs(&[3, 5, 1], sample_tabs());
    assert_eq!(ids(&ordered), vec![5, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_ordering_after_compaction() {
    let host = MemoryTabHost::new(vec![
        TabSnapshot::new(1, 1).with_title("GitHub").with_url("https://github.com"),
        TabSnapshot::new(2, 1).with_title("Docs").with_url("https://docs.example.com"),
    ]);
    let log = RecencyLog::from_recent([2, 1, 2]).into_shared();
    let switcher = SwitcherHost::with_log(Arc::new(host), log);

    let raw = ids(&switcher.ordered_tabs().await.unwrap());
    assert_eq!(switcher.compact(), 1);
    assert_eq!(switcher.log().lock().snapshot(), vec![2, 1]);
    let compacted = ids(&switcher.ordered_tabs().await.unwrap());

    // Tab 2 is current and is offered after tab 1
    assert_eq!(raw, vec![1, 2]);
    assert_eq!(compacted, raw);
}

#[tokio::test]
async fn test_closed_tab_disappears_from_ordering() {
    let switcher = SwitcherHost::new(Arc::new(MemoryTabHost::new(sample_tabs())));
    for id in [1, 2, 3] {
        switcher.record_activation(id);
    }

    let remaining = ids(&switcher.close_tab(2).await.unwrap());
    assert_eq!(remaining, vec![1, 3, 4, 5]);
}
