//! Fleetdeck screen store: shared counts and list snapshots.
//!
//! One `ScreenStore` backs one screen. Readers always see a consistent
//! snapshot per partition; writers swap whole snapshots and bump a global
//! epoch. The epoch is what lets the view layer tell a fresh authoritative
//! load from a stale one and discard optimistic local edits on adoption.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use fleetdeck_api::{ApiResult, ListBackend};
use fleetdeck_core::{sanitize_records, TableRow};

/// Immutable view of one partition's records at a point in time.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    pub epoch: u64,
    pub rows: Vec<R>,
}

/// Shared state of one screen: a count per partition and a cached, cleaned
/// list snapshot per partition. The store never issues fetches itself; the
/// free functions below drive a [`ListBackend`] and commit into it.
pub struct ScreenStore<R: TableRow> {
    lists: ArcSwap<FxHashMap<String, Arc<ListSnapshot<R>>>>,
    counts: ArcSwap<FxHashMap<String, u64>>,
    epoch: AtomicU64,
}

impl<R: TableRow> Default for ScreenStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRow> ScreenStore<R> {
    pub fn new() -> Self {
        Self {
            lists: ArcSwap::from_pointee(FxHashMap::default()),
            counts: ArcSwap::from_pointee(FxHashMap::default()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub fn list(&self, partition: &str) -> Option<Arc<ListSnapshot<R>>> {
        self.lists.load().get(partition).cloned()
    }

    pub fn count(&self, partition: &str) -> Option<u64> {
        self.counts.load().get(partition).copied()
    }

    pub fn counts(&self) -> Arc<FxHashMap<String, u64>> {
        self.counts.load_full()
    }

    /// Swap in an authoritative list for one partition, bumping the epoch.
    /// Returns the snapshot's epoch. Input is cleaned (validation + first-
    /// occurrence dedup) before committing; drops are logged, never surfaced.
    pub fn commit_list(&self, partition: &str, raw: &[R]) -> u64 {
        let clean = sanitize_records(raw);
        if clean.dropped_invalid > 0 || clean.dropped_duplicates > 0 {
            warn!(
                partition = %partition,
                invalid = clean.dropped_invalid,
                duplicates = clean.dropped_duplicates,
                "dropped malformed upstream records"
            );
        }
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        let snap = Arc::new(ListSnapshot { epoch, rows: clean.rows });
        let mut next = FxHashMap::clone(&self.lists.load());
        next.insert(partition.to_string(), snap);
        self.lists.store(Arc::new(next));
        debug!(partition = %partition, epoch, "list snapshot committed");
        epoch
    }

    pub fn commit_count(&self, partition: &str, n: u64) {
        let mut next = FxHashMap::clone(&self.counts.load());
        next.insert(partition.to_string(), n);
        self.counts.store(Arc::new(next));
    }
}

/// Fetch one partition's list and commit it. Returns the committed snapshot.
pub async fn load_partition<R: TableRow>(
    backend: &dyn ListBackend<R>,
    store: &ScreenStore<R>,
    partition: &str,
) -> ApiResult<Arc<ListSnapshot<R>>> {
    let raw = backend.fetch_list(partition).await?;
    store.commit_list(partition, &raw);
    // read back the committed snapshot; a concurrent commit may have raced
    // us, in which case the newer one wins and that is fine
    Ok(store
        .list(partition)
        .unwrap_or_else(|| Arc::new(ListSnapshot { epoch: store.epoch(), rows: Vec::new() })))
}

/// Refresh every partition's count concurrently.
///
/// Each count commits to the store as it lands; if any fetch fails the
/// first error is returned after all have settled. Partial successes are
/// deliberately not rolled back.
pub async fn refresh_counts<R: TableRow>(
    backend: &dyn ListBackend<R>,
    store: &ScreenStore<R>,
    partitions: &[&str],
) -> ApiResult<()> {
    let fetches = partitions
        .iter()
        .map(|p| async move { (*p, backend.fetch_count(p).await) });
    let settled = futures::future::join_all(fetches).await;

    let mut first_err = None;
    for (partition, res) in settled {
        match res {
            Ok(n) => store.commit_count(partition, n),
            Err(e) => {
                warn!(partition = %partition, error = %e, "count refresh failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    match first_err {
        None => Ok(()),
        Some(e) => Err(e),
    }
}
