//! Query Cache Module
//!
//! Main cache engine: keyed query values with LRU eviction, staleness,
//! read epochs for fetch cancellation, and optimistic write bookkeeping.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheStats, LruTracker, QueryEntry, QueryKey};
use crate::error::{CacheError, Result};
use crate::mutation::PendingMutation;

/// A value read from the cache along with its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRead {
    pub value: Value,
    pub stale: bool,
}

// == Query Cache ==
/// Shared store of query results.
///
/// Every transition replaces a whole value; nothing is merged field by field.
#[derive(Debug)]
pub struct QueryCache {
    /// Cached values by key
    entries: HashMap<QueryKey, QueryEntry>,
    /// Epoch of the last read cancellation per key; a fetch commits only if
    /// its key was not cancelled after the fetch began
    read_epochs: HashMap<QueryKey, u64>,
    /// Cancellation epoch assumed for keys without a record
    pruned_epoch: u64,
    next_epoch: u64,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    stale_time_ms: u64,
}

impl QueryCache {
    // == Constructor ==
    /// Creates a new QueryCache.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of queries the cache can hold
    /// * `stale_time` - Seconds a written value counts as fresh
    pub fn new(max_entries: usize, stale_time: u64) -> Self {
        Self {
            entries: HashMap::new(),
            read_epochs: HashMap::new(),
            pruned_epoch: 0,
            next_epoch: 1,
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            stale_time_ms: stale_time.saturating_mul(1000),
        }
    }

    // == Read ==
    /// Reads a value and reports whether it is due for a refresh.
    pub fn read(&mut self, key: &QueryKey) -> Result<CachedRead> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = current_timestamp_ms();
                let read = CachedRead {
                    value: entry.value.clone(),
                    stale: entry.is_stale(self.stale_time_ms),
                };
                self.stats.record_hit();
                self.lru.touch(key);
                Ok(read)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    pub fn get(&mut self, key: &QueryKey) -> Result<Value> {
        self.read(key).map(|read| read.value)
    }

    // == Peek ==
    /// Snapshot read; leaves statistics and LRU order alone.
    pub fn peek(&self, key: &QueryKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// True while an optimistic write on `key` waits for its remote call.
    pub fn has_pending_mutation(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(QueryEntry::is_pinned)
    }

    // == Set ==
    /// Replaces the value under `key` and marks it fresh.
    ///
    /// If the cache is at capacity, the least recently used entry without a
    /// pending mutation is evicted.
    pub fn set(&mut self, key: QueryKey, value: Value) -> Result<()> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.replace(value);
            self.lru.touch(&key);
            return Ok(());
        }

        if self.entries.len() >= self.max_entries {
            let entries = &self.entries;
            let evicted = self
                .lru
                .evict_oldest(|k| entries.get(k).map_or(true, |e| !e.is_pinned()));
            match evicted {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_evictions(1);
                }
                None => {
                    return Err(CacheError::CacheFull(
                        "every cached query has a pending mutation".to_string(),
                    ));
                }
            }
        }

        self.entries.insert(key.clone(), QueryEntry::new(value));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Remove ==
    /// Drops the entry under `key`. Fetches already in flight for it are
    /// discarded when they resolve.
    pub fn remove(&mut self, key: &QueryKey) -> Option<Value> {
        self.cancel_pending_reads(key);
        let removed = self.entries.remove(key).map(|entry| entry.value);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Read Cancellation ==
    /// Records a cancellation for `key`. Returns immediately; a fetch started
    /// before it finds out when it tries to commit.
    pub fn cancel_pending_reads(&mut self, key: &QueryKey) {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.read_epochs.insert(key.clone(), epoch);
    }

    /// Epoch a fetch for `key` must present to `commit_fetch`.
    pub fn begin_fetch(&self, _key: &QueryKey) -> u64 {
        self.next_epoch
    }

    /// True when reads of `key` were cancelled after a fetch began at `epoch`.
    pub fn is_superseded(&self, key: &QueryKey, epoch: u64) -> bool {
        let cancelled = self.read_epochs.get(key).copied().unwrap_or(self.pruned_epoch);
        cancelled >= epoch
    }

    /// Writes a fetched value unless it was superseded.
    ///
    /// Returns `Ok(false)` when reads of the key were cancelled since the
    /// fetch began or an optimistic write is still pending on the key.
    pub fn commit_fetch(&mut self, key: QueryKey, epoch: u64, value: Value) -> Result<bool> {
        if self.has_pending_mutation(&key) || self.is_superseded(&key, epoch) {
            self.stats.record_discarded_read();
            return Ok(false);
        }
        self.set(key, value)?;
        self.stats.record_fetch();
        Ok(true)
    }

    // == Invalidation ==
    /// Marks one entry stale. Returns false if nothing is cached under `key`.
    pub fn mark_stale(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                self.stats.record_invalidations(1);
                true
            }
            None => false,
        }
    }

    /// Marks every entry whose key starts with `prefix` stale.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> Vec<QueryKey> {
        let mut keys = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                keys.push(key.clone());
            }
        }
        self.stats.record_invalidations(keys.len());
        keys
    }

    // == Optimistic Writes ==
    /// Cancels reads for `key`, snapshots its value and writes `proposed`,
    /// all under one borrow of the store.
    pub fn begin_mutation(&mut self, key: QueryKey, proposed: Value) -> Result<PendingMutation> {
        self.cancel_pending_reads(&key);
        let snapshot = self.peek(&key);
        self.set(key.clone(), proposed.clone())?;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.pending_mutations += 1;
        }
        self.stats.record_optimistic_write();
        Ok(PendingMutation::applied(key, proposed, snapshot))
    }

    /// Remote write succeeded; the optimistic value stays in place.
    ///
    /// Fetches started while the write was pending may carry the pre-write
    /// server copy, so they are cancelled too.
    pub fn confirm_mutation(&mut self, pending: &mut PendingMutation) {
        self.cancel_pending_reads(pending.key());
        self.unpin(pending.key());
        pending.confirm();
        self.stats.record_confirmation();
    }

    /// Remote write failed; puts the snapshot back, or removes the entry if
    /// nothing was cached before.
    ///
    /// Pinned entries are never evicted, so a missing entry was removed on
    /// purpose and stays removed.
    pub fn rollback_mutation(&mut self, pending: &mut PendingMutation) {
        let key = pending.key().clone();
        self.cancel_pending_reads(&key);
        self.unpin(&key);
        match pending.snapshot() {
            Some(previous) => match self.entries.get_mut(&key) {
                Some(entry) => entry.replace(previous.clone()),
                None => debug!(key = %key, "entry removed during mutation; snapshot dropped"),
            },
            None => {
                if !self.has_pending_mutation(&key) {
                    self.remove(&key);
                }
            }
        }
        pending.roll_back();
        self.stats.record_rollback();
    }

    fn unpin(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.pending_mutations = entry.pending_mutations.saturating_sub(1);
        }
    }

    // == Garbage Collection ==
    /// Removes entries idle for `gc_time` seconds with no pending mutation,
    /// and forgets read cancellations for keys that are no longer cached.
    ///
    /// Returns the number of entries removed.
    pub fn collect_garbage(&mut self, gc_time: u64) -> usize {
        let gc_time_ms = gc_time.saturating_mul(1000);
        let idle: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_collectable(gc_time_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &idle {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        let tracked = self.read_epochs.len();
        let entries = &self.entries;
        self.read_epochs.retain(|key, _| entries.contains_key(key));
        if self.read_epochs.len() < tracked {
            // Fetches begun before now may have raced a forgotten cancellation.
            self.pruned_epoch = self.next_epoch;
            self.next_epoch += 1;
        }

        self.stats.record_evictions(idle.len());
        self.stats.set_total_entries(self.entries.len());
        idle.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
