//! Query Client
//!
//! Reads through the shared cache, serves stale values while a background
//! refresh runs, and routes invalidations to the refresh queue.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryKey, SharedCache};
use crate::error::{CacheError, Result};
use crate::query::Fetcher;

/// Whether invalidated queries are re-fetched right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchType {
    /// Queue a background refresh for every invalidated query
    Active,
    /// Only mark them stale
    None,
}

/// Receiving end of the refresh queue, drained by the refresh task.
#[derive(Debug)]
pub struct RefreshQueue {
    rx: mpsc::UnboundedReceiver<QueryKey>,
}

impl RefreshQueue {
    pub async fn recv(&mut self) -> Option<QueryKey> {
        self.rx.recv().await
    }
}

// == Query Client ==
/// Handle to the query cache used by handlers and the mutation coordinator.
#[derive(Clone, Debug)]
pub struct QueryClient {
    cache: SharedCache,
    refresh_tx: mpsc::UnboundedSender<QueryKey>,
    /// Keys sitting in the refresh queue, so repeated invalidations coalesce
    queued: Arc<Mutex<HashSet<QueryKey>>>,
}

impl QueryClient {
    /// Wraps `cache` and returns the client together with its refresh queue.
    pub fn new(cache: QueryCache) -> (Self, RefreshQueue) {
        let (refresh_tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            cache: Arc::new(RwLock::new(cache)),
            refresh_tx,
            queued: Arc::new(Mutex::new(HashSet::new())),
        };
        (client, RefreshQueue { rx })
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Fetch Query ==
    /// Returns the cached value for `key`, fetching it if nothing is cached.
    ///
    /// A stale cached value is returned as is and a refresh is queued.
    pub async fn fetch_query<F: Fetcher>(&self, key: &QueryKey, fetcher: &F) -> Result<Value> {
        // Write lock: reads touch LRU order and stats
        let cached = self.cache.write().await.read(key);
        match cached {
            Ok(read) => {
                if read.stale {
                    self.schedule_refresh(key.clone()).await;
                }
                return Ok(read.value);
            }
            Err(CacheError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }

        let epoch = self.cache.read().await.begin_fetch(key);
        let value = fetcher.fetch(key).await?;

        let mut cache = self.cache.write().await;
        if cache.commit_fetch(key.clone(), epoch, value.clone())? {
            Ok(value)
        } else {
            // Superseded while in flight; hand out what readers see now.
            debug!(key = %key, "fetch result discarded");
            Ok(cache.peek(key).unwrap_or(value))
        }
    }

    // == Refetch ==
    /// Re-reads `key` from upstream. Returns whether the result was committed.
    ///
    /// A not-found answer drops the cached entry.
    pub async fn refetch<F: Fetcher>(&self, key: &QueryKey, fetcher: &F) -> Result<bool> {
        let epoch = self.cache.read().await.begin_fetch(key);
        match fetcher.fetch(key).await {
            Ok(value) => self.cache.write().await.commit_fetch(key.clone(), epoch, value),
            Err(err) if err.is_not_found() => {
                let mut cache = self.cache.write().await;
                if !cache.is_superseded(key, epoch) && !cache.has_pending_mutation(key) {
                    cache.remove(key);
                }
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    // == Invalidation ==
    /// Marks every query under `prefix` stale.
    ///
    /// Returns the number of queries invalidated.
    pub async fn invalidate(&self, prefix: &QueryKey, refetch: RefetchType) -> usize {
        let keys = self.cache.write().await.invalidate(prefix);
        if refetch == RefetchType::Active {
            for key in &keys {
                self.schedule_refresh(key.clone()).await;
            }
        }
        keys.len()
    }

    /// Marks exactly `key` stale. With `RefetchType::Active` a refresh is
    /// queued even when nothing is cached under it.
    pub async fn invalidate_key(&self, key: &QueryKey, refetch: RefetchType) {
        self.cache.write().await.mark_stale(key);
        if refetch == RefetchType::Active {
            self.schedule_refresh(key.clone()).await;
        }
    }

    // == Direct Access ==
    pub async fn get_query_data(&self, key: &QueryKey) -> Option<Value> {
        self.cache.read().await.peek(key)
    }

    pub async fn set_query_data(&self, key: QueryKey, value: Value) -> Result<()> {
        self.cache.write().await.set(key, value)
    }

    pub async fn remove_query(&self, key: &QueryKey) -> Option<Value> {
        self.cache.write().await.remove(key)
    }

    // == Refresh Queue ==
    async fn schedule_refresh(&self, key: QueryKey) {
        let mut queued = self.queued.lock().await;
        if !queued.insert(key.clone()) {
            return;
        }
        if self.refresh_tx.send(key).is_err() {
            warn!("Refresh queue closed; background refresh skipped");
        }
    }

    /// Called by the refresh task once it has taken `key` off the queue.
    pub(crate) async fn dequeued(&self, key: &QueryKey) {
        self.queued.lock().await.remove(key);
    }
}
