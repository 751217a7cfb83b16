//! Query Garbage Collection Task
//!
//! Background task that periodically drops queries nobody has touched.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that removes idle queries every `gc_interval_secs`.
///
/// An entry is idle once `gc_time_secs` have passed since its last read or
/// write. Entries with a pending mutation are never collected.
///
/// # Example
/// ```ignore
/// let gc_handle = spawn_gc_task(queries.cache().clone(), 30, 300);
/// // Later, during shutdown:
/// gc_handle.abort();
/// ```
pub fn spawn_gc_task(cache: SharedCache, gc_interval_secs: u64, gc_time_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(gc_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting query GC task with interval of {} seconds, gc time {} seconds",
            gc_interval_secs, gc_time_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.collect_garbage(gc_time_secs);

            if removed > 0 {
                info!("Query GC: removed {} idle queries", removed);
            } else {
                debug!("Query GC: no idle queries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{QueryCache, QueryKey};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn test_gc_task_removes_idle_queries() {
        let cache = Arc::new(RwLock::new(QueryCache::new(100, 60)));
        let key = QueryKey::event("1").unwrap();
        cache.write().await.set(key.clone(), json!(1)).unwrap();

        let handle = spawn_gc_task(cache.clone(), 1, 0);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!cache.read().await.contains(&key), "Idle query should have been collected");
        handle.abort();
    }

    #[tokio::test]
    async fn test_gc_task_keeps_recent_queries() {
        let cache = Arc::new(RwLock::new(QueryCache::new(100, 60)));
        let key = QueryKey::event("1").unwrap();
        cache.write().await.set(key.clone(), json!(1)).unwrap();

        let handle = spawn_gc_task(cache.clone(), 1, 3600);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.read().await.contains(&key), "Recent query should be kept");
        handle.abort();
    }

    #[tokio::test]
    async fn test_gc_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(QueryCache::new(100, 60)));

        let handle = spawn_gc_task(cache, 1, 300);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
