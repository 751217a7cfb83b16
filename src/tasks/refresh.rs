//! Background Refresh Task
//!
//! Drains the refresh queue and re-reads each key from upstream, replacing
//! optimistic or invalidated values with the server's copy.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::query::{Fetcher, QueryClient, RefreshQueue};

/// Spawns the refresh worker. Keys are refreshed one at a time in queue order.
pub fn spawn_refresh_task<F: Fetcher>(
    client: QueryClient,
    fetcher: Arc<F>,
    mut queue: RefreshQueue,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting background refresh task");

        while let Some(key) = queue.recv().await {
            // Off the queue before fetching, so invalidations during the
            // fetch queue another round.
            client.dequeued(&key).await;

            match client.refetch(&key, fetcher.as_ref()).await {
                Ok(true) => debug!(key = %key, "query refreshed"),
                Ok(false) => debug!(key = %key, "refresh superseded by a newer write"),
                Err(err) => warn!(key = %key, error = %err, "background refresh failed"),
            }
        }

        info!("Refresh queue closed; refresh task exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{QueryCache, QueryKey};
    use crate::error::RemoteError;
    use crate::query::RefetchType;
    use serde_json::{json, Value};
    use std::time::Duration;

    struct StaticFetcher(Value);

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _key: &QueryKey) -> Result<Value, RemoteError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_invalidated_value() {
        let (client, queue) = QueryClient::new(QueryCache::new(100, 60));
        let key = QueryKey::event("42").unwrap();
        client.set_query_data(key.clone(), json!({"title": "New"})).await.unwrap();

        let fetcher = Arc::new(StaticFetcher(json!({"title": "New (server)"})));
        let handle = spawn_refresh_task(client.clone(), fetcher, queue);

        client.invalidate_key(&key, RefetchType::Active).await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(
            client.get_query_data(&key).await,
            Some(json!({"title": "New (server)"}))
        );
        handle.abort();
    }
}
