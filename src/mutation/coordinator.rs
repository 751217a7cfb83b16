//! Optimistic Mutation Coordinator
//!
//! Writes a predicted value into the cache before the remote write runs,
//! then confirms or rolls it back and queues a refresh either way.

use std::future::Future;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::QueryKey;
use crate::error::{CacheError, RemoteError, Result};
use crate::mutation::{MutationState, PendingMutation};
use crate::query::{QueryClient, RefetchType};

// == Coordinator ==
/// Runs optimistic mutations against a [`QueryClient`].
///
/// Mutations on the same key are not serialized: a second mutation snapshots
/// whatever the first one wrote, so its rollback restores that value.
#[derive(Clone, Debug)]
pub struct MutationCoordinator {
    client: QueryClient,
}

impl MutationCoordinator {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    // == Perform Mutation ==
    /// Applies `new_value` under `key`, awaits `remote_write`, then reconciles.
    ///
    /// Readers see `new_value` as soon as the optimistic write lands. On
    /// failure the previous value is restored and the remote error returned.
    /// A refresh of `key` is queued on both paths.
    pub async fn perform_mutation<T, Fut>(
        &self,
        key: QueryKey,
        new_value: Value,
        remote_write: Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, RemoteError>>,
    {
        let pending = self.apply(key, new_value).await?;
        let outcome = remote_write.await;
        self.settle(pending, outcome).await
    }

    // == Spawn Mutation ==
    /// Applies `new_value` now and runs the remote write on a background task.
    ///
    /// When this returns the optimistic value is already visible. The handle
    /// yields the remote result once the mutation has settled.
    pub async fn spawn_mutation<T, Fut>(
        &self,
        key: QueryKey,
        new_value: Value,
        remote_write: Fut,
    ) -> Result<JoinHandle<Result<T>>>
    where
        T: Send + 'static,
        Fut: Future<Output = std::result::Result<T, RemoteError>> + Send + 'static,
    {
        let pending = self.apply(key, new_value).await?;
        let this = self.clone();
        Ok(tokio::spawn(async move {
            let outcome = remote_write.await;
            this.settle(pending, outcome).await
        }))
    }

    /// Cancels in-flight reads, snapshots, and writes the predicted value.
    async fn apply(&self, key: QueryKey, new_value: Value) -> Result<PendingMutation> {
        let pending = self
            .client
            .cache()
            .write()
            .await
            .begin_mutation(key, new_value)?;
        debug!(key = %pending.key(), "optimistic value applied");
        Ok(pending)
    }

    async fn settle<T>(
        &self,
        mut pending: PendingMutation,
        outcome: std::result::Result<T, RemoteError>,
    ) -> Result<T> {
        {
            let mut cache = self.client.cache().write().await;
            match &outcome {
                Ok(_) => cache.confirm_mutation(&mut pending),
                Err(_) => cache.rollback_mutation(&mut pending),
            }
        }

        // Reconcile with the server whatever happened.
        self.client
            .invalidate_key(pending.key(), RefetchType::Active)
            .await;

        let key = pending.key().clone();
        match (pending.settle(), outcome) {
            (MutationState::Confirmed, Ok(value)) => {
                info!(key = %key, "mutation confirmed");
                Ok(value)
            }
            (_, Err(err)) => {
                warn!(key = %key, error = %err, "mutation failed; optimistic value rolled back");
                Err(CacheError::Remote(err))
            }
            (state, Ok(_)) => Err(CacheError::Internal(format!(
                "mutation on '{}' settled in unexpected state {:?}",
                key, state
            ))),
        }
    }
}
