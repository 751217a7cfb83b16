//! Fetcher seam: how a query key turns into an upstream read.

use std::future::Future;

use serde_json::Value;

use crate::cache::QueryKey;
use crate::error::RemoteError;

/// Loads the authoritative value for a query key.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, key: &QueryKey) -> impl Future<Output = Result<Value, RemoteError>> + Send;
}
