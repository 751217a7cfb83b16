//! Cache Module
//!
//! In-memory query cache with staleness, LRU eviction and optimistic write
//! bookkeeping.

pub(crate) mod entry;
mod key;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::QueryEntry;
pub use key::QueryKey;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CachedRead, QueryCache};

/// Query cache shared between handlers, the coordinator and background tasks.
pub type SharedCache = Arc<RwLock<QueryCache>>;

// == Public Constants ==
/// Maximum allowed rendered key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
