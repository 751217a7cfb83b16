//! Query Entry Module
//!
//! Defines the structure for individual cached queries with staleness tracking.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Query Entry ==
/// Represents a single cached query with value and metadata.
#[derive(Debug, Clone)]
pub struct QueryEntry {
    /// The cached value (confirmed or optimistic)
    pub value: Value,
    /// Last write timestamp (Unix milliseconds)
    pub updated_at: u64,
    /// Last read or write timestamp (Unix milliseconds), drives garbage collection
    pub last_access: u64,
    /// Set by invalidation, cleared by the next write
    pub invalidated: bool,
    /// Number of optimistic mutations still in flight for this key
    pub pending_mutations: usize,
}

impl QueryEntry {
    // == Constructor ==
    /// Creates a fresh entry holding `value`.
    pub fn new(value: Value) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            updated_at: now,
            last_access: now,
            invalidated: false,
            pending_mutations: 0,
        }
    }

    // == Replace ==
    /// Swaps in a whole new value and marks the entry fresh.
    pub fn replace(&mut self, value: Value) {
        let now = current_timestamp_ms();
        self.value = value;
        self.updated_at = now;
        self.last_access = now;
        self.invalidated = false;
    }

    // == Is Stale ==
    /// Checks if the entry is due for a refresh.
    ///
    /// An entry is stale once invalidated, or once `stale_time_ms` has fully
    /// elapsed since its last write. A zero stale time makes every entry stale.
    pub fn is_stale(&self, stale_time_ms: u64) -> bool {
        self.invalidated || current_timestamp_ms() >= self.updated_at.saturating_add(stale_time_ms)
    }

    // == Is Idle ==
    /// True when nothing touched the entry for `gc_time_ms` and no mutation pins it.
    pub fn is_collectable(&self, gc_time_ms: u64) -> bool {
        self.pending_mutations == 0 && current_timestamp_ms() >= self.last_access.saturating_add(gc_time_ms)
    }

    pub fn is_pinned(&self) -> bool {
        self.pending_mutations > 0
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = QueryEntry::new(json!({"title": "Old"}));

        assert_eq!(entry.value["title"], "Old");
        assert!(!entry.invalidated);
        assert!(!entry.is_pinned());
    }

    #[test]
    fn test_entry_zero_stale_time_is_stale() {
        let entry = QueryEntry::new(json!(1));
        assert!(entry.is_stale(0));
        assert!(!entry.is_stale(60_000));
        assert!(!entry.is_stale(u64::MAX));
    }

    #[test]
    fn test_entry_becomes_stale() {
        let entry = QueryEntry::new(json!(1));
        assert!(!entry.is_stale(100));

        sleep(Duration::from_millis(150));

        assert!(entry.is_stale(100));
    }

    #[test]
    fn test_entry_invalidated_is_stale() {
        let mut entry = QueryEntry::new(json!(1));
        entry.invalidated = true;
        assert!(entry.is_stale(60_000));

        entry.replace(json!(2));
        assert!(!entry.is_stale(60_000));
        assert_eq!(entry.value, json!(2));
    }

    #[test]
    fn test_pinned_entry_not_collectable() {
        let mut entry = QueryEntry::new(json!(1));
        assert!(entry.is_collectable(0));

        entry.pending_mutations = 1;
        assert!(!entry.is_collectable(0));
    }

    #[test]
    fn test_staleness_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = QueryEntry {
            value: json!(null),
            updated_at: now,
            last_access: now,
            invalidated: false,
            pending_mutations: 0,
        };

        // Stale exactly when the window has elapsed
        assert!(entry.is_stale(0), "Entry should be stale at boundary");
    }
}
