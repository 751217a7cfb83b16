//! Cache Statistics Module
//!
//! Tracks read and mutation counters for the query cache.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from the cache
    pub hits: u64,
    /// Reads that found nothing cached
    pub misses: u64,
    /// Upstream fetches committed to the cache
    pub fetches: u64,
    /// Fetch results dropped because a write superseded them
    pub stale_reads_discarded: u64,
    /// Optimistic values written ahead of the remote call
    pub optimistic_writes: u64,
    /// Mutations the remote accepted
    pub confirmations: u64,
    /// Mutations rolled back after a remote failure
    pub rollbacks: u64,
    /// Entries marked stale
    pub invalidations: u64,
    /// Entries dropped for capacity or idleness
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_fetch(&mut self) {
        self.fetches += 1;
    }

    pub fn record_discarded_read(&mut self) {
        self.stale_reads_discarded += 1;
    }

    pub fn record_optimistic_write(&mut self) {
        self.optimistic_writes += 1;
    }

    pub fn record_confirmation(&mut self) {
        self.confirmations += 1;
    }

    pub fn record_rollback(&mut self) {
        self.rollbacks += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.rollbacks, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_mutation_counters() {
        let mut stats = CacheStats::new();
        stats.record_optimistic_write();
        stats.record_optimistic_write();
        stats.record_confirmation();
        stats.record_rollback();
        stats.record_invalidations(3);

        assert_eq!(stats.optimistic_writes, 2);
        assert_eq!(stats.confirmations, 1);
        assert_eq!(stats.rollbacks, 1);
        assert_eq!(stats.invalidations, 3);
    }
}
