//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for query eviction.

use std::collections::VecDeque;

use crate::cache::QueryKey;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<QueryKey>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    pub fn touch(&mut self, key: &QueryKey) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &QueryKey) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key that `can_evict` accepts.
    ///
    /// Keys rejected by the predicate keep their position.
    pub fn evict_oldest<F>(&mut self, can_evict: F) -> Option<QueryKey>
    where
        F: Fn(&QueryKey) -> bool,
    {
        let pos = self.order.iter().rposition(|k| can_evict(k))?;
        self.order.remove(pos)
    }

    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&QueryKey> {
        self.order.back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: &str) -> QueryKey {
        QueryKey::event(id).unwrap()
    }

    #[test]
    fn test_lru_touch_orders_keys() {
        let mut lru = LruTracker::new();

        lru.touch(&key("1"));
        lru.touch(&key("2"));
        lru.touch(&key("3"));

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&key("1")));

        lru.touch(&key("1"));
        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(&key("2")));
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.touch(&key("1"));
        lru.touch(&key("2"));

        assert_eq!(lru.evict_oldest(|_| true), Some(key("1")));
        assert_eq!(lru.evict_oldest(|_| true), Some(key("2")));
        assert_eq!(lru.evict_oldest(|_| true), None);
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_evict_skips_rejected_keys() {
        let mut lru = LruTracker::new();

        lru.touch(&key("pinned"));
        lru.touch(&key("2"));
        lru.touch(&key("3"));

        let pinned = key("pinned");
        let evicted = lru.evict_oldest(|k| k != &pinned);

        assert_eq!(evicted, Some(key("2")));
        assert!(lru.contains(&pinned));
        assert_eq!(lru.peek_oldest(), Some(&pinned));
    }

    #[test]
    fn test_lru_evict_none_acceptable() {
        let mut lru = LruTracker::new();
        lru.touch(&key("1"));

        assert_eq!(lru.evict_oldest(|_| false), None);
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_remove_nonexistent_key() {
        let mut lru = LruTracker::new();

        lru.touch(&key("1"));
        lru.remove(&key("nonexistent"));

        assert_eq!(lru.len(), 1);
        assert!(lru.contains(&key("1")));
    }
}
