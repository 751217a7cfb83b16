//! Pending Mutation Module
//!
//! Bookkeeping for one in-flight optimistic write.

use serde_json::Value;

use crate::cache::QueryKey;

// == Mutation State ==
/// Lifecycle of a single optimistic write.
///
/// `Idle -> OptimisticallyApplied -> {Confirmed | RolledBack} -> Idle`.
/// `Confirmed` and `RolledBack` are transient: the coordinator always moves
/// on to reconciliation and back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    OptimisticallyApplied,
    Confirmed,
    RolledBack,
}

// == Pending Mutation ==
/// A write in flight: the key, the predicted value, and what the cache held
/// right before the predicted value went in.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    key: QueryKey,
    proposed: Value,
    snapshot: Option<Value>,
    state: MutationState,
}

impl PendingMutation {
    /// Records an optimistic write that has just been applied.
    pub fn applied(key: QueryKey, proposed: Value, snapshot: Option<Value>) -> Self {
        Self {
            key,
            proposed,
            snapshot,
            state: MutationState::OptimisticallyApplied,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn proposed(&self) -> &Value {
        &self.proposed
    }

    /// Value to restore on rollback; `None` means nothing was cached.
    pub fn snapshot(&self) -> Option<&Value> {
        self.snapshot.as_ref()
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == MutationState::OptimisticallyApplied
    }

    pub(crate) fn confirm(&mut self) {
        debug_assert!(self.is_in_flight());
        self.state = MutationState::Confirmed;
    }

    pub(crate) fn roll_back(&mut self) {
        debug_assert!(self.is_in_flight());
        self.state = MutationState::RolledBack;
    }

    /// Reconciliation done; the pending marker is cleared.
    pub(crate) fn settle(&mut self) -> MutationState {
        std::mem::replace(&mut self.state, MutationState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirm_path() {
        let key = QueryKey::event("42").unwrap();
        let mut pending = PendingMutation::applied(key, json!({"title": "New"}), None);
        assert!(pending.is_in_flight());

        pending.confirm();
        assert_eq!(pending.state(), MutationState::Confirmed);
        assert_eq!(pending.settle(), MutationState::Confirmed);
        assert_eq!(pending.state(), MutationState::Idle);
    }

    #[test]
    fn test_rollback_path_keeps_snapshot() {
        let key = QueryKey::event("42").unwrap();
        let mut pending =
            PendingMutation::applied(key, json!({"title": "New"}), Some(json!({"title": "Old"})));

        pending.roll_back();
        assert_eq!(pending.state(), MutationState::RolledBack);
        assert_eq!(pending.snapshot(), Some(&json!({"title": "Old"})));
        assert_eq!(pending.proposed()["title"], "New");
        assert_eq!(pending.settle(), MutationState::RolledBack);
    }
}
