//! Mutation Module
//!
//! Optimistic writes with rollback on remote failure.

mod coordinator;
mod pending;

pub use coordinator::MutationCoordinator;
pub use pending::{MutationState, PendingMutation};
