//! Event Query - a query cache with optimistic mutations
//!
//! Caches events from an upstream REST API, applies edits optimistically
//! with rollback on failure, and refreshes from the server afterwards.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod mutation;
pub mod query;
pub mod remote;
pub mod tasks;

pub use api::AppState;
pub use cache::{QueryCache, QueryKey};
pub use config::Config;
pub use mutation::MutationCoordinator;
pub use query::{QueryClient, RefetchType};
pub use tasks::{spawn_gc_task, spawn_refresh_task};
