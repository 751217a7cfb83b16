//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the server.
//!
//! # Tasks
//! - Refresh: re-reads invalidated queries from upstream
//! - GC: removes queries that have been idle for the configured time

mod gc;
mod refresh;

pub use gc::spawn_gc_task;
pub use refresh::spawn_refresh_task;
