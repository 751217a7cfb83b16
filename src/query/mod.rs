//! Query Module
//!
//! Read-through access to the query cache and the refresh queue.

mod client;
mod fetcher;

pub use client::{QueryClient, RefetchType, RefreshQueue};
pub use fetcher::Fetcher;
