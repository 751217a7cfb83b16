//! Remote Module
//!
//! Client for the upstream events REST API.

mod client;

pub use client::{EventsApi, HttpEventsClient};
