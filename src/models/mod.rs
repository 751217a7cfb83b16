//! Request and Response models for the events API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod event;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use event::{Event, EventEnvelope};
pub use requests::UpdateEventRequest;
pub use responses::{
    EditEventResponse, ErrorResponse, EventDetailsResponse, HealthResponse, MutationResponse,
    StatsResponse,
};
