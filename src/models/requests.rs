//! Request DTOs for the events API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::Event;

/// Request body for PUT /events/:id
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventRequest {
    pub event: Event,
}

impl UpdateEventRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.event.title.trim().is_empty() {
            return Some("Event title cannot be empty".to_string());
        }
        None
    }

    /// The event to send upstream, carrying the id from the path.
    pub fn into_event(self, id: &str) -> Event {
        Event {
            id: Some(id.to_string()),
            ..self.event
        }
    }
}
