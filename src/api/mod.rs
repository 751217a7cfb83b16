//! API Module
//!
//! HTTP handlers and routing for the event screens.
//!
//! # Endpoints
//! - `GET /events/:id` - Event details through the query cache
//! - `GET /events/:id/edit` - Event data for the edit form
//! - `PUT /events/:id` - Optimistic update with rollback
//! - `DELETE /events/:id` - Delete an event
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
