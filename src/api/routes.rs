//! API Routes
//!
//! Configures the Axum router with the event screens and cache endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_event_handler, edit_event_handler, event_details_handler, health_handler,
    stats_handler, update_event_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /events/:id` - Event details
/// - `PUT /events/:id` - Optimistic update
/// - `DELETE /events/:id` - Delete and invalidate event queries
/// - `GET /events/:id/edit` - Event for the edit form
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/events/:id",
            get(event_details_handler)
                .put(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/events/:id/edit", get(edit_event_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
