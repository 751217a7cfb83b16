//! API Handlers
//!
//! HTTP request handlers for the event screens and cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::config::Config;
use crate::error::{CacheError, RemoteError, ScreenError};
use crate::models::{
    EditEventResponse, Event, EventDetailsResponse, HealthResponse, MutationResponse,
    StatsResponse, UpdateEventRequest,
};
use crate::mutation::MutationCoordinator;
use crate::query::{QueryClient, RefetchType, RefreshQueue};
use crate::remote::{EventsApi, HttpEventsClient};

const LOAD_FALLBACK: &str = "Failed to load event details.";
const DETAILS_TITLE: &str = "An error occurred";
const EDIT_TITLE: &str = "Error loading event to edit.";
const UPDATE_TITLE: &str = "Failed to update event";
const UPDATE_FALLBACK: &str = "Failed to update event.";
const DELETE_TITLE: &str = "Failed to delete event";
const DELETE_FALLBACK: &str = "Failed to delete event.";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub queries: QueryClient,
    pub mutations: MutationCoordinator,
    pub events: Arc<HttpEventsClient>,
}

impl AppState {
    /// Creates the state and the refresh queue the refresh task must drain.
    pub fn new(cache: QueryCache, events: HttpEventsClient) -> (Self, RefreshQueue) {
        let (queries, refresh_queue) = QueryClient::new(cache);
        let state = Self {
            mutations: MutationCoordinator::new(queries.clone()),
            queries,
            events: Arc::new(events),
        };
        (state, refresh_queue)
    }

    /// Creates the state from configuration.
    pub fn from_config(config: &Config) -> Result<(Self, RefreshQueue), RemoteError> {
        let cache = QueryCache::new(config.max_entries, config.stale_time);
        let events = HttpEventsClient::from_config(config)?;
        Ok(Self::new(cache, events))
    }

    /// Reads one event through the query cache.
    async fn load_event(&self, id: &str) -> Result<Event, CacheError> {
        let key = QueryKey::event(id)?;
        let value = self.queries.fetch_query(&key, self.events.as_ref()).await?;
        decode_event(value)
    }
}

fn decode_event(value: Value) -> Result<Event, CacheError> {
    serde_json::from_value(value)
        .map_err(|e| CacheError::Internal(format!("cached event is malformed: {}", e)))
}

/// Handler for GET /events/:id
pub async fn event_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventDetailsResponse>, ScreenError> {
    let event = state
        .load_event(&id)
        .await
        .map_err(|e| ScreenError::new(DETAILS_TITLE, LOAD_FALLBACK, e))?;
    let image_url = state.events.image_url(&event.image);

    Ok(Json(EventDetailsResponse::new(event, image_url)))
}

/// Handler for GET /events/:id/edit
pub async fn edit_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditEventResponse>, ScreenError> {
    let event = state
        .load_event(&id)
        .await
        .map_err(|e| ScreenError::new(EDIT_TITLE, LOAD_FALLBACK, e))?;

    Ok(Json(EditEventResponse { event }))
}

/// Handler for PUT /events/:id
///
/// The submitted event becomes the cached value right away; a failed
/// upstream write puts the previous value back before the error is returned.
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<MutationResponse>, ScreenError> {
    let fail = |e: CacheError| ScreenError::new(UPDATE_TITLE, UPDATE_FALLBACK, e);

    if let Some(error_msg) = req.validate() {
        return Err(fail(CacheError::InvalidRequest(error_msg)));
    }

    let key = QueryKey::event(&id).map_err(fail)?;
    let event = req.into_event(&id);
    let optimistic = serde_json::to_value(&event)
        .map_err(|e| fail(CacheError::Internal(format!("cannot encode event: {}", e))))?;

    state
        .mutations
        .perform_mutation(key.clone(), optimistic, state.events.update_event(&id, &event))
        .await
        .map_err(fail)?;

    Ok(Json(MutationResponse::updated(
        key.to_string(),
        format!("/events/{}", id),
    )))
}

/// Handler for DELETE /events/:id
///
/// Event queries are invalidated without refetching so the deleted event is
/// not requested again.
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ScreenError> {
    let key = QueryKey::event(&id).map_err(|e| ScreenError::new(DELETE_TITLE, DELETE_FALLBACK, e))?;

    state
        .events
        .delete_event(&id)
        .await
        .map_err(|e| ScreenError::new(DELETE_TITLE, DELETE_FALLBACK, e.into()))?;

    state
        .queries
        .invalidate(&QueryKey::events(), RefetchType::None)
        .await;
    state.queries.remove_query(&key).await;

    Ok(Json(MutationResponse::deleted(key.to_string(), "/events")))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.queries.cache().read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
