//! Response DTOs for the events API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::Event;

/// Response body for the details screen (GET /events/:id)
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailsResponse {
    pub event: Event,
    /// Date in en-GB short form; the raw date when it cannot be parsed
    pub formatted_date: String,
    pub image_url: String,
}

impl EventDetailsResponse {
    pub fn new(event: Event, image_url: String) -> Self {
        let formatted_date = event.formatted_date().unwrap_or_else(|| event.date.clone());
        Self {
            event,
            formatted_date,
            image_url,
        }
    }
}

/// Response body for the edit screen (GET /events/:id/edit)
#[derive(Debug, Clone, Serialize)]
pub struct EditEventResponse {
    pub event: Event,
}

/// Response body for update and delete.
///
/// `redirect` is where the client should navigate next.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub key: String,
    pub redirect: String,
}

impl MutationResponse {
    pub fn updated(key: impl Into<String>, redirect: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Query '{}' updated", key),
            key,
            redirect: redirect.into(),
        }
    }

    pub fn deleted(key: impl Into<String>, redirect: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Query '{}' deleted", key),
            key,
            redirect: redirect.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            title: None,
            error: error.into(),
        }
    }

    pub fn with_title(title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_response_formats_date() {
        let event = Event {
            id: Some("1".to_string()),
            title: "Launch".to_string(),
            description: String::new(),
            date: "2024-12-24".to_string(),
            time: "10:00".to_string(),
            image: "launch.png".to_string(),
            location: "Paris".to_string(),
        };
        let resp = EventDetailsResponse::new(event, "http://localhost:3000/launch.png".to_string());
        assert_eq!(resp.formatted_date, "24 Dec 2024");
    }

    #[test]
    fn test_mutation_response_serialize() {
        let resp = MutationResponse::deleted("events/42", "/events");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["redirect"], "/events");
        assert_eq!(json["key"], "events/42");
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_rollback();

        let json = serde_json::to_value(StatsResponse::from(stats)).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["rollbacks"], 1);
        assert_eq!(json["hit_rate"], 0.5);
    }

    #[test]
    fn test_error_response_title_optional() {
        let plain = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert!(plain.get("title").is_none());

        let titled =
            serde_json::to_value(ErrorResponse::with_title("An error occurred", "boom")).unwrap();
        assert_eq!(titled["title"], "An error occurred");
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
