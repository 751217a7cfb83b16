//! HTTP client for the upstream events REST API.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::QueryKey;
use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{Event, EventEnvelope};
use crate::query::Fetcher;

/// Remote operations on events.
pub trait EventsApi: Send + Sync + 'static {
    fn fetch_event(&self, id: &str) -> impl Future<Output = Result<Event, RemoteError>> + Send;

    /// Sends the full event; returns the server's copy when it echoes one.
    fn update_event(
        &self,
        id: &str,
        event: &Event,
    ) -> impl Future<Output = Result<Event, RemoteError>> + Send;

    fn delete_event(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Update responses may or may not echo the event back.
#[derive(Debug, Deserialize)]
struct UpdateBody {
    #[serde(default)]
    event: Option<Event>,
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => RemoteError::http(status.as_u16(), None),
            None => RemoteError::transport(err.to_string()),
        }
    }
}

// == HTTP Client ==
#[derive(Clone, Debug)]
pub struct HttpEventsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEventsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an event image.
    pub fn image_url(&self, image: &str) -> String {
        format!("{}/{}", self.base_url, image.trim_start_matches('/'))
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/events/{}", self.base_url, id)
    }

    /// Passes 2xx responses through and turns the rest into `RemoteError`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        Err(RemoteError::http(status.as_u16(), message))
    }
}

impl EventsApi for HttpEventsClient {
    async fn fetch_event(&self, id: &str) -> Result<Event, RemoteError> {
        debug!(id, "GET event");
        let response = self.client.get(self.event_url(id)).send().await?;
        let envelope: EventEnvelope = Self::check(response).await?.json().await?;
        Ok(envelope.event)
    }

    async fn update_event(&self, id: &str, event: &Event) -> Result<Event, RemoteError> {
        debug!(id, "PUT event");
        let response = self
            .client
            .put(self.event_url(id))
            .json(&EventEnvelope {
                event: event.clone(),
            })
            .send()
            .await?;
        let response = Self::check(response).await?;
        // Some backends answer with just a message.
        let body: Option<UpdateBody> = response.json().await.ok();
        Ok(body.and_then(|b| b.event).unwrap_or_else(|| event.clone()))
    }

    async fn delete_event(&self, id: &str) -> Result<(), RemoteError> {
        debug!(id, "DELETE event");
        let response = self.client.delete(self.event_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl Fetcher for HttpEventsClient {
    async fn fetch(&self, key: &QueryKey) -> Result<Value, RemoteError> {
        match key.tokens() {
            [kind, id] if kind == "events" => {
                let event = self.fetch_event(id).await?;
                serde_json::to_value(event).map_err(|e| RemoteError::transport(e.to_string()))
            }
            _ => Err(RemoteError::transport(format!(
                "no upstream route for query '{}'",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = HttpEventsClient::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.event_url("42"), "http://localhost:3000/events/42");
        assert_eq!(
            client.image_url("images/a.jpg"),
            "http://localhost:3000/images/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_fetcher_rejects_unknown_keys() {
        let client = HttpEventsClient::new("http://localhost:3000", Duration::from_secs(1)).unwrap();
        let key = QueryKey::new(["users", "1"]).unwrap();

        let err = client.fetch(&key).await.unwrap_err();
        assert!(err.status.is_none());
        assert!(err.detail.contains("users/1"));
    }

    #[tokio::test]
    async fn test_transport_error_has_no_status() {
        // Nothing listens on port 9 of the loopback interface.
        let client = HttpEventsClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.fetch_event("1").await.unwrap_err();
        assert!(err.status.is_none());
        assert!(err.message.is_none());
    }
}
