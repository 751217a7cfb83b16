//! Event resource as exchanged with the upstream API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One event. Fields the backend leaves out default to empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Image path relative to the API base URL
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
}

impl Event {
    /// Date in en-GB short form, e.g. `15 Mar 2024`.
    ///
    /// Returns `None` if `date` is not a `YYYY-MM-DD` date.
    pub fn formatted_date(&self) -> Option<String> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .map(|date| date.format("%-d %b %Y").to_string())
    }
}

/// `{"event": {...}}` wrapper used by the upstream API in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: Event,
}
