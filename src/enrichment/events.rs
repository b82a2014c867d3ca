use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Duration, OffsetDateTime, UtcOffset};
use tracing::debug;

use super::GatewayError;

/// Public event happening near an appointment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct MultipartText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EventStart {
    #[serde(default)]
    local: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamEvent {
    #[serde(default)]
    name: MultipartText,
    #[serde(default)]
    description: MultipartText,
    #[serde(default)]
    start: EventStart,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
pub struct EventSearchResponse {
    #[serde(default)]
    events: Vec<UpstreamEvent>,
}

pub fn map_events(body: EventSearchResponse) -> Vec<Event> {
    body.events
        .into_iter()
        .map(|e| Event {
            name: e.name.text.unwrap_or_default(),
            description: e.description.text,
            date_time: e.start.local,
            url: e.url,
        })
        .collect()
}

/// `[start, start + 1 day)` as UTC `YYYY-MM-DDTHH:MM:SS` strings.
pub fn search_window(start: OffsetDateTime) -> Result<(String, String), GatewayError> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let out_of_range = || GatewayError::Payload(format!("search window after {start} is out of range"));
    let start = start.checked_to_offset(UtcOffset::UTC).ok_or_else(out_of_range)?;
    let end = start.checked_add(Duration::days(1)).ok_or_else(out_of_range)?;
    let render = |t: OffsetDateTime| {
        t.format(&format)
            .map_err(|e| GatewayError::Payload(format!("format search window: {e}")))
    };
    Ok((render(start)?, render(end)?))
}

/// Extracts Eventbrite's `error_description` from an error body.
fn error_description(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error_description").and_then(|d| d.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}

/// Public events for a town on the day starting at `date`.
#[async_trait]
pub trait EventsGateway: Send + Sync {
    async fn events_for(&self, town: &str, date: OffsetDateTime) -> Result<Vec<Event>, GatewayError>;
}

/// Eventbrite search API client.
#[derive(Clone)]
pub struct EventbriteEvents {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl EventbriteEvents {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl EventsGateway for EventbriteEvents {
    async fn events_for(&self, town: &str, date: OffsetDateTime) -> Result<Vec<Event>, GatewayError> {
        let (range_start, range_end) = search_window(date)?;
        let url = format!("{}/events/search/", self.base_url);
        let mut query = vec![
            ("location.address", town),
            ("start_date.range_start", range_start.as_str()),
            ("start_date.range_end", range_end.as_str()),
        ];
        if let Some(token) = self.token.as_deref() {
            query.push(("token", token));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::InvalidArgument(format!(
                "EventBrite Error: {}",
                error_description(&body)
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(format!(
                "EventBrite API error: {status} - {}",
                error_description(&body)
            )));
        }

        let body: EventSearchResponse = response.json().await?;
        let events = map_events(body);
        debug!(town, count = events.len(), "events response");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn maps_upstream_events() {
        let body: EventSearchResponse = serde_json::from_value(json!({
            "pagination": { "object_count": 2 },
            "events": [
                {
                    "name": { "text": "Farmers Market", "html": "<p>Farmers Market</p>" },
                    "description": { "text": "Local produce" },
                    "start": { "local": "2016-11-16T09:00:00", "timezone": "Europe/London" },
                    "url": "https://www.eventbrite.co.uk/e/1"
                },
                {
                    "name": { "text": "Quiz Night" },
                    "description": { "text": null },
                    "start": { "local": "2016-11-16T19:30:00" },
                    "url": "https://www.eventbrite.co.uk/e/2"
                }
            ]
        }))
        .unwrap();

        let events = map_events(body);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Farmers Market");
        assert_eq!(events[0].description.as_deref(), Some("Local produce"));
        assert_eq!(events[1].description, None);
        assert_eq!(events[1].date_time, "2016-11-16T19:30:00");
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let body: EventSearchResponse = serde_json::from_value(json!({ "events": [] })).unwrap();
        assert!(map_events(body).is_empty());
        let body: EventSearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(map_events(body).is_empty());
    }

    #[test]
    fn event_serializes_date_time_in_camel_case() {
        let event = Event {
            name: "n".into(),
            description: None,
            date_time: "2016-11-16T09:00:00".into(),
            url: "u".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["dateTime"], "2016-11-16T09:00:00");
    }

    #[test]
    fn search_window_spans_one_day_in_utc() {
        let (start, end) = search_window(datetime!(2016-11-16 10:00 +1)).unwrap();
        assert_eq!(start, "2016-11-16T09:00:00");
        assert_eq!(end, "2016-11-17T09:00:00");
    }

    #[test]
    fn search_window_errors_instead_of_overflowing() {
        let err = search_window(datetime!(9999-12-31 12:00 UTC)).unwrap_err();
        assert!(matches!(err, GatewayError::Payload(_)));

        let err = search_window(datetime!(9999-12-31 23:00 -2)).unwrap_err();
        assert!(matches!(err, GatewayError::Payload(_)));
    }

    #[test]
    fn error_description_prefers_upstream_message() {
        let body = r#"{"status_code":400,"error_description":"There are errors with your arguments: location.address - INVALID","error":"ARGUMENTS_ERROR"}"#;
        assert_eq!(
            error_description(body),
            "There are errors with your arguments: location.address - INVALID"
        );
        assert_eq!(error_description("plain text"), "plain text");
    }
}
