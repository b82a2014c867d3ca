use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GatewayError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextValue {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    #[serde(default)]
    pub html_instructions: String,
    #[serde(default)]
    pub distance: TextValue,
    #[serde(default)]
    pub duration: TextValue,
    #[serde(default)]
    pub start_location: LatLng,
    #[serde(default)]
    pub end_location: LatLng,
    #[serde(default)]
    pub travel_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    /// Meters.
    pub distance: TextValue,
    /// Seconds.
    pub duration: TextValue,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

/// First leg of the first route, or the upstream status as an error.
pub fn first_leg(body: DirectionsResponse) -> Result<Leg, GatewayError> {
    match body.status.as_str() {
        "OK" => {}
        "NOT_FOUND" | "ZERO_RESULTS" => {
            return Err(GatewayError::NotFound(format!(
                "Google Maps Error: {}",
                body.status
            )))
        }
        other => {
            let detail = body
                .error_message
                .map(|m| format!(" - {m}"))
                .unwrap_or_default();
            return Err(GatewayError::Status(format!(
                "Google Maps Error: {other}{detail}"
            )));
        }
    }

    body.routes
        .into_iter()
        .next()
        .and_then(|r| r.legs.into_iter().next())
        .ok_or_else(|| GatewayError::Payload("directions response has no legs".into()))
}

/// Travel directions between a free-form origin and destination.
#[async_trait]
pub trait DirectionsGateway: Send + Sync {
    /// One upstream call; route, distance and duration all derive from it.
    async fn leg(&self, origin: &str, destination: &str) -> Result<Leg, GatewayError>;

    async fn route(&self, origin: &str, destination: &str) -> Result<Vec<Step>, GatewayError> {
        Ok(self.leg(origin, destination).await?.steps)
    }

    async fn distance(&self, origin: &str, destination: &str) -> Result<i64, GatewayError> {
        Ok(self.leg(origin, destination).await?.distance.value)
    }

    async fn duration(&self, origin: &str, destination: &str) -> Result<i64, GatewayError> {
        Ok(self.leg(origin, destination).await?.duration.value)
    }
}

/// Google Directions API client.
#[derive(Clone)]
pub struct GoogleDirections {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleDirections {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl DirectionsGateway for GoogleDirections {
    async fn leg(&self, origin: &str, destination: &str) -> Result<Leg, GatewayError> {
        let url = format!("{}/directions/json", self.base_url);
        let mut query = vec![("origin", origin), ("destination", destination)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(format!(
                "Google Maps API error: {status} - {body}"
            )));
        }

        let body: DirectionsResponse = response.json().await?;
        debug!(status = %body.status, routes = body.routes.len(), "directions response");
        first_leg(body)
    }
}
