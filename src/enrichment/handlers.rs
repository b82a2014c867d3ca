use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use super::{
    directions::Step,
    events::Event,
    services::{get_directions, get_distance, get_duration, get_events},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub directions: Vec<Step>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub distance: i64,
}

#[derive(Debug, Serialize)]
pub struct DurationResponse {
    pub duration: i64,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

pub fn enrichment_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/:lat/:long/directions", get(directions))
        .route("/:id/:lat/:long/distance", get(distance))
        .route("/:id/:lat/:long/duration", get(duration))
        .route("/:id/events", get(events))
}

/// `"lat, long"` origin from path segments, rejecting non-numeric values.
fn origin(lat: &str, long: &str) -> AppResult<String> {
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_input(format!("latitude {lat:?} is not a number")))?;
    let long: f64 = long
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_input(format!("longitude {long:?} is not a number")))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&long) {
        return Err(AppError::invalid_input("coordinates out of range"));
    }
    Ok(format!("{lat}, {long}"))
}

#[instrument(skip(state))]
pub async fn directions(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path((id, lat, long)): Path<(String, String, String)>,
) -> AppResult<Json<DirectionsResponse>> {
    let origin = origin(&lat, &long)?;
    let directions = get_directions(
        state.appointments.as_ref(),
        state.directions.as_ref(),
        &id,
        &username,
        &origin,
    )
    .await?;
    Ok(Json(DirectionsResponse { directions }))
}

#[instrument(skip(state))]
pub async fn distance(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path((id, lat, long)): Path<(String, String, String)>,
) -> AppResult<Json<DistanceResponse>> {
    let origin = origin(&lat, &long)?;
    let distance = get_distance(
        state.appointments.as_ref(),
        state.directions.as_ref(),
        &id,
        &username,
        &origin,
    )
    .await?;
    Ok(Json(DistanceResponse { distance }))
}

#[instrument(skip(state))]
pub async fn duration(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path((id, lat, long)): Path<(String, String, String)>,
) -> AppResult<Json<DurationResponse>> {
    let origin = origin(&lat, &long)?;
    let duration = get_duration(
        state.appointments.as_ref(),
        state.directions.as_ref(),
        &id,
        &username,
        &origin,
    )
    .await?;
    Ok(Json(DurationResponse { duration }))
}

#[instrument(skip(state))]
pub async fn events(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<EventsResponse>> {
    let events = get_events(
        state.appointments.as_ref(),
        state.events.as_ref(),
        &id,
        &username,
    )
    .await?;
    Ok(Json(EventsResponse { events }))
}
