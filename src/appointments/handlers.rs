use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dates::looks_like_date,
    dto::{
        ClearedResponse, CountResponse, CreatedAppointmentResponse, LookupResponse,
        MessageResponse, UpdatedResponse,
    },
    repo_types::Appointment,
    services,
};
use crate::{auth::AuthUser, error::AppResult, state::AppState, validation::JsonBody};

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            get(list_appointments)
                .post(create_appointment)
                .delete(clear_appointments),
        )
        .route("/appointments/count", get(count_appointments))
        .route(
            "/appointments/:key",
            get(lookup_appointments)
                .put(update_appointment)
                .delete(delete_appointment),
        )
}

#[instrument(skip(state))]
pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(services::get_all(state.appointments.as_ref(), &username).await?))
}

/// GET /appointments/:key where key is either an appointment id or a date.
#[instrument(skip(state))]
pub async fn lookup_appointments(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(key): Path<String>,
) -> AppResult<Json<LookupResponse>> {
    let store = state.appointments.as_ref();
    let response = if looks_like_date(&key) {
        LookupResponse::Many(
            services::get_by_date(store, &key, &username, state.config.calendar_offset).await?,
        )
    } else {
        LookupResponse::One(services::get_by_id(store, &key, &username).await?)
    };
    Ok(Json(response))
}

#[instrument(skip(state, body))]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<CreatedAppointmentResponse>)> {
    let appointment = services::create(
        state.appointments.as_ref(),
        &body,
        &username,
        state.config.calendar_offset,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedAppointmentResponse { appointment }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_appointment(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<UpdatedResponse>> {
    let response = services::update(
        state.appointments.as_ref(),
        &id,
        &body,
        &username,
        state.config.calendar_offset,
    )
    .await?;
    Ok(Json(UpdatedResponse { response, id }))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let response = services::remove(state.appointments.as_ref(), &id, &username).await?;
    Ok(Json(MessageResponse { response }))
}

#[instrument(skip(state))]
pub async fn clear_appointments(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> AppResult<Json<ClearedResponse>> {
    let removed = services::clear_all(state.appointments.as_ref(), &username).await?;
    Ok(Json(ClearedResponse {
        response: "all appointments removed".into(),
        removed,
    }))
}

#[instrument(skip(state))]
pub async fn count_appointments(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> AppResult<Json<CountResponse>> {
    let count = services::count(state.appointments.as_ref(), &username).await?;
    Ok(Json(CountResponse { count }))
}
