use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{PublicUser, RegisterResponse, ValidResponse},
        services::{authorize, register},
    },
    error::AppResult,
    state::AppState,
    validation::JsonBody,
};

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/accounts", get(check_login).post(create_account))
}

#[instrument(skip(state, body))]
pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user = register(state.users.as_ref(), &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: PublicUser {
                username: user.username,
            },
        }),
    ))
}

/// Reports whether the supplied basic-auth credentials are valid.
#[instrument(skip(state, headers))]
pub async fn check_login(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match authorize(state.users.as_ref(), &headers).await {
        Ok(creds) => {
            info!(username = %creds.username, "login check passed");
            Json(ValidResponse {
                valid: true,
                error: None,
            })
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "login check failed");
            (
                e.status(),
                Json(ValidResponse {
                    valid: false,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
