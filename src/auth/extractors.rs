use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::{dto::Credentials, services::authorize};
use crate::{error::AppError, state::AppState};

/// Verifies basic-auth credentials against the user store on every request
/// and yields the authenticated username.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Credentials { username, .. } = authorize(state.users.as_ref(), &parts.headers)
            .await
            .map_err(|e| {
                if e.is_auth_failure() {
                    warn!(error = %e, uri = %parts.uri, "authorization rejected");
                }
                e
            })?;
        Ok(AuthUser(username))
    }
}
