use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64ct::{Base64, Encoding};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    auth::{
        dto::{Credentials, RegisterRequest},
        password::{hash_password, verify_password},
        repo::UserStore,
        repo_types::User,
    },
    error::{AppError, AppResult},
};

/// Validates the payload, hashes the password and stores the user.
///
/// The lookup skips hashing for the common duplicate case; the store's
/// uniqueness check decides concurrent registrations of one name.
pub async fn register(users: &dyn UserStore, body: &Value) -> AppResult<User> {
    let RegisterRequest { username, password } = RegisterRequest::try_from(body)?;

    if users.find_by_username(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::UsernameTaken(username));
    }

    let hash = hash_password(&password)?;
    let Some(user) = users.insert(&username, &hash).await? else {
        warn!(%username, "username registered concurrently");
        return Err(AppError::UsernameTaken(username));
    };
    info!(username = %user.username, "user registered");
    Ok(user)
}

pub async fn find_user(users: &dyn UserStore, username: &str) -> AppResult<User> {
    users
        .find_by_username(username)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Pulls username/password out of an `Authorization: Basic ...` header.
pub fn basic_credentials(headers: &HeaderMap) -> AppResult<Credentials> {
    // Past this point the header exists; anything unusable is missing credentials.
    let raw = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AppError::MissingCredentials)?;

    let (scheme, encoded) = raw
        .trim()
        .split_once(' ')
        .ok_or(AppError::MissingCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AppError::MissingCredentials);
    }

    let decoded = Base64::decode_vec(encoded.trim()).map_err(|_| AppError::MissingCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::MissingCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AppError::MissingCredentials)?;
    if username.is_empty() || password.is_empty() {
        return Err(AppError::MissingCredentials);
    }

    Ok(Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

/// Runs the full check for one request: header, user lookup, password.
pub async fn authorize(users: &dyn UserStore, headers: &HeaderMap) -> AppResult<Credentials> {
    let credentials = basic_credentials(headers)?;
    let user = find_user(users, &credentials.username).await?;

    if !verify_password(&credentials.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    debug!(username = %credentials.username, "request authorized");
    Ok(credentials)
}

#[cfg(test)]
pub(crate) fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", Base64::encode_string(format!("{username}:{password}").as_bytes()))
}
