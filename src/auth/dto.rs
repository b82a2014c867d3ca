use serde::Serialize;
use serde_json::Value;

use crate::{error::AppError, validation::string_field};

/// Request body for registration, parsed from raw JSON so non-string
/// fields surface as `InvalidInput` instead of an extractor rejection.
#[derive(Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<&Value> for RegisterRequest {
    type Error = AppError;

    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        match (string_field(body, "username"), string_field(body, "password")) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(AppError::invalid_input("username/password are not strings")),
        }
    }
}

/// Basic-auth credentials that passed verification.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct ValidResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
