use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::enrichment::GatewayError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authorization header missing")]
    MissingAuthHeader,

    #[error("missing username/password")]
    MissingCredentials,

    #[error("user does not exist")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidInput(String),

    #[error("username {0:?} is already registered")]
    UsernameTaken(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NoneFound(String),

    #[error("{0}")]
    UpstreamNotFound(String),

    #[error("{0}")]
    UpstreamInvalidArgument(String),

    #[error("{0}")]
    Upstream(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn appointment_not_found() -> Self {
        AppError::NotFound("no appointment found".into())
    }

    /// Stable identifier rendered next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingAuthHeader => "missing_auth_header",
            AppError::MissingCredentials => "missing_credentials",
            AppError::UserNotFound => "user_not_found",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::UsernameTaken(_) => "username_taken",
            AppError::NotFound(_) => "not_found",
            AppError::NoneFound(_) => "none_found",
            AppError::UpstreamNotFound(_) => "upstream_not_found",
            AppError::UpstreamInvalidArgument(_) => "upstream_invalid_argument",
            AppError::Upstream(_) => "upstream_error",
            AppError::Storage(_) => "storage_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::MissingAuthHeader
                | AppError::MissingCredentials
                | AppError::UserNotFound
                | AppError::InvalidCredentials
        )
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(msg) => AppError::UpstreamNotFound(msg),
            GatewayError::InvalidArgument(msg) => AppError::UpstreamInvalidArgument(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Storage(e) => {
                error!(error = %format!("{e:#}"), "storage failure");
                "a storage error occurred".to_string()
            }
            AppError::Upstream(msg) => {
                warn!(error = %msg, "upstream failure");
                msg.clone()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: message,
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
