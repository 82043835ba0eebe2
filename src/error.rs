//! Error types for the Hostel Manager API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing request fields
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Registration id already taken
    #[error("User already exists")]
    DuplicateAccount,

    /// No bearer credential on the request
    #[error("Token is missing")]
    MissingCredential,

    /// Credential did not resolve to an account, or secret mismatch
    #[error("{0}")]
    InvalidCredential(&'static str),

    /// Referenced account/room/staff id absent
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller lacks the required role
    #[error("Admin access required")]
    Forbidden,

    /// Account awaiting administrator confirmation
    #[error("Account is waiting for administrator confirmation")]
    AwaitingApproval,

    /// Account suspended by an administrator
    #[error("Account is suspended")]
    Suspended,

    /// Account past its access expiry
    #[error("Account has expired")]
    Expired,

    /// Attempt to delete the bootstrap admin
    #[error("Cannot delete main admin")]
    Protected,

    /// Persistence failure
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Stored document could not be encoded
    #[error("data error: {0}")]
    Data(#[from] serde_json::Error),
}

impl ApiError {
    /// Machine-stable error kind for clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::DuplicateAccount => "duplicate_account",
            ApiError::MissingCredential => "missing_credential",
            ApiError::InvalidCredential(_) => "invalid_credential",
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden => "forbidden",
            ApiError::AwaitingApproval => "awaiting_approval",
            ApiError::Suspended => "suspended",
            ApiError::Expired => "expired",
            ApiError::Protected => "protected",
            ApiError::Storage(_) => "storage",
            ApiError::Data(_) => "data",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::DuplicateAccount => StatusCode::BAD_REQUEST,
            ApiError::MissingCredential | ApiError::InvalidCredential(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden
            | ApiError::AwaitingApproval
            | ApiError::Suspended
            | ApiError::Expired
            | ApiError::Protected => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Account-status gate outcomes echo the status so the client can
    /// render the matching screen.
    fn gate_status(&self) -> Option<&'static str> {
        match self {
            ApiError::AwaitingApproval => Some("pending"),
            ApiError::Suspended => Some("suspended"),
            ApiError::Expired => Some("expired"),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let Some(gate) = self.gate_status() {
            body["status"] = json!(gate);
        }
        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
