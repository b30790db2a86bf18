use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

// Messages reused across the workflow and repository layers. Centralized so
// the tests can assert against the exact wording the API emits.
pub const PLACE_NOT_FOUND: &str = "Place not found in our database";
pub const DUPLICATE_PLACE: &str = "City in this state already included in our database";
pub const USER_NOT_FOUND: &str = "User not found!";
pub const DUPLICATE_USERNAME: &str = "Username already in use!";

/// ApiError
///
/// The failure taxonomy shared by every workflow operation. Each variant maps
/// to exactly one HTTP status; anything the taxonomy does not name (store
/// connectivity, hashing failures) surfaces as a 500.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested place or user does not exist. Maps to 404.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness invariant was violated (place triple or username). Maps
    /// to 400, not 409; the API contract treats duplicates as bad requests.
    #[error("{0}")]
    Conflict(String),
    /// Login failure or a missing/invalid/expired token. Maps to 401. The
    /// message is deliberately uniform so callers cannot distinguish unknown
    /// usernames from wrong passwords.
    #[error("Invalid credentials")]
    Unauthorized,
    /// An authenticated caller without the ADMIN role hit an admin operation.
    #[error("Access denied")]
    Forbidden,
    /// The relational store failed. Propagates as a generic fault.
    #[error("database failure")]
    Database(#[from] sqlx::Error),
    /// Password hashing failed. Propagates as a generic fault.
    #[error("password hashing failure: {0}")]
    Hashing(String),
    /// Token signing failed. Propagates as a generic fault.
    #[error("token issuance failure: {0}")]
    Token(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Attaches the request path, producing the response the HTTP surface
    /// returns for this failure.
    pub fn at(self, path: &str) -> ErrorResponse {
        ErrorResponse::new(self, path)
    }
}

/// StandardError
///
/// The JSON body carried by every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StandardError {
    pub timestamp: DateTime<Utc>,
    /// Numeric HTTP status, duplicated in the body for log scrapers.
    pub status: u16,
    pub message: String,
    /// The request path that produced the failure.
    pub path: String,
}

/// ErrorResponse
///
/// An `ApiError` bound to the request path it occurred on. This is the
/// rejection type handlers and extractors return; converting to a response
/// renders the `StandardError` body with the matching status code.
#[derive(Debug)]
pub struct ErrorResponse {
    status: StatusCode,
    body: StandardError,
}

impl ErrorResponse {
    pub fn new(error: ApiError, path: &str) -> Self {
        let status = error.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal faults are logged with their cause; the response body
            // stays generic.
            tracing::error!(path, error = %error, "request failed");
        }
        Self {
            status,
            body: StandardError {
                timestamp: Utc::now(),
                status: status.as_u16(),
                message: error.to_string(),
                path: path.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
