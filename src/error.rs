//! Error Taxonomy
//!
//! Every fallible operation in the crate returns a tagged [`Error`] value.
//! Validation and not-found conditions are detected close to the API boundary
//! and mapped to specific HTTP statuses. Upstream capability failures and
//! malformed AI output are caught only at the outermost pipeline operation
//! and collapsed into a generic internal error: the caller cannot tell
//! "PDF unreadable" from "AI provider down", and no operation is retried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad input shape: malformed source URL, invalid email, difficulty
    /// out of range.
    #[error("{0}")]
    Validation(String),

    /// Request is well-formed but conflicts with existing state
    /// (e.g. email already registered).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid bearer credential.
    #[error("unauthorized")]
    Unauthorized,

    /// Entity absent, or present but owned by another user. The two cases
    /// are indistinguishable to the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An AI or storage provider call failed.
    #[error("upstream capability failure: {0}")]
    Upstream(String),

    /// The AI provider answered, but not in the expected structured shape.
    #[error("malformed generation output: {0}")]
    MalformedGeneration(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            Error::NotFound(kind) => (StatusCode::NOT_FOUND, format!("{} not found", kind)),
            // Collapsed: the specific cause is logged, never surfaced.
            Error::Upstream(_) | Error::MalformedGeneration(_) => {
                tracing::error!("internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream(err.to_string())
    }
}
