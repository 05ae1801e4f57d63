pub mod calendar;
pub mod meta;
pub mod navigation;

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

const GENERIC_ERROR: &str = "Something went wrong!";

/// Errors returned by handlers, mapped to JSON responses
pub enum AppError {
    NotFound(&'static str),
    /// Request that could not be parsed; the detail is returned to the client
    BadRequest(String),
    /// Failure whose detail is included in the response body
    Exposed {
        error: &'static str,
        source: anyhow::Error,
    },
    /// Failure whose detail is only logged
    Internal(anyhow::Error),
}

impl AppError {
    pub fn exposed(error: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Exposed {
            error,
            source: source.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(error) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error.to_string(),
                    message: None,
                },
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid request".to_string(),
                    message: Some(message),
                },
            ),
            AppError::Exposed { error, source } => {
                tracing::error!(error = %source, "{}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error.to_string(),
                        message: Some(source.to_string()),
                    },
                )
            }
            AppError::Internal(source) => {
                tracing::error!(error = ?source, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: GENERIC_ERROR.to_string(),
                        message: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found")
}

/// Response for a panicking handler; the panic message is only logged.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
