//! Application error taxonomy and its HTTP rendering.
//!
//! Client-facing bodies are always `{"error": "<message>"}`. Store and
//! internal failures are logged with full detail and surfaced only as
//! `"Internal server error"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::repositories::StoreError;

pub const MSG_URL_REQUIRED: &str = "URL is required";
pub const MSG_INVALID_JSON: &str = "Invalid JSON in request body";
pub const MSG_CODE_EXHAUSTED: &str = "Unable to generate unique short code";
pub const MSG_INTERNAL: &str = "Internal server error";

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing, null, non-string or empty `url`.
    #[error("URL is required")]
    MissingUrl,

    #[error("invalid JSON in request body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Every creation attempt hit an existing code.
    #[error("no unique short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::CodeSpaceExhausted { .. } | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to callers. Never includes store internals.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingUrl => MSG_URL_REQUIRED,
            Self::InvalidJson(_) => MSG_INVALID_JSON,
            Self::CodeSpaceExhausted { .. } => MSG_CODE_EXHAUSTED,
            Self::Store(_) | Self::Internal(_) => MSG_INTERNAL,
        }
    }

    /// Returns true for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingUrl | AppError::InvalidJson(_) => {
                tracing::debug!(error = %self, "Rejected request");
            }
            AppError::CodeSpaceExhausted { attempts } => {
                tracing::error!(attempts, "Short code space exhausted");
            }
            AppError::Store(e) => {
                tracing::error!(error = ?e, "Store failure");
            }
            AppError::Internal(message) => {
                tracing::error!(%message, "Internal error");
            }
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(AppError::MissingUrl.status_code(), StatusCode::BAD_REQUEST);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::InvalidJson(json_err);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Invalid JSON in request body");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_exhaustion_is_distinct_server_error() {
        let err = AppError::CodeSpaceExhausted { attempts: 3 };

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Unable to generate unique short code");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_store_errors_do_not_leak_details() {
        let err = AppError::from(StoreError::Unavailable("connection refused 10.0.0.7".into()));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.to_string().contains("10.0.0.7"));
    }
}
