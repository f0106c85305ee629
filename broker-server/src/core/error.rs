//! Unified error handling
//!
//! Request-path failures surface as HTTP 500 with a plain-text description.
//! Print failures are NOT errors at this level: the print endpoints fold
//! them into a `{Success, Message}` body with status 200, because the HTTP
//! transaction itself succeeded.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use broker_printer::OsCode;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Listener port unavailable at startup
    #[error("failed to bind 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or missing required field in a request body
    #[error("invalid request body: {0}")]
    Parse(String),

    /// Invalid base64 payload
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// OS printer enumeration rejected the call
    #[error("printer enumeration failed: os error {0}")]
    Enumerate(OsCode),

    /// Any other fault while processing a request
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for broker operations and handlers
pub type ServiceResult<T> = Result<T, ServiceError>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
