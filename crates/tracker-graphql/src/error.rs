//! Error types for the gateway.
//!
//! [`LifecycleError`] describes a failed initialization attempt.
//! [`GatewayError`] covers failures that happen around the pipeline on the
//! HTTP path and converts them into responses.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::classifier::{ErrorDetail, FailureKind, finalize};
use crate::response::QueryResponse;

/// Why an initialization attempt failed.
///
/// `Clone` so that every caller awaiting the same attempt gets the same error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LifecycleError {
    /// Schema construction failed.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// The carrier registry could not be initialized.
    #[error("Carrier registry initialization failed: {0}")]
    RegistryInitFailed(String),
}

/// Errors produced by the listener adapter outside of query execution.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing or mismatched API key.
    #[error("Invalid API key")]
    Unauthenticated,

    /// The transport payload could not be turned into a query request.
    #[error("{0}")]
    InvalidRequest(String),

    /// The gateway could not become ready for this request.
    #[error(transparent)]
    NotReady(#[from] LifecycleError),
}

impl GatewayError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the error code placed in `extensions.code`.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidRequest(_) => "BAD_REQUEST",
            Self::NotReady(_) => "INTERNAL",
        }
    }

    /// Response body for this error.
    ///
    /// Authentication failures sit outside the query error taxonomy; the
    /// other variants go through the classifier like any pipeline error.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let kind = match self {
            Self::Unauthenticated => {
                return json!({
                    "errors": [{
                        "message": self.to_string(),
                        "extensions": { "code": self.error_code() }
                    }]
                });
            }
            Self::InvalidRequest(_) => FailureKind::BadUserInput,
            Self::NotReady(_) => FailureKind::InternalServerError,
        };

        let response = QueryResponse::from_errors(vec![finalize(ErrorDetail::new(
            kind,
            self.to_string(),
        ))]);
        serde_json::to_value(&response).unwrap_or_else(|_| json!({ "errors": [] }))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_body();

        match self {
            Self::Unauthenticated => (
                status,
                [(header::WWW_AUTHENTICATE, "ApiKey")],
                Json(body),
            )
                .into_response(),
            _ => (status, Json(body)).into_response(),
        }
    }
}
