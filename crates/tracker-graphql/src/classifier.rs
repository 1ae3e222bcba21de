//! Client-facing error classification.
//!
//! Every failure the execution pipeline can produce is first described as a
//! [`FailureKind`] and then collapsed into one of three [`ErrorClass`]es.
//! [`finalize`] is the only place where an error leaves the gateway: errors
//! classified `INTERNAL` have their message replaced and their detail logged.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::response::{ClassifiedError, ErrorExtensions, Location, PathSegment};

/// Message returned in place of any internal error detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// Error class exposed to clients in `extensions.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    Internal,
    BadRequest,
    NotFound,
}

impl ErrorClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every kind of failure the engine or the resolvers can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The query document is not syntactically valid.
    ParseFailed,
    /// The document does not validate against the schema.
    ValidationFailed,
    /// The requested operation name is unknown or ambiguous.
    OperationResolutionFailure,
    /// Client input was recognized as malformed.
    BadUserInput,
    PersistedQueryNotFound,
    PersistedQueryNotSupported,
    /// A resolver raised an error that already carries a client-facing class.
    Classified(ErrorClass),
    /// The engine failed internally, or a resolver raised an uncoded error.
    InternalServerError,
    /// A code this gateway does not know about.
    Unrecognized(String),
}

impl FailureKind {
    /// Interprets a raw `extensions.code` value.
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code else {
            return Self::InternalServerError;
        };

        match code {
            "INTERNAL" => Self::Classified(ErrorClass::Internal),
            "BAD_REQUEST" => Self::Classified(ErrorClass::BadRequest),
            "NOT_FOUND" => Self::Classified(ErrorClass::NotFound),
            "GRAPHQL_PARSE_FAILED" => Self::ParseFailed,
            "GRAPHQL_VALIDATION_FAILED" => Self::ValidationFailed,
            "OPERATION_RESOLUTION_FAILURE" => Self::OperationResolutionFailure,
            "BAD_USER_INPUT" => Self::BadUserInput,
            "PERSISTED_QUERY_NOT_FOUND" => Self::PersistedQueryNotFound,
            "PERSISTED_QUERY_NOT_SUPPORTED" => Self::PersistedQueryNotSupported,
            "INTERNAL_SERVER_ERROR" => Self::InternalServerError,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Raw code of this failure, as it would appear before classification.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::ParseFailed => "GRAPHQL_PARSE_FAILED",
            Self::ValidationFailed => "GRAPHQL_VALIDATION_FAILED",
            Self::OperationResolutionFailure => "OPERATION_RESOLUTION_FAILURE",
            Self::BadUserInput => "BAD_USER_INPUT",
            Self::PersistedQueryNotFound => "PERSISTED_QUERY_NOT_FOUND",
            Self::PersistedQueryNotSupported => "PERSISTED_QUERY_NOT_SUPPORTED",
            Self::Classified(class) => class.as_str(),
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::Unrecognized(code) => code,
        }
    }

    /// Client-facing class of this failure.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Classified(class) => *class,
            Self::ParseFailed
            | Self::ValidationFailed
            | Self::OperationResolutionFailure
            | Self::BadUserInput
            | Self::PersistedQueryNotFound
            | Self::PersistedQueryNotSupported => ErrorClass::BadRequest,
            Self::InternalServerError | Self::Unrecognized(_) => ErrorClass::Internal,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classifies a raw error code.
#[must_use]
pub fn classify(code: Option<&str>) -> ErrorClass {
    FailureKind::from_code(code).class()
}

/// An error as produced by the pipeline, before it is made client-safe.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub kind: FailureKind,
    pub message: String,
    pub locations: Vec<Location>,
    pub path: Vec<PathSegment>,
    /// Description of the underlying cause, logged but never returned.
    pub cause: Option<String>,
}

impl ErrorDetail {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            cause: None,
        }
    }

    #[must_use]
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Turns an error into its client-facing form.
///
/// `INTERNAL` errors are logged once with their original message, code and
/// cause, and returned with [`INTERNAL_ERROR_MESSAGE`]. Other classes pass
/// through unchanged and are not logged.
pub fn finalize(detail: ErrorDetail) -> ClassifiedError {
    let class = detail.kind.class();

    let message = if class == ErrorClass::Internal {
        error!(
            code = %detail.kind,
            original_message = %detail.message,
            path = ?detail.path,
            cause = ?detail.cause,
            "internal error response"
        );
        INTERNAL_ERROR_MESSAGE.to_string()
    } else {
        detail.message
    };

    ClassifiedError {
        message,
        locations: detail.locations,
        path: detail.path,
        extensions: ErrorExtensions { code: class },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let bad_request = [
            "BAD_REQUEST",
            "GRAPHQL_PARSE_FAILED",
            "GRAPHQL_VALIDATION_FAILED",
            "OPERATION_RESOLUTION_FAILURE",
            "BAD_USER_INPUT",
            "PERSISTED_QUERY_NOT_FOUND",
            "PERSISTED_QUERY_NOT_SUPPORTED",
        ];
        for code in bad_request {
            assert_eq!(classify(Some(code)), ErrorClass::BadRequest, "{code}");
        }
        assert_eq!(classify(Some("NOT_FOUND")), ErrorClass::NotFound);
        assert_eq!(classify(Some("INTERNAL")), ErrorClass::Internal);
        assert_eq!(classify(Some("INTERNAL_SERVER_ERROR")), ErrorClass::Internal);
    }

    #[test]
    fn test_unknown_codes_are_internal() {
        for code in [
            "",
            "UNAUTHENTICATED",
            "FORBIDDEN",
            "not_found",
            "Bad_Request",
            "BAD_REQUEST ",
            "DOWNSTREAM_SERVICE_ERROR",
            "코드",
        ] {
            assert_eq!(classify(Some(code)), ErrorClass::Internal, "{code:?}");
        }
        assert_eq!(classify(None), ErrorClass::Internal);
    }

    #[test]
    fn test_code_round_trips_through_from_code() {
        let kinds = [
            FailureKind::ParseFailed,
            FailureKind::ValidationFailed,
            FailureKind::OperationResolutionFailure,
            FailureKind::BadUserInput,
            FailureKind::PersistedQueryNotFound,
            FailureKind::PersistedQueryNotSupported,
            FailureKind::Classified(ErrorClass::NotFound),
            FailureKind::InternalServerError,
            FailureKind::Unrecognized("TEAPOT".into()),
        ];
        for kind in kinds {
            assert_eq!(FailureKind::from_code(Some(kind.code())), kind);
        }
    }

    #[test]
    fn test_finalize_redacts_internal_errors() {
        let secret = "connection refused: 10.0.3.7:5432 password=hunter2";
        let detail = ErrorDetail::new(FailureKind::InternalServerError, secret)
            .with_path(vec![PathSegment::Field("shipment".into())])
            .with_cause("io error");

        let finalized = finalize(detail);
        assert_eq!(finalized.message, INTERNAL_ERROR_MESSAGE);
        assert!(!finalized.message.contains("hunter2"));
        assert_eq!(finalized.extensions.code, ErrorClass::Internal);
        assert_eq!(finalized.path, vec![PathSegment::Field("shipment".into())]);
    }

    #[test]
    fn test_finalize_redacts_unrecognized_codes() {
        let detail = ErrorDetail::new(FailureKind::Unrecognized("TEAPOT".into()), "short and stout");
        let finalized = finalize(detail);
        assert_eq!(finalized.message, INTERNAL_ERROR_MESSAGE);
        assert_eq!(finalized.extensions.code, ErrorClass::Internal);
    }

    #[test]
    fn test_finalize_passes_client_errors_through() {
        let location = Location { line: 1, column: 3 };
        let detail = ErrorDetail::new(FailureKind::ValidationFailed, "Unknown field \"foo\"")
            .with_locations(vec![location]);
        let finalized = finalize(detail);
        assert_eq!(finalized.message, "Unknown field \"foo\"");
        assert_eq!(finalized.locations, vec![location]);
        assert_eq!(finalized.extensions.code, ErrorClass::BadRequest);

        let detail = ErrorDetail::new(
            FailureKind::Classified(ErrorClass::NotFound),
            "Shipment 42 not found",
        );
        let finalized = finalize(detail);
        assert_eq!(finalized.message, "Shipment 42 not found");
        assert_eq!(finalized.extensions.code, ErrorClass::NotFound);
    }

    #[test]
    fn test_error_class_wire_names() {
        assert_eq!(
            serde_json::to_value(ErrorClass::BadRequest).unwrap(),
            serde_json::json!("BAD_REQUEST")
        );
        assert_eq!(
            serde_json::to_value(ErrorClass::NotFound).unwrap(),
            serde_json::json!("NOT_FOUND")
        );
        assert_eq!(ErrorClass::Internal.to_string(), "INTERNAL");
    }
}
