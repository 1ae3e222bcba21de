//! Response payload shared by both entry adapters.

use serde::Serialize;

use crate::classifier::ErrorClass;

/// Message returned when an operation would need incremental delivery.
pub const INCREMENTAL_UNSUPPORTED_MESSAGE: &str = "Incremental delivery not supported";

/// Source location of an error in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<async_graphql::Pos> for Location {
    fn from(pos: async_graphql::Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

/// One element of a response path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<async_graphql::PathSegment> for PathSegment {
    fn from(segment: async_graphql::PathSegment) -> Self {
        match segment {
            async_graphql::PathSegment::Field(name) => Self::Field(name),
            async_graphql::PathSegment::Index(index) => Self::Index(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorExtensions {
    pub code: ErrorClass,
}

/// A client-safe error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    pub extensions: ErrorExtensions,
}

/// Query response: `{ data?, errors? }`.
///
/// `data` is absent only when the request was rejected before execution, in
/// which case `errors` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ClassifiedError>,
}

impl QueryResponse {
    /// Response for a request rejected before execution.
    #[must_use]
    pub fn from_errors(errors: Vec<ClassifiedError>) -> Self {
        Self { data: None, errors }
    }

    /// Response for an operation whose result would be streamed.
    #[must_use]
    pub fn incremental_unsupported() -> Self {
        Self::from_errors(vec![ClassifiedError {
            message: INCREMENTAL_UNSUPPORTED_MESSAGE.to_string(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: ErrorExtensions {
                code: ErrorClass::Internal,
            },
        }])
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
