//! Query execution pipeline.
//!
//! A request goes through three stages, each of which can end it early:
//!
//! 1. Parse the document. Syntax errors are returned as `BAD_REQUEST`.
//! 2. Validate against the schema. Every validation failure is returned as
//!    `BAD_REQUEST`; nothing is executed.
//! 3. Execute with the request's variables, operation name and context.
//!    Partial data is kept and every field error goes through
//!    [`finalize`](crate::classifier::finalize).
//!
//! Stages 2 and 3 run inside the engine. A response without data whose
//! errors carry no field path was rejected before any resolver ran. A valid
//! subscription passes stage 2 and is then refused by the engine without
//! resolving anything; it comes back as [`ExecutionOutcome::Incremental`].

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response, ServerError, Variables};
use async_graphql_parser::parse_query;
use async_graphql_parser::types::{DocumentOperations, ExecutableDocument, OperationType};
use serde::Deserialize;
use tracing::debug;
use tracker_core::TrackError;

use crate::classifier::{ErrorDetail, FailureKind, finalize};
use crate::context::GatewayContext;
use crate::response::QueryResponse;

/// Message the engine answers a validated subscription with on `execute`.
const STREAM_REFUSED: &str = "Subscriptions are not supported on this transport.";

/// Query request payload: `{ query, variables?, operationName? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional variables for the query.
    #[serde(default)]
    pub variables: Option<serde_json::Value>,

    /// Optional operation name for multi-operation documents.
    #[serde(default, rename = "operationName")]
    pub operation_name: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    #[must_use]
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }

    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// What running a request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// A single, complete response.
    Complete(QueryResponse),

    /// The selected operation needs a result stream (subscriptions).
    Incremental,
}

impl ExecutionOutcome {
    /// Collapses the outcome into one response, rejecting streamed results.
    #[must_use]
    pub fn into_query_response(self) -> QueryResponse {
        match self {
            Self::Complete(response) => response,
            Self::Incremental => {
                debug!("Rejecting operation that requires incremental delivery");
                QueryResponse::incremental_unsupported()
            }
        }
    }
}

/// Parses, validates and executes query requests against one schema.
#[derive(Clone)]
pub struct ExecutionPipeline {
    schema: Schema,
}

impl ExecutionPipeline {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Runs one request.
    pub async fn run(&self, request: QueryRequest, context: GatewayContext) -> ExecutionOutcome {
        let document = match parse_query(&request.query) {
            Ok(document) => document,
            Err(err) => {
                debug!(request_id = %context.request_id, "Query document failed to parse");
                let detail = ErrorDetail::new(FailureKind::ParseFailed, err.to_string());
                return ExecutionOutcome::Complete(QueryResponse::from_errors(vec![finalize(
                    detail,
                )]));
            }
        };

        let subscription = selects_subscription(&document, request.operation_name.as_deref());
        let request_id = context.request_id.clone();
        let mut gql_request = Request::new(request.query);

        if let Some(op_name) = request.operation_name {
            gql_request = gql_request.operation_name(op_name);
        }

        if let Some(vars) = request.variables {
            gql_request = gql_request.variables(Variables::from_json(vars));
        }

        gql_request = gql_request.data(context);

        debug!(request_id = %request_id, "Executing GraphQL query");
        let response = self.schema.execute(gql_request).await;

        // The engine validates first and only refuses valid subscriptions.
        if subscription && refused_stream(&response) {
            return ExecutionOutcome::Incremental;
        }

        ExecutionOutcome::Complete(collect(response))
    }
}

/// Checks whether the operation that will run is a subscription.
fn selects_subscription(document: &ExecutableDocument, operation_name: Option<&str>) -> bool {
    let ty = match (&document.operations, operation_name) {
        (DocumentOperations::Single(op), _) => Some(op.node.ty),
        (DocumentOperations::Multiple(ops), Some(name)) => ops
            .iter()
            .find(|(op_name, _)| op_name.as_str() == name)
            .map(|(_, op)| op.node.ty),
        // Ambiguous; the engine reports it.
        (DocumentOperations::Multiple(_), None) => None,
    };
    ty == Some(OperationType::Subscription)
}

fn refused_stream(response: &Response) -> bool {
    matches!(
        response.errors.as_slice(),
        [err] if err.message == STREAM_REFUSED && err.path.is_empty()
    )
}

/// Converts an engine response into a classified one.
fn collect(response: Response) -> QueryResponse {
    let data = serde_json::to_value(&response.data).unwrap_or(serde_json::Value::Null);

    let rejected = data.is_null()
        && !response.errors.is_empty()
        && response.errors.iter().all(|e| e.path.is_empty());

    if rejected {
        let errors = response
            .errors
            .into_iter()
            .map(|e| finalize(rejection_detail(e)))
            .collect();
        return QueryResponse::from_errors(errors);
    }

    let errors = response
        .errors
        .into_iter()
        .map(|e| finalize(execution_detail(e)))
        .collect();

    QueryResponse {
        data: Some(data),
        errors,
    }
}

/// Describes an error raised before execution started.
///
/// These are always the caller's fault, whatever code they carry.
fn rejection_detail(err: ServerError) -> ErrorDetail {
    let kind = if err.message.starts_with("Unknown operation")
        || err.message.starts_with("Operation name required")
    {
        FailureKind::OperationResolutionFailure
    } else {
        FailureKind::ValidationFailed
    };

    ErrorDetail::new(kind, err.message)
        .with_locations(err.locations.into_iter().map(Into::into).collect())
}

/// Describes an error raised while resolving fields.
fn execution_detail(err: ServerError) -> ErrorDetail {
    let kind = FailureKind::from_code(error_code(&err));
    let cause = err.source::<TrackError>().map(|source| format!("{source:?}"));

    let mut detail = ErrorDetail::new(kind, err.message)
        .with_locations(err.locations.into_iter().map(Into::into).collect())
        .with_path(err.path.into_iter().map(Into::into).collect());
    if let Some(cause) = cause {
        detail = detail.with_cause(cause);
    }
    detail
}

fn error_code(err: &ServerError) -> Option<&str> {
    match err.extensions.as_ref()?.get("code")? {
        async_graphql::Value::String(code) => Some(code.as_str()),
        _ => None,
    }
}
