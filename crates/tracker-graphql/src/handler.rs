//! Axum HTTP handlers for the GraphQL endpoint.
//!
//! This module provides the listener adapter:
//! - `POST /graphql` - GraphQL request as a JSON body
//! - `GET /graphql` - GraphQL request via URL query parameters
//!
//! Both routes sit behind [`require_api_key`]. Execution results are always
//! returned with 200 OK; the classified errors are in the body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde::Deserialize;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::auth::require_api_key;
use crate::error::GatewayError;
use crate::lifecycle::Lifecycle;
use crate::pipeline::QueryRequest;

/// Header carrying the caller's request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Process-wide gateway initializer.
    pub lifecycle: Arc<Lifecycle>,

    /// Secret the `x-api-key` header is compared against.
    pub api_key: Arc<str>,
}

impl GatewayState {
    pub fn new(lifecycle: Arc<Lifecycle>, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            lifecycle,
            api_key: api_key.into(),
        }
    }
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// The GraphQL query string.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// Builds the authenticated `/graphql` router.
pub fn graphql_router(state: GatewayState) -> Router {
    Router::new()
        .route("/graphql", get(graphql_handler_get).post(graphql_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .with_state(state)
}

/// Handles POST requests to /graphql.
pub async fn graphql_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Rejecting malformed GraphQL request body");
            return GatewayError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    execute(state, &headers, request).await
}

/// Handles GET requests to /graphql.
pub async fn graphql_handler_get(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Response {
    let request = match params_to_request(params) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    execute(state, &headers, request).await
}

async fn execute(state: GatewayState, headers: &HeaderMap, request: QueryRequest) -> Response {
    let request_id = request_id(headers);
    let span = info_span!("graphql", request_id = %request_id);

    async move {
        let gateway = match state.lifecycle.ensure_ready().await {
            Ok(gateway) => gateway,
            Err(e) => return GatewayError::from(e).into_response(),
        };

        let response = gateway
            .execute(request, &request_id)
            .await
            .into_query_response();

        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(response),
        )
            .into_response()
    }
    .instrument(span)
    .await
}

/// Uses the caller's `x-request-id` if present, otherwise generates one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Converts GET query params to a query request.
fn params_to_request(params: QueryParams) -> Result<QueryRequest, GatewayError> {
    let query = params
        .query
        .ok_or_else(|| GatewayError::InvalidRequest("Missing query parameter".into()))?;

    let variables = match params.variables {
        Some(vars_str) => Some(serde_json::from_str(&vars_str).map_err(|e| {
            GatewayError::InvalidRequest(format!("Invalid variables parameter: {e}"))
        })?),
        None => None,
    };

    Ok(QueryRequest {
        query,
        variables,
        operation_name: params.operation_name,
    })
}
