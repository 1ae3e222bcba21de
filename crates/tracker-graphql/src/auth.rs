//! API key authentication for the listener adapter.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::credential::{API_KEY_HEADER, validate_api_key};
use crate::error::GatewayError;
use crate::handler::GatewayState;

/// Authentication middleware that checks the `x-api-key` header.
///
/// Requests with a missing or mismatched key are rejected with
/// 401 Unauthorized before the gateway is touched.
pub async fn require_api_key(
    State(state): State<GatewayState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if !validate_api_key(presented, &state.api_key) {
        tracing::debug!(
            path = %req.uri().path(),
            present = presented.is_some(),
            "Rejecting request with invalid API key"
        );
        return GatewayError::Unauthenticated.into_response();
    }

    next.run(req).await
}
