use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;
use tracker_graphql::{Lifecycle, ReadinessState};

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Delivery Tracker API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz(State(lifecycle): State<Arc<Lifecycle>>) -> impl IntoResponse {
    match lifecycle.state() {
        ReadinessState::Ready => (StatusCode::OK, Json(HealthResponse { status: "ready" })),
        ReadinessState::Initializing => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "initializing",
            }),
        ),
        ReadinessState::Uninitialized => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "uninitialized",
            }),
        ),
    }
}
