//! GraphQL execution context.
//!
//! A [`GatewayContext`] is created fresh for every request and handed to the
//! resolvers through the async-graphql context system. It is a cheap handle
//! over the process-wide, already-initialized carrier registry.

use std::sync::Arc;

use tracker_core::{Carrier, DynCarrierRegistry, TrackError};

/// Per-request execution context.
#[derive(Clone)]
pub struct GatewayContext {
    /// Carrier registry shared by all requests.
    pub registry: DynCarrierRegistry,

    /// Request ID for tracing and correlation.
    pub request_id: String,
}

impl GatewayContext {
    pub fn new(registry: DynCarrierRegistry, request_id: impl Into<String>) -> Self {
        Self {
            registry,
            request_id: request_id.into(),
        }
    }

    /// Looks up a carrier, failing with a `NOT_FOUND` domain error.
    pub fn carrier(&self, carrier_id: &str) -> Result<Arc<dyn Carrier>, TrackError> {
        self.registry
            .get(carrier_id)
            .ok_or_else(|| TrackError::not_found(format!("Carrier {carrier_id} not found")))
    }
}
