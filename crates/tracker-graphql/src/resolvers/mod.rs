//! GraphQL resolvers for carriers and shipments.
//!
//! - `carrier`: carrier listing and lookup (`carriers`, `carrier(id:)`)
//! - `shipment`: shipment tracking (`shipment(carrierId:, trackingNumber:)`)

mod carrier;
mod shipment;

pub use carrier::CarrierResolver;
pub use shipment::ShipmentResolver;

use async_graphql::dynamic::ResolverContext;
use async_graphql::{Error as GraphQLError, ErrorExtensions};
use tracker_core::TrackError;

use crate::context::GatewayContext;

/// Helper to extract the gateway context from resolver context.
pub(crate) fn gateway_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GatewayContext, GraphQLError> {
    ctx.data::<GatewayContext>()
        .map_err(|_| GraphQLError::new("Gateway context not available"))
}

/// Converts a domain error into a resolver error.
///
/// Errors with a client-facing code carry it in `extensions.code`; all other
/// errors keep the `TrackError` as their source so it can be logged.
pub(crate) fn track_error(err: TrackError) -> GraphQLError {
    match err.code() {
        Some(code) => {
            GraphQLError::new(err.to_string()).extend_with(|_, ext| ext.set("code", code.to_string()))
        }
        None => GraphQLError::new_with_source(err),
    }
}
