//! Carrier resolvers.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use tracing::debug;
use tracker_core::Carrier;

use super::gateway_context;

/// Resolver for carrier queries and `Carrier` fields.
pub struct CarrierResolver;

impl CarrierResolver {
    /// `Query.carriers`: all registered carriers.
    pub fn list(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let gateway_ctx = gateway_context(&ctx)?;
            let carriers = gateway_ctx.registry.carriers();
            debug!(
                request_id = %gateway_ctx.request_id,
                count = carriers.len(),
                "Resolving carrier list"
            );
            Ok(Some(FieldValue::list(
                carriers.into_iter().map(FieldValue::owned_any),
            )))
        })
    }

    /// `Query.carrier(id:)`: a single carrier, or null when unknown.
    pub fn by_id(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let id = ctx.args.try_get("id")?.string()?.to_string();
            let gateway_ctx = gateway_context(&ctx)?;
            debug!(request_id = %gateway_ctx.request_id, carrier_id = %id, "Resolving carrier");
            Ok(gateway_ctx.registry.get(&id).map(FieldValue::owned_any))
        })
    }

    pub fn id(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        Self::field(ctx, |carrier| carrier.id().to_string())
    }

    pub fn name(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        Self::field(ctx, |carrier| carrier.name().to_string())
    }

    pub fn display_name(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        Self::field(ctx, |carrier| carrier.display_name().to_string())
    }

    fn field(
        ctx: ResolverContext<'_>,
        read: fn(&Arc<dyn Carrier>) -> String,
    ) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let carrier = ctx.parent_value.try_downcast_ref::<Arc<dyn Carrier>>()?;
            Ok(Some(Value::String(read(carrier))))
        })
    }
}
