//! Shipment tracking resolvers.
//!
//! Implements `Query.shipment(carrierId:, trackingNumber:)`,
//! `Subscription.shipmentEvents` and the fields of the `Shipment` and
//! `TrackEvent` types.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext, SubscriptionFieldFuture};
use async_graphql::{Error as GraphQLError, Value};
use futures_util::stream;
use time::format_description::well_known::Rfc3339;
use tracing::debug;
use tracker_core::{TrackEvent, TrackInfo};

use super::{gateway_context, track_error};

/// Resolver for shipment tracking.
pub struct ShipmentResolver;

impl ShipmentResolver {
    /// `Query.shipment`: looks the shipment up with its carrier.
    ///
    /// Unknown carriers and tracking numbers surface as `NOT_FOUND` errors.
    pub fn track(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let carrier_id = ctx.args.try_get("carrierId")?.string()?.to_string();
            let tracking_number = ctx.args.try_get("trackingNumber")?.string()?.to_string();
            let gateway_ctx = gateway_context(&ctx)?;

            debug!(
                request_id = %gateway_ctx.request_id,
                carrier_id = %carrier_id,
                "Resolving shipment"
            );

            let carrier = gateway_ctx.carrier(&carrier_id).map_err(track_error)?;
            let info = carrier.track(&tracking_number).await.map_err(track_error)?;

            Ok(Some(FieldValue::owned_any(info)))
        })
    }

    /// `Subscription.shipmentEvents`: streams the shipment's events oldest
    /// first, then ends.
    pub fn watch(ctx: ResolverContext<'_>) -> SubscriptionFieldFuture<'_> {
        SubscriptionFieldFuture::new(async move {
            let carrier_id = ctx.args.try_get("carrierId")?.string()?.to_string();
            let tracking_number = ctx.args.try_get("trackingNumber")?.string()?.to_string();
            let gateway_ctx = gateway_context(&ctx)?;

            debug!(
                request_id = %gateway_ctx.request_id,
                carrier_id = %carrier_id,
                "Starting shipmentEvents subscription"
            );

            let carrier = gateway_ctx.carrier(&carrier_id).map_err(track_error)?;
            let info = carrier.track(&tracking_number).await.map_err(track_error)?;

            Ok(stream::iter(info.events.into_iter().map(|event| {
                Ok::<_, GraphQLError>(FieldValue::owned_any(event))
            })))
        })
    }

    pub fn carrier_id(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let info = ctx.parent_value.try_downcast_ref::<TrackInfo>()?;
            Ok(Some(Value::String(info.carrier_id.clone())))
        })
    }

    pub fn tracking_number(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let info = ctx.parent_value.try_downcast_ref::<TrackInfo>()?;
            Ok(Some(Value::String(info.tracking_number.clone())))
        })
    }

    pub fn last_event(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let info = ctx.parent_value.try_downcast_ref::<TrackInfo>()?;
            Ok(info.last_event().cloned().map(FieldValue::owned_any))
        })
    }

    pub fn events(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let info = ctx.parent_value.try_downcast_ref::<TrackInfo>()?;
            Ok(Some(FieldValue::list(
                info.events.iter().cloned().map(FieldValue::owned_any),
            )))
        })
    }

    pub fn event_time(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let event = ctx.parent_value.try_downcast_ref::<TrackEvent>()?;
            Ok(event
                .time
                .and_then(|t| t.format(&Rfc3339).ok())
                .map(Value::String))
        })
    }

    pub fn event_status(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let event = ctx.parent_value.try_downcast_ref::<TrackEvent>()?;
            Ok(Some(Value::String(event.status.as_str().to_string())))
        })
    }

    pub fn event_description(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let event = ctx.parent_value.try_downcast_ref::<TrackEvent>()?;
            Ok(event.description.clone().map(Value::String))
        })
    }

    pub fn event_location(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
        FieldFuture::new(async move {
            let event = ctx.parent_value.try_downcast_ref::<TrackEvent>()?;
            Ok(event.location.clone().map(Value::String))
        })
    }
}
