//! Delivery tracker GraphQL schema builder.
//!
//! This module provides `TrackerSchemaBuilder`, which assembles the schema
//! with async-graphql's dynamic schema API:
//!
//! ```graphql
//! type Query {
//!   carriers: [Carrier!]!
//!   carrier(id: ID!): Carrier
//!   shipment(carrierId: ID!, trackingNumber: String!): Shipment
//! }
//!
//! type Subscription {
//!   shipmentEvents(carrierId: ID!, trackingNumber: String!): TrackEvent!
//! }
//! ```
//!
//! Both request adapters answer one response per request, so subscriptions
//! are validated but never resolved by them.

use async_graphql::dynamic::{
    Field, InputValue, Object, Schema, Subscription, SubscriptionField, TypeRef,
};
use tracing::debug;

use crate::config::{DEFAULT_MAX_COMPLEXITY, DEFAULT_MAX_DEPTH};
use crate::error::LifecycleError;
use crate::resolvers::{CarrierResolver, ShipmentResolver};

const CARRIER: &str = "Carrier";
const SHIPMENT: &str = "Shipment";
const TRACK_EVENT: &str = "TrackEvent";

/// Configuration for the schema builder.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            introspection_enabled: true,
        }
    }
}

/// Builds the tracker GraphQL schema.
pub struct TrackerSchemaBuilder {
    config: SchemaBuilderConfig,
}

impl TrackerSchemaBuilder {
    #[must_use]
    pub fn new(config: SchemaBuilderConfig) -> Self {
        Self { config }
    }

    /// Builds the GraphQL schema.
    ///
    /// # Errors
    ///
    /// Returns an error if schema construction fails.
    pub fn build(&self) -> Result<Schema, LifecycleError> {
        debug!("Starting GraphQL schema build");

        let mut builder = Schema::build("Query", None, Some("Subscription"))
            .register(Self::carrier_type())
            .register(Self::shipment_type())
            .register(Self::track_event_type())
            .register(Self::query_type())
            .register(Self::subscription_type())
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);

        if !self.config.introspection_enabled {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| LifecycleError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");
        Ok(schema)
    }

    fn query_type() -> Object {
        Object::new("Query")
            .field(Field::new(
                "carriers",
                TypeRef::named_nn_list_nn(CARRIER),
                CarrierResolver::list,
            ))
            .field(
                Field::new("carrier", TypeRef::named(CARRIER), CarrierResolver::by_id)
                    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID))),
            )
            .field(
                Field::new("shipment", TypeRef::named(SHIPMENT), ShipmentResolver::track)
                    .argument(InputValue::new("carrierId", TypeRef::named_nn(TypeRef::ID)))
                    .argument(InputValue::new(
                        "trackingNumber",
                        TypeRef::named_nn(TypeRef::STRING),
                    )),
            )
    }

    fn subscription_type() -> Subscription {
        Subscription::new("Subscription").field(
            SubscriptionField::new(
                "shipmentEvents",
                TypeRef::named_nn(TRACK_EVENT),
                ShipmentResolver::watch,
            )
            .description("Track events of one shipment")
            .argument(InputValue::new("carrierId", TypeRef::named_nn(TypeRef::ID)))
            .argument(InputValue::new(
                "trackingNumber",
                TypeRef::named_nn(TypeRef::STRING),
            )),
        )
    }

    fn carrier_type() -> Object {
        Object::new(CARRIER)
            .description("A parcel carrier")
            .field(Field::new("id", TypeRef::named_nn(TypeRef::ID), CarrierResolver::id))
            .field(Field::new(
                "name",
                TypeRef::named_nn(TypeRef::STRING),
                CarrierResolver::name,
            ))
            .field(Field::new(
                "displayName",
                TypeRef::named_nn(TypeRef::STRING),
                CarrierResolver::display_name,
            ))
    }

    fn shipment_type() -> Object {
        Object::new(SHIPMENT)
            .description("Tracking history of one shipment")
            .field(Field::new(
                "carrierId",
                TypeRef::named_nn(TypeRef::ID),
                ShipmentResolver::carrier_id,
            ))
            .field(Field::new(
                "trackingNumber",
                TypeRef::named_nn(TypeRef::STRING),
                ShipmentResolver::tracking_number,
            ))
            .field(Field::new(
                "lastEvent",
                TypeRef::named(TRACK_EVENT),
                ShipmentResolver::last_event,
            ))
            .field(Field::new(
                "events",
                TypeRef::named_nn_list_nn(TRACK_EVENT),
                ShipmentResolver::events,
            ))
    }

    fn track_event_type() -> Object {
        Object::new(TRACK_EVENT)
            .field(Field::new(
                "time",
                TypeRef::named(TypeRef::STRING),
                ShipmentResolver::event_time,
            ))
            .field(Field::new(
                "status",
                TypeRef::named_nn(TypeRef::STRING),
                ShipmentResolver::event_status,
            ))
            .field(Field::new(
                "description",
                TypeRef::named(TypeRef::STRING),
                ShipmentResolver::event_description,
            ))
            .field(Field::new(
                "location",
                TypeRef::named(TypeRef::STRING),
                ShipmentResolver::event_location,
            ))
    }
}
