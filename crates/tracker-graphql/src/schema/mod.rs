//! GraphQL schema building.
//!
//! The schema is built once per process by the [`Lifecycle`](crate::Lifecycle)
//! manager and then shared read-only by every request.

mod builder;

pub use builder::{SchemaBuilderConfig, TrackerSchemaBuilder};
