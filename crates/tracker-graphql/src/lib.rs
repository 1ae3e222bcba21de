//! # tracker-graphql
//!
//! GraphQL request gateway for the delivery tracker.
//!
//! Incoming requests are authenticated (on the HTTP path), executed against
//! the carrier schema and answered with errors that are safe to show to
//! clients. It provides:
//!
//! - An execution pipeline: parse, validate, execute
//! - Error classification into `INTERNAL`, `BAD_REQUEST` and `NOT_FOUND`,
//!   with internal detail logged and never returned
//! - Single-flight, retry-on-failure initialization of the schema and the
//!   carrier registry
//! - Two entry adapters: an axum listener and a single-invocation handler
//!
//! ## Endpoints
//!
//! - `POST /graphql` - GraphQL request as JSON body
//! - `GET /graphql` - GraphQL request via URL params
//!
//! Both require a matching `x-api-key` header.
//!
//! ## Configuration
//!
//! Add to `tracker.toml`:
//!
//! ```toml
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] - Error classification and redaction
//! - [`pipeline`] - Query execution pipeline
//! - [`lifecycle`] - Gateway initialization
//! - [`schema`] - Schema building
//! - [`handler`] - Axum HTTP handlers
//! - [`invocation`] - Single-invocation adapter

pub mod auth;
pub mod classifier;
pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod handler;
pub mod invocation;
pub mod lifecycle;
pub mod pipeline;
pub mod resolvers;
pub mod response;
pub mod schema;

// Re-export main types
pub use auth::require_api_key;
pub use classifier::{ErrorClass, FailureKind, INTERNAL_ERROR_MESSAGE, classify, finalize};
pub use config::GraphQLConfig;
pub use context::GatewayContext;
pub use credential::{API_KEY_HEADER, validate_api_key};
pub use error::{GatewayError, LifecycleError};
pub use handler::{GatewayState, graphql_router};
pub use invocation::InvocationHandler;
pub use lifecycle::{Gateway, Lifecycle, ReadinessState};
pub use pipeline::{ExecutionOutcome, ExecutionPipeline, QueryRequest};
pub use response::{ClassifiedError, INCREMENTAL_UNSUPPORTED_MESSAGE, QueryResponse};
pub use schema::{SchemaBuilderConfig, TrackerSchemaBuilder};
