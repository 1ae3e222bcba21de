//! Limits and toggles for the tracker schema, read from the `[graphql]`
//! table of `tracker.toml` or from `TRACKER__GRAPHQL__*` variables.
//!
//! ```toml
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

use crate::schema::SchemaBuilderConfig;

pub const DEFAULT_MAX_DEPTH: usize = 15;
pub const DEFAULT_MAX_COMPLEXITY: usize = 500;

/// Depth of `shipment { events { status } }`. Anything lower makes the
/// tracking fields unreachable.
pub const MIN_DEPTH: usize = 3;

/// `[graphql]` settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQLConfig {
    pub max_depth: usize,
    pub max_complexity: usize,
    /// Answer `__schema` / `__type` queries.
    pub introspection: bool,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            introspection: true,
        }
    }
}

impl GraphQLConfig {
    /// # Errors
    ///
    /// Fails when a limit would reject every tracking query.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth < MIN_DEPTH {
            return Err(format!(
                "graphql.max_depth must be at least {MIN_DEPTH} (got {})",
                self.max_depth
            ));
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        Ok(())
    }

    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig::from(self)
    }
}

impl From<&GraphQLConfig> for SchemaBuilderConfig {
    fn from(config: &GraphQLConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_complexity: config.max_complexity,
            introspection_enabled: config.introspection,
        }
    }
}
