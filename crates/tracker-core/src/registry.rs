//! Carrier registry.
//!
//! The registry is initialized once per process and then shared read-only
//! by every request. [`DefaultCarrierRegistry`] combines carriers registered
//! in code with carriers loaded from an optional JSON fixture file.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::carrier::{Carrier, FixtureCarrier};
use crate::error::Result;

/// Lookup of carrier-specific tracking logic.
#[async_trait]
pub trait CarrierRegistry: Send + Sync {
    /// Prepares the registry. May perform file or network I/O.
    async fn init(&self) -> Result<()>;

    /// Returns the carrier with the given id.
    fn get(&self, carrier_id: &str) -> Option<Arc<dyn Carrier>>;

    /// Returns all carriers in registration order.
    fn carriers(&self) -> Vec<Arc<dyn Carrier>>;
}

/// Shared handle to a carrier registry.
pub type DynCarrierRegistry = Arc<dyn CarrierRegistry>;

/// Fixture file layout: `{ "carriers": [ { "id", "name", "shipments": {...} } ] }`.
#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    carriers: Vec<FixtureCarrier>,
}

/// Default registry implementation.
#[derive(Default)]
pub struct DefaultCarrierRegistry {
    builtin: Vec<Arc<dyn Carrier>>,
    fixtures: Option<PathBuf>,
    carriers: RwLock<IndexMap<String, Arc<dyn Carrier>>>,
}

impl DefaultCarrierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a carrier that is registered on every `init()`.
    #[must_use]
    pub fn with_carrier(mut self, carrier: Arc<dyn Carrier>) -> Self {
        self.builtin.push(carrier);
        self
    }

    /// Loads additional carriers from a JSON fixture file during `init()`.
    #[must_use]
    pub fn with_fixtures(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures = Some(path.into());
        self
    }

    async fn load_fixtures(&self) -> Result<Vec<Arc<dyn Carrier>>> {
        let Some(path) = &self.fixtures else {
            return Ok(Vec::new());
        };

        debug!(path = %path.display(), "Loading carrier fixtures");
        let raw = tokio::fs::read_to_string(path).await?;
        let file: FixtureFile = serde_json::from_str(&raw)?;

        Ok(file
            .carriers
            .into_iter()
            .map(|c| Arc::new(c) as Arc<dyn Carrier>)
            .collect())
    }
}

#[async_trait]
impl CarrierRegistry for DefaultCarrierRegistry {
    async fn init(&self) -> Result<()> {
        let mut loaded = self.builtin.clone();
        loaded.extend(self.load_fixtures().await?);

        for carrier in &loaded {
            carrier.init().await?;
        }

        let carriers: IndexMap<String, Arc<dyn Carrier>> = loaded
            .into_iter()
            .map(|c| (c.id().to_string(), c))
            .collect();

        info!(carriers = carriers.len(), "Carrier registry initialized");
        *self.carriers.write() = carriers;
        Ok(())
    }

    fn get(&self, carrier_id: &str) -> Option<Arc<dyn Carrier>> {
        self.carriers.read().get(carrier_id).cloned()
    }

    fn carriers(&self) -> Vec<Arc<dyn Carrier>> {
        self.carriers.read().values().cloned().collect()
    }
}
