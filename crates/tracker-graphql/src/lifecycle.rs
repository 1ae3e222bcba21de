//! Process-wide gateway initialization.
//!
//! This module provides [`Lifecycle`], which builds the schema and
//! initializes the carrier registry the first time the gateway is needed and
//! hands out the resulting [`Gateway`] afterwards.
//!
//! Concurrent first callers share a single initialization attempt and all
//! observe its outcome. A failed attempt is not remembered: the next call
//! starts over from scratch.
//!
//! # Example
//!
//! ```ignore
//! let lifecycle = Lifecycle::new(registry, SchemaBuilderConfig::default());
//!
//! // First call initializes
//! let gateway = lifecycle.ensure_ready().await?;
//!
//! // Later calls return the same gateway without doing any work
//! let gateway = lifecycle.ensure_ready().await?;
//! ```

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use tracker_core::DynCarrierRegistry;

use crate::context::GatewayContext;
use crate::error::LifecycleError;
use crate::pipeline::{ExecutionOutcome, ExecutionPipeline, QueryRequest};
use crate::schema::{SchemaBuilderConfig, TrackerSchemaBuilder};

type InitAttempt = Shared<BoxFuture<'static, Result<Arc<Gateway>, LifecycleError>>>;

/// Hook run at the start of every initialization attempt.
pub type SetupHook = Arc<dyn Fn() + Send + Sync>;

/// Readiness of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    /// No initialization has succeeded and none is running.
    Uninitialized,
    /// An initialization attempt is in progress.
    Initializing,
    /// The gateway is ready for use.
    Ready,
}

/// The initialized gateway: schema and registry, immutable from here on.
pub struct Gateway {
    pipeline: ExecutionPipeline,
    registry: DynCarrierRegistry,
}

impl Gateway {
    /// Creates the execution context for one request.
    #[must_use]
    pub fn context(&self, request_id: impl Into<String>) -> GatewayContext {
        GatewayContext::new(Arc::clone(&self.registry), request_id)
    }

    #[must_use]
    pub fn pipeline(&self) -> &ExecutionPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn registry(&self) -> &DynCarrierRegistry {
        &self.registry
    }

    /// Runs one request through the pipeline with a fresh context.
    pub async fn execute(&self, request: QueryRequest, request_id: &str) -> ExecutionOutcome {
        self.pipeline.run(request, self.context(request_id)).await
    }
}

enum Slot {
    Idle,
    Pending(InitAttempt),
}

/// Single-flight, retry-on-failure gateway initializer.
pub struct Lifecycle {
    /// Set once an attempt succeeds; never cleared.
    ready: ArcSwapOption<Gateway>,

    /// The in-flight attempt, if any.
    slot: Mutex<Slot>,

    registry: DynCarrierRegistry,
    schema_config: SchemaBuilderConfig,
    setup: Option<SetupHook>,
}

impl Lifecycle {
    #[must_use]
    pub fn new(registry: DynCarrierRegistry, schema_config: SchemaBuilderConfig) -> Self {
        Self {
            ready: ArcSwapOption::empty(),
            slot: Mutex::new(Slot::Idle),
            registry,
            schema_config,
            setup: None,
        }
    }

    /// Sets a hook that runs before the schema is built in every attempt.
    #[must_use]
    pub fn with_setup(mut self, setup: impl Fn() + Send + Sync + 'static) -> Self {
        self.setup = Some(Arc::new(setup));
        self
    }

    /// Returns the current readiness state.
    pub fn state(&self) -> ReadinessState {
        if self.ready.load().is_some() {
            return ReadinessState::Ready;
        }
        match *self.slot.lock() {
            Slot::Pending(_) => ReadinessState::Initializing,
            Slot::Idle => ReadinessState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load().is_some()
    }

    /// Returns the gateway, initializing it if necessary.
    ///
    /// Safe to call on every request. Once initialization has succeeded this
    /// is a single atomic load.
    ///
    /// # Errors
    ///
    /// Returns the error of the attempt this call joined or started. Every
    /// caller that joined the same attempt gets the same error.
    pub async fn ensure_ready(&self) -> Result<Arc<Gateway>, LifecycleError> {
        if let Some(gateway) = self.ready.load_full() {
            return Ok(gateway);
        }

        let attempt = {
            let mut slot = self.slot.lock();

            // Double-check after acquiring lock
            if let Some(gateway) = self.ready.load_full() {
                return Ok(gateway);
            }

            match &*slot {
                Slot::Pending(attempt) => {
                    debug!("Joining in-flight gateway initialization");
                    attempt.clone()
                }
                Slot::Idle => {
                    let attempt = initialize(
                        Arc::clone(&self.registry),
                        self.schema_config.clone(),
                        self.setup.clone(),
                    )
                    .boxed()
                    .shared();
                    *slot = Slot::Pending(attempt.clone());
                    attempt
                }
            }
        };

        // Await a clone so `attempt` can still be compared afterwards.
        let result = attempt.clone().await;

        let mut slot = self.slot.lock();
        let finished = matches!(&*slot, Slot::Pending(current) if current.ptr_eq(&attempt));
        if finished {
            if let Ok(gateway) = &result {
                self.ready.store(Some(Arc::clone(gateway)));
            }
            *slot = Slot::Idle;
        }

        result
    }
}

async fn initialize(
    registry: DynCarrierRegistry,
    schema_config: SchemaBuilderConfig,
    setup: Option<SetupHook>,
) -> Result<Arc<Gateway>, LifecycleError> {
    if let Some(setup) = setup {
        setup();
    }

    info!("Initializing gateway...");

    let schema = TrackerSchemaBuilder::new(schema_config).build()?;

    if let Err(e) = registry.init().await {
        let error_msg = e.to_string();
        warn!(error = %error_msg, "Carrier registry initialization failed");
        return Err(LifecycleError::RegistryInitFailed(error_msg));
    }

    info!(
        carriers = registry.carriers().len(),
        "Gateway initialized successfully"
    );

    Ok(Arc::new(Gateway {
        pipeline: ExecutionPipeline::new(schema),
        registry,
    }))
}
