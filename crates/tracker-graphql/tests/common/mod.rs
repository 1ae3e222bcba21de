//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracker_core::{
    Carrier, CarrierRegistry, TrackError, TrackEvent, TrackEventStatus, TrackInfo,
};
use tracker_graphql::{Lifecycle, SchemaBuilderConfig};

/// Text carried by the simulated upstream fault. Must never reach a client.
pub const UPSTREAM_FAULT: &str = "connect ECONNREFUSED 10.0.0.7:8443";

// =============================================================================
// Test Carrier
// =============================================================================

/// Carrier whose behavior depends on the tracking number:
///
/// - `delivered-1`: two events, last one `DELIVERED`
/// - `missing`: `NOT_FOUND`
/// - `bad`: `BAD_REQUEST`
/// - anything else: an uncoded upstream fault
pub struct TestCarrier;

#[async_trait]
impl Carrier for TestCarrier {
    fn id(&self) -> &str {
        "dev.test"
    }

    fn name(&self) -> &str {
        "Test Carrier"
    }

    async fn track(&self, tracking_number: &str) -> tracker_core::Result<TrackInfo> {
        match tracking_number {
            "delivered-1" => Ok(TrackInfo {
                carrier_id: "dev.test".into(),
                tracking_number: tracking_number.into(),
                events: vec![
                    TrackEvent {
                        time: None,
                        status: TrackEventStatus::InTransit,
                        description: Some("Left origin facility".into()),
                        location: Some("Seoul".into()),
                    },
                    TrackEvent {
                        time: None,
                        status: TrackEventStatus::Delivered,
                        description: Some("Delivered".into()),
                        location: Some("Busan".into()),
                    },
                ],
            }),
            "missing" => Err(TrackError::not_found("Shipment missing not found")),
            "bad" => Err(TrackError::bad_request("Tracking number format is invalid")),
            _ => Err(TrackError::upstream(UPSTREAM_FAULT)),
        }
    }
}

// =============================================================================
// Counting Registry
// =============================================================================

/// Registry that records how often it was initialized and consulted.
#[derive(Default)]
pub struct CountingRegistry {
    pub init_calls: AtomicUsize,
    pub lookups: AtomicUsize,
    failures_left: AtomicUsize,
    init_delay: Option<Duration>,
}

impl CountingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the first `n` initializations fail.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Makes every initialization take at least `delay`.
    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = Some(delay);
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierRegistry for CountingRegistry {
    async fn init(&self) -> tracker_core::Result<()> {
        let call = self.init_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.init_delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TrackError::Registry(format!(
                "registry unavailable (attempt {call})"
            )));
        }
        Ok(())
    }

    fn get(&self, carrier_id: &str) -> Option<Arc<dyn Carrier>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        (carrier_id == "dev.test").then(|| Arc::new(TestCarrier) as Arc<dyn Carrier>)
    }

    fn carriers(&self) -> Vec<Arc<dyn Carrier>> {
        vec![Arc::new(TestCarrier)]
    }
}

pub fn lifecycle(registry: &Arc<CountingRegistry>) -> Arc<Lifecycle> {
    Arc::new(Lifecycle::new(
        Arc::clone(registry) as Arc<dyn CarrierRegistry>,
        SchemaBuilderConfig::default(),
    ))
}

// =============================================================================
// Log Capture
// =============================================================================

/// A recorded log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Checks whether any field of the event mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.fields.values().any(|v| v.contains(needle))
    }
}

/// Layer that stores every event it sees.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.at_level(Level::ERROR)
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

/// Captures events emitted on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(logs.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
