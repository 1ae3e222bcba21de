//! Carrier contract and shipment tracking types.
//!
//! A [`Carrier`] knows how to look up the tracking history of a shipment.
//! Carrier-specific protocol adapters live outside this crate; the only
//! implementation shipped here is [`FixtureCarrier`], which serves tracking
//! data loaded from a fixture file.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Result, TrackError};

/// Normalized status of a tracking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackEventStatus {
    InformationReceived,
    AtPickup,
    InTransit,
    OutForDelivery,
    AttemptFail,
    Delivered,
    AvailableForPickup,
    Exception,
    Unknown,
}

impl TrackEventStatus {
    /// Returns the wire name of the status (e.g. `IN_TRANSIT`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InformationReceived => "INFORMATION_RECEIVED",
            Self::AtPickup => "AT_PICKUP",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::AttemptFail => "ATTEMPT_FAIL",
            Self::Delivered => "DELIVERED",
            Self::AvailableForPickup => "AVAILABLE_FOR_PICKUP",
            Self::Exception => "EXCEPTION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A single event in a shipment's tracking history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub time: Option<OffsetDateTime>,
    pub status: TrackEventStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Tracking result for one shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub carrier_id: String,
    pub tracking_number: String,
    /// Events in chronological order.
    pub events: Vec<TrackEvent>,
}

impl TrackInfo {
    /// Most recent event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<&TrackEvent> {
        self.events.last()
    }
}

/// A parcel carrier able to track shipments.
#[async_trait]
pub trait Carrier: Send + Sync {
    /// Stable carrier identifier (e.g. `kr.cjlogistics`).
    fn id(&self) -> &str;

    /// Carrier name.
    fn name(&self) -> &str;

    /// Human-readable name; defaults to [`Carrier::name`].
    fn display_name(&self) -> &str {
        self.name()
    }

    /// One-time setup run by the registry during its own initialization.
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Looks up the tracking history of a shipment.
    async fn track(&self, tracking_number: &str) -> Result<TrackInfo>;
}

/// Carrier backed by static tracking data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCarrier {
    id: String,
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    shipments: HashMap<String, Vec<TrackEvent>>,
}

impl FixtureCarrier {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: None,
            shipments: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn with_shipment(
        mut self,
        tracking_number: impl Into<String>,
        events: Vec<TrackEvent>,
    ) -> Self {
        self.shipments.insert(tracking_number.into(), events);
        self
    }
}

#[async_trait]
impl Carrier for FixtureCarrier {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    async fn track(&self, tracking_number: &str) -> Result<TrackInfo> {
        let tracking_number = tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(TrackError::bad_request("Tracking number must not be empty"));
        }

        let events = self.shipments.get(tracking_number).ok_or_else(|| {
            TrackError::not_found(format!(
                "Shipment {tracking_number} not found for carrier {}",
                self.id
            ))
        })?;

        Ok(TrackInfo {
            carrier_id: self.id.clone(),
            tracking_number: tracking_number.to_string(),
            events: events.clone(),
        })
    }
}
