//! # tracker-core
//!
//! Domain collaborators of the delivery tracker: the [`Carrier`] contract,
//! shipment tracking types, and the [`CarrierRegistry`] that is initialized
//! once per process and consulted by the API resolvers.

pub mod carrier;
pub mod error;
pub mod registry;

pub use carrier::{Carrier, FixtureCarrier, TrackEvent, TrackEventStatus, TrackInfo};
pub use error::{Result, TrackError};
pub use registry::{CarrierRegistry, DefaultCarrierRegistry, DynCarrierRegistry};
