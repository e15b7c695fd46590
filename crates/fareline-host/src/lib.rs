//! # fareline-host: Host-Side Rate Applier for Fareline
//!
//! This crate models the reservation-system side of the pricing boundary:
//! the rate settings a host stores per vehicle type, and the applier that
//! turns those settings plus a measured route into engine proposals.
//!
//! ## Boundary Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Host / Engine Boundary                            │
//! │                                                                         │
//! │   HOST (this crate)                      ENGINE (fareline-engine)       │
//! │   ─────────────────                      ───────────────────────        │
//! │                                                                         │
//! │   VehicleRateSchedule ──┐                                               │
//! │   AdditionalFeeSetting ─┼─► RateApplier ──► HostMessage ──► guards ──►  │
//! │   RouteMeasurement ─────┘                                  quote        │
//! │                                                                         │
//! │   The host owns its settings; the engine owns the quote. Proposals      │
//! │   cross the boundary as messages, and the engine's empty-field and      │
//! │   provenance guards arbitrate every write. Re-pushing is always safe.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`settings`] - `VehicleRateSchedule`, `DistanceTier`, `AdditionalFeeSetting`
//! - [`applier`] - `RateApplier` and `RouteMeasurement`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fareline_engine::{EngineConfig, EngineService};
//! use fareline_host::{AdditionalFeeSetting, RateApplier, RouteMeasurement, VehicleRateSchedule};
//!
//! let (handle, mut outbound_rx) = EngineService::spawn(EngineConfig::load_or_default(None));
//!
//! let mut sedan = VehicleRateSchedule::new("Sedan");
//! sedan.per_mile_rate = Some(3.50);
//! sedan.default_gratuity_percent = Some(20.0);
//!
//! let applier = RateApplier::new(sedan)
//!     .with_fees(vec![AdditionalFeeSetting::percentage("Fuel Surcharge", 10.0)]);
//!
//! let route = RouteMeasurement { miles: Some(22.5), ..Default::default() };
//! applier.apply(&handle, &route).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod applier;
pub mod settings;

// =============================================================================
// Re-exports
// =============================================================================

pub use applier::{RateApplier, RouteMeasurement};
pub use settings::{AdditionalFeeSetting, DistanceTier, VehicleRateSchedule};
