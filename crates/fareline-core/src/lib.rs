//! # fareline-core: Pure Pricing Logic for Fareline
//!
//! This crate is the **heart** of Fareline. It contains all pricing logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fareline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Reservation System                         │   │
//! │  │   vehicle schedules ── route measurements ── fee settings       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ fareline-host (rate applier)           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              fareline-engine (protocol + actor)                 │   │
//! │  │    setVehicleRates, setRouteData, setPricingBasis, clear, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ fareline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  money  │  │  sheet  │  │  rules  │  │  basis  │           │   │
//! │  │   │  Money  │  │ RateRow │  │ FeeRule │  │Eligible │           │   │
//! │  │   │ Percent │  │RateSheet│  │Schedule │  │  rows   │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                ┌─────────┐  ┌──────────┐                       │   │
//! │  │                │  quote  │  │ snapshot │                       │   │
//! │  │                │  Quote  │  │ Pricing  │                       │   │
//! │  │                │ totals  │  │ Snapshot │                       │   │
//! │  │                └─────────┘  └──────────┘                       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CHANNELS • NO CLOCKS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Fixed-point Money / Percent / Quantity (no floating point!)
//! - [`sheet`] - The six billing rows and their write guards
//! - [`basis`] - Service-type → pricing basis lookup, row eligibility
//! - [`rules`] - Additional fee rules (fixed / percentage / multiplier)
//! - [`quote`] - Aggregate quote state and the totals pipeline
//! - [`snapshot`] - The read model published to the host
//! - [`error`] - Strict parse errors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deriving a snapshot is deterministic and never
//!    mutates state - pricing twice yields identical results
//! 2. **No I/O**: channels, clocks, network, file system are FORBIDDEN here
//! 3. **Integer Money**: cents / basis points / milli-units (i64); untrusted
//!    wire floats are sanitized once at the boundary
//! 4. **No Panics**: garbage input coerces to safe values, unknown targets
//!    are no-ops; the computation path cannot throw
//!
//! ## Example Usage
//!
//! ```rust
//! use fareline_core::money::{Money, Percent, Quantity};
//! use fareline_core::quote::{Quote, QuoteDefaults};
//! use fareline_core::sheet::{Provenance, RateKey};
//!
//! let mut quote = Quote::new(QuoteDefaults::default());
//!
//! // flat 1 × $50, hourRoute 2 × $30
//! quote.set_rate(RateKey::Flat, Money::from_dollars(50.0));
//! quote.set_rate(RateKey::HourRoute, Money::from_dollars(30.0));
//! quote.set_quantity(RateKey::HourRoute, Quantity::from_whole(2), Provenance::User);
//!
//! let snapshot = quote.snapshot();
//! assert_eq!(snapshot.subtotal, Money::from_dollars(110.0));
//! assert_eq!(snapshot.gratuity_total, Money::from_dollars(22.0)); // default 20%
//! assert_eq!(snapshot.grand_total, Money::from_dollars(132.0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basis;
pub mod error;
pub mod money;
pub mod quote;
pub mod rules;
pub mod sheet;
pub mod snapshot;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fareline_core::Money` instead of
// `use fareline_core::money::Money`

pub use basis::{Eligibility, PricingBasis};
pub use error::{CoreError, CoreResult};
pub use money::{Money, Percent, Quantity};
pub use quote::{Quote, QuoteDefaults};
pub use rules::{FeeBasis, FeeKind, FeeRule, FeeSchedule};
pub use sheet::{Provenance, RateKey, RateRow, RateSheet};
pub use snapshot::{FeeLineState, PricingSnapshot, RateRowState};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default gratuity in basis points (20%).
///
/// ## Why a constant?
/// The default appears in exactly one place. Engine configuration derives
/// its own default from this value and injects it via `QuoteDefaults`, so
/// a deployment can override it without touching core math, and `clear`
/// resets to whatever was injected.
pub const DEFAULT_GRATUITY_BPS: i64 = 2_000;

/// Default airport surcharge rate in cents ($15.00).
///
/// The airport row starts at quantity 0 with this rate, so the surcharge
/// appears pre-priced the moment the host flags an airport leg.
pub const DEFAULT_AIRPORT_FEE_CENTS: i64 = 1_500;
