//! # Pricing Protocol Messages
//!
//! Message types for host ↔ engine communication.
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Protocol Messages                          │
//! │                                                                         │
//! │  STARTUP FLOW                                                           │
//! │  ────────────                                                           │
//! │  ENGINE ───► ready { protocolVersion }          (also on requestReady)  │
//! │                                                                         │
//! │  RATE PUSHES (HOST → ENGINE)                                            │
//! │  ───────────────────────────                                            │
//! │  HOST ───► setVehicleRates { flat?, hourRoute?, ..., minimumFare? }     │
//! │  HOST ───► setRates { flat?, ..., allowedPricingTypes? }                │
//! │  HOST ───► setRouteData { miles?, hours?, tripHours?, passengers? }     │
//! │  HOST ───► setAirportFee { qty?, rate? }                                │
//! │  HOST ───► setTieredDistanceTotal { total }                             │
//! │  HOST ───► setGratuity { percent } / setPayments { amount }             │
//! │  HOST ───► setAdditionalRates { rates: [...] }   (wholesale)            │
//! │  HOST ───► setPricingBasis { basis, allowedTypes }                      │
//! │  ENGINE ◄─── ratesChanged { ...snapshot }        (after every mutation) │
//! │                                                                         │
//! │  PULL / RESET                                                           │
//! │  ────────────                                                           │
//! │  HOST ───► getRates            ENGINE ───► ratesData { ...snapshot }    │
//! │  HOST ───► clear               ENGINE ───► ratesChanged { ... }         │
//! │                                                                         │
//! │  LAYOUT HINT (widget builds only)                                       │
//! │  ────────────                                                           │
//! │  ENGINE ───► resize { height }                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format (JSON)
//! Messages are serialized as tagged JSON using serde's adjacently tagged
//! enum:
//! ```json
//! { "type": "setRouteData", "payload": { "miles": 24.5, "hours": 1.75 } }
//! ```
//!
//! ## Tolerance Rules
//! The channel is lossy by design: an unknown message type or a malformed
//! payload is ignored (see [`decode_host_message`]), a missing optional
//! field leaves the corresponding state untouched, and numeric garbage is
//! sanitized at ingest. Neither side may take the other down.

use fareline_core::PricingSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current protocol version, announced in `ready`.
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Inbound Messages (HOST → ENGINE)
// =============================================================================

/// All messages the host may send to the engine.
///
/// Uses serde's adjacently tagged enum for clean JSON serialization:
/// `{ "type": "setGratuity", "payload": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum HostMessage {
    // =========================================================================
    // Handshake
    // =========================================================================

    /// Asks the engine to re-announce readiness (host reload recovery).
    RequestReady,

    // =========================================================================
    // Rate Pushes
    // =========================================================================

    /// Vehicle-type default rates. Every rate is a guarded proposal: the
    /// engine only fills fields that are still empty.
    SetVehicleRates(VehicleRatesPayload),

    /// Direct rate writes, optionally updating the allowed pricing types.
    SetRates(RatesPayload),

    /// Route-derived quantities. Provenance-guarded: user-entered values
    /// are never overwritten.
    SetRouteData(RoutePayload),

    /// Partial update of the airport surcharge row.
    SetAirportFee(AirportFeePayload),

    /// A matched distance-tier total; lands in the flat row as
    /// `(qty 1, rate total)`.
    SetTieredDistanceTotal(TieredTotalPayload),

    /// Gratuity percentage (last write wins).
    SetGratuity(GratuityPayload),

    /// Payments applied against the quote.
    SetPayments(PaymentsPayload),

    /// Wholesale replacement of the additional fee rules.
    SetAdditionalRates(AdditionalRatesPayload),

    /// Pricing basis + allowed pricing types for the selected service.
    SetPricingBasis(PricingBasisPayload),

    // =========================================================================
    // Pull / Reset
    // =========================================================================

    /// Requests a full snapshot (`ratesData` reply).
    GetRates,

    /// Resets the quote to defaults for a new reservation.
    Clear,
}

// =============================================================================
// Outbound Messages (ENGINE → HOST)
// =============================================================================

/// All messages the engine may send to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum EngineMessage {
    /// Announces the engine is up and which protocol it speaks. Emitted on
    /// service start and in reply to `requestReady`.
    Ready(ReadyPayload),

    /// Full snapshot pushed after every mutating message.
    RatesChanged(PricingSnapshot),

    /// Full snapshot in reply to `getRates`.
    RatesData(PricingSnapshot),

    /// Layout hint emitted by embedded widget builds when their rendered
    /// height changes. The headless engine never sends it; hosts that do
    /// not render the widget ignore it.
    Resize(ResizePayload),
}

// =============================================================================
// Inbound Payloads
// =============================================================================

/// Vehicle-type default rates (dollars), all guarded proposals.
///
/// `minimum_fare` is special: it proposes `(qty 1, rate minimumFare)` into
/// the flat row, each side under its own guard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleRatesPayload {
    pub flat: Option<f64>,
    pub hour_route: Option<f64>,
    pub hour_trip: Option<f64>,
    pub passenger: Option<f64>,
    pub mile: Option<f64>,
    pub gratuity_percent: Option<f64>,
    pub minimum_fare: Option<f64>,
}

/// Direct rate writes (dollars). Fields left out stay untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatesPayload {
    pub flat: Option<f64>,
    pub hour_route: Option<f64>,
    pub hour_trip: Option<f64>,
    pub passenger: Option<f64>,
    pub mile: Option<f64>,
    /// When present, wholesale-replaces the allowed pricing-type list
    /// (empty list fails open to all rows).
    pub allowed_pricing_types: Option<Vec<String>>,
}

/// Route-derived quantities. Fields left out stay untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutePayload {
    pub miles: Option<f64>,
    pub hours: Option<f64>,
    pub trip_hours: Option<f64>,
    pub passengers: Option<f64>,
}

/// Airport surcharge partial update; either side may be pushed alone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirportFeePayload {
    pub qty: Option<f64>,
    pub rate: Option<f64>,
}

/// A matched distance-tier price (dollars).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredTotalPayload {
    pub total: f64,
}

/// Gratuity percentage in percent units (20 ⇒ 20%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GratuityPayload {
    pub percent: f64,
}

/// Payments applied against the quote (dollars).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsPayload {
    pub amount: f64,
}

/// One fee rule as pushed by the host.
///
/// Everything is stringly-typed and optional on the wire so that a rule
/// this engine build does not understand degrades gracefully instead of
/// poisoning the whole push.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulePayload {
    pub id: String,
    pub name: String,
    /// `fixed` | `percentage` | `multiplier`; unknown kinds skip the rule.
    pub kind: String,
    /// Dollar amount for `fixed` rules.
    pub amount: Option<f64>,
    /// Percent for `percentage` rules, factor for `multiplier` rules.
    pub value: Option<f64>,
    /// Quantity for `fixed` rules; defaults to 1.
    pub quantity: Option<f64>,
    /// `active` | `inactive`; missing means active.
    pub status: Option<String>,
}

/// Wholesale fee-rule replacement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalRatesPayload {
    pub rates: Vec<RulePayload>,
}

/// Pricing basis selection for the reservation's service type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBasisPayload {
    /// Service-type code; unknown codes fall back to `flat`.
    pub basis: String,
    /// Allowed pricing-type codes; empty (or missing) fails open.
    #[serde(default)]
    pub allowed_types: Vec<String>,
}

// =============================================================================
// Outbound Payloads
// =============================================================================

/// Readiness announcement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyPayload {
    pub protocol_version: u32,
}

/// Rendered-height hint from widget builds (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizePayload {
    pub height: f64,
}

// =============================================================================
// Helper Functions
// =============================================================================

impl HostMessage {
    /// Returns the message type name as it appears on the wire (for logging).
    pub fn type_name(&self) -> &'static str {
        match self {
            HostMessage::RequestReady => "requestReady",
            HostMessage::SetVehicleRates(_) => "setVehicleRates",
            HostMessage::SetRates(_) => "setRates",
            HostMessage::SetRouteData(_) => "setRouteData",
            HostMessage::SetAirportFee(_) => "setAirportFee",
            HostMessage::SetTieredDistanceTotal(_) => "setTieredDistanceTotal",
            HostMessage::SetGratuity(_) => "setGratuity",
            HostMessage::SetPayments(_) => "setPayments",
            HostMessage::SetAdditionalRates(_) => "setAdditionalRates",
            HostMessage::SetPricingBasis(_) => "setPricingBasis",
            HostMessage::GetRates => "getRates",
            HostMessage::Clear => "clear",
        }
    }

    /// Creates a setGratuity message.
    pub fn set_gratuity(percent: f64) -> Self {
        HostMessage::SetGratuity(GratuityPayload { percent })
    }

    /// Creates a setPayments message.
    pub fn set_payments(amount: f64) -> Self {
        HostMessage::SetPayments(PaymentsPayload { amount })
    }

    /// Creates a setAirportFee message.
    pub fn set_airport_fee(qty: Option<f64>, rate: Option<f64>) -> Self {
        HostMessage::SetAirportFee(AirportFeePayload { qty, rate })
    }

    /// Creates a setTieredDistanceTotal message.
    pub fn set_tiered_distance_total(total: f64) -> Self {
        HostMessage::SetTieredDistanceTotal(TieredTotalPayload { total })
    }

    /// Creates a setPricingBasis message.
    pub fn set_pricing_basis(basis: &str, allowed_types: Vec<String>) -> Self {
        HostMessage::SetPricingBasis(PricingBasisPayload {
            basis: basis.to_string(),
            allowed_types,
        })
    }

    /// Serializes to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes from JSON string (strict; see [`decode_host_message`]
    /// for the tolerant message-path variant).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl EngineMessage {
    /// Returns the message type name as it appears on the wire (for logging).
    pub fn type_name(&self) -> &'static str {
        match self {
            EngineMessage::Ready(_) => "ready",
            EngineMessage::RatesChanged(_) => "ratesChanged",
            EngineMessage::RatesData(_) => "ratesData",
            EngineMessage::Resize(_) => "resize",
        }
    }

    /// Creates a ready message for the current protocol version.
    pub fn ready() -> Self {
        EngineMessage::Ready(ReadyPayload {
            protocol_version: PROTOCOL_VERSION,
        })
    }

    /// Serializes to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Tolerant inbound decode: unknown message types and malformed payloads
/// yield `None` instead of an error.
///
/// This is the forward-compatibility seam. A host newer than this engine
/// build may send message types we have never heard of; they must be
/// dropped silently rather than tearing the channel down.
pub fn decode_host_message(raw: &str) -> Option<HostMessage> {
    match HostMessage::from_json(raw) {
        Ok(message) => Some(message),
        Err(error) => {
            debug!(%error, "ignoring unrecognized host message");
            None
        }
    }
}
