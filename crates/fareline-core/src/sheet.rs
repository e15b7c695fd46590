//! # Rate Sheet Module
//!
//! The line-item store: six fixed billing rows, each a `(quantity, rate)`
//! pair whose total is always derived, never stored.
//!
//! ## The Six Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key         quantity means          typical source                     │
//! │  ──────────  ─────────────────────   ─────────────────────────────────  │
//! │  flat        multiplier (usually 1)  tiered total / minimum fare        │
//! │  hourRoute   routed hours            directions service                 │
//! │  hourTrip    full trip hours         dispatch estimate                  │
//! │  passenger   passenger count         reservation form                   │
//! │  mile        billable miles          directions − included allowance    │
//! │  airport     0 or 1 (surcharge)      host address analysis              │
//! │                                                                         │
//! │  The airport row is conditional: hidden whenever quantity == 0.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Guards
//! Two guarded write paths keep host pushes from stomping manual work:
//!
//! - [`RateSheet::propose_rate`] writes only into an empty (zero) rate field,
//!   so vehicle-default rates never overwrite a typed-in price.
//! - [`RateSheet::propose_route_quantity`] writes unless the current value
//!   was user-entered, so re-requested directions refresh autofilled
//!   quantities without touching manual overrides.

use crate::money::{Money, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// RateKey
// =============================================================================

/// Identifies one of the six billing rows.
///
/// Serialized in camelCase to match the wire protocol and the embedding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum RateKey {
    Flat,
    HourRoute,
    HourTrip,
    Passenger,
    Mile,
    Airport,
}

impl RateKey {
    /// Number of billing rows.
    pub const COUNT: usize = 6;

    /// Every row, in display order.
    pub const ALL: [RateKey; RateKey::COUNT] = [
        RateKey::Flat,
        RateKey::HourRoute,
        RateKey::HourTrip,
        RateKey::Passenger,
        RateKey::Mile,
        RateKey::Airport,
    ];

    /// The five base rows, excluding the conditional airport surcharge.
    pub const BASE: [RateKey; 5] = [
        RateKey::Flat,
        RateKey::HourRoute,
        RateKey::HourTrip,
        RateKey::Passenger,
        RateKey::Mile,
    ];

    const fn index(self) -> usize {
        match self {
            RateKey::Flat => 0,
            RateKey::HourRoute => 1,
            RateKey::HourTrip => 2,
            RateKey::Passenger => 3,
            RateKey::Mile => 4,
            RateKey::Airport => 5,
        }
    }

    /// Human-readable row label for logs and the demo console.
    pub const fn label(self) -> &'static str {
        match self {
            RateKey::Flat => "Flat Rate",
            RateKey::HourRoute => "Hourly (Route)",
            RateKey::HourTrip => "Hourly (Trip)",
            RateKey::Passenger => "Per Passenger",
            RateKey::Mile => "Per Mile",
            RateKey::Airport => "Airport Fee",
        }
    }

    /// Wire name of the row (camelCase, matches serde).
    pub const fn wire_name(self) -> &'static str {
        match self {
            RateKey::Flat => "flat",
            RateKey::HourRoute => "hourRoute",
            RateKey::HourTrip => "hourTrip",
            RateKey::Passenger => "passenger",
            RateKey::Mile => "mile",
            RateKey::Airport => "airport",
        }
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

// =============================================================================
// Provenance
// =============================================================================

/// Origin tag carried by every row quantity.
///
/// The tag decides whether a later route-derived push may overwrite the
/// field:
///
/// - `Empty`: unset or cleared; any writer may fill it
/// - `User`: manually entered; route pushes must not touch it
/// - `RouteDerived`: autofilled from a route; a newer route may refresh it
///
/// A user edit back to zero returns the field to `Empty`, so an emptied
/// field becomes overwritable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    #[default]
    Empty,
    User,
    RouteDerived,
}

impl Provenance {
    /// True when the value was manually entered and must be preserved.
    #[inline]
    pub const fn is_user(self) -> bool {
        matches!(self, Provenance::User)
    }
}

// =============================================================================
// RateRow
// =============================================================================

/// One billing row: a quantity, a rate, and the quantity's origin tag.
///
/// The row total is never stored; [`RateRow::total`] recomputes it on every
/// read so a stale total cannot survive an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateRow {
    pub quantity: Quantity,
    pub rate: Money,
    pub quantity_source: Provenance,
}

impl RateRow {
    /// Derived line total: `rate × quantity`.
    #[inline]
    pub fn total(&self) -> Money {
        self.rate.times(self.quantity)
    }
}

// =============================================================================
// RateSheet
// =============================================================================

/// The six billing rows plus the write-guard logic that protects them.
///
/// The sheet knows nothing about eligibility; the owning quote decides which
/// writes reach it. Everything here is plain value math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSheet {
    rows: [RateRow; RateKey::COUNT],
}

impl RateSheet {
    /// Creates a sheet with default rows: flat quantity 1, the airport row
    /// at quantity 0 with the supplied default surcharge rate, everything
    /// else zeroed.
    pub fn new(airport_fee: Money) -> Self {
        let mut sheet = RateSheet {
            rows: [RateRow::default(); RateKey::COUNT],
        };
        sheet.reset(airport_fee);
        sheet
    }

    /// Read access to one row.
    #[inline]
    pub fn row(&self, key: RateKey) -> &RateRow {
        &self.rows[key.index()]
    }

    #[inline]
    fn row_mut(&mut self, key: RateKey) -> &mut RateRow {
        &mut self.rows[key.index()]
    }

    /// Sets a row rate unconditionally (clamped non-negative).
    pub fn set_rate(&mut self, key: RateKey, rate: Money) {
        self.row_mut(key).rate = rate.max(Money::zero());
    }

    /// Sets a row quantity unconditionally (clamped non-negative) and tags
    /// its origin.
    pub fn set_quantity(&mut self, key: RateKey, quantity: Quantity, source: Provenance) {
        let row = self.row_mut(key);
        row.quantity = quantity.max(Quantity::zero());
        row.quantity_source = source;
    }

    /// Empty-field guard: writes a proposed rate only when the current rate
    /// is zero. Returns whether the write happened.
    pub fn propose_rate(&mut self, key: RateKey, rate: Money) -> bool {
        if !self.row(key).rate.is_zero() {
            return false;
        }
        self.set_rate(key, rate);
        true
    }

    /// Provenance guard: writes a route-derived quantity unless the current
    /// value is user-entered, tagging the field `RouteDerived` on success.
    /// Returns whether the write happened.
    pub fn propose_route_quantity(&mut self, key: RateKey, quantity: Quantity) -> bool {
        if self.row(key).quantity_source.is_user() {
            return false;
        }
        self.set_quantity(key, quantity, Provenance::RouteDerived);
        true
    }

    /// Zeroes a row entirely: quantity 0, rate 0, provenance `Empty`.
    ///
    /// Used when a row becomes ineligible, so a hidden row can never leak a
    /// stale value into the subtotal.
    pub fn clear_row(&mut self, key: RateKey) {
        *self.row_mut(key) = RateRow::default();
    }

    /// Restores every row to its default: flat at quantity 1 / rate 0, the
    /// four other base rows zeroed, the airport row at quantity 0 with the
    /// supplied default rate.
    pub fn reset(&mut self, airport_fee: Money) {
        for key in RateKey::ALL {
            self.clear_row(key);
        }
        self.row_mut(RateKey::Flat).quantity = Quantity::one();
        self.row_mut(RateKey::Airport).rate = airport_fee.max(Money::zero());
    }

    /// Sum of all derived row totals.
    ///
    /// Ineligible rows are 0/0 by construction, so summing every row is the
    /// same as summing the eligible ones.
    pub fn subtotal(&self) -> Money {
        RateKey::ALL
            .iter()
            .fold(Money::zero(), |acc, key| acc + self.row(*key).total())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
