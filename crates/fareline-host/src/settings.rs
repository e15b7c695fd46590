//! # Host-Side Rate Settings
//!
//! The facts the reservation system stores about a vehicle type: its default
//! rates, its distance pricing, and the extra fee rules configured for it.
//!
//! ## Settings Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      VehicleRateSchedule                                │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌─────────────────────┐   │
//! │  │  Default Rates   │  │  Distance Rules  │  │  Policy             │   │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────             │   │
//! │  │  flat_rate       │  │  included_miles  │  │  minimum_fare       │   │
//! │  │  hourly_rate     │  │  distance_tiers  │  │  default_gratuity_  │   │
//! │  │  hourly_trip_rate│  │  (up to N miles  │  │  percent            │   │
//! │  │  per_passenger   │  │   costs $X)      │  │  allowed_pricing_   │   │
//! │  │  per_mile_rate   │  │                  │  │  types              │   │
//! │  │  airport_fee     │  │                  │  │                     │   │
//! │  └──────────────────┘  └──────────────────┘  └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here stays in the host's native units (dollars, percent,
//! miles as floats); the fixed-point types live on the engine's side of
//! the boundary. Rates left as `None` are simply never proposed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fareline_engine::protocol::RulePayload;

// =============================================================================
// Distance Tier
// =============================================================================

/// One rung of a tiered point-to-point price table: trips up to
/// `up_to_miles` cost `total`, all-in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTier {
    /// Upper bound (inclusive) on trip distance for this tier.
    pub up_to_miles: f64,

    /// All-in trip total in dollars.
    pub total: f64,
}

impl DistanceTier {
    /// A tier covering trips up to the given distance.
    pub fn new(up_to_miles: f64, total: f64) -> Self {
        DistanceTier { up_to_miles, total }
    }

    fn covers(&self, miles: f64) -> bool {
        self.up_to_miles.is_finite() && self.total.is_finite() && miles <= self.up_to_miles
    }
}

// =============================================================================
// Vehicle Rate Schedule
// =============================================================================

/// Default rates and distance pricing for one vehicle type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRateSchedule {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g., "Stretch Limo", "Executive Sedan").
    pub name: String,

    /// Default flat rate in dollars.
    pub flat_rate: Option<f64>,

    /// Default hourly rate in dollars (route-duration billing).
    pub hourly_rate: Option<f64>,

    /// Default hourly rate for as-directed trips in dollars.
    pub hourly_trip_rate: Option<f64>,

    /// Default per-passenger rate in dollars.
    pub per_passenger_rate: Option<f64>,

    /// Default per-mile rate in dollars.
    pub per_mile_rate: Option<f64>,

    /// Airport surcharge rate in dollars, overriding the engine's default.
    pub airport_fee: Option<f64>,

    /// Minimum fare floor in dollars, applied as a flat-row base.
    pub minimum_fare: Option<f64>,

    /// Default gratuity percentage for this vehicle type.
    pub default_gratuity_percent: Option<f64>,

    /// Miles included before per-mile billing starts.
    #[serde(default)]
    pub included_miles: f64,

    /// Tiered point-to-point price table. Empty means per-mile billing.
    #[serde(default)]
    pub distance_tiers: Vec<DistanceTier>,

    /// Pricing-type codes this vehicle may bill under. Empty fails open to
    /// every billing row.
    #[serde(default)]
    pub allowed_pricing_types: Vec<String>,
}

impl VehicleRateSchedule {
    /// A named schedule with a generated id and no rates set.
    pub fn new(name: impl Into<String>) -> Self {
        VehicleRateSchedule {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// The tiered trip total for a measured distance, if a tier covers it.
    ///
    /// The cheapest covering tier wins. Totals below the minimum fare are
    /// raised to it. Trips beyond the last tier return `None` and fall back
    /// to per-mile billing.
    pub fn tiered_total(&self, miles: f64) -> Option<f64> {
        if !miles.is_finite() || miles < 0.0 {
            return None;
        }

        let tier = self
            .distance_tiers
            .iter()
            .filter(|tier| tier.covers(miles))
            .min_by(|a, b| {
                a.up_to_miles
                    .partial_cmp(&b.up_to_miles)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let floor = self.minimum_fare.unwrap_or(0.0);
        Some(tier.total.max(floor))
    }

    /// Billable mileage after the included-miles allowance.
    pub fn billable_miles(&self, measured: f64) -> f64 {
        if !measured.is_finite() || measured < 0.0 {
            return 0.0;
        }
        let included = if self.included_miles.is_finite() {
            self.included_miles.max(0.0)
        } else {
            0.0
        };
        (measured - included).max(0.0)
    }

    /// True if any default rate is configured.
    pub fn has_rates(&self) -> bool {
        self.flat_rate.is_some()
            || self.hourly_rate.is_some()
            || self.hourly_trip_rate.is_some()
            || self.per_passenger_rate.is_some()
            || self.per_mile_rate.is_some()
    }
}

// =============================================================================
// Additional Fee Setting
// =============================================================================

/// One extra fee rule as the reservation system stores it.
///
/// The `kind` string stays exactly as persisted; the engine parses it and
/// skips kinds it does not recognize, so newer host builds can carry rules
/// an older engine ignores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalFeeSetting {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the breakdown (e.g., "Fuel Surcharge").
    pub name: String,

    /// Fee kind as stored: "fixed", "percentage", or "multiplier".
    pub kind: String,

    /// Dollar amount, for fixed fees.
    pub amount: Option<f64>,

    /// Percent or multiplier factor, for the other kinds.
    pub value: Option<f64>,

    /// Whether the fee participates in pricing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AdditionalFeeSetting {
    /// A fixed-amount fee (enabled).
    pub fn fixed(name: impl Into<String>, amount: f64) -> Self {
        AdditionalFeeSetting {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind: "fixed".into(),
            amount: Some(amount),
            value: None,
            enabled: true,
        }
    }

    /// A percentage-of-subtotal fee (enabled).
    pub fn percentage(name: impl Into<String>, percent: f64) -> Self {
        AdditionalFeeSetting {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind: "percentage".into(),
            amount: None,
            value: Some(percent),
            enabled: true,
        }
    }

    /// A subtotal-multiplier fee (enabled).
    pub fn multiplier(name: impl Into<String>, factor: f64) -> Self {
        AdditionalFeeSetting {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind: "multiplier".into(),
            amount: None,
            value: Some(factor),
            enabled: true,
        }
    }

    /// Marks the fee disabled (builder-style).
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The wire payload for this fee.
    pub fn to_rule_payload(&self) -> RulePayload {
        RulePayload {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            amount: self.amount,
            value: self.value,
            quantity: None,
            status: Some(if self.enabled { "active" } else { "inactive" }.to_string()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tiered_schedule() -> VehicleRateSchedule {
        let mut schedule = VehicleRateSchedule::new("Sedan");
        schedule.distance_tiers = vec![
            DistanceTier::new(25.0, 75.0),
            DistanceTier::new(10.0, 40.0),
        ];
        schedule
    }

    #[test]
    fn test_cheapest_covering_tier_wins() {
        let schedule = tiered_schedule();
        // Both tiers cover 8 miles, the 10-mile tier is cheaper
        assert_eq!(schedule.tiered_total(8.0), Some(40.0));
        assert_eq!(schedule.tiered_total(10.0), Some(40.0)); // inclusive bound
        assert_eq!(schedule.tiered_total(18.0), Some(75.0));
    }

    #[test]
    fn test_beyond_last_tier_falls_back_to_mileage() {
        let schedule = tiered_schedule();
        assert_eq!(schedule.tiered_total(30.0), None);
    }

    #[test]
    fn test_tiered_total_respects_minimum_fare() {
        let mut schedule = tiered_schedule();
        schedule.minimum_fare = Some(60.0);
        // The 10-mile tier ($40) sits below the floor
        assert_eq!(schedule.tiered_total(8.0), Some(60.0));
        assert_eq!(schedule.tiered_total(18.0), Some(75.0));
    }

    #[test]
    fn test_tiered_total_rejects_garbage_distances() {
        let schedule = tiered_schedule();
        assert_eq!(schedule.tiered_total(f64::NAN), None);
        assert_eq!(schedule.tiered_total(-5.0), None);
    }

    #[test]
    fn test_billable_miles_subtracts_allowance() {
        let mut schedule = VehicleRateSchedule::new("Sedan");
        schedule.included_miles = 5.0;

        assert_eq!(schedule.billable_miles(22.5), 17.5);
        assert_eq!(schedule.billable_miles(3.0), 0.0);
        assert_eq!(schedule.billable_miles(f64::NAN), 0.0);
    }

    #[test]
    fn test_has_rates() {
        let mut schedule = VehicleRateSchedule::new("Sedan");
        assert!(!schedule.has_rates());
        schedule.per_mile_rate = Some(3.5);
        assert!(schedule.has_rates());
    }

    #[test]
    fn test_fee_setting_payload_status() {
        let fee = AdditionalFeeSetting::percentage("Fuel Surcharge", 10.0);
        let payload = fee.to_rule_payload();
        assert_eq!(payload.kind, "percentage");
        assert_eq!(payload.value, Some(10.0));
        assert_eq!(payload.status.as_deref(), Some("active"));

        let off = AdditionalFeeSetting::fixed("Tolls", 12.0).disabled();
        assert_eq!(off.to_rule_payload().status.as_deref(), Some("inactive"));
    }

    #[test]
    fn test_schedule_serde_defaults() {
        let schedule: VehicleRateSchedule = serde_json::from_str(
            r#"{"id":"v1","name":"Sedan","per_mile_rate":3.5}"#,
        )
        .unwrap();
        assert_eq!(schedule.included_miles, 0.0);
        assert!(schedule.distance_tiers.is_empty());
        assert!(schedule.allowed_pricing_types.is_empty());
        assert_eq!(schedule.per_mile_rate, Some(3.5));
        assert_eq!(schedule.airport_fee, None);
    }
}
