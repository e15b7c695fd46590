//! # Rate Applier
//!
//! Translates the two independent host-side facts - the vehicle's rate
//! schedule and the measured route - into engine proposals.
//!
//! ## Proposal Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          RateApplier                                    │
//! │                                                                         │
//! │   VehicleRateSchedule ──┬─► setVehicleRates (rates + gratuity + min)    │
//! │                         └─► setAirportFee { rate }  (schedule override) │
//! │   AdditionalFeeSettings ──► setAdditionalRates (replace-all)            │
//! │   service-type code ──────► setPricingBasis (allowed types from         │
//! │                             the schedule)                               │
//! │                                                                         │
//! │   RouteMeasurement ──┬──► setTieredDistanceTotal   (tier table covers)  │
//! │                      ├──► setRouteData             (billable qty)       │
//! │                      └──► setAirportFee { qty }    (airport stops)      │
//! │                                                                         │
//! │  PRECEDENCE (enforced on the engine side, not here):                    │
//! │  ──────────────────────────────────────────────────                     │
//! │  • vehicle rates fill only empty rate fields                            │
//! │  • route quantities never overwrite user-typed quantities               │
//! │                                                                         │
//! │  The applier may therefore re-push the same facts any number of         │
//! │  times, in any order relative to operator edits, without damage.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use fareline_engine::protocol::{
    AdditionalRatesPayload, HostMessage, RoutePayload, VehicleRatesPayload,
};
use fareline_engine::{EngineHandle, EngineResult};

use crate::settings::{AdditionalFeeSetting, VehicleRateSchedule};

// =============================================================================
// Route Measurement
// =============================================================================

/// What the routing layer measured for one trip. Fields left as `None`
/// were not measured and are never proposed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMeasurement {
    /// Trip distance in miles.
    pub miles: Option<f64>,

    /// Route duration in hours.
    pub hours: Option<f64>,

    /// As-directed duration in hours.
    pub trip_hours: Option<f64>,

    /// Passenger count.
    pub passengers: Option<u32>,

    /// Number of airport stops on the itinerary.
    pub airport_stops: u32,
}

// =============================================================================
// Rate Applier
// =============================================================================

/// Builds and pushes pricing proposals for one vehicle selection.
///
/// The applier is stateless beyond its settings: every push is a full
/// restatement of the host's current facts, and the engine's guards decide
/// what lands.
#[derive(Debug, Clone)]
pub struct RateApplier {
    schedule: VehicleRateSchedule,
    fees: Vec<AdditionalFeeSetting>,
}

impl RateApplier {
    /// An applier for the given vehicle schedule.
    pub fn new(schedule: VehicleRateSchedule) -> Self {
        RateApplier {
            schedule,
            fees: Vec::new(),
        }
    }

    /// Attaches the configured fee rules (builder-style).
    pub fn with_fees(mut self, fees: Vec<AdditionalFeeSetting>) -> Self {
        self.fees = fees;
        self
    }

    /// The schedule this applier proposes from.
    pub fn schedule(&self) -> &VehicleRateSchedule {
        &self.schedule
    }

    // -------------------------------------------------------------------------
    // Pure message builders
    // -------------------------------------------------------------------------

    /// The vehicle-defaults proposal: rates, gratuity, and minimum fare.
    pub fn vehicle_rates_message(&self) -> HostMessage {
        HostMessage::SetVehicleRates(VehicleRatesPayload {
            flat: self.schedule.flat_rate,
            hour_route: self.schedule.hourly_rate,
            hour_trip: self.schedule.hourly_trip_rate,
            passenger: self.schedule.per_passenger_rate,
            mile: self.schedule.per_mile_rate,
            gratuity_percent: self.schedule.default_gratuity_percent,
            minimum_fare: self.schedule.minimum_fare,
        })
    }

    /// The airport-rate override, when the schedule defines one. The
    /// quantity side stays untouched; only routes flag airport legs.
    pub fn airport_fee_message(&self) -> Option<HostMessage> {
        self.schedule
            .airport_fee
            .map(|rate| HostMessage::set_airport_fee(None, Some(rate)))
    }

    /// The pricing-basis selection for a reservation's service type,
    /// carrying the schedule's allowed pricing-type list.
    pub fn basis_message(&self, service_type: &str) -> HostMessage {
        HostMessage::set_pricing_basis(service_type, self.schedule.allowed_pricing_types.clone())
    }

    /// The replace-all fee rule push. An empty fee list is still pushed:
    /// the host's latest word is "no rules".
    pub fn fee_rules_message(&self) -> HostMessage {
        HostMessage::SetAdditionalRates(AdditionalRatesPayload {
            rates: self
                .fees
                .iter()
                .map(AdditionalFeeSetting::to_rule_payload)
                .collect(),
        })
    }

    /// The proposals derived from one route measurement.
    ///
    /// Distance goes through the tier table first; only uncovered trips
    /// bill per-mile, after the included-miles allowance.
    pub fn route_messages(&self, route: &RouteMeasurement) -> Vec<HostMessage> {
        let mut messages = Vec::new();
        let mut payload = RoutePayload::default();
        let mut tiered = None;

        if let Some(miles) = route.miles {
            match self.schedule.tiered_total(miles) {
                Some(total) => {
                    debug!(miles, total, "distance covered by tier table");
                    tiered = Some(total);
                }
                None => payload.miles = Some(self.schedule.billable_miles(miles)),
            }
        }

        payload.hours = route.hours;
        payload.trip_hours = route.trip_hours;
        payload.passengers = route.passengers.map(f64::from);

        let has_quantities = payload.miles.is_some()
            || payload.hours.is_some()
            || payload.trip_hours.is_some()
            || payload.passengers.is_some();
        if has_quantities {
            messages.push(HostMessage::SetRouteData(payload));
        }

        if let Some(total) = tiered {
            messages.push(HostMessage::set_tiered_distance_total(total));
        }

        if route.airport_stops > 0 {
            messages.push(HostMessage::set_airport_fee(
                Some(f64::from(route.airport_stops)),
                None,
            ));
        }

        messages
    }

    // -------------------------------------------------------------------------
    // Engine pushes
    // -------------------------------------------------------------------------

    /// Pushes everything for a fresh vehicle selection: defaults, the
    /// airport-rate override, fee rules, then route-derived quantities.
    pub async fn apply(
        &self,
        handle: &EngineHandle,
        route: &RouteMeasurement,
    ) -> EngineResult<()> {
        debug!(vehicle = %self.schedule.name, "applying vehicle rate schedule");
        handle.send(self.vehicle_rates_message()).await?;
        if let Some(message) = self.airport_fee_message() {
            handle.send(message).await?;
        }
        handle.send(self.fee_rules_message()).await?;
        self.apply_route(handle, route).await
    }

    /// Pushes the basis selection for the reservation's service type.
    /// Sent ahead of rates so eligibility is settled first.
    pub async fn apply_service_type(
        &self,
        handle: &EngineHandle,
        service_type: &str,
    ) -> EngineResult<()> {
        handle.send(self.basis_message(service_type)).await
    }

    /// Pushes only the route-derived proposals, for re-routes where the
    /// vehicle selection is unchanged.
    pub async fn apply_route(
        &self,
        handle: &EngineHandle,
        route: &RouteMeasurement,
    ) -> EngineResult<()> {
        for message in self.route_messages(route) {
            handle.send(message).await?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
