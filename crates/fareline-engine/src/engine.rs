//! # Pricing Engine
//!
//! The message-dispatch layer: one [`PricingEngine`] owns one core
//! [`Quote`] and translates protocol messages into quote operations.
//!
//! ## Dispatch Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inbound message            quote operation              reply          │
//! │  ─────────────────────────  ──────────────────────────   ─────────────  │
//! │  requestReady               (none)                       ready          │
//! │  setVehicleRates            propose_rate per field       ratesChanged   │
//! │  setRates                   set_rate per field           ratesChanged   │
//! │  setRouteData               propose_route_quantity       ratesChanged   │
//! │  setAirportFee              set qty/rate (partial)       ratesChanged   │
//! │  setTieredDistanceTotal     apply_tiered_total           ratesChanged   │
//! │  setGratuity / setPayments  set_gratuity / set_payments  ratesChanged   │
//! │  setAdditionalRates         replace_fee_rules            ratesChanged   │
//! │  setPricingBasis            set_pricing_basis            ratesChanged   │
//! │  getRates                   (none)                       ratesData      │
//! │  clear                      reset                        ratesChanged   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never fail: garbage numbers were already sanitized into the
//! fixed-point types, guarded writes that bounce are logged at debug and
//! dropped, and a message that mutates nothing still publishes a snapshot
//! (an idempotent redraw is harmless, a missed one is not).
//!
//! Local widget-context inputs (the operator typing into the embedded form)
//! arrive as [`LocalEdit`] values rather than protocol messages; they share
//! the same quote and the same snapshot publishing.

use crate::config::EngineConfig;
use crate::protocol::{
    AdditionalRatesPayload, AirportFeePayload, EngineMessage, GratuityPayload, HostMessage,
    PaymentsPayload, PricingBasisPayload, RatesPayload, RoutePayload, RulePayload,
    TieredTotalPayload, VehicleRatesPayload,
};
use fareline_core::{
    FeeBasis, FeeKind, FeeRule, Money, Percent, PricingBasis, PricingSnapshot, Provenance,
    Quantity, Quote, QuoteDefaults, RateKey,
};
use tracing::debug;

// =============================================================================
// LocalEdit
// =============================================================================

/// A manual input from the engine's own widget context.
///
/// Edits arrive on a separate channel from host messages, so they are
/// ordered among themselves but not against host pushes; the provenance
/// guards are what keep stale route data from clobbering them.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalEdit {
    /// Operator typed a row quantity. Non-zero tags the field user-entered;
    /// zero empties it back to overwritable.
    Quantity { key: RateKey, value: f64 },
    /// Operator typed a row rate.
    Rate { key: RateKey, value: f64 },
    /// Operator adjusted the gratuity percentage.
    Gratuity { percent: f64 },
    /// Operator changed a fixed fee rule's quantity.
    FeeQuantity { id: String, value: f64 },
}

// =============================================================================
// PricingEngine
// =============================================================================

/// One reservation's pricing engine: a quote plus message dispatch.
///
/// Synchronous and channel-free; [`crate::service::EngineService`] wraps it
/// in the actor loop.
#[derive(Debug)]
pub struct PricingEngine {
    quote: Quote,
}

impl PricingEngine {
    /// Engine over a fresh quote with the given defaults.
    pub fn new(defaults: QuoteDefaults) -> Self {
        PricingEngine {
            quote: Quote::new(defaults),
        }
    }

    /// Engine with defaults taken from configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        PricingEngine::new(config.quote_defaults())
    }

    /// Read access to the underlying quote.
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// Current full snapshot.
    pub fn snapshot(&self) -> PricingSnapshot {
        self.quote.snapshot()
    }

    /// Handles one host message, returning the messages to publish.
    ///
    /// Infallible by design: anything unusable inside the payload is
    /// dropped field-by-field, never bounced back as an error.
    pub fn handle(&mut self, message: HostMessage) -> Vec<EngineMessage> {
        debug!(message = message.type_name(), "handling host message");
        match message {
            HostMessage::RequestReady => vec![EngineMessage::ready()],
            HostMessage::GetRates => vec![EngineMessage::RatesData(self.quote.snapshot())],

            HostMessage::SetVehicleRates(payload) => {
                self.apply_vehicle_rates(payload);
                self.publish_changed()
            }
            HostMessage::SetRates(payload) => {
                self.apply_rates(payload);
                self.publish_changed()
            }
            HostMessage::SetRouteData(payload) => {
                self.apply_route_data(payload);
                self.publish_changed()
            }
            HostMessage::SetAirportFee(payload) => {
                self.apply_airport_fee(payload);
                self.publish_changed()
            }
            HostMessage::SetTieredDistanceTotal(payload) => {
                self.apply_tiered_total(payload);
                self.publish_changed()
            }
            HostMessage::SetGratuity(payload) => {
                self.apply_gratuity(payload);
                self.publish_changed()
            }
            HostMessage::SetPayments(payload) => {
                self.apply_payments(payload);
                self.publish_changed()
            }
            HostMessage::SetAdditionalRates(payload) => {
                self.apply_additional_rates(payload);
                self.publish_changed()
            }
            HostMessage::SetPricingBasis(payload) => {
                self.apply_pricing_basis(payload);
                self.publish_changed()
            }
            HostMessage::Clear => {
                self.quote.reset();
                self.publish_changed()
            }
        }
    }

    /// Applies one local edit and returns the snapshot to publish.
    pub fn apply_edit(&mut self, edit: LocalEdit) -> EngineMessage {
        match edit {
            LocalEdit::Quantity { key, value } => {
                self.quote.edit_quantity(key, Quantity::from_units(value));
            }
            LocalEdit::Rate { key, value } => {
                self.quote.edit_rate(key, Money::from_dollars(value));
            }
            LocalEdit::Gratuity { percent } => {
                self.quote.set_gratuity(Percent::from_percent(percent));
            }
            LocalEdit::FeeQuantity { id, value } => {
                if !self.quote.set_fee_quantity(&id, Quantity::from_units(value)) {
                    debug!(%id, "fee quantity edit ignored (unknown rule id)");
                }
            }
        }
        EngineMessage::RatesChanged(self.quote.snapshot())
    }

    fn publish_changed(&self) -> Vec<EngineMessage> {
        vec![EngineMessage::RatesChanged(self.quote.snapshot())]
    }

    // -------------------------------------------------------------------------
    // Per-message application
    // -------------------------------------------------------------------------

    fn apply_vehicle_rates(&mut self, payload: VehicleRatesPayload) {
        let proposals = [
            (RateKey::Flat, payload.flat),
            (RateKey::HourRoute, payload.hour_route),
            (RateKey::HourTrip, payload.hour_trip),
            (RateKey::Passenger, payload.passenger),
            (RateKey::Mile, payload.mile),
        ];
        for (key, rate) in proposals {
            if let Some(rate) = rate {
                if !self.quote.propose_rate(key, Money::from_dollars(rate)) {
                    debug!(%key, "vehicle rate proposal skipped, field in use");
                }
            }
        }

        if let Some(percent) = payload.gratuity_percent {
            self.quote.set_gratuity(Percent::from_percent(percent));
        }

        if let Some(minimum) = payload.minimum_fare {
            if !self.quote.apply_minimum_fare(Money::from_dollars(minimum)) {
                debug!("minimum fare proposal skipped, flat row in use");
            }
        }
    }

    fn apply_rates(&mut self, payload: RatesPayload) {
        // Eligibility first, so rates pushed alongside a widened allowed
        // list land in the rows that list just enabled.
        if let Some(allowed) = payload.allowed_pricing_types {
            let basis = self.quote.basis();
            self.quote.set_pricing_basis(basis, &allowed);
        }

        let writes = [
            (RateKey::Flat, payload.flat),
            (RateKey::HourRoute, payload.hour_route),
            (RateKey::HourTrip, payload.hour_trip),
            (RateKey::Passenger, payload.passenger),
            (RateKey::Mile, payload.mile),
        ];
        for (key, rate) in writes {
            if let Some(rate) = rate {
                self.quote.set_rate(key, Money::from_dollars(rate));
            }
        }
    }

    fn apply_route_data(&mut self, payload: RoutePayload) {
        let proposals = [
            (RateKey::Mile, payload.miles),
            (RateKey::HourRoute, payload.hours),
            (RateKey::HourTrip, payload.trip_hours),
            (RateKey::Passenger, payload.passengers),
        ];
        for (key, quantity) in proposals {
            if let Some(quantity) = quantity {
                if !self
                    .quote
                    .propose_route_quantity(key, Quantity::from_units(quantity))
                {
                    debug!(%key, "route quantity skipped, user-entered value present");
                }
            }
        }
    }

    fn apply_airport_fee(&mut self, payload: AirportFeePayload) {
        if let Some(qty) = payload.qty {
            self.quote.set_quantity(
                RateKey::Airport,
                Quantity::from_units(qty),
                Provenance::RouteDerived,
            );
        }
        if let Some(rate) = payload.rate {
            self.quote.set_rate(RateKey::Airport, Money::from_dollars(rate));
        }
    }

    fn apply_tiered_total(&mut self, payload: TieredTotalPayload) {
        self.quote.apply_tiered_total(Money::from_dollars(payload.total));
    }

    fn apply_gratuity(&mut self, payload: GratuityPayload) {
        self.quote.set_gratuity(Percent::from_percent(payload.percent));
    }

    fn apply_payments(&mut self, payload: PaymentsPayload) {
        self.quote.set_payments(Money::from_dollars(payload.amount));
    }

    fn apply_additional_rates(&mut self, payload: AdditionalRatesPayload) {
        let rules = convert_rules(payload.rates);
        self.quote.replace_fee_rules(rules);
    }

    fn apply_pricing_basis(&mut self, payload: PricingBasisPayload) {
        let basis = PricingBasis::from_code(&payload.basis);
        debug!(code = %payload.basis, %basis, "pricing basis selected");
        self.quote.set_pricing_basis(basis, &payload.allowed_types);
    }
}

/// Converts pushed rule payloads into core fee rules, skipping rules whose
/// kind this build does not understand.
fn convert_rules(payloads: Vec<RulePayload>) -> Vec<FeeRule> {
    let mut rules = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let kind = match payload.kind.parse::<FeeKind>() {
            Ok(kind) => kind,
            Err(error) => {
                debug!(%error, rule = %payload.name, "skipping fee rule with unknown kind");
                continue;
            }
        };

        let basis = match kind {
            FeeKind::Fixed => FeeBasis::Fixed {
                amount: Money::from_dollars(payload.amount.unwrap_or(0.0)),
            },
            FeeKind::Percentage => FeeBasis::Percentage {
                percent: Percent::from_percent(payload.value.unwrap_or(0.0)),
            },
            // Missing multiplier value means the neutral factor, not ×0
            FeeKind::Multiplier => FeeBasis::Multiplier {
                factor: Percent::from_factor(payload.value.unwrap_or(1.0)),
            },
        };

        let active = match payload.status.as_deref() {
            None => true,
            Some(status) => match status.trim().to_ascii_lowercase().as_str() {
                "active" => true,
                "inactive" => false,
                other => {
                    debug!(rule = %payload.name, status = %other, "unknown rule status, treating as inactive");
                    false
                }
            },
        };

        let quantity = payload
            .quantity
            .map(Quantity::from_units)
            .unwrap_or_else(Quantity::one);

        rules.push(FeeRule {
            id: payload.id,
            name: payload.name,
            basis,
            active,
            quantity,
        });
    }
    rules
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PROTOCOL_VERSION;

    fn engine() -> PricingEngine {
        PricingEngine::new(QuoteDefaults::default())
    }

    /// Unwraps the single ratesChanged snapshot a mutating message yields.
    fn changed(replies: Vec<EngineMessage>) -> PricingSnapshot {
        assert_eq!(replies.len(), 1);
        match replies.into_iter().next().unwrap() {
            EngineMessage::RatesChanged(snapshot) => snapshot,
            other => panic!("expected ratesChanged, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_request_ready_replies_ready() {
        let replies = engine().handle(HostMessage::RequestReady);
        assert_eq!(replies.len(), 1);
        match &replies[0] {
            EngineMessage::Ready(payload) => {
                assert_eq!(payload.protocol_version, PROTOCOL_VERSION)
            }
            other => panic!("expected ready, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_get_rates_replies_rates_data() {
        let mut engine = engine();
        let replies = engine.handle(HostMessage::GetRates);
        assert_eq!(replies.len(), 1);
        match &replies[0] {
            EngineMessage::RatesData(snapshot) => assert!(snapshot.subtotal.is_zero()),
            other => panic!("expected ratesData, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_every_mutation_publishes_one_snapshot() {
        let mut engine = engine();
        let snapshot = changed(engine.handle(HostMessage::set_gratuity(25.0)));
        assert_eq!(snapshot.gratuity_percent, Percent::from_percent(25.0));
    }

    #[test]
    fn test_vehicle_rates_fill_only_empty_fields() {
        let mut engine = engine();

        // Typed-in hourRoute rate
        engine.handle(HostMessage::SetRates(RatesPayload {
            hour_route: Some(45.0),
            ..Default::default()
        }));

        // Vehicle defaults: hourRoute must survive, mile fills in
        let snapshot = changed(engine.handle(HostMessage::SetVehicleRates(VehicleRatesPayload {
            hour_route: Some(65.0),
            mile: Some(3.5),
            ..Default::default()
        })));

        assert_eq!(
            snapshot.row(RateKey::HourRoute).unwrap().rate,
            Money::from_dollars(45.0)
        );
        assert_eq!(snapshot.row(RateKey::Mile).unwrap().rate, Money::from_dollars(3.5));
    }

    #[test]
    fn test_vehicle_gratuity_overwrites_default() {
        let mut engine = engine();
        let snapshot = changed(engine.handle(HostMessage::SetVehicleRates(VehicleRatesPayload {
            gratuity_percent: Some(18.0),
            ..Default::default()
        })));
        assert_eq!(snapshot.gratuity_percent, Percent::from_percent(18.0));
    }

    #[test]
    fn test_minimum_fare_lands_in_flat_row() {
        let mut engine = engine();
        let snapshot = changed(engine.handle(HostMessage::SetVehicleRates(VehicleRatesPayload {
            minimum_fare: Some(70.0),
            ..Default::default()
        })));

        let flat = snapshot.row(RateKey::Flat).unwrap();
        assert_eq!(flat.rate, Money::from_dollars(70.0));
        assert_eq!(flat.quantity, Quantity::one());
        assert_eq!(flat.total, Money::from_dollars(70.0));
    }

    #[test]
    fn test_route_data_respects_user_edits() {
        let mut engine = engine();

        // Operator typed 20 miles by hand
        engine.apply_edit(LocalEdit::Quantity {
            key: RateKey::Mile,
            value: 20.0,
        });

        // Stale route arrives afterwards: miles stay, hours fill in
        let snapshot = changed(engine.handle(HostMessage::SetRouteData(RoutePayload {
            miles: Some(12.0),
            hours: Some(1.5),
            ..Default::default()
        })));

        let mile = snapshot.row(RateKey::Mile).unwrap();
        assert_eq!(mile.quantity, Quantity::from_units(20.0));
        assert_eq!(mile.quantity_source, Provenance::User);

        let hour = snapshot.row(RateKey::HourRoute).unwrap();
        assert_eq!(hour.quantity, Quantity::from_units(1.5));
        assert_eq!(hour.quantity_source, Provenance::RouteDerived);
    }

    #[test]
    fn test_route_data_partial_update_leaves_other_fields() {
        let mut engine = engine();
        engine.handle(HostMessage::SetRouteData(RoutePayload {
            hours: Some(2.0),
            ..Default::default()
        }));

        // A later miles-only push must not clear the hours
        let snapshot = changed(engine.handle(HostMessage::SetRouteData(RoutePayload {
            miles: Some(24.5),
            ..Default::default()
        })));

        assert_eq!(
            snapshot.row(RateKey::HourRoute).unwrap().quantity,
            Quantity::from_units(2.0)
        );
        assert_eq!(
            snapshot.row(RateKey::Mile).unwrap().quantity,
            Quantity::from_units(24.5)
        );
    }

    #[test]
    fn test_airport_fee_partial_update() {
        let mut engine = engine();

        // qty alone: default $15 rate becomes billable and visible
        let snapshot = changed(engine.handle(HostMessage::set_airport_fee(Some(1.0), None)));
        let airport = snapshot.row(RateKey::Airport).unwrap();
        assert!(airport.visible);
        assert_eq!(airport.total, Money::from_dollars(15.0));

        // rate alone: qty survives
        let snapshot = changed(engine.handle(HostMessage::set_airport_fee(None, Some(22.0))));
        let airport = snapshot.row(RateKey::Airport).unwrap();
        assert_eq!(airport.quantity, Quantity::one());
        assert_eq!(airport.total, Money::from_dollars(22.0));
    }

    #[test]
    fn test_tiered_total_overwrites_flat_row() {
        let mut engine = engine();
        engine.handle(HostMessage::SetRates(RatesPayload {
            flat: Some(40.0),
            ..Default::default()
        }));

        let snapshot = changed(engine.handle(HostMessage::set_tiered_distance_total(95.0)));
        let flat = snapshot.row(RateKey::Flat).unwrap();
        assert_eq!(flat.rate, Money::from_dollars(95.0));
        assert_eq!(flat.quantity, Quantity::one());
    }

    #[test]
    fn test_numeric_garbage_coerces_to_zero() {
        let mut engine = engine();

        let snapshot = changed(engine.handle(HostMessage::set_gratuity(f64::NAN)));
        assert!(snapshot.gratuity_percent.is_zero());

        let snapshot = changed(engine.handle(HostMessage::set_payments(-50.0)));
        assert!(snapshot.payments_applied.is_zero());

        let snapshot = changed(engine.handle(HostMessage::SetRouteData(RoutePayload {
            miles: Some(f64::NAN),
            ..Default::default()
        })));
        assert!(snapshot.row(RateKey::Mile).unwrap().quantity.is_zero());
    }

    #[test]
    fn test_additional_rates_replace_wholesale() {
        let mut engine = engine();
        engine.handle(HostMessage::SetAdditionalRates(AdditionalRatesPayload {
            rates: vec![RulePayload {
                id: "a".into(),
                name: "Fee A".into(),
                kind: "fixed".into(),
                amount: Some(10.0),
                ..Default::default()
            }],
        }));

        let snapshot = changed(engine.handle(HostMessage::SetAdditionalRates(
            AdditionalRatesPayload {
                rates: vec![RulePayload {
                    id: "b".into(),
                    name: "Fee B".into(),
                    kind: "percentage".into(),
                    value: Some(5.0),
                    ..Default::default()
                }],
            },
        )));

        assert_eq!(snapshot.additional_rates.len(), 1);
        assert_eq!(snapshot.additional_rates[0].id, "b");
        assert_eq!(snapshot.additional_rates[0].kind, FeeKind::Percentage);
    }

    #[test]
    fn test_unknown_rule_kind_is_skipped() {
        let mut engine = engine();
        let snapshot = changed(engine.handle(HostMessage::SetAdditionalRates(
            AdditionalRatesPayload {
                rates: vec![
                    RulePayload {
                        id: "ok".into(),
                        name: "Booking Fee".into(),
                        kind: "fixed".into(),
                        amount: Some(10.0),
                        ..Default::default()
                    },
                    RulePayload {
                        id: "weird".into(),
                        name: "Quantum Surge".into(),
                        kind: "quantum".into(),
                        value: Some(9000.0),
                        ..Default::default()
                    },
                ],
            },
        )));

        assert_eq!(snapshot.additional_rates.len(), 1);
        assert_eq!(snapshot.additional_rates[0].id, "ok");
    }

    #[test]
    fn test_rule_status_parsing() {
        let mut engine = engine();
        let snapshot = changed(engine.handle(HostMessage::SetAdditionalRates(
            AdditionalRatesPayload {
                rates: vec![
                    RulePayload {
                        id: "implicit".into(),
                        name: "Implicit".into(),
                        kind: "fixed".into(),
                        amount: Some(1.0),
                        ..Default::default()
                    },
                    RulePayload {
                        id: "off".into(),
                        name: "Off".into(),
                        kind: "fixed".into(),
                        amount: Some(1.0),
                        status: Some("inactive".into()),
                        ..Default::default()
                    },
                    RulePayload {
                        id: "odd".into(),
                        name: "Odd".into(),
                        kind: "fixed".into(),
                        amount: Some(1.0),
                        status: Some("paused".into()),
                        ..Default::default()
                    },
                ],
            },
        )));

        assert!(snapshot.additional_rates[0].active);
        assert!(!snapshot.additional_rates[1].active);
        assert!(!snapshot.additional_rates[2].active);
    }

    #[test]
    fn test_basis_switch_clears_hidden_rows() {
        let mut engine = engine();
        engine.handle(HostMessage::SetRates(RatesPayload {
            hour_route: Some(40.0),
            ..Default::default()
        }));
        engine.apply_edit(LocalEdit::Quantity {
            key: RateKey::HourRoute,
            value: 3.0,
        });

        let snapshot = changed(engine.handle(HostMessage::set_pricing_basis(
            "DISTANCE",
            vec!["DISTANCE".to_string()],
        )));

        let hour = snapshot.row(RateKey::HourRoute).unwrap();
        assert!(!hour.visible);
        assert!(hour.quantity.is_zero());
        assert!(hour.rate.is_zero());
        assert!(snapshot.subtotal.is_zero());
    }

    #[test]
    fn test_unknown_basis_code_falls_back_to_flat() {
        let mut engine = engine();
        engine.handle(HostMessage::set_pricing_basis("CHARTER_2049", vec![]));
        assert_eq!(engine.quote().basis(), PricingBasis::Flat);
    }

    #[test]
    fn test_set_rates_can_widen_eligibility() {
        let mut engine = engine();
        engine.handle(HostMessage::set_pricing_basis(
            "DISTANCE",
            vec!["DISTANCE".to_string()],
        ));

        // hourRoute is hidden; pushing its rate alongside a widened allowed
        // list must land
        let snapshot = changed(engine.handle(HostMessage::SetRates(RatesPayload {
            hour_route: Some(40.0),
            allowed_pricing_types: Some(vec!["DISTANCE".to_string(), "HOURLY".to_string()]),
            ..Default::default()
        })));

        let hour = snapshot.row(RateKey::HourRoute).unwrap();
        assert!(hour.visible);
        assert_eq!(hour.rate, Money::from_dollars(40.0));
    }

    #[test]
    fn test_clear_resets_quote() {
        let mut engine = engine();
        engine.handle(HostMessage::SetRates(RatesPayload {
            flat: Some(50.0),
            ..Default::default()
        }));
        engine.handle(HostMessage::set_gratuity(25.0));
        engine.handle(HostMessage::set_payments(40.0));
        engine.handle(HostMessage::SetAdditionalRates(AdditionalRatesPayload {
            rates: vec![RulePayload {
                id: "bf".into(),
                name: "Booking Fee".into(),
                kind: "fixed".into(),
                amount: Some(10.0),
                quantity: Some(4.0),
                ..Default::default()
            }],
        }));

        let snapshot = changed(engine.handle(HostMessage::Clear));

        let flat = snapshot.row(RateKey::Flat).unwrap();
        assert_eq!(flat.quantity, Quantity::one());
        assert!(flat.rate.is_zero());
        assert_eq!(snapshot.gratuity_percent, Percent::from_percent(20.0));
        assert!(snapshot.payments_applied.is_zero());
        // The rule list survives, its quantity resets
        assert_eq!(snapshot.additional_rates.len(), 1);
        assert_eq!(snapshot.additional_rates[0].quantity, Quantity::one());
    }

    #[test]
    fn test_full_session_breakdown() {
        let mut engine = engine();

        engine.handle(HostMessage::SetRates(RatesPayload {
            flat: Some(50.0),
            hour_route: Some(30.0),
            ..Default::default()
        }));
        engine.handle(HostMessage::SetRouteData(RoutePayload {
            hours: Some(2.0),
            ..Default::default()
        }));
        engine.handle(HostMessage::SetAdditionalRates(AdditionalRatesPayload {
            rates: vec![RulePayload {
                id: "fuel".into(),
                name: "Fuel Surcharge".into(),
                kind: "percentage".into(),
                value: Some(10.0),
                ..Default::default()
            }],
        }));
        engine.handle(HostMessage::set_payments(50.0));

        let replies = engine.handle(HostMessage::GetRates);
        let snapshot = match replies.into_iter().next().unwrap() {
            EngineMessage::RatesData(snapshot) => snapshot,
            other => panic!("expected ratesData, got {}", other.type_name()),
        };

        assert_eq!(snapshot.subtotal, Money::from_dollars(110.0));
        assert_eq!(snapshot.gratuity_total, Money::from_dollars(22.0));
        assert_eq!(snapshot.additional_total, Money::from_dollars(11.0));
        assert_eq!(snapshot.grand_total, Money::from_dollars(143.0));
        assert_eq!(snapshot.balance_due, Money::from_dollars(93.0));
    }

    #[test]
    fn test_local_edits_publish_snapshots() {
        let mut engine = engine();
        engine.handle(HostMessage::SetRates(RatesPayload {
            mile: Some(3.5),
            ..Default::default()
        }));

        let reply = engine.apply_edit(LocalEdit::Quantity {
            key: RateKey::Mile,
            value: 10.0,
        });
        match reply {
            EngineMessage::RatesChanged(snapshot) => {
                assert_eq!(snapshot.subtotal, Money::from_dollars(35.0));
            }
            other => panic!("expected ratesChanged, got {}", other.type_name()),
        }

        // Unknown fee rule id: no-op but still publishes
        let reply = engine.apply_edit(LocalEdit::FeeQuantity {
            id: "ghost".into(),
            value: 2.0,
        });
        assert!(matches!(reply, EngineMessage::RatesChanged(_)));
    }
}
