//! # Quote Module
//!
//! The aggregate pricing state for one reservation and the totals math that
//! turns it into a [`PricingSnapshot`].
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   RateSheet (6 rows)                                                    │
//! │        │  Σ rate × quantity                                             │
//! │        ▼                                                                │
//! │   subtotal ──────────────┬──────────────────────────┐                   │
//! │        │                 │                          │                   │
//! │        │            × gratuity %              fee rules (each vs        │
//! │        │                 │                    the BASE subtotal)        │
//! │        │                 ▼                          ▼                   │
//! │        │           gratuityTotal            additionalTotal             │
//! │        │                 │                          │                   │
//! │        └────────────┬────┴──────────────────────────┘                   │
//! │                     ▼                                                   │
//! │               grandTotal ── paymentsApplied ──► balanceDue              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eligibility Enforcement
//! Every write path goes through the quote, and the quote drops writes that
//! target an ineligible row. Combined with clearing-on-hide this gives the
//! core guarantee: a hidden row is 0/0 and stays 0/0 until re-enabled, so
//! the subtotal can blindly sum all rows.
//!
//! Deriving a snapshot never mutates anything, so pricing the same state
//! twice yields identical snapshots.

use crate::basis::{Eligibility, PricingBasis};
use crate::money::{Money, Percent, Quantity};
use crate::rules::{FeeRule, FeeSchedule};
use crate::sheet::{Provenance, RateKey, RateSheet};
use crate::snapshot::{FeeLineState, PricingSnapshot, RateRowState};
use crate::{DEFAULT_AIRPORT_FEE_CENTS, DEFAULT_GRATUITY_BPS};

// =============================================================================
// QuoteDefaults
// =============================================================================

/// The configurable baseline a quote starts from and resets to.
///
/// Injected once at engine construction so the defaults live in exactly one
/// place; `clear` restores these values, not hard-coded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteDefaults {
    pub gratuity: Percent,
    pub airport_fee: Money,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        QuoteDefaults {
            gratuity: Percent::from_bps(DEFAULT_GRATUITY_BPS),
            airport_fee: Money::from_cents(DEFAULT_AIRPORT_FEE_CENTS),
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

/// All pricing state for one reservation.
///
/// Owned by the engine; the host only ever sees snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    sheet: RateSheet,
    basis: PricingBasis,
    eligibility: Eligibility,
    fees: FeeSchedule,
    gratuity: Percent,
    payments: Money,
    defaults: QuoteDefaults,
}

impl Quote {
    /// A fresh quote: default rows, all rows eligible, flat basis, no fee
    /// rules, the configured default gratuity, no payments.
    pub fn new(defaults: QuoteDefaults) -> Self {
        Quote {
            sheet: RateSheet::new(defaults.airport_fee),
            basis: PricingBasis::default(),
            eligibility: Eligibility::all(),
            fees: FeeSchedule::new(),
            gratuity: defaults.gratuity,
            payments: Money::zero(),
            defaults,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn sheet(&self) -> &RateSheet {
        &self.sheet
    }

    pub fn basis(&self) -> PricingBasis {
        self.basis
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    pub fn gratuity(&self) -> Percent {
        self.gratuity
    }

    pub fn payments(&self) -> Money {
        self.payments
    }

    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    // -------------------------------------------------------------------------
    // Row writes (host-pushed)
    // -------------------------------------------------------------------------
    // Every row write checks eligibility first: a hidden row must stay 0/0
    // until it is re-enabled, no matter what arrives for it.

    /// Unguarded rate write (host `setRates` and airport fee path).
    pub fn set_rate(&mut self, key: RateKey, rate: Money) {
        if !self.eligibility.contains(key) {
            return;
        }
        self.sheet.set_rate(key, rate);
    }

    /// Unguarded quantity write with an explicit origin tag.
    pub fn set_quantity(&mut self, key: RateKey, quantity: Quantity, source: Provenance) {
        if !self.eligibility.contains(key) {
            return;
        }
        self.sheet.set_quantity(key, quantity, source);
    }

    /// Empty-field-guarded rate proposal (vehicle default rates).
    pub fn propose_rate(&mut self, key: RateKey, rate: Money) -> bool {
        if !self.eligibility.contains(key) {
            return false;
        }
        self.sheet.propose_rate(key, rate)
    }

    /// Provenance-guarded quantity proposal (route-derived values).
    pub fn propose_route_quantity(&mut self, key: RateKey, quantity: Quantity) -> bool {
        if !self.eligibility.contains(key) {
            return false;
        }
        self.sheet.propose_route_quantity(key, quantity)
    }

    /// Minimum-fare floor: lands in the flat row as `(qty 1, rate minimum)`,
    /// each side under its own guard, so a typed-in flat price or quantity
    /// survives. Returns whether anything was written.
    pub fn apply_minimum_fare(&mut self, minimum: Money) -> bool {
        let wrote_rate = self.propose_rate(RateKey::Flat, minimum);
        let wrote_qty = self.propose_route_quantity(RateKey::Flat, Quantity::one());
        wrote_rate || wrote_qty
    }

    /// Tiered-distance total: the matched tier price is authoritative and
    /// lands in the flat row unguarded as `(qty 1, rate total)`.
    pub fn apply_tiered_total(&mut self, total: Money) {
        self.set_rate(RateKey::Flat, total);
        self.set_quantity(RateKey::Flat, Quantity::one(), Provenance::RouteDerived);
    }

    // -------------------------------------------------------------------------
    // Row writes (widget-local user edits)
    // -------------------------------------------------------------------------

    /// User-typed quantity. A non-zero value tags the field `User` (route
    /// pushes must leave it alone); clearing back to zero returns the field
    /// to `Empty` so autofill works again.
    pub fn edit_quantity(&mut self, key: RateKey, quantity: Quantity) {
        let source = if quantity.max(Quantity::zero()).is_zero() {
            Provenance::Empty
        } else {
            Provenance::User
        };
        self.set_quantity(key, quantity, source);
    }

    /// User-typed rate. Rates carry no provenance; the empty-field guard on
    /// proposals is what protects them.
    pub fn edit_rate(&mut self, key: RateKey, rate: Money) {
        self.set_rate(key, rate);
    }

    // -------------------------------------------------------------------------
    // Gratuity / payments / fee rules
    // -------------------------------------------------------------------------

    /// Gratuity is last-write-wins from every source (vehicle default, host
    /// push, user edit); negative input clamps to zero.
    pub fn set_gratuity(&mut self, percent: Percent) {
        self.gratuity = percent.max(Percent::zero());
    }

    /// Payments applied against the quote; negative input clamps to zero.
    pub fn set_payments(&mut self, amount: Money) {
        self.payments = amount.max(Money::zero());
    }

    /// Wholesale fee-rule replacement (host `setAdditionalRates`).
    pub fn replace_fee_rules(&mut self, rules: Vec<FeeRule>) {
        self.fees.replace_all(rules);
    }

    /// Per-rule quantity edit; unknown ids are a no-op.
    pub fn set_fee_quantity(&mut self, id: &str, quantity: Quantity) -> bool {
        self.fees.set_quantity(id, quantity)
    }

    // -------------------------------------------------------------------------
    // Basis / eligibility
    // -------------------------------------------------------------------------

    /// Applies a new basis and allowed-type list, clearing every row that
    /// drops out of the eligible set (clearing-on-hide).
    pub fn set_pricing_basis(&mut self, basis: PricingBasis, allowed_codes: &[String]) {
        self.basis = basis;
        self.eligibility = Eligibility::for_basis(basis, allowed_codes);
        for key in RateKey::ALL {
            if !self.eligibility.contains(key) {
                self.sheet.clear_row(key);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------

    /// Resets the quote for a new reservation: rows to defaults, gratuity to
    /// the configured default, payments to zero, fee quantities back to 1.
    /// The fee rule list, basis, and eligibility are kept; the host re-pushes
    /// those wholesale when they change.
    pub fn reset(&mut self) {
        self.sheet.reset(self.defaults.airport_fee);
        self.gratuity = self.defaults.gratuity;
        self.payments = Money::zero();
        self.fees.reset_quantities();
    }

    // -------------------------------------------------------------------------
    // Snapshot (the totals calculator)
    // -------------------------------------------------------------------------

    /// Derives the full price breakdown. Pure: calling this any number of
    /// times yields identical snapshots and never changes state.
    pub fn snapshot(&self) -> PricingSnapshot {
        let subtotal = self.sheet.subtotal();
        let gratuity_total = subtotal.percent_of(self.gratuity);
        let additional_total = self.fees.total(subtotal);
        let grand_total = subtotal + gratuity_total + additional_total;

        let rows = RateKey::ALL
            .iter()
            .map(|&key| {
                let row = self.sheet.row(key);
                let visible = match key {
                    RateKey::Airport => !row.quantity.is_zero(),
                    _ => self.eligibility.contains(key),
                };
                RateRowState {
                    key,
                    quantity: row.quantity,
                    rate: row.rate,
                    total: row.total(),
                    visible,
                    quantity_source: row.quantity_source,
                }
            })
            .collect();

        let additional_rates = self
            .fees
            .rules()
            .iter()
            .map(|rule| FeeLineState {
                id: rule.id.clone(),
                name: rule.name.clone(),
                kind: rule.basis.kind(),
                quantity: rule.quantity,
                active: rule.active,
                total: rule.contribution(subtotal),
            })
            .collect();

        PricingSnapshot {
            rows,
            additional_rates,
            subtotal,
            gratuity_percent: self.gratuity,
            gratuity_total,
            additional_total,
            grand_total,
            payments_applied: self.payments,
            balance_due: grand_total - self.payments,
        }
    }
}

impl Default for Quote {
    fn default() -> Self {
        Quote::new(QuoteDefaults::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_quote() -> Quote {
        // flat 1 × $50, hourRoute 2 × $30, 20% gratuity, one 10% rule
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.set_rate(RateKey::Flat, Money::from_dollars(50.0));
        quote.set_rate(RateKey::HourRoute, Money::from_dollars(30.0));
        quote.set_quantity(RateKey::HourRoute, Quantity::from_whole(2), Provenance::User);
        quote.replace_fee_rules(vec![FeeRule::percentage(
            "fuel",
            "Fuel Surcharge",
            Percent::from_percent(10.0),
        )]);
        quote
    }

    #[test]
    fn test_fresh_quote_prices_to_zero() {
        let snapshot = Quote::new(QuoteDefaults::default()).snapshot();
        assert!(snapshot.subtotal.is_zero());
        assert!(snapshot.gratuity_total.is_zero());
        assert!(snapshot.grand_total.is_zero());
        assert!(snapshot.balance_due.is_zero());
        assert_eq!(snapshot.gratuity_percent, Percent::from_percent(20.0));
    }

    #[test]
    fn test_end_to_end_breakdown() {
        let mut quote = populated_quote();
        quote.set_payments(Money::from_dollars(50.0));

        let snapshot = quote.snapshot();
        assert_eq!(snapshot.subtotal, Money::from_dollars(110.0));
        assert_eq!(snapshot.gratuity_total, Money::from_dollars(22.0));
        assert_eq!(snapshot.additional_total, Money::from_dollars(11.0));
        assert_eq!(snapshot.grand_total, Money::from_dollars(143.0));
        assert_eq!(snapshot.payments_applied, Money::from_dollars(50.0));
        assert_eq!(snapshot.balance_due, Money::from_dollars(93.0));
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let quote = populated_quote();
        let first = quote.snapshot();
        let second = quote.snapshot();
        let third = quote.snapshot();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_basis_switch_clears_hidden_rows() {
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.set_rate(RateKey::HourRoute, Money::from_dollars(40.0));
        quote.set_quantity(RateKey::HourRoute, Quantity::from_whole(3), Provenance::User);
        assert_eq!(quote.snapshot().subtotal, Money::from_dollars(120.0));

        quote.set_pricing_basis(PricingBasis::Mile, &["DISTANCE".to_string()]);

        let snapshot = quote.snapshot();
        let hour_route = snapshot.row(RateKey::HourRoute).unwrap();
        assert!(hour_route.quantity.is_zero());
        assert!(hour_route.rate.is_zero());
        assert!(!hour_route.visible);
        assert!(snapshot.subtotal.is_zero());
    }

    #[test]
    fn test_hidden_rows_reject_writes_until_reenabled() {
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.set_pricing_basis(PricingBasis::Mile, &["DISTANCE".to_string()]);

        // Direct, guarded, and user writes all bounce off the hidden row
        quote.set_rate(RateKey::HourRoute, Money::from_dollars(40.0));
        quote.set_quantity(RateKey::HourRoute, Quantity::from_whole(3), Provenance::User);
        assert!(!quote.propose_rate(RateKey::HourRoute, Money::from_dollars(40.0)));
        assert!(!quote.propose_route_quantity(RateKey::HourRoute, Quantity::from_whole(2)));
        quote.edit_rate(RateKey::HourRoute, Money::from_dollars(40.0));

        let row = *quote.sheet().row(RateKey::HourRoute);
        assert!(row.rate.is_zero());
        assert!(row.quantity.is_zero());

        // Re-enable, then the same writes land
        quote.set_pricing_basis(PricingBasis::Mile, &[]);
        quote.set_rate(RateKey::HourRoute, Money::from_dollars(40.0));
        assert_eq!(quote.sheet().row(RateKey::HourRoute).rate, Money::from_dollars(40.0));
    }

    #[test]
    fn test_airport_row_stays_writable_under_restrictions() {
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.set_pricing_basis(PricingBasis::Mile, &["DISTANCE".to_string()]);

        quote.set_quantity(RateKey::Airport, Quantity::one(), Provenance::RouteDerived);
        let snapshot = quote.snapshot();
        let airport = snapshot.row(RateKey::Airport).unwrap();
        assert!(airport.visible);
        assert_eq!(airport.total, Money::from_dollars(15.0));
    }

    #[test]
    fn test_airport_row_hidden_at_zero_quantity() {
        let quote = Quote::new(QuoteDefaults::default());
        let snapshot = quote.snapshot();
        let airport = snapshot.row(RateKey::Airport).unwrap();
        // Default rate present but quantity 0: hidden, contributes nothing
        assert!(!airport.visible);
        assert_eq!(airport.rate, Money::from_dollars(15.0));
        assert!(airport.total.is_zero());
    }

    #[test]
    fn test_user_edit_provenance_lifecycle() {
        let mut quote = Quote::new(QuoteDefaults::default());

        quote.edit_quantity(RateKey::Mile, Quantity::from_units(18.0));
        assert_eq!(quote.sheet().row(RateKey::Mile).quantity_source, Provenance::User);

        // Route push must not overwrite the manual value
        assert!(!quote.propose_route_quantity(RateKey::Mile, Quantity::from_units(25.0)));
        assert_eq!(quote.sheet().row(RateKey::Mile).quantity.milli(), 18000);

        // Clearing the field re-opens it to route pushes
        quote.edit_quantity(RateKey::Mile, Quantity::zero());
        assert_eq!(quote.sheet().row(RateKey::Mile).quantity_source, Provenance::Empty);
        assert!(quote.propose_route_quantity(RateKey::Mile, Quantity::from_units(25.0)));
        assert_eq!(
            quote.sheet().row(RateKey::Mile).quantity_source,
            Provenance::RouteDerived
        );
    }

    #[test]
    fn test_minimum_fare_lands_in_flat_row() {
        let mut quote = Quote::new(QuoteDefaults::default());
        assert!(quote.apply_minimum_fare(Money::from_dollars(70.0)));

        let flat = quote.sheet().row(RateKey::Flat);
        assert_eq!(flat.rate, Money::from_dollars(70.0));
        assert_eq!(flat.quantity, Quantity::one());

        // A typed-in flat price wins over the floor
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.edit_rate(RateKey::Flat, Money::from_dollars(85.0));
        quote.apply_minimum_fare(Money::from_dollars(70.0));
        assert_eq!(quote.sheet().row(RateKey::Flat).rate, Money::from_dollars(85.0));
    }

    #[test]
    fn test_tiered_total_overwrites_flat_row() {
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.edit_rate(RateKey::Flat, Money::from_dollars(40.0));

        quote.apply_tiered_total(Money::from_dollars(95.0));
        let flat = quote.sheet().row(RateKey::Flat);
        assert_eq!(flat.rate, Money::from_dollars(95.0));
        assert_eq!(flat.quantity, Quantity::one());
        assert_eq!(flat.quantity_source, Provenance::RouteDerived);
    }

    #[test]
    fn test_gratuity_clamps_negative() {
        let mut quote = Quote::new(QuoteDefaults::default());
        quote.set_gratuity(Percent::from_percent(-5.0));
        assert!(quote.gratuity().is_zero());
    }

    #[test]
    fn test_payments_clamp_negative_and_allow_overpayment() {
        let mut quote = populated_quote();

        quote.set_payments(Money::from_dollars(-20.0));
        assert!(quote.payments().is_zero());

        // grand total is $143; paying $200 leaves a negative balance
        quote.set_payments(Money::from_dollars(200.0));
        assert_eq!(quote.snapshot().balance_due, Money::from_dollars(-57.0));
    }

    #[test]
    fn test_reset_restores_configured_defaults() {
        let defaults = QuoteDefaults {
            gratuity: Percent::from_percent(18.0),
            airport_fee: Money::from_dollars(12.0),
        };
        let mut quote = Quote::new(defaults);
        quote.set_rate(RateKey::Flat, Money::from_dollars(50.0));
        quote.set_gratuity(Percent::from_percent(25.0));
        quote.set_payments(Money::from_dollars(40.0));
        quote.replace_fee_rules(vec![FeeRule::fixed("bf", "Booking Fee", Money::from_cents(1000))]);
        quote.set_fee_quantity("bf", Quantity::from_whole(4));

        quote.reset();

        let snapshot = quote.snapshot();
        let flat = snapshot.row(RateKey::Flat).unwrap();
        assert_eq!(flat.quantity, Quantity::one());
        assert!(flat.rate.is_zero());
        assert_eq!(snapshot.gratuity_percent, Percent::from_percent(18.0));
        assert!(snapshot.payments_applied.is_zero());

        // Rules survive a reset, their quantities do not
        assert_eq!(snapshot.additional_rates.len(), 1);
        assert_eq!(snapshot.additional_rates[0].quantity, Quantity::one());

        let airport = snapshot.row(RateKey::Airport).unwrap();
        assert!(airport.quantity.is_zero());
        assert_eq!(airport.rate, Money::from_dollars(12.0));
    }

    #[test]
    fn test_snapshot_lists_inactive_rules_with_zero_total() {
        let mut quote = populated_quote();
        quote.replace_fee_rules(vec![
            FeeRule::percentage("fuel", "Fuel Surcharge", Percent::from_percent(10.0)),
            FeeRule::fixed("bf", "Booking Fee", Money::from_cents(1000)).inactive(),
        ]);

        let snapshot = quote.snapshot();
        assert_eq!(snapshot.additional_rates.len(), 2);
        let booking = &snapshot.additional_rates[1];
        assert!(!booking.active);
        assert!(booking.total.is_zero());
        // Only the active rule contributes
        assert_eq!(snapshot.additional_total, Money::from_dollars(11.0));
    }
}
