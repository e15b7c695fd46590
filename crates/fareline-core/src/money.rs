//! # Money Module
//!
//! Provides the fixed-point numeric types every price in the engine flows
//! through: [`Money`] (cents), [`Percent`] (basis points), [`Quantity`]
//! (thousandths of a unit).
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The host form posts plain JSON numbers:                                │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    parseFloat("") = NaN             ❌ POISONS EVERY TOTAL!             │
//! │                                                                         │
//! │  OUR SOLUTION: sanitize once at the boundary, integers everywhere else  │
//! │    Money::from_dollars(f64)    → cents (i64), garbage coerced to 0      │
//! │    Quantity::from_units(f64)   → thousandths, negative/NaN → 0          │
//! │    Percent::from_percent(f64)  → basis points, NaN → 0                  │
//! │                                                                         │
//! │  Inside the engine a NaN cannot exist, so a total can never be NaN.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fareline_core::money::{Money, Percent, Quantity};
//!
//! // Wire ingestion (the only place f64 is accepted)
//! let rate = Money::from_dollars(30.0);      // $30.00 → 3000 cents
//! let qty = Quantity::from_units(2.0);       // 2 hours → 2000 milli-units
//!
//! // Line total: 2 × $30.00 = $60.00
//! assert_eq!(rate.times(qty).cents(), 6000);
//!
//! // Gratuity: 20% of $110.00 = $22.00
//! let gratuity = Percent::from_percent(20.0);
//! assert_eq!(Money::from_cents(11000).percent_of(gratuity).cents(), 2200);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Boundary Sanitization Helpers
// =============================================================================

/// Scales an untrusted wire number into an integer sub-unit count.
///
/// Non-finite input (NaN, ±inf) maps to 0; everything else is rounded half
/// away from zero and saturated to the i64 range. This is the single gate
/// through which host-supplied numbers enter the integer domain.
fn scale_wire_number(value: f64, scale: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let scaled = (value * scale).round();
    if scaled >= i64::MAX as f64 {
        i64::MAX
    } else if scaled <= i64::MIN as f64 {
        i64::MIN
    } else {
        scaled as i64
    }
}

/// Signed division with half-away-from-zero rounding.
///
/// Used for every bps/milli scaling so that $−10.005 and $10.005 round
/// symmetrically instead of drifting toward zero.
const fn div_round_half_away(numer: i128, denom: i128) -> i64 {
    let adjusted = if numer >= 0 {
        numer + denom / 2
    } else {
        numer - denom / 2
    };
    (adjusted / denom) as i64
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: fixed-amount fee rules may be discounts, and an
///   overpaid quote has a negative balance due
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support; serialized as a bare cent count
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  VehicleRateSchedule rate ──► RateRow.rate ──► RateRow total            │
/// │                                                      │                  │
/// │  subtotal ──► gratuity ──► additional fees ──► grand total ──► balance  │
/// │                                                                         │
/// │  EVERY monetary value in the engine flows through this type             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::Money;
    ///
    /// let rate = Money::from_cents(4500); // $45.00
    /// assert_eq!(rate.cents(), 4500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from an untrusted wire number in dollars.
    ///
    /// The protocol carries dollars as plain JSON numbers exactly as the host
    /// form posts them, so this constructor tolerates anything `f64` can be:
    ///
    /// - NaN and ±infinity coerce to zero
    /// - fractional cents round half away from zero
    /// - out-of-range magnitudes saturate
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(10.99).cents(), 1099);
    /// assert_eq!(Money::from_dollars(f64::NAN).cents(), 0);
    /// assert_eq!(Money::from_dollars(f64::INFINITY).cents(), 0);
    /// ```
    #[inline]
    pub fn from_dollars(dollars: f64) -> Self {
        Money(scale_wire_number(dollars, 100.0))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in dollars, for config echo and display.
    #[inline]
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a rate by a fractional quantity, rounding half away from
    /// zero on the milli-unit scale.
    ///
    /// This is the line-total operation: `total = rate × quantity`.
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::{Money, Quantity};
    ///
    /// let per_mile = Money::from_cents(350);        // $3.50/mile
    /// let miles = Quantity::from_units(22.5);       // 22.5 miles
    /// assert_eq!(per_mile.times(miles).cents(), 7875); // $78.75
    /// ```
    pub fn times(&self, quantity: Quantity) -> Money {
        // i128 to prevent overflow on large rate × quantity products
        Money(div_round_half_away(
            self.0 as i128 * quantity.milli() as i128,
            1_000,
        ))
    }

    /// Takes a percentage of this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(cents * bps ± 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::{Money, Percent};
    ///
    /// let subtotal = Money::from_cents(11000);           // $110.00
    /// let gratuity = Percent::from_percent(20.0);        // 20%
    /// assert_eq!(subtotal.percent_of(gratuity).cents(), 2200); // $22.00
    /// ```
    pub fn percent_of(&self, percent: Percent) -> Money {
        Money(div_round_half_away(
            self.0 as i128 * percent.bps() as i128,
            10_000,
        ))
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and the demo console. Use frontend formatting for actual
/// UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a whole count (for whole-unit line math in tests and
/// the demo console).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage in basis points (1% = 100 bps), signed.
///
/// Covers three wire shapes:
/// - gratuity percent (`20` ⇒ 2000 bps)
/// - percentage fee rules (`10` ⇒ 1000 bps)
/// - multiplier fee rules expressed as a factor (`1.5` ⇒ 15000 bps)
///
/// Signed because a multiplier below ×1.0 evaluates through a negative
/// delta (`×0.9` ⇒ −1000 bps of the subtotal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    /// One hundred percent (the neutral multiplier factor).
    pub const ONE_HUNDRED: Percent = Percent(10_000);

    /// Creates a Percent from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    /// Creates a Percent from an untrusted wire number in percent units.
    ///
    /// NaN and ±infinity coerce to zero.
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::Percent;
    ///
    /// assert_eq!(Percent::from_percent(20.0).bps(), 2000);
    /// assert_eq!(Percent::from_percent(8.25).bps(), 825);
    /// assert_eq!(Percent::from_percent(f64::NAN).bps(), 0);
    /// ```
    #[inline]
    pub fn from_percent(percent: f64) -> Self {
        Percent(scale_wire_number(percent, 100.0))
    }

    /// Creates a Percent from an untrusted multiplier factor (×1.5 ⇒ 150%).
    ///
    /// Garbage handling differs from the other constructors: a non-finite
    /// factor coerces to the *neutral* ×1.0 rather than ×0.0, because a ×0.0
    /// coercion would silently wipe out the whole subtotal. Negative factors
    /// clamp to ×0.0.
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::Percent;
    ///
    /// assert_eq!(Percent::from_factor(1.5).bps(), 15000);
    /// assert_eq!(Percent::from_factor(f64::NAN), Percent::ONE_HUNDRED);
    /// assert_eq!(Percent::from_factor(-2.0).bps(), 0);
    /// ```
    pub fn from_factor(factor: f64) -> Self {
        if !factor.is_finite() {
            return Percent::ONE_HUNDRED;
        }
        Percent(scale_wire_number(factor.max(0.0), 10_000.0))
    }

    /// Returns the value in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the value in percent units, for config echo and display.
    #[inline]
    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.as_percent())
        }
    }
}

/// Default percent is zero.
impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl Add for Percent {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Percent(self.0 + other.0)
    }
}

impl Sub for Percent {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Percent(self.0 - other.0)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A line-item quantity in thousandths of a unit (1.5 hours = 1500).
///
/// Quantities are miles, hours, passenger counts, or plain multipliers
/// depending on the row, so they carry three decimal places of precision.
/// Row quantities are never negative; the wire constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a Quantity from raw thousandths.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a Quantity from an untrusted wire number in whole units.
    ///
    /// NaN, ±infinity, and negative values all coerce to zero.
    ///
    /// ## Example
    /// ```rust
    /// use fareline_core::money::Quantity;
    ///
    /// assert_eq!(Quantity::from_units(1.5).milli(), 1500);
    /// assert_eq!(Quantity::from_units(-3.0).milli(), 0);
    /// assert_eq!(Quantity::from_units(f64::NAN).milli(), 0);
    /// ```
    #[inline]
    pub fn from_units(units: f64) -> Self {
        Quantity(scale_wire_number(units, 1_000.0).max(0))
    }

    /// Creates a Quantity from a whole unit count (clamped non-negative).
    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        if units < 0 {
            Quantity(0)
        } else {
            Quantity(units * 1_000)
        }
    }

    /// Exactly one unit.
    #[inline]
    pub const fn one() -> Self {
        Quantity(1_000)
    }

    /// Zero units.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Returns the raw thousandths count.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the quantity in whole units as a float, for display only.
    #[inline]
    pub fn units(&self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000 == 0 {
            write!(f, "{}", self.0 / 1_000)
        } else {
            let text = format!("{:.3}", self.units());
            write!(f, "{}", text.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}

/// Default quantity is zero.
impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
        assert_eq!(money.as_dollars(), 10.99);
    }

    #[test]
    fn test_from_dollars_rounds_to_cents() {
        assert_eq!(Money::from_dollars(50.0).cents(), 5000);
        assert_eq!(Money::from_dollars(3.505).cents(), 351);
        assert_eq!(Money::from_dollars(-25.0).cents(), -2500);
        assert_eq!(Money::from_dollars(0.0).cents(), 0);
    }

    #[test]
    fn test_from_dollars_coerces_garbage_to_zero() {
        assert_eq!(Money::from_dollars(f64::NAN).cents(), 0);
        assert_eq!(Money::from_dollars(f64::INFINITY).cents(), 0);
        assert_eq!(Money::from_dollars(f64::NEG_INFINITY).cents(), 0);
    }

    #[test]
    fn test_from_dollars_saturates() {
        assert_eq!(Money::from_dollars(1e30).cents(), i64::MAX);
        assert_eq!(Money::from_dollars(-1e30).cents(), i64::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_times_whole_quantity() {
        // 2 hours × $30.00 = $60.00
        let rate = Money::from_cents(3000);
        assert_eq!(rate.times(Quantity::from_whole(2)).cents(), 6000);
    }

    #[test]
    fn test_times_fractional_quantity() {
        // 22.5 miles × $3.50 = $78.75
        let rate = Money::from_cents(350);
        assert_eq!(rate.times(Quantity::from_units(22.5)).cents(), 7875);

        // 1.75 hours × $65.00 = $113.75
        let hourly = Money::from_cents(6500);
        assert_eq!(hourly.times(Quantity::from_units(1.75)).cents(), 11375);
    }

    #[test]
    fn test_times_rounds_half_away_from_zero() {
        // $0.25 × 1.5 = $0.375 → $0.38
        assert_eq!(Money::from_cents(25).times(Quantity::from_milli(1500)).cents(), 38);
        // -$0.25 × 1.5 = -$0.375 → -$0.38 (symmetric)
        assert_eq!(
            Money::from_cents(-25).times(Quantity::from_milli(1500)).cents(),
            -38
        );
    }

    #[test]
    fn test_times_zero_quantity_is_zero() {
        assert!(Money::from_cents(9999).times(Quantity::zero()).is_zero());
    }

    #[test]
    fn test_percent_of_basic() {
        // $110.00 at 20% = $22.00
        let subtotal = Money::from_cents(11000);
        assert_eq!(subtotal.percent_of(Percent::from_percent(20.0)).cents(), 2200);
        // $110.00 at 10% = $11.00
        assert_eq!(subtotal.percent_of(Percent::from_percent(10.0)).cents(), 1100);
    }

    #[test]
    fn test_percent_of_with_rounding() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let amount = Money::from_cents(1000);
        assert_eq!(amount.percent_of(Percent::from_bps(825)).cents(), 83);
    }

    #[test]
    fn test_percent_of_negative_delta() {
        // ×0.9 multiplier evaluates as −10% of the subtotal
        let subtotal = Money::from_cents(10000);
        let delta = Percent::from_factor(0.9) - Percent::ONE_HUNDRED;
        assert_eq!(subtotal.percent_of(delta).cents(), -1000);
    }

    #[test]
    fn test_percent_constructors() {
        assert_eq!(Percent::from_percent(20.0).bps(), 2000);
        assert_eq!(Percent::from_percent(8.25).bps(), 825);
        assert_eq!(Percent::from_percent(f64::NAN).bps(), 0);
        assert_eq!(Percent::from_factor(1.5).bps(), 15000);
        assert_eq!(Percent::from_factor(0.9).bps(), 9000);
        assert_eq!(Percent::from_factor(f64::NAN), Percent::ONE_HUNDRED);
        assert_eq!(Percent::from_factor(f64::INFINITY), Percent::ONE_HUNDRED);
        assert_eq!(Percent::from_factor(-2.0).bps(), 0);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(format!("{}", Percent::from_bps(2000)), "20%");
        assert_eq!(format!("{}", Percent::from_bps(825)), "8.25%");
        assert_eq!(format!("{}", Percent::from_bps(-1000)), "-10%");
    }

    #[test]
    fn test_quantity_constructors() {
        assert_eq!(Quantity::from_units(2.0).milli(), 2000);
        assert_eq!(Quantity::from_units(1.5).milli(), 1500);
        assert_eq!(Quantity::from_units(24.5).milli(), 24500);
        assert_eq!(Quantity::from_units(-3.0).milli(), 0);
        assert_eq!(Quantity::from_units(f64::NAN).milli(), 0);
        assert_eq!(Quantity::from_units(f64::INFINITY).milli(), 0);
        assert_eq!(Quantity::from_whole(3).milli(), 3000);
        assert_eq!(Quantity::from_whole(-3).milli(), 0);
        assert_eq!(Quantity::one().milli(), 1000);
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(format!("{}", Quantity::from_whole(3)), "3");
        assert_eq!(format!("{}", Quantity::from_units(1.5)), "1.5");
        assert_eq!(format!("{}", Quantity::from_units(22.125)), "22.125");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
