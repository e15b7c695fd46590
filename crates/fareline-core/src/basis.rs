//! # Pricing Basis Module
//!
//! Maps a reservation's service-type code onto the billing row that anchors
//! its price, and derives which rows are visible/editable at all.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service type code          pricing basis        anchor row             │
//! │  ─────────────────────────  ─────────────────    ──────────             │
//! │  FLAT / POINT_TO_POINT  ──► Flat             ──► flat                   │
//! │  HOURLY                 ──► HourRoute        ──► hourRoute              │
//! │  HOURLY_TRIP/AS_DIRECTED──► HourTrip         ──► hourTrip               │
//! │  PASSENGER / PER_SEAT   ──► Passenger        ──► passenger              │
//! │  DISTANCE / PER_MILE    ──► Mile             ──► mile                   │
//! │  (anything else)        ──► Flat (fallback)                             │
//! │                                                                         │
//! │  eligible rows = {flat} ∪ {allowed-type rows} ∪ {anchor row}            │
//! │  empty allowed list ⇒ every row eligible (fail open)                    │
//! │  airport row: always eligible, gated by quantity instead                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows outside the eligible set are cleared when the set shrinks
//! (clearing-on-hide), which is what lets the subtotal blindly sum all rows.

use crate::error::CoreError;
use crate::sheet::RateKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// PricingBasis
// =============================================================================

/// The row a reservation's price is anchored on, chosen by service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PricingBasis {
    #[default]
    Flat,
    HourRoute,
    HourTrip,
    Passenger,
    Mile,
}

impl PricingBasis {
    /// Parses a service-type code, falling back to `Flat` when the code is
    /// not recognized. This is the message-path conversion: pricing must
    /// stay available even when the host sends a code this build has never
    /// heard of.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// The billing row this basis anchors on.
    pub const fn row_key(self) -> RateKey {
        match self {
            PricingBasis::Flat => RateKey::Flat,
            PricingBasis::HourRoute => RateKey::HourRoute,
            PricingBasis::HourTrip => RateKey::HourTrip,
            PricingBasis::Passenger => RateKey::Passenger,
            PricingBasis::Mile => RateKey::Mile,
        }
    }
}

/// Strict parse for callers that want to reject unknown codes.
///
/// Codes are matched case-insensitively with spaces and dashes collapsed to
/// underscores, so `"per mile"`, `"PER-MILE"`, and `"per_mile"` all parse.
/// The camelCase wire names (`hourRoute`, ...) are accepted too.
impl FromStr for PricingBasis {
    type Err = CoreError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let normalized: String = code
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                _ => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "FLAT" | "FLAT_RATE" | "POINT_TO_POINT" => Ok(PricingBasis::Flat),
            "HOURLY" | "HOURLY_ROUTE" | "HOURROUTE" | "HOURLY_RATE" => Ok(PricingBasis::HourRoute),
            "HOURLY_TRIP" | "TRIP_HOURLY" | "AS_DIRECTED" | "HOURTRIP" => Ok(PricingBasis::HourTrip),
            "PASSENGER" | "PER_PASSENGER" | "PER_SEAT" => Ok(PricingBasis::Passenger),
            "DISTANCE" | "MILEAGE" | "PER_MILE" | "MILE" => Ok(PricingBasis::Mile),
            _ => Err(CoreError::UnknownBasisCode(code.to_string())),
        }
    }
}

impl fmt::Display for PricingBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.row_key().wire_name())
    }
}

// =============================================================================
// Eligibility
// =============================================================================

/// The set of billing rows a reservation may currently use, packed as one
/// bit per [`RateKey`].
///
/// Derived from the pricing basis and the vehicle's allowed pricing types;
/// never stored on the wire (the snapshot exposes a per-row `visible` flag
/// instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility(u8);

impl Eligibility {
    const ALL_BITS: u8 = (1 << RateKey::COUNT) - 1;

    const fn bit(key: RateKey) -> u8 {
        match key {
            RateKey::Flat => 1 << 0,
            RateKey::HourRoute => 1 << 1,
            RateKey::HourTrip => 1 << 2,
            RateKey::Passenger => 1 << 3,
            RateKey::Mile => 1 << 4,
            RateKey::Airport => 1 << 5,
        }
    }

    /// Every row eligible. This is both the startup state and the fail-open
    /// result for an empty allowed-type list.
    pub const fn all() -> Self {
        Eligibility(Self::ALL_BITS)
    }

    /// Computes the eligible set for a basis and an allowed-type code list.
    ///
    /// - empty `allowed_codes` fails open to every row
    /// - the flat row and the airport row are always eligible
    /// - the current basis row is always eligible, even when the allowed
    ///   list omits it
    /// - unrecognized codes contribute nothing
    pub fn for_basis(basis: PricingBasis, allowed_codes: &[String]) -> Self {
        if allowed_codes.is_empty() {
            return Eligibility::all();
        }

        let mut bits =
            Self::bit(RateKey::Flat) | Self::bit(RateKey::Airport) | Self::bit(basis.row_key());
        for code in allowed_codes {
            if let Ok(allowed) = code.parse::<PricingBasis>() {
                bits |= Self::bit(allowed.row_key());
            }
        }
        Eligibility(bits)
    }

    /// Whether a row is in the eligible set.
    #[inline]
    pub const fn contains(self, key: RateKey) -> bool {
        self.0 & Self::bit(key) != 0
    }
}

impl Default for Eligibility {
    fn default() -> Self {
        Eligibility::all()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup() {
        assert_eq!(PricingBasis::from_code("FLAT"), PricingBasis::Flat);
        assert_eq!(PricingBasis::from_code("HOURLY"), PricingBasis::HourRoute);
        assert_eq!(PricingBasis::from_code("AS_DIRECTED"), PricingBasis::HourTrip);
        assert_eq!(PricingBasis::from_code("PER_PASSENGER"), PricingBasis::Passenger);
        assert_eq!(PricingBasis::from_code("DISTANCE"), PricingBasis::Mile);
    }

    #[test]
    fn test_code_lookup_is_case_and_separator_insensitive() {
        assert_eq!(PricingBasis::from_code("hourly"), PricingBasis::HourRoute);
        assert_eq!(PricingBasis::from_code("per mile"), PricingBasis::Mile);
        assert_eq!(PricingBasis::from_code("PER-MILE"), PricingBasis::Mile);
        assert_eq!(PricingBasis::from_code(" point_to_point "), PricingBasis::Flat);
    }

    #[test]
    fn test_wire_names_parse_back() {
        assert_eq!(PricingBasis::from_code("hourRoute"), PricingBasis::HourRoute);
        assert_eq!(PricingBasis::from_code("hourTrip"), PricingBasis::HourTrip);
        assert_eq!(PricingBasis::from_code("mile"), PricingBasis::Mile);
    }

    #[test]
    fn test_unknown_code_falls_back_to_flat() {
        assert_eq!(PricingBasis::from_code("CHARTER_2049"), PricingBasis::Flat);
        assert_eq!(PricingBasis::from_code(""), PricingBasis::Flat);
    }

    #[test]
    fn test_strict_parse_rejects_unknown_codes() {
        let err = "CHARTER_2049".parse::<PricingBasis>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownBasisCode(code) if code == "CHARTER_2049"));
    }

    #[test]
    fn test_empty_allowed_list_fails_open() {
        let eligibility = Eligibility::for_basis(PricingBasis::Mile, &[]);
        for key in RateKey::ALL {
            assert!(eligibility.contains(key));
        }
    }

    #[test]
    fn test_allowed_list_restricts_rows() {
        let allowed = vec!["DISTANCE".to_string()];
        let eligibility = Eligibility::for_basis(PricingBasis::Mile, &allowed);

        assert!(eligibility.contains(RateKey::Flat));
        assert!(eligibility.contains(RateKey::Mile));
        assert!(eligibility.contains(RateKey::Airport));
        assert!(!eligibility.contains(RateKey::HourRoute));
        assert!(!eligibility.contains(RateKey::HourTrip));
        assert!(!eligibility.contains(RateKey::Passenger));
    }

    #[test]
    fn test_basis_row_is_eligible_even_when_not_allowed() {
        // Basis hourRoute with an allowed list that omits it: the anchor row
        // stays usable.
        let allowed = vec!["DISTANCE".to_string()];
        let eligibility = Eligibility::for_basis(PricingBasis::HourRoute, &allowed);
        assert!(eligibility.contains(RateKey::HourRoute));
        assert!(eligibility.contains(RateKey::Mile));
        assert!(!eligibility.contains(RateKey::Passenger));
    }

    #[test]
    fn test_unrecognized_allowed_codes_contribute_nothing() {
        let allowed = vec!["HOURLY".to_string(), "WARP_DRIVE".to_string()];
        let eligibility = Eligibility::for_basis(PricingBasis::Flat, &allowed);
        assert!(eligibility.contains(RateKey::HourRoute));
        assert!(!eligibility.contains(RateKey::Mile));
    }
}
