//! # Pricing Snapshot Module
//!
//! The read model the engine publishes after every change: all six rows with
//! derived totals, the evaluated fee rules, and the roll-up figures. A
//! snapshot is always derived from quote state in one pass and never mutated
//! in place, so publishing twice in a row yields byte-identical JSON.
//!
//! Field names are camelCase on the wire; every type here is exported to
//! TypeScript for the embedding UI.

use crate::money::{Money, Percent, Quantity};
use crate::rules::FeeKind;
use crate::sheet::{Provenance, RateKey};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One billing row as the host sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateRowState {
    pub key: RateKey,
    pub quantity: Quantity,
    pub rate: Money,
    /// Derived `rate × quantity`, recomputed at snapshot time.
    pub total: Money,
    /// False when the row is ineligible (or, for the airport row, has
    /// quantity 0); hidden rows always carry zeros.
    pub visible: bool,
    /// Origin of the quantity, so the UI can style autofilled fields.
    pub quantity_source: Provenance,
}

/// One evaluated fee rule as the host sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FeeLineState {
    pub id: String,
    pub name: String,
    pub kind: FeeKind,
    pub quantity: Quantity,
    pub active: bool,
    /// Contribution against the base subtotal; zero when inactive.
    pub total: Money,
}

/// The authoritative price breakdown published to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub rows: Vec<RateRowState>,
    pub additional_rates: Vec<FeeLineState>,
    /// Sum of eligible row totals.
    pub subtotal: Money,
    pub gratuity_percent: Percent,
    /// `subtotal × gratuityPercent`.
    pub gratuity_total: Money,
    /// Sum of fee rule contributions against the subtotal.
    pub additional_total: Money,
    /// `subtotal + gratuityTotal + additionalTotal`.
    pub grand_total: Money,
    pub payments_applied: Money,
    /// `grandTotal − paymentsApplied`; negative when overpaid.
    pub balance_due: Money,
}

impl PricingSnapshot {
    /// Looks up one row by key (rows are always present, in fixed order).
    pub fn row(&self, key: RateKey) -> Option<&RateRowState> {
        self.rows.iter().find(|row| row.key == key)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
