//! # Fee Rules Module
//!
//! The additional-rate evaluator: a list of account-level fee rules applied
//! on top of the base subtotal.
//!
//! ## Evaluation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kind         contribution                        example               │
//! │  ──────────   ─────────────────────────────────   ───────────────────   │
//! │  fixed        amount × quantity                   $10 booking fee       │
//! │  percentage   subtotal × percent                  5% fuel surcharge     │
//! │  multiplier   subtotal × (factor − 100%)          ×1.5 holiday pricing  │
//! │                                                                         │
//! │  EVERY rule evaluates against the BASE subtotal. Contributions are      │
//! │  summed, never chained, so 10% + 20% of $100 is $30, not $32.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host owns the rule list and replaces it wholesale on every push; the
//! engine only edits per-rule quantities (fixed rules) and activity is part
//! of the pushed definition.

use crate::error::CoreError;
use crate::money::{Money, Percent, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// FeeKind / FeeBasis
// =============================================================================

/// Discriminant of a fee rule, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    Fixed,
    Percentage,
    Multiplier,
}

impl FromStr for FeeKind {
    type Err = CoreError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(FeeKind::Fixed),
            "percentage" => Ok(FeeKind::Percentage),
            "multiplier" => Ok(FeeKind::Multiplier),
            _ => Err(CoreError::UnknownFeeKind(kind.to_string())),
        }
    }
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeeKind::Fixed => "fixed",
            FeeKind::Percentage => "percentage",
            FeeKind::Multiplier => "multiplier",
        };
        write!(f, "{}", name)
    }
}

/// The kind-specific value of a fee rule, parsed into fixed-point form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeBasis {
    /// A flat amount, multiplied by the rule quantity. The amount may be
    /// negative (a fixed discount).
    Fixed { amount: Money },
    /// A share of the base subtotal.
    Percentage { percent: Percent },
    /// A subtotal multiplier; contributes the delta against ×1.0.
    Multiplier { factor: Percent },
}

impl FeeBasis {
    /// The wire discriminant for this basis.
    pub const fn kind(&self) -> FeeKind {
        match self {
            FeeBasis::Fixed { .. } => FeeKind::Fixed,
            FeeBasis::Percentage { .. } => FeeKind::Percentage,
            FeeBasis::Multiplier { .. } => FeeKind::Multiplier,
        }
    }
}

// =============================================================================
// FeeRule
// =============================================================================

/// One account-level fee rule, as pushed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRule {
    pub id: String,
    pub name: String,
    pub basis: FeeBasis,
    pub active: bool,
    /// Meaningful for fixed rules (amount × quantity); defaults to 1.
    pub quantity: Quantity,
}

impl FeeRule {
    /// A fixed-amount rule (active, quantity 1).
    pub fn fixed(id: impl Into<String>, name: impl Into<String>, amount: Money) -> Self {
        FeeRule {
            id: id.into(),
            name: name.into(),
            basis: FeeBasis::Fixed { amount },
            active: true,
            quantity: Quantity::one(),
        }
    }

    /// A percentage-of-subtotal rule (active, quantity 1).
    pub fn percentage(id: impl Into<String>, name: impl Into<String>, percent: Percent) -> Self {
        FeeRule {
            id: id.into(),
            name: name.into(),
            basis: FeeBasis::Percentage { percent },
            active: true,
            quantity: Quantity::one(),
        }
    }

    /// A subtotal-multiplier rule (active, quantity 1).
    pub fn multiplier(id: impl Into<String>, name: impl Into<String>, factor: Percent) -> Self {
        FeeRule {
            id: id.into(),
            name: name.into(),
            basis: FeeBasis::Multiplier { factor },
            active: true,
            quantity: Quantity::one(),
        }
    }

    /// Marks the rule inactive (builder-style, used by hosts and tests).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// This rule's contribution against a base subtotal. Inactive rules
    /// contribute zero but stay listed.
    pub fn contribution(&self, subtotal: Money) -> Money {
        if !self.active {
            return Money::zero();
        }
        match self.basis {
            FeeBasis::Fixed { amount } => amount.times(self.quantity),
            FeeBasis::Percentage { percent } => subtotal.percent_of(percent),
            FeeBasis::Multiplier { factor } => {
                subtotal.percent_of(factor - Percent::ONE_HUNDRED)
            }
        }
    }
}

// =============================================================================
// FeeSchedule
// =============================================================================

/// The full rule list, replaced wholesale on every host push.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeeSchedule {
    rules: Vec<FeeRule>,
}

impl FeeSchedule {
    /// An empty schedule.
    pub fn new() -> Self {
        FeeSchedule::default()
    }

    /// Replaces every rule. There is no merge: the pushed list is the whole
    /// truth, which keeps host and engine from drifting apart.
    pub fn replace_all(&mut self, rules: Vec<FeeRule>) {
        self.rules = rules;
    }

    /// Read access to the rules, in push order.
    pub fn rules(&self) -> &[FeeRule] {
        &self.rules
    }

    /// Whether any rules are present.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Updates one rule's quantity (clamped non-negative). Unknown ids are
    /// a no-op; returns whether a rule matched.
    pub fn set_quantity(&mut self, id: &str, quantity: Quantity) -> bool {
        match self.rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => {
                rule.quantity = quantity.max(Quantity::zero());
                true
            }
            None => false,
        }
    }

    /// Resets every rule quantity back to 1 (the `clear` behavior).
    pub fn reset_quantities(&mut self) {
        for rule in &mut self.rules {
            rule.quantity = Quantity::one();
        }
    }

    /// Sum of all rule contributions against one base subtotal.
    ///
    /// Each rule sees the same subtotal; a rule's output never feeds the
    /// next rule's input.
    pub fn total(&self, subtotal: Money) -> Money {
        self.rules
            .iter()
            .fold(Money::zero(), |acc, rule| acc + rule.contribution(subtotal))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
