//! # Error Types
//!
//! Strict parse errors for fareline-core.
//!
//! ## Why So Few?
//! The pricing path is deliberately error-free: garbage numbers coerce to
//! zero at the boundary, unknown codes fall back to safe defaults, unknown
//! rule ids are no-ops. The variants here exist for callers that *want* to
//! reject unknown input (config validation, host-side settings checks)
//! instead of riding the lossy fallbacks the message path uses.

use thiserror::Error;

/// Strict parse failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A service-type / pricing-type code no lookup row matches.
    ///
    /// The message path never raises this; it uses
    /// `PricingBasis::from_code`, which falls back to `flat`.
    #[error("unknown pricing basis code: {0}")]
    UnknownBasisCode(String),

    /// A fee-rule kind outside `fixed` / `percentage` / `multiplier`.
    ///
    /// On the message path the affected rule is skipped instead.
    #[error("unknown fee kind: {0}")]
    UnknownFeeKind(String),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
