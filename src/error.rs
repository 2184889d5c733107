//! Unified error type for the tri-pool engine.
//!
//! All fallible operations across the crate return [`PoolError`] as their
//! error type. Every error is deterministic and synchronous; an operation
//! that fails leaves the pool state exactly as it found it.
//!
//! # Error Code Ranges
//!
//! | Range | Category | Description |
//! |-------|----------|-------------|
//! | 1000–1999 | Validation | Invalid inputs or parameters |
//! | 2000–2999 | State | Pool state or lifecycle violations |
//! | 3000–3999 | Governance | Schedule and timelock violations |
//! | 4000–4999 | Arithmetic | Overflow, underflow, solver failure |

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PoolError>;

// ---------------------------------------------------------------------------
// PoolError
// ---------------------------------------------------------------------------

/// Unified error enum for the tri-pool engine.
///
/// Every fallible operation in the crate returns `Result<T, PoolError>`.
/// Variants are grouped by numeric error-code ranges so that callers can
/// pattern-match on categories or inspect individual codes for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // ----- 1000–1999: Validation errors ------------------------------------
    /// Constructor parameters outside bounds (code 1000).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// An asset index is outside the basket (code 1001).
    #[error("asset index out of range")]
    InvalidIndex,

    /// Input and output asset of a swap are the same (code 1002).
    #[error("input and output asset must differ")]
    SameCoin,

    /// A zero amount where a positive one is required (code 1003).
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// An amplification coefficient outside `(0, MAX_A)` (code 1004).
    #[error("invalid amplification: {0}")]
    InvalidAmp(&'static str),

    /// A precision / decimals value outside the supported range (code 1005).
    #[error("invalid precision: {0}")]
    InvalidPrecision(&'static str),

    // ----- 2000–2999: State errors -----------------------------------------
    /// A non-exit operation was attempted while the pool is killed (code 2000).
    #[error("pool is killed")]
    Killed,

    /// The first deposit must supply every asset in the basket (code 2001).
    #[error("initial deposit must include every asset")]
    InitialDepositIncomplete,

    /// The invariant did not grow after a deposit (code 2002).
    #[error("invariant did not grow")]
    InvariantDidNotGrow,

    /// Resulting mint or output fell below the caller's minimum (code 2003).
    #[error("slippage limit exceeded")]
    Slippage,

    /// A proportional withdrawal fell below the per-asset floor (code 2004).
    #[error("withdrawal below requested minimum")]
    InsufficientOutput,

    /// A non-owner called an admin operation (code 2005).
    #[error("caller is not the pool owner")]
    Unauthorized,

    /// A ledger account lacks the funds or shares to cover a move (code 2006).
    #[error("insufficient balance")]
    InsufficientBalance,

    /// A state-mutating entry point was re-entered (code 2007).
    #[error("re-entrant call rejected")]
    Reentrancy,

    // ----- 3000–3999: Governance errors ------------------------------------
    /// An amplification ramp started too soon after the previous one (code 3000).
    #[error("ramp violates minimum timing: {0}")]
    RampTooSoon(&'static str),

    /// An amplification ramp exceeds the allowed rate of change (code 3001).
    #[error("ramp exceeds allowed rate of change")]
    RampTooFast,

    /// A fee change is already pending (code 3002).
    #[error("a governance action is already pending")]
    PendingActionExists,

    /// No fee change is pending (code 3003).
    #[error("no governance action is pending")]
    NoPendingAction,

    /// The timelock deadline has not been reached (code 3004).
    #[error("governance delay not met")]
    DelayNotMet,

    // ----- 4000–4999: Arithmetic errors ------------------------------------
    /// An arithmetic operation overflowed (code 4000).
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// An arithmetic operation underflowed (code 4001).
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero was attempted (code 4002).
    #[error("division by zero")]
    DivisionByZero,

    /// Newton-Raphson iteration did not converge (code 4003).
    #[error("solver did not converge: {0}")]
    SolverDidNotConverge(&'static str),
}

impl PoolError {
    /// Returns the numeric error code for this variant.
    ///
    /// Codes are organized into ranges:
    /// - 1000–1999 for validation errors
    /// - 2000–2999 for state errors
    /// - 3000–3999 for governance errors
    /// - 4000–4999 for arithmetic errors
    #[must_use]
    pub const fn error_code(&self) -> u16 {
        match self {
            // Validation (1000–1999)
            Self::InvalidConfig(_) => 1000,
            Self::InvalidIndex => 1001,
            Self::SameCoin => 1002,
            Self::ZeroAmount => 1003,
            Self::InvalidAmp(_) => 1004,
            Self::InvalidPrecision(_) => 1005,

            // State (2000–2999)
            Self::Killed => 2000,
            Self::InitialDepositIncomplete => 2001,
            Self::InvariantDidNotGrow => 2002,
            Self::Slippage => 2003,
            Self::InsufficientOutput => 2004,
            Self::Unauthorized => 2005,
            Self::InsufficientBalance => 2006,
            Self::Reentrancy => 2007,

            // Governance (3000–3999)
            Self::RampTooSoon(_) => 3000,
            Self::RampTooFast => 3001,
            Self::PendingActionExists => 3002,
            Self::NoPendingAction => 3003,
            Self::DelayNotMet => 3004,

            // Arithmetic (4000–4999)
            Self::Overflow(_) => 4000,
            Self::Underflow(_) => 4001,
            Self::DivisionByZero => 4002,
            Self::SolverDidNotConverge(_) => 4003,
        }
    }

    /// Returns `true` if this is a validation error (1000–1999).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.error_code() >= 1000 && self.error_code() < 2000
    }

    /// Returns `true` if this is a state error (2000–2999).
    #[must_use]
    pub const fn is_state(&self) -> bool {
        self.error_code() >= 2000 && self.error_code() < 3000
    }

    /// Returns `true` if this is a governance error (3000–3999).
    #[must_use]
    pub const fn is_governance(&self) -> bool {
        self.error_code() >= 3000 && self.error_code() < 4000
    }

    /// Returns `true` if this is an arithmetic error (4000–4999).
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        self.error_code() >= 4000 && self.error_code() < 5000
    }
}
