//! Protocol constants shared across the crate.
//!
//! All fee-like quantities are expressed in parts of [`FEE_DENOM`];
//! canonical balances are 18-decimal fixed-point integers scaled by
//! [`PRECISION`].

/// Number of assets in the basket. The whole engine is specialised to
/// a fixed basket of three pegged assets.
pub const N_ASSETS: usize = 3;

/// Denominator for fee rates: a rate of `FEE_DENOM` is 100%.
pub const FEE_DENOM: u64 = 10_000_000_000;

/// Canonical 18-decimal fixed-point scale.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Upper bound for the trading fee (50% of output, in parts of [`FEE_DENOM`]).
pub const MAX_FEE: u64 = 5_000_000_000;

/// Upper bound for the admin fee (100% of the trading fee).
pub const MAX_ADMIN_FEE: u64 = 10_000_000_000;

/// Exclusive upper bound for the amplification coefficient.
pub const MAX_A: u64 = 1_000_000;

/// Maximum factor by which a single ramp may change the amplification.
pub const MAX_A_CHANGE: u64 = 10;

/// Delay between committing and applying a fee change, in seconds.
pub const ADMIN_ACTIONS_DELAY: u64 = 3 * 86_400;

/// Minimum duration of an amplification ramp, in seconds.
pub const MIN_RAMP_TIME: u64 = 86_400;

/// Maximum Newton-Raphson iterations before declaring non-convergence.
pub const MAX_ITERATIONS: u8 = 255;
