//! Fee rates expressed in parts of [`FEE_DENOM`](crate::constants::FEE_DENOM).

use core::fmt;

use primitive_types::U256;

use crate::constants::{FEE_DENOM, MAX_ADMIN_FEE, MAX_FEE};
use crate::error::{PoolError, Result};

use super::Amount;

/// A fee rate in parts of `FEE_DENOM` (`10^10`), so a rate of
/// `4_000_000` is 0.04%.
///
/// Any `u64` value can be constructed; the protocol caps are enforced at
/// the points where a rate enters the pool ([`ensure_trading_cap`] for
/// the trading fee, [`ensure_admin_cap`] for the admin split).
///
/// [`ensure_trading_cap`]: Self::ensure_trading_cap
/// [`ensure_admin_cap`]: Self::ensure_admin_cap
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{Amount, FeeRate};
///
/// let fee = FeeRate::new(4_000_000); // 0.04%
/// assert_eq!(fee.apply_native(Amount::new(10_000_000_000)), Some(Amount::new(4_000_000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FeeRate(u64);

impl FeeRate {
    /// Zero fee.
    pub const ZERO: Self = Self(0);

    /// Creates a new `FeeRate` from raw parts of `FEE_DENOM`.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw rate in parts of `FEE_DENOM`.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the rate is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Validates this rate against the trading-fee cap.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the rate exceeds
    /// [`MAX_FEE`].
    pub const fn ensure_trading_cap(&self) -> Result<()> {
        if self.0 > MAX_FEE {
            return Err(PoolError::InvalidConfig("trading fee exceeds cap"));
        }
        Ok(())
    }

    /// Validates this rate against the admin-fee cap.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the rate exceeds
    /// [`MAX_ADMIN_FEE`].
    pub const fn ensure_admin_cap(&self) -> Result<()> {
        if self.0 > MAX_ADMIN_FEE {
            return Err(PoolError::InvalidConfig("admin fee exceeds cap"));
        }
        Ok(())
    }

    /// Applies the rate to a canonical (18-decimal, 256-bit) value:
    /// `value * rate / FEE_DENOM`, floor.
    ///
    /// The 256-bit multiply cannot overflow for canonical balances, which
    /// stay far below `2^128`.
    #[must_use]
    pub fn apply(&self, value: U256) -> U256 {
        value * U256::from(self.0) / U256::from(FEE_DENOM)
    }

    /// Applies the rate to a native amount with a widened intermediate:
    /// `amount * rate / FEE_DENOM`, floor.
    ///
    /// Returns `None` only if the result exceeds `u128`, which requires a
    /// rate above 100%.
    #[must_use]
    pub fn apply_native(&self, amount: Amount) -> Option<Amount> {
        amount.mul_div_floor(u128::from(self.0), u128::from(FEE_DENOM))
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, FEE_DENOM)
    }
}
