//! Pool construction parameters.

use crate::domain::{AccountId, Amp, Basket, FeeRate};
use crate::error::{PoolError, Result};

/// Immutable parameters a pool is created with.
///
/// Validation happens once at construction; a `PoolConfig` that exists
/// is a valid one. The starting amplification becomes a flat
/// [`AmpSchedule`](crate::schedule::AmpSchedule) anchored at the
/// creation timestamp.
///
/// # Validation
///
/// - `owner` and `pool_account` must be non-zero and distinct.
/// - The basket enforces its own invariants (non-zero, distinct assets).
/// - `fee` and `admin_fee` must be within their protocol caps.
/// - `initial_a` is validated by [`Amp`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    owner: AccountId,
    pool_account: AccountId,
    basket: Basket,
    initial_a: Amp,
    fee: FeeRate,
    admin_fee: FeeRate,
}

impl PoolConfig {
    /// Creates a new `PoolConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if an account is zero or the
    /// owner doubles as the custody account, or if a fee exceeds its cap.
    pub fn new(
        owner: AccountId,
        pool_account: AccountId,
        basket: Basket,
        initial_a: Amp,
        fee: FeeRate,
        admin_fee: FeeRate,
    ) -> Result<Self> {
        let config = Self {
            owner,
            pool_account,
            basket,
            initial_a,
            fee,
            admin_fee,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] on any violation.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() {
            return Err(PoolError::InvalidConfig("owner account must be non-zero"));
        }
        if self.pool_account.is_zero() {
            return Err(PoolError::InvalidConfig("pool account must be non-zero"));
        }
        if self.owner == self.pool_account {
            return Err(PoolError::InvalidConfig(
                "owner and pool custody account must differ",
            ));
        }
        self.fee.ensure_trading_cap()?;
        self.admin_fee.ensure_admin_cap()?;
        Ok(())
    }

    /// Returns the pool owner.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// Returns the pool's custody account on the ledger.
    #[must_use]
    pub const fn pool_account(&self) -> AccountId {
        self.pool_account
    }

    /// Returns the asset basket.
    #[must_use]
    pub const fn basket(&self) -> Basket {
        self.basket
    }

    /// Returns the starting amplification coefficient.
    #[must_use]
    pub const fn initial_a(&self) -> Amp {
        self.initial_a
    }

    /// Returns the trading fee rate.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        self.fee
    }

    /// Returns the admin fee rate.
    #[must_use]
    pub const fn admin_fee(&self) -> FeeRate {
        self.admin_fee
    }
}
