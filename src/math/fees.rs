//! Fee arithmetic: the swap-fee split and the liquidity-imbalance rate.

use primitive_types::U256;

use crate::constants::N_ASSETS;
use crate::domain::FeeRate;

/// Decomposition of a raw canonical swap output into the user's net
/// amount, the trading fee retained by the pool, and the admin slice of
/// that fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapFeeSplit {
    /// What the trader receives, canonical units.
    pub net: U256,
    /// Full trading fee taken from the raw output, canonical units.
    pub trading_fee: U256,
    /// Portion of the trading fee owed to the pool owner, canonical
    /// units. The remainder (`trading_fee - admin_portion`) stays in the
    /// pool and accrues to share holders.
    pub admin_portion: U256,
}

/// Splits a raw canonical output `dy_raw` into net output, trading fee
/// and admin portion.
///
/// `trading_fee = dy_raw · fee / FEE_DENOM` and
/// `admin_portion = trading_fee · admin_fee / FEE_DENOM`, both floored,
/// so every rounding unit stays with the share holders.
#[must_use]
pub fn split_swap_fee(dy_raw: U256, fee: FeeRate, admin_fee: FeeRate) -> SwapFeeSplit {
    let trading_fee = fee.apply(dy_raw);
    let admin_portion = admin_fee.apply(trading_fee);
    SwapFeeSplit {
        net: dy_raw.saturating_sub(trading_fee),
        trading_fee,
        admin_portion,
    }
}

/// The elevated per-asset rate charged on the imbalanced part of a
/// deposit: `fee · n / (4 · (n − 1))`.
///
/// Calibrated so that a maximally lopsided deposit pays the same as
/// swapping the excess in afterwards would have.
#[must_use]
pub fn imbalance_fee_rate(fee: FeeRate) -> FeeRate {
    let n = N_ASSETS as u64;
    FeeRate::new(fee.get() * n / (4 * (n - 1)))
}
