//! Mutable pool state.

use crate::constants::N_ASSETS;
use crate::domain::Amount;

/// The book balances and lifecycle flag of one pool.
///
/// `balances` are native-unit book values per asset. They exclude
/// accrued admin fees: the external ledger's custody balance is always
/// at least the book value, and the non-negative difference is what
/// [`withdraw_admin_fees`](crate::pool::PoolEngine::withdraw_admin_fees)
/// sweeps to the owner.
///
/// When `killed` is set the pool is in its last-resort exit state: only
/// proportional withdrawal and `unkill` remain available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub(crate) balances: [Amount; N_ASSETS],
    pub(crate) killed: bool,
}

impl PoolState {
    /// Creates an empty, live pool state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            balances: [Amount::ZERO; N_ASSETS],
            killed: false,
        }
    }

    /// Returns the book balances.
    #[must_use]
    pub const fn balances(&self) -> [Amount; N_ASSETS] {
        self.balances
    }

    /// Returns the book balance of one asset.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`; engine entry points validate indices
    /// before reading.
    #[must_use]
    pub const fn balance(&self, index: usize) -> Amount {
        self.balances[index]
    }

    /// Returns `true` if the pool is killed.
    #[must_use]
    pub const fn is_killed(&self) -> bool {
        self.killed
    }
}

impl Default for PoolState {
    fn default() -> Self {
        Self::new()
    }
}
