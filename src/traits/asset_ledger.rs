//! External custody capability consumed by the pool engine.

use crate::domain::{AccountId, Amount, AssetId, Shares};
use crate::error::Result;

/// Asset custody and share-unit authority, as seen from the pool.
///
/// The engine never holds tokens itself: every transfer of basket assets
/// and every mint or burn of pool shares goes through this trait. An
/// implementation might wrap a chain runtime, a database, or the
/// [`InMemoryLedger`](crate::ledger::InMemoryLedger) used in tests.
///
/// # Contract
///
/// - Every mutating method either fully succeeds or fails without side
///   effects.
/// - [`move_in`](Self::move_in) must deliver exactly the requested
///   amount into pool custody. The engine books the requested amount, so
///   fee-on-transfer style assets (which deliver less than requested)
///   are **unsupported**: they would leave the booked balance above real
///   custody and corrupt admin-fee accounting.
/// - Implementations may be callback-capable; the engine defends its
///   entry points with a busy flag, and nested calls into the same pool
///   fail with [`Reentrancy`](crate::error::PoolError::Reentrancy).
pub trait AssetLedger {
    /// The balance of `asset` held by `who`.
    fn balance_of(&self, asset: AssetId, who: AccountId) -> Amount;

    /// Transfers `amount` of `asset` from `from` into pool custody.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientBalance`](crate::error::PoolError::InsufficientBalance)
    /// if `from` cannot cover the amount.
    fn move_in(&mut self, asset: AssetId, from: AccountId, amount: Amount) -> Result<()>;

    /// Transfers `amount` of `asset` out of pool custody to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientBalance`](crate::error::PoolError::InsufficientBalance)
    /// if custody cannot cover the amount.
    fn move_out(&mut self, asset: AssetId, to: AccountId, amount: Amount) -> Result<()>;

    /// The pool shares held by `who`.
    fn shares_of(&self, who: AccountId) -> Shares;

    /// Total outstanding pool shares.
    fn share_supply(&self) -> Shares;

    /// Mints `amount` shares to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Overflow`](crate::error::PoolError::Overflow) if the
    /// supply would exceed the representable range.
    fn mint_shares(&mut self, to: AccountId, amount: Shares) -> Result<()>;

    /// Burns `amount` shares from `from`.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientBalance`](crate::error::PoolError::InsufficientBalance)
    /// if `from` holds fewer shares.
    fn burn_shares(&mut self, from: AccountId, amount: Shares) -> Result<()>;
}
