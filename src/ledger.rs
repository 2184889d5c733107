//! In-memory reference implementation of [`AssetLedger`].

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount, AssetId, Shares};
use crate::error::{PoolError, Result};
use crate::traits::AssetLedger;

/// A self-contained ledger keeping all balances in process memory.
///
/// Used by the test suites and as a template for real custody
/// integrations. One instance backs one pool: the custody account is
/// fixed at construction and is the destination of every
/// [`move_in`](AssetLedger::move_in) and the source of every
/// [`move_out`](AssetLedger::move_out).
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{AccountId, Amount, AssetId};
/// use tripool_amm::ledger::InMemoryLedger;
/// use tripool_amm::traits::AssetLedger;
///
/// let pool = AccountId::from_bytes([0xAA; 32]);
/// let alice = AccountId::from_bytes([1; 32]);
/// let usd = AssetId::from_bytes([9; 32]);
///
/// let mut ledger = InMemoryLedger::new(pool);
/// ledger.credit(usd, alice, Amount::new(100));
/// ledger.move_in(usd, alice, Amount::new(40)).expect("funded");
/// assert_eq!(ledger.balance_of(usd, pool), Amount::new(40));
/// assert_eq!(ledger.balance_of(usd, alice), Amount::new(60));
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    custody: AccountId,
    balances: BTreeMap<(AssetId, AccountId), u128>,
    shares: BTreeMap<AccountId, u128>,
    supply: u128,
}

impl InMemoryLedger {
    /// Creates an empty ledger whose custody account is `pool_account`.
    #[must_use]
    pub fn new(pool_account: AccountId) -> Self {
        Self {
            custody: pool_account,
            balances: BTreeMap::new(),
            shares: BTreeMap::new(),
            supply: 0,
        }
    }

    /// Credits `amount` of `asset` to `who` out of thin air.
    ///
    /// Test and bootstrap helper; saturates at the numeric maximum.
    pub fn credit(&mut self, asset: AssetId, who: AccountId, amount: Amount) {
        let entry = self.balances.entry((asset, who)).or_insert(0);
        *entry = entry.saturating_add(amount.get());
    }

    fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let from_balance = self.balances.get(&(asset, from)).copied().unwrap_or(0);
        let remaining = from_balance
            .checked_sub(amount.get())
            .ok_or(PoolError::InsufficientBalance)?;
        self.balances.insert((asset, from), remaining);
        let entry = self.balances.entry((asset, to)).or_insert(0);
        *entry = entry
            .checked_add(amount.get())
            .ok_or(PoolError::Overflow("ledger balance"))?;
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: AssetId, who: AccountId) -> Amount {
        Amount::new(self.balances.get(&(asset, who)).copied().unwrap_or(0))
    }

    fn move_in(&mut self, asset: AssetId, from: AccountId, amount: Amount) -> Result<()> {
        let custody = self.custody;
        self.transfer(asset, from, custody, amount)
    }

    fn move_out(&mut self, asset: AssetId, to: AccountId, amount: Amount) -> Result<()> {
        let custody = self.custody;
        self.transfer(asset, custody, to, amount)
    }

    fn shares_of(&self, who: AccountId) -> Shares {
        Shares::new(self.shares.get(&who).copied().unwrap_or(0))
    }

    fn share_supply(&self) -> Shares {
        Shares::new(self.supply)
    }

    fn mint_shares(&mut self, to: AccountId, amount: Shares) -> Result<()> {
        let new_supply = self
            .supply
            .checked_add(amount.get())
            .ok_or(PoolError::Overflow("share supply"))?;
        let entry = self.shares.entry(to).or_insert(0);
        *entry = entry
            .checked_add(amount.get())
            .ok_or(PoolError::Overflow("share balance"))?;
        self.supply = new_supply;
        Ok(())
    }

    fn burn_shares(&mut self, from: AccountId, amount: Shares) -> Result<()> {
        let held = self.shares.get(&from).copied().unwrap_or(0);
        let remaining = held
            .checked_sub(amount.get())
            .ok_or(PoolError::InsufficientBalance)?;
        self.shares.insert(from, remaining);
        // Supply covers every holder balance, so this cannot underflow.
        self.supply -= amount.get();
        Ok(())
    }
}
