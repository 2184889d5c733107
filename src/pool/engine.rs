//! The pool engine: every public operation of the tri-pool.
//!
//! `PoolEngine` owns the book state, both parameter schedules, the
//! active fee pair and the ledger handle, and orchestrates them into the
//! operation surface: deposit, withdraw, swap, quotes, amplification
//! ramps, fee governance, the kill switch and admin-fee sweeping.
//!
//! # Atomicity
//!
//! Every mutating operation validates and computes first, then commits:
//! no book balance changes and no ledger transfer happens until all
//! checks have passed. An error therefore always leaves the pool exactly
//! as it was.
//!
//! # Re-entrancy
//!
//! Exclusive access (`&mut self`) already makes nested entry
//! unrepresentable in safe Rust. On top of that, every mutating entry
//! point sets a busy flag for its duration and fails with
//! [`PoolError::Reentrancy`] if the flag is already set, guarding
//! against callback-capable ledger implementations that smuggle a pool
//! handle across an unsafe or FFI boundary.

use primitive_types::U256;

use crate::config::PoolConfig;
use crate::constants::{N_ASSETS, PRECISION};
use crate::domain::{AccountId, Amount, Amp, Basket, FeeRate, Shares, Timestamp};
use crate::error::{PoolError, Result};
use crate::math::{
    canonical_amount, compute_d, compute_y, from_canonical, imbalance_fee_rate, split_swap_fee,
    to_canonical,
};
use crate::schedule::{AmpSchedule, GovernanceSchedule};
use crate::traits::AssetLedger;

use super::{PoolEvent, PoolState};

fn u256_to_amount(value: U256, context: &'static str) -> Result<Amount> {
    if value > U256::from(u128::MAX) {
        return Err(PoolError::Overflow(context));
    }
    Ok(Amount::new(value.as_u128()))
}

fn u256_to_shares(value: U256, context: &'static str) -> Result<Shares> {
    if value > U256::from(u128::MAX) {
        return Err(PoolError::Overflow(context));
    }
    Ok(Shares::new(value.as_u128()))
}

/// A StableSwap pool over a fixed basket of three pegged assets.
///
/// Generic over the [`AssetLedger`] that holds custody of the basket
/// assets and mints/burns the pool shares. The engine itself is a plain
/// value: wrap it in whatever synchronisation the host runtime uses and
/// feed it timestamps explicitly.
pub struct PoolEngine<L: AssetLedger> {
    ledger: L,
    owner: AccountId,
    pool_account: AccountId,
    basket: Basket,
    state: PoolState,
    amp_schedule: AmpSchedule,
    governance: GovernanceSchedule,
    fee: FeeRate,
    admin_fee: FeeRate,
    busy: bool,
    events: Vec<PoolEvent>,
}

impl<L: AssetLedger> PoolEngine<L> {
    /// Creates a pool from a validated configuration.
    ///
    /// The amplification schedule starts flat at the configured
    /// coefficient, anchored at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration fails
    /// validation (it cannot if it was built through
    /// [`PoolConfig::new`]).
    pub fn new(config: PoolConfig, ledger: L, now: Timestamp) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger,
            owner: config.owner(),
            pool_account: config.pool_account(),
            basket: config.basket(),
            state: PoolState::new(),
            amp_schedule: AmpSchedule::new(config.initial_a(), now),
            governance: GovernanceSchedule::new(),
            fee: config.fee(),
            admin_fee: config.admin_fee(),
            busy: false,
            events: Vec::new(),
        })
    }

    // -- guard helpers -------------------------------------------------------

    fn begin(&mut self) -> Result<()> {
        if self.busy {
            return Err(PoolError::Reentrancy);
        }
        self.busy = true;
        Ok(())
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        self.busy = false;
        result
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state.killed {
            return Err(PoolError::Killed);
        }
        Ok(())
    }

    fn ensure_owner(&self, caller: AccountId) -> Result<()> {
        if caller != self.owner {
            return Err(PoolError::Unauthorized);
        }
        Ok(())
    }

    fn xp(&self) -> [U256; N_ASSETS] {
        to_canonical(&self.state.balances, &self.basket)
    }

    /// Raw canonical output for moving `dx_canonical` of asset `i` into
    /// the pool against asset `j`, including the mandatory one-unit
    /// safety margin. Saturates to zero when the solution leaves no
    /// margin (one-unit swaps at dust scale).
    fn raw_output(
        &self,
        i: usize,
        j: usize,
        dx_canonical: U256,
        xp: &[U256; N_ASSETS],
        amp: Amp,
    ) -> Result<U256> {
        let x_new = xp[i]
            .checked_add(dx_canonical)
            .ok_or(PoolError::Overflow("swap input balance"))?;
        let y = compute_y(i, j, x_new, xp, amp)?;
        Ok(xp[j]
            .checked_sub(y + U256::one())
            .unwrap_or_else(U256::zero))
    }

    // -- liquidity -----------------------------------------------------------

    /// Deposits up to three assets and mints pool shares to `caller`.
    ///
    /// The very first deposit must fund every asset and mints the
    /// invariant `D` itself. Later deposits pay the imbalance fee on
    /// whatever part of the deposit deviates from the pool's current
    /// composition, and mint in proportion to invariant growth.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Killed`] while the pool is killed.
    /// - [`PoolError::InitialDepositIncomplete`] if the first deposit
    ///   misses an asset.
    /// - [`PoolError::InvariantDidNotGrow`] for an effectively empty
    ///   deposit.
    /// - [`PoolError::Slippage`] if fewer than `min_mint` shares result.
    /// - [`PoolError::InsufficientBalance`] if `caller` cannot fund the
    ///   deposit.
    pub fn add_liquidity(
        &mut self,
        caller: AccountId,
        amounts: [Amount; N_ASSETS],
        min_mint: Shares,
        now: Timestamp,
    ) -> Result<Shares> {
        self.begin()?;
        let result = self.add_liquidity_inner(caller, amounts, min_mint, now);
        self.finish(result)
    }

    fn add_liquidity_inner(
        &mut self,
        caller: AccountId,
        amounts: [Amount; N_ASSETS],
        min_mint: Shares,
        now: Timestamp,
    ) -> Result<Shares> {
        self.ensure_live()?;

        let supply = self.ledger.share_supply();
        if supply.is_zero() && amounts.iter().any(Amount::is_zero) {
            return Err(PoolError::InitialDepositIncomplete);
        }

        let amp = self.amp_schedule.effective(now);
        let old_balances = self.state.balances;
        let d0 = if supply.is_zero() {
            U256::zero()
        } else {
            compute_d(&to_canonical(&old_balances, &self.basket), amp)?
        };

        let mut new_balances = old_balances;
        for i in 0..N_ASSETS {
            new_balances[i] = old_balances[i]
                .checked_add(&amounts[i])
                .ok_or(PoolError::Overflow("deposit balance"))?;
        }
        let d1 = compute_d(&to_canonical(&new_balances, &self.basket), amp)?;
        if d1 <= d0 {
            return Err(PoolError::InvariantDidNotGrow);
        }

        let mut fees = [Amount::ZERO; N_ASSETS];
        let (stored_balances, minted) = if supply.is_zero() {
            (new_balances, u256_to_shares(d1, "initial mint")?)
        } else {
            // Charge the imbalance fee on each asset's deviation from the
            // proportional target, then mint on the post-fee invariant.
            let rate = imbalance_fee_rate(self.fee);
            let mut stored = new_balances;
            let mut booked = new_balances;
            for i in 0..N_ASSETS {
                let ideal_wide = U256::from(old_balances[i].get()) * d1 / d0;
                let ideal = u256_to_amount(ideal_wide, "ideal balance")?;
                let deviation = ideal.abs_diff(&new_balances[i]);
                fees[i] = rate
                    .apply_native(deviation)
                    .ok_or(PoolError::Overflow("imbalance fee"))?;
                let admin_cut = self
                    .admin_fee
                    .apply_native(fees[i])
                    .ok_or(PoolError::Overflow("admin fee"))?;
                stored[i] = new_balances[i]
                    .checked_sub(&admin_cut)
                    .ok_or(PoolError::Underflow("post-fee balance"))?;
                booked[i] = new_balances[i]
                    .checked_sub(&fees[i])
                    .ok_or(PoolError::Underflow("fee-adjusted balance"))?;
            }
            let d2 = compute_d(&to_canonical(&booked, &self.basket), amp)?;
            let growth = d2.checked_sub(d0).ok_or(PoolError::InvariantDidNotGrow)?;
            let minted = supply
                .mul_div_floor(growth, d0)
                .ok_or(PoolError::Overflow("share mint"))?;
            (stored, minted)
        };

        if minted < min_mint {
            return Err(PoolError::Slippage);
        }

        // Pre-check funding so the multi-asset pull is all-or-nothing.
        for i in 0..N_ASSETS {
            if !amounts[i].is_zero()
                && self.ledger.balance_of(self.basket.asset(i), caller) < amounts[i]
            {
                return Err(PoolError::InsufficientBalance);
            }
        }

        for i in 0..N_ASSETS {
            if !amounts[i].is_zero() {
                self.ledger.move_in(self.basket.asset(i), caller, amounts[i])?;
            }
        }
        self.state.balances = stored_balances;
        self.ledger.mint_shares(caller, minted)?;

        let new_supply = supply
            .checked_add(&minted)
            .ok_or(PoolError::Overflow("share supply"))?;
        self.events.push(PoolEvent::AddLiquidity {
            provider: caller,
            amounts,
            fees,
            invariant: d1,
            share_supply: new_supply,
        });
        Ok(minted)
    }

    /// Burns `shares` and pays out every asset proportionally.
    ///
    /// Deliberately available while the pool is killed: proportional
    /// exit is the last-resort escape hatch and charges no fees.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ZeroAmount`] for a zero share amount.
    /// - [`PoolError::InsufficientBalance`] if `caller` holds fewer
    ///   shares.
    /// - [`PoolError::InsufficientOutput`] if any payout is below the
    ///   caller's floor.
    pub fn remove_liquidity(
        &mut self,
        caller: AccountId,
        shares: Shares,
        min_amounts: [Amount; N_ASSETS],
    ) -> Result<[Amount; N_ASSETS]> {
        self.begin()?;
        let result = self.remove_liquidity_inner(caller, shares, min_amounts);
        self.finish(result)
    }

    fn remove_liquidity_inner(
        &mut self,
        caller: AccountId,
        shares: Shares,
        min_amounts: [Amount; N_ASSETS],
    ) -> Result<[Amount; N_ASSETS]> {
        if shares.is_zero() {
            return Err(PoolError::ZeroAmount);
        }
        if self.ledger.shares_of(caller) < shares {
            return Err(PoolError::InsufficientBalance);
        }
        let supply = self.ledger.share_supply();

        let mut amounts = [Amount::ZERO; N_ASSETS];
        for i in 0..N_ASSETS {
            amounts[i] = self.state.balances[i]
                .mul_div_floor(shares.get(), supply.get())
                .ok_or(PoolError::Overflow("proportional payout"))?;
            if amounts[i] < min_amounts[i] {
                return Err(PoolError::InsufficientOutput);
            }
        }

        self.ledger.burn_shares(caller, shares)?;
        for i in 0..N_ASSETS {
            self.state.balances[i] = self.state.balances[i]
                .checked_sub(&amounts[i])
                .ok_or(PoolError::Underflow("book balance"))?;
            if !amounts[i].is_zero() {
                self.ledger.move_out(self.basket.asset(i), caller, amounts[i])?;
            }
        }

        let new_supply = supply
            .checked_sub(&shares)
            .ok_or(PoolError::Underflow("share supply"))?;
        self.events.push(PoolEvent::RemoveLiquidity {
            provider: caller,
            amounts,
            fees: [Amount::ZERO; N_ASSETS],
            share_supply: new_supply,
        });
        Ok(amounts)
    }

    // -- swapping ------------------------------------------------------------

    /// Swaps `dx` of asset `i` for asset `j`, returning the net output.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Killed`] while the pool is killed.
    /// - [`PoolError::SameCoin`] / [`PoolError::InvalidIndex`] /
    ///   [`PoolError::ZeroAmount`] for malformed requests.
    /// - [`PoolError::Slippage`] if the net output is below `min_dy`.
    /// - [`PoolError::InsufficientBalance`] if `caller` cannot fund `dx`.
    pub fn exchange(
        &mut self,
        caller: AccountId,
        i: usize,
        j: usize,
        dx: Amount,
        min_dy: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        self.begin()?;
        let result = self.exchange_inner(caller, i, j, dx, min_dy, now);
        self.finish(result)
    }

    fn exchange_inner(
        &mut self,
        caller: AccountId,
        i: usize,
        j: usize,
        dx: Amount,
        min_dy: Amount,
        now: Timestamp,
    ) -> Result<Amount> {
        self.ensure_live()?;
        self.basket.ensure_index(i)?;
        self.basket.ensure_index(j)?;
        if i == j {
            return Err(PoolError::SameCoin);
        }
        if dx.is_zero() {
            return Err(PoolError::ZeroAmount);
        }

        let amp = self.amp_schedule.effective(now);
        let xp = self.xp();
        let mul_i = self.basket.precision_multiplier(i);
        let mul_j = self.basket.precision_multiplier(j);

        let dy_raw = self.raw_output(i, j, canonical_amount(dx, mul_i), &xp, amp)?;
        let split = split_swap_fee(dy_raw, self.fee, self.admin_fee);
        let dy_native = from_canonical(split.net, mul_j)?;
        let admin_native = from_canonical(split.admin_portion, mul_j)?;

        if dy_native < min_dy {
            return Err(PoolError::Slippage);
        }

        self.ledger.move_in(self.basket.asset(i), caller, dx)?;
        self.state.balances[i] = self.state.balances[i]
            .checked_add(&dx)
            .ok_or(PoolError::Overflow("book balance"))?;
        // The admin slice leaves the book but stays in custody until swept.
        let out_total = dy_native
            .checked_add(&admin_native)
            .ok_or(PoolError::Overflow("swap output"))?;
        self.state.balances[j] = self.state.balances[j]
            .checked_sub(&out_total)
            .ok_or(PoolError::Underflow("book balance"))?;
        self.ledger.move_out(self.basket.asset(j), caller, dy_native)?;

        self.events.push(PoolEvent::TokenExchange {
            buyer: caller,
            sold_id: i,
            tokens_sold: dx,
            bought_id: j,
            tokens_bought: dy_native,
        });
        Ok(dy_native)
    }

    // -- views ---------------------------------------------------------------

    /// Quotes the net output of swapping `dx` of asset `i` for asset
    /// `j`, after fees, without touching state.
    ///
    /// # Errors
    ///
    /// Same request validation as [`exchange`](Self::exchange), minus
    /// the zero-amount check: a zero `dx` quotes a zero output.
    pub fn quote(&self, i: usize, j: usize, dx: Amount, now: Timestamp) -> Result<Amount> {
        self.basket.ensure_index(i)?;
        self.basket.ensure_index(j)?;
        if i == j {
            return Err(PoolError::SameCoin);
        }

        let amp = self.amp_schedule.effective(now);
        let xp = self.xp();
        let dy_raw = self.raw_output(
            i,
            j,
            canonical_amount(dx, self.basket.precision_multiplier(i)),
            &xp,
            amp,
        )?;
        let net = dy_raw
            .checked_sub(self.fee.apply(dy_raw))
            .unwrap_or_else(U256::zero);
        from_canonical(net, self.basket.precision_multiplier(j))
    }

    /// Estimates the share delta of a deposit (`is_deposit`) or a
    /// by-amounts withdrawal, ignoring fees. A slippage-sizing helper,
    /// not a binding quote.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InsufficientBalance`] if a withdrawal estimate
    ///   exceeds the pool balances, or the pool has no shares to
    ///   withdraw against.
    pub fn quote_shares(
        &self,
        amounts: [Amount; N_ASSETS],
        is_deposit: bool,
        now: Timestamp,
    ) -> Result<Shares> {
        let supply = self.ledger.share_supply();
        if !is_deposit && supply.is_zero() {
            return Err(PoolError::InsufficientBalance);
        }

        let amp = self.amp_schedule.effective(now);
        let balances = self.state.balances;
        let mut adjusted = balances;
        for i in 0..N_ASSETS {
            adjusted[i] = if is_deposit {
                balances[i]
                    .checked_add(&amounts[i])
                    .ok_or(PoolError::Overflow("deposit balance"))?
            } else {
                balances[i]
                    .checked_sub(&amounts[i])
                    .ok_or(PoolError::InsufficientBalance)?
            };
        }

        let d1 = compute_d(&to_canonical(&adjusted, &self.basket), amp)?;
        if supply.is_zero() {
            return u256_to_shares(d1, "initial mint estimate");
        }
        let d0 = compute_d(&to_canonical(&balances, &self.basket), amp)?;
        let diff = if is_deposit {
            d1.checked_sub(d0)
        } else {
            d0.checked_sub(d1)
        }
        .ok_or(PoolError::InvariantDidNotGrow)?;
        supply
            .mul_div_floor(diff, d0)
            .ok_or(PoolError::Overflow("share estimate"))
    }

    /// The canonical value of one share scaled by `10^18`:
    /// `D · PRECISION / supply`, or 0 for an empty pool.
    ///
    /// Weakly monotone non-decreasing across every successful operation
    /// that leaves shares outstanding.
    ///
    /// # Errors
    ///
    /// Propagates solver failures, which cannot occur for balances in
    /// the supported range.
    pub fn virtual_price(&self, now: Timestamp) -> Result<U256> {
        let supply = self.ledger.share_supply();
        if supply.is_zero() {
            return Ok(U256::zero());
        }
        let amp = self.amp_schedule.effective(now);
        let d = compute_d(&self.xp(), amp)?;
        Ok(d * U256::from(PRECISION) / U256::from(supply.get()))
    }

    /// The effective amplification coefficient at `now`.
    #[must_use]
    pub fn amp(&self, now: Timestamp) -> Amp {
        self.amp_schedule.effective(now)
    }

    /// Admin fees accrued for asset `i`: custody minus book balance.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidIndex`] for an out-of-range index.
    pub fn admin_balance(&self, i: usize) -> Result<Amount> {
        self.basket.ensure_index(i)?;
        let custody = self
            .ledger
            .balance_of(self.basket.asset(i), self.pool_account);
        // Custody never drops below the book balance.
        Ok(custody
            .checked_sub(&self.state.balances[i])
            .unwrap_or(Amount::ZERO))
    }

    // -- amplification governance ---------------------------------------------

    /// Starts ramping the amplification towards `new_a`. Owner only.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Unauthorized`] / [`PoolError::Killed`].
    /// - [`PoolError::RampTooSoon`] / [`PoolError::RampTooFast`] from
    ///   the schedule's rate limits.
    pub fn ramp_a(
        &mut self,
        caller: AccountId,
        new_a: Amp,
        future_time: Timestamp,
        now: Timestamp,
    ) -> Result<()> {
        self.begin()?;
        let result = self.ramp_a_inner(caller, new_a, future_time, now);
        self.finish(result)
    }

    fn ramp_a_inner(
        &mut self,
        caller: AccountId,
        new_a: Amp,
        future_time: Timestamp,
        now: Timestamp,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.ensure_live()?;
        let old_a = self.amp_schedule.ramp_to(new_a, future_time, now)?;
        self.events.push(PoolEvent::RampA {
            old_a,
            new_a,
            initial_time: now,
            future_time,
        });
        Ok(())
    }

    /// Halts a running amplification ramp at its current value. Owner
    /// only.
    ///
    /// # Errors
    ///
    /// [`PoolError::Unauthorized`] / [`PoolError::Killed`].
    pub fn stop_ramp_a(&mut self, caller: AccountId, now: Timestamp) -> Result<()> {
        self.begin()?;
        let result = self.stop_ramp_a_inner(caller, now);
        self.finish(result)
    }

    fn stop_ramp_a_inner(&mut self, caller: AccountId, now: Timestamp) -> Result<()> {
        self.ensure_owner(caller)?;
        self.ensure_live()?;
        let a = self.amp_schedule.stop(now);
        self.events.push(PoolEvent::StopRampA { a, time: now });
        Ok(())
    }

    // -- fee governance --------------------------------------------------------

    /// Commits a fee change behind the timelock. Owner only. Returns the
    /// deadline after which [`apply_fee`](Self::apply_fee) succeeds.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Unauthorized`] / [`PoolError::Killed`].
    /// - [`PoolError::PendingActionExists`] while a change is pending.
    /// - [`PoolError::InvalidConfig`] if a rate exceeds its cap.
    pub fn commit_fee(
        &mut self,
        caller: AccountId,
        fee: FeeRate,
        admin_fee: FeeRate,
        now: Timestamp,
    ) -> Result<Timestamp> {
        self.begin()?;
        let result = self.commit_fee_inner(caller, fee, admin_fee, now);
        self.finish(result)
    }

    fn commit_fee_inner(
        &mut self,
        caller: AccountId,
        fee: FeeRate,
        admin_fee: FeeRate,
        now: Timestamp,
    ) -> Result<Timestamp> {
        self.ensure_owner(caller)?;
        self.ensure_live()?;
        let deadline = self.governance.commit(fee, admin_fee, now)?;
        self.events.push(PoolEvent::CommitNewFee {
            deadline,
            fee,
            admin_fee,
        });
        Ok(deadline)
    }

    /// Activates the pending fee change. Owner only.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Unauthorized`] / [`PoolError::Killed`].
    /// - [`PoolError::NoPendingAction`] / [`PoolError::DelayNotMet`]
    ///   from the timelock.
    pub fn apply_fee(&mut self, caller: AccountId, now: Timestamp) -> Result<()> {
        self.begin()?;
        let result = self.apply_fee_inner(caller, now);
        self.finish(result)
    }

    fn apply_fee_inner(&mut self, caller: AccountId, now: Timestamp) -> Result<()> {
        self.ensure_owner(caller)?;
        self.ensure_live()?;
        let (fee, admin_fee) = self.governance.apply(now)?;
        self.fee = fee;
        self.admin_fee = admin_fee;
        self.events.push(PoolEvent::NewFee { fee, admin_fee });
        Ok(())
    }

    // -- lifecycle -------------------------------------------------------------

    /// Puts the pool into the killed state. Owner only, idempotent.
    ///
    /// # Errors
    ///
    /// [`PoolError::Unauthorized`] for non-owners.
    pub fn kill(&mut self, caller: AccountId) -> Result<()> {
        self.begin()?;
        let result = self.kill_inner(caller);
        self.finish(result)
    }

    fn kill_inner(&mut self, caller: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.state.killed = true;
        self.events.push(PoolEvent::Kill);
        Ok(())
    }

    /// Returns a killed pool to the active state. Owner only.
    ///
    /// # Errors
    ///
    /// [`PoolError::Unauthorized`] for non-owners.
    pub fn unkill(&mut self, caller: AccountId) -> Result<()> {
        self.begin()?;
        let result = self.unkill_inner(caller);
        self.finish(result)
    }

    fn unkill_inner(&mut self, caller: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.state.killed = false;
        self.events.push(PoolEvent::Unkill);
        Ok(())
    }

    /// Sweeps all accrued admin fees to the owner. Owner only.
    ///
    /// # Errors
    ///
    /// [`PoolError::Unauthorized`] / [`PoolError::Killed`].
    pub fn withdraw_admin_fees(&mut self, caller: AccountId) -> Result<[Amount; N_ASSETS]> {
        self.begin()?;
        let result = self.withdraw_admin_fees_inner(caller);
        self.finish(result)
    }

    fn withdraw_admin_fees_inner(&mut self, caller: AccountId) -> Result<[Amount; N_ASSETS]> {
        self.ensure_owner(caller)?;
        self.ensure_live()?;

        let mut swept = [Amount::ZERO; N_ASSETS];
        for i in 0..N_ASSETS {
            let surplus = self.admin_balance(i)?;
            if !surplus.is_zero() {
                self.ledger
                    .move_out(self.basket.asset(i), self.owner, surplus)?;
                swept[i] = surplus;
            }
        }
        self.events
            .push(PoolEvent::WithdrawAdminFees { amounts: swept });
        Ok(swept)
    }

    // -- accessors -------------------------------------------------------------

    /// The pool owner.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// The pool's custody account on the ledger.
    #[must_use]
    pub const fn pool_account(&self) -> AccountId {
        self.pool_account
    }

    /// The asset basket.
    #[must_use]
    pub const fn basket(&self) -> Basket {
        self.basket
    }

    /// The book balances, native units per asset.
    #[must_use]
    pub const fn balances(&self) -> [Amount; N_ASSETS] {
        self.state.balances()
    }

    /// Whether the pool is killed.
    #[must_use]
    pub const fn is_killed(&self) -> bool {
        self.state.is_killed()
    }

    /// The active trading fee.
    #[must_use]
    pub const fn fee(&self) -> FeeRate {
        self.fee
    }

    /// The active admin fee.
    #[must_use]
    pub const fn admin_fee(&self) -> FeeRate {
        self.admin_fee
    }

    /// The amplification schedule.
    #[must_use]
    pub const fn amp_schedule(&self) -> &AmpSchedule {
        &self.amp_schedule
    }

    /// The fee governance schedule.
    #[must_use]
    pub const fn governance(&self) -> &GovernanceSchedule {
        &self.governance
    }

    /// Read access to the ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the ledger, for seeding test fixtures.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Drains and returns all recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, Decimals};
    use crate::ledger::InMemoryLedger;

    const ONE_18: u128 = 1_000_000_000_000_000_000;
    const ONE_6: u128 = 1_000_000;

    // -- fixture helpers ------------------------------------------------------

    fn owner() -> AccountId {
        AccountId::from_bytes([0xEE; 32])
    }

    fn pool_acct() -> AccountId {
        AccountId::from_bytes([0xAA; 32])
    }

    fn alice() -> AccountId {
        AccountId::from_bytes([1u8; 32])
    }

    fn bob() -> AccountId {
        AccountId::from_bytes([2u8; 32])
    }

    fn basket() -> Basket {
        let Ok(d18) = Decimals::new(18) else {
            panic!("valid decimals");
        };
        let Ok(d6) = Decimals::new(6) else {
            panic!("valid decimals");
        };
        let Ok(b) = Basket::new(
            [
                AssetId::from_bytes([11u8; 32]),
                AssetId::from_bytes([12u8; 32]),
                AssetId::from_bytes([13u8; 32]),
            ],
            [d18, d6, d6],
        ) else {
            panic!("valid basket");
        };
        b
    }

    fn t(seconds: u64) -> Timestamp {
        Timestamp::new(seconds)
    }

    fn make_engine(a: u64, fee: u64, admin_fee: u64) -> PoolEngine<InMemoryLedger> {
        let Ok(amp) = Amp::new(a) else {
            panic!("valid amp");
        };
        let Ok(config) = PoolConfig::new(
            owner(),
            pool_acct(),
            basket(),
            amp,
            FeeRate::new(fee),
            FeeRate::new(admin_fee),
        ) else {
            panic!("valid config");
        };
        let mut ledger = InMemoryLedger::new(pool_acct());
        for who in [alice(), bob()] {
            ledger.credit(basket().asset(0), who, Amount::new(10_000_000 * ONE_18));
            ledger.credit(basket().asset(1), who, Amount::new(10_000_000 * ONE_6));
            ledger.credit(basket().asset(2), who, Amount::new(10_000_000 * ONE_6));
        }
        let Ok(engine) = PoolEngine::new(config, ledger, t(0)) else {
            panic!("valid engine");
        };
        engine
    }

    fn seed_amounts() -> [Amount; N_ASSETS] {
        [
            Amount::new(100_000 * ONE_18),
            Amount::new(100_000 * ONE_6),
            Amount::new(100_000 * ONE_6),
        ]
    }

    /// Pool with the reference parameters, seeded with a balanced
    /// 100k/100k/100k deposit by alice.
    fn seeded_engine() -> PoolEngine<InMemoryLedger> {
        let mut engine = make_engine(2_000, 4_000_000, 5_000_000_000);
        let Ok(_) = engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)) else {
            panic!("seed deposit accepted");
        };
        engine
    }

    // -- construction ----------------------------------------------------------

    #[test]
    fn new_engine_is_empty_and_live() {
        let engine = make_engine(2_000, 4_000_000, 5_000_000_000);
        assert_eq!(engine.balances(), [Amount::ZERO; N_ASSETS]);
        assert!(!engine.is_killed());
        assert_eq!(engine.ledger().share_supply(), Shares::ZERO);
        let Ok(vp) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert_eq!(vp, U256::zero());
    }

    // -- add_liquidity ---------------------------------------------------------

    #[test]
    fn balanced_first_deposit() {
        let mut engine = make_engine(2_000, 4_000_000, 5_000_000_000);
        let Ok(minted) = engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        // A balanced deposit mints D = sum of canonical deposits exactly.
        assert_eq!(minted, Shares::new(300_000 * ONE_18));
        assert_eq!(engine.ledger().share_supply(), minted);
        assert_eq!(engine.balances(), seed_amounts());
        // One share is worth exactly one canonical unit at inception.
        let Ok(vp) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert_eq!(vp, U256::from(PRECISION));
    }

    #[test]
    fn first_deposit_missing_asset_rejected() {
        let mut engine = make_engine(2_000, 4_000_000, 5_000_000_000);
        let amounts = [
            Amount::new(100_000 * ONE_18),
            Amount::ZERO,
            Amount::new(100_000 * ONE_6),
        ];
        assert_eq!(
            engine.add_liquidity(alice(), amounts, Shares::ZERO, t(0)),
            Err(PoolError::InitialDepositIncomplete)
        );
        assert_eq!(engine.balances(), [Amount::ZERO; N_ASSETS]);
    }

    #[test]
    fn deposit_below_min_mint_rejected() {
        let mut engine = seeded_engine();
        let amounts = [Amount::new(1_000 * ONE_18), Amount::ZERO, Amount::ZERO];
        let result = engine.add_liquidity(bob(), amounts, Shares::new(1_000 * ONE_18), t(0));
        assert_eq!(result, Err(PoolError::Slippage));
        // Nothing moved.
        assert_eq!(engine.balances(), seed_amounts());
        assert_eq!(engine.ledger().share_supply(), Shares::new(300_000 * ONE_18));
    }

    #[test]
    fn imbalanced_deposit_pays_fee_and_raises_virtual_price() {
        let mut engine = seeded_engine();
        let supply_before = engine.ledger().share_supply();
        let Ok(vp_before) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };

        let amounts = [Amount::new(10_000 * ONE_18), Amount::ZERO, Amount::ZERO];
        let Ok(minted) = engine.add_liquidity(bob(), amounts, Shares::ZERO, t(0)) else {
            panic!("expected Ok");
        };

        // Strictly less than the proportional share of a balanced deposit.
        let proportional = Shares::new(supply_before.get() / 30);
        assert!(
            minted < proportional,
            "minted {minted} not below proportional {proportional}"
        );
        // Fees accrued to the remaining holders.
        let Ok(vp_after) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert!(vp_after > vp_before, "virtual price must rise: {vp_after}");

        // The event carries non-zero imbalance fees.
        let events = engine.take_events();
        let Some(PoolEvent::AddLiquidity { fees, .. }) = events.last() else {
            panic!("expected AddLiquidity event");
        };
        assert!(fees.iter().any(|f| !f.is_zero()));
    }

    #[test]
    fn deposit_rejected_when_killed() {
        let mut engine = seeded_engine();
        let Ok(()) = engine.kill(owner()) else {
            panic!("expected Ok");
        };
        assert_eq!(
            engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)),
            Err(PoolError::Killed)
        );
    }

    #[test]
    fn deposit_without_funding_rejected() {
        let mut engine = seeded_engine();
        let broke = AccountId::from_bytes([99u8; 32]);
        let amounts = [Amount::new(ONE_18), Amount::ZERO, Amount::ZERO];
        assert_eq!(
            engine.add_liquidity(broke, amounts, Shares::ZERO, t(0)),
            Err(PoolError::InsufficientBalance)
        );
        assert_eq!(engine.balances(), seed_amounts());
    }

    // -- exchange --------------------------------------------------------------

    #[test]
    fn small_swap_lands_in_expected_band() {
        let mut engine = seeded_engine();
        let dx = Amount::new(1_000 * ONE_18);
        let Ok(dy) = engine.exchange(bob(), 0, 1, dx, Amount::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        // ~1000 USDC minus the 0.04% fee and sub-basis-point slippage.
        assert!(
            (999_000_000..=999_600_000).contains(&dy.get()),
            "dy = {}",
            dy.get()
        );
        // Never more out (in pegged terms) than came in.
        assert!(dy.get() <= dx.get() / 1_000_000_000_000);
        // Half the fee accrues to the admin reserve of the output asset.
        let Ok(admin) = engine.admin_balance(1) else {
            panic!("expected Ok");
        };
        assert!(!admin.is_zero());
    }

    #[test]
    fn swap_into_higher_precision_asset() {
        let mut engine = seeded_engine();
        let dx = Amount::new(1_000 * ONE_6);
        let Ok(dy) = engine.exchange(bob(), 1, 0, dx, Amount::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        // Output in 18-decimal units, same economic band as above.
        assert!(
            (999 * ONE_18..=9996 * ONE_18 / 10).contains(&dy.get()),
            "dy = {}",
            dy.get()
        );
    }

    #[test]
    fn swap_request_validation() {
        let mut engine = seeded_engine();
        assert_eq!(
            engine.exchange(bob(), 1, 1, Amount::new(1), Amount::ZERO, t(0)),
            Err(PoolError::SameCoin)
        );
        assert_eq!(
            engine.exchange(bob(), 0, 3, Amount::new(1), Amount::ZERO, t(0)),
            Err(PoolError::InvalidIndex)
        );
        assert_eq!(
            engine.exchange(bob(), 0, 1, Amount::ZERO, Amount::ZERO, t(0)),
            Err(PoolError::ZeroAmount)
        );
    }

    #[test]
    fn swap_slippage_guard() {
        let mut engine = seeded_engine();
        let balances_before = engine.balances();
        let result = engine.exchange(
            bob(),
            0,
            1,
            Amount::new(1_000 * ONE_18),
            Amount::new(1_000 * ONE_6),
            t(0),
        );
        assert_eq!(result, Err(PoolError::Slippage));
        assert_eq!(engine.balances(), balances_before);
    }

    #[test]
    fn swap_rejected_when_killed() {
        let mut engine = seeded_engine();
        let Ok(()) = engine.kill(owner()) else {
            panic!("expected Ok");
        };
        assert_eq!(
            engine.exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0)),
            Err(PoolError::Killed)
        );
    }

    #[test]
    fn swap_books_balance_both_sides() {
        let mut engine = seeded_engine();
        let before = engine.balances();
        let dx = Amount::new(5_000 * ONE_18);
        let Ok(dy) = engine.exchange(bob(), 0, 2, dx, Amount::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        let after = engine.balances();
        assert_eq!(after[0], Amount::new(before[0].get() + dx.get()));
        // Output asset drops by net output plus the admin slice.
        assert!(after[2] < before[2]);
        let Ok(admin) = engine.admin_balance(2) else {
            panic!("expected Ok");
        };
        assert_eq!(
            before[2].get() - after[2].get(),
            dy.get() + admin.get(),
            "book delta must equal user net plus admin slice"
        );
    }

    // -- quote -----------------------------------------------------------------

    #[test]
    fn quote_matches_exchange_output() {
        let mut engine = seeded_engine();
        let dx = Amount::new(2_500 * ONE_18);
        let Ok(quoted) = engine.quote(0, 1, dx, t(0)) else {
            panic!("expected Ok");
        };
        let Ok(dy) = engine.exchange(bob(), 0, 1, dx, Amount::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        assert_eq!(quoted, dy);
    }

    #[test]
    fn quote_zero_input_is_zero_output() {
        let engine = seeded_engine();
        let Ok(quoted) = engine.quote(0, 1, Amount::ZERO, t(0)) else {
            panic!("expected Ok");
        };
        assert_eq!(quoted, Amount::ZERO);
    }

    #[test]
    fn larger_swaps_get_worse_rates() {
        let engine = seeded_engine();
        let Ok(small) = engine.quote(0, 1, Amount::new(1_000 * ONE_18), t(0)) else {
            panic!("expected Ok");
        };
        let Ok(large) = engine.quote(0, 1, Amount::new(100_000 * ONE_18), t(0)) else {
            panic!("expected Ok");
        };
        // Per-unit rate of the large trade is strictly worse.
        assert!(
            small.get() * 100 > large.get(),
            "small {small} per-unit should beat large {large}"
        );
    }

    // -- remove_liquidity ------------------------------------------------------

    #[test]
    fn proportional_withdrawal_of_half() {
        let mut engine = seeded_engine();
        let supply = engine.ledger().share_supply();
        let half = Shares::new(supply.get() / 2);
        let Ok(amounts) = engine.remove_liquidity(alice(), half, [Amount::ZERO; N_ASSETS]) else {
            panic!("expected Ok");
        };
        for (i, amount) in amounts.iter().enumerate() {
            let expected = seed_amounts()[i].get() / 2;
            assert!(
                amount.get().abs_diff(expected) <= 1,
                "asset {i}: {amount} vs {expected}"
            );
        }
        assert_eq!(engine.ledger().share_supply(), half);
    }

    #[test]
    fn withdrawal_floor_enforced() {
        let mut engine = seeded_engine();
        let supply = engine.ledger().share_supply();
        let mins = [
            Amount::new(60_000 * ONE_18),
            Amount::ZERO,
            Amount::ZERO,
        ];
        assert_eq!(
            engine.remove_liquidity(alice(), Shares::new(supply.get() / 2), mins),
            Err(PoolError::InsufficientOutput)
        );
        assert_eq!(engine.ledger().share_supply(), supply);
    }

    #[test]
    fn withdrawal_validation() {
        let mut engine = seeded_engine();
        assert_eq!(
            engine.remove_liquidity(alice(), Shares::ZERO, [Amount::ZERO; N_ASSETS]),
            Err(PoolError::ZeroAmount)
        );
        assert_eq!(
            engine.remove_liquidity(bob(), Shares::new(1), [Amount::ZERO; N_ASSETS]),
            Err(PoolError::InsufficientBalance)
        );
    }

    #[test]
    fn killed_pool_still_allows_proportional_exit() {
        let mut engine = seeded_engine();
        let Ok(()) = engine.kill(owner()) else {
            panic!("expected Ok");
        };
        // Swaps and deposits refused...
        assert_eq!(
            engine.exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0)),
            Err(PoolError::Killed)
        );
        assert_eq!(
            engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)),
            Err(PoolError::Killed)
        );
        // ...but the exit hatch stays open.
        let supply = engine.ledger().share_supply();
        let Ok(amounts) = engine.remove_liquidity(
            alice(),
            Shares::new(supply.get() / 2),
            [Amount::ZERO; N_ASSETS],
        ) else {
            panic!("withdraw under kill must succeed");
        };
        assert!(amounts.iter().all(|a| !a.is_zero()));
    }

    // -- lifecycle -------------------------------------------------------------

    #[test]
    fn kill_requires_owner() {
        let mut engine = seeded_engine();
        assert_eq!(engine.kill(alice()), Err(PoolError::Unauthorized));
        assert!(!engine.is_killed());
    }

    #[test]
    fn unkill_restores_operations() {
        let mut engine = seeded_engine();
        let Ok(()) = engine.kill(owner()) else {
            panic!("expected Ok");
        };
        assert!(engine.is_killed());
        let Ok(()) = engine.unkill(owner()) else {
            panic!("expected Ok");
        };
        assert!(!engine.is_killed());
        assert!(engine
            .exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0))
            .is_ok());
    }

    #[test]
    fn admin_ops_refused_when_killed() {
        let mut engine = seeded_engine();
        let Ok(()) = engine.kill(owner()) else {
            panic!("expected Ok");
        };
        let Ok(a) = Amp::new(4_000) else {
            panic!("valid amp");
        };
        assert_eq!(
            engine.ramp_a(owner(), a, t(200_000), t(100_000)),
            Err(PoolError::Killed)
        );
        assert_eq!(
            engine.commit_fee(owner(), FeeRate::ZERO, FeeRate::ZERO, t(0)),
            Err(PoolError::Killed)
        );
        assert_eq!(
            engine.withdraw_admin_fees(owner()),
            Err(PoolError::Killed)
        );
    }

    // -- amplification governance ----------------------------------------------

    #[test]
    fn ramp_interpolates_through_engine() {
        let mut engine = seeded_engine();
        let Ok(a_target) = Amp::new(4_000) else {
            panic!("valid amp");
        };
        let start = t(crate::constants::MIN_RAMP_TIME + 1);
        let end = start.saturating_add(86_400);
        let Ok(()) = engine.ramp_a(owner(), a_target, end, start) else {
            panic!("ramp accepted");
        };

        let mid = engine.amp(start.saturating_add(43_200));
        assert!(mid.get() > 2_000 && mid.get() < 4_000, "mid A = {mid}");
        assert_eq!(engine.amp(end).get(), 4_000);
    }

    #[test]
    fn ramp_rate_limit_via_engine() {
        let mut engine = seeded_engine();
        let Ok(too_far) = Amp::new(30_000) else {
            panic!("valid amp");
        };
        let start = t(crate::constants::MIN_RAMP_TIME + 1);
        assert_eq!(
            engine.ramp_a(owner(), too_far, start.saturating_add(86_400), start),
            Err(PoolError::RampTooFast)
        );
    }

    #[test]
    fn ramp_requires_owner() {
        let mut engine = seeded_engine();
        let Ok(a) = Amp::new(4_000) else {
            panic!("valid amp");
        };
        assert_eq!(
            engine.ramp_a(alice(), a, t(200_000), t(100_000)),
            Err(PoolError::Unauthorized)
        );
    }

    #[test]
    fn stop_ramp_pins_current_amp() {
        let mut engine = seeded_engine();
        let Ok(a_target) = Amp::new(4_000) else {
            panic!("valid amp");
        };
        let start = t(crate::constants::MIN_RAMP_TIME + 1);
        let end = start.saturating_add(86_400);
        let Ok(()) = engine.ramp_a(owner(), a_target, end, start) else {
            panic!("ramp accepted");
        };
        let mid = start.saturating_add(43_200);
        let Ok(()) = engine.stop_ramp_a(owner(), mid) else {
            panic!("stop accepted");
        };
        let pinned = engine.amp(mid);
        assert_eq!(engine.amp(end), pinned);
    }

    // -- fee governance ---------------------------------------------------------

    #[test]
    fn fee_timelock_lifecycle() {
        let mut engine = seeded_engine();
        let new_fee = FeeRate::new(2_000_000);
        let new_admin = FeeRate::new(6_000_000_000);

        let Ok(deadline) = engine.commit_fee(owner(), new_fee, new_admin, t(1_000)) else {
            panic!("commit accepted");
        };
        assert_eq!(
            deadline,
            t(1_000 + crate::constants::ADMIN_ACTIONS_DELAY)
        );

        // Early apply refused, change still pending, fee unchanged.
        assert_eq!(
            engine.apply_fee(owner(), t(deadline.get() - 1)),
            Err(PoolError::DelayNotMet)
        );
        assert_eq!(engine.fee(), FeeRate::new(4_000_000));

        // A second commit is refused while pending.
        assert_eq!(
            engine.commit_fee(owner(), FeeRate::ZERO, FeeRate::ZERO, t(2_000)),
            Err(PoolError::PendingActionExists)
        );

        let Ok(()) = engine.apply_fee(owner(), deadline) else {
            panic!("apply accepted");
        };
        assert_eq!(engine.fee(), new_fee);
        assert_eq!(engine.admin_fee(), new_admin);

        // The slate is clean for the next commit.
        assert!(engine
            .commit_fee(owner(), FeeRate::new(1), FeeRate::new(2), deadline)
            .is_ok());
    }

    #[test]
    fn fee_governance_requires_owner() {
        let mut engine = seeded_engine();
        assert_eq!(
            engine.commit_fee(alice(), FeeRate::ZERO, FeeRate::ZERO, t(0)),
            Err(PoolError::Unauthorized)
        );
        assert_eq!(
            engine.apply_fee(alice(), t(0)),
            Err(PoolError::Unauthorized)
        );
    }

    // -- admin fees --------------------------------------------------------------

    #[test]
    fn admin_fees_accrue_and_sweep() {
        let mut engine = seeded_engine();
        for _ in 0..5 {
            let Ok(_) = engine.exchange(bob(), 0, 1, Amount::new(1_000 * ONE_18), Amount::ZERO, t(0))
            else {
                panic!("swap accepted");
            };
        }
        let Ok(accrued) = engine.admin_balance(1) else {
            panic!("expected Ok");
        };
        assert!(!accrued.is_zero());

        let owner_before = engine.ledger().balance_of(basket().asset(1), owner());
        let Ok(swept) = engine.withdraw_admin_fees(owner()) else {
            panic!("sweep accepted");
        };
        assert_eq!(swept[1], accrued);
        let owner_after = engine.ledger().balance_of(basket().asset(1), owner());
        assert_eq!(owner_after.get() - owner_before.get(), accrued.get());

        // Custody now matches the book exactly.
        let Ok(after) = engine.admin_balance(1) else {
            panic!("expected Ok");
        };
        assert_eq!(after, Amount::ZERO);
    }

    #[test]
    fn admin_fee_sweep_requires_owner() {
        let mut engine = seeded_engine();
        assert_eq!(
            engine.withdraw_admin_fees(alice()),
            Err(PoolError::Unauthorized)
        );
    }

    // -- conservation and monotonicity -------------------------------------------

    #[test]
    fn custody_always_covers_book() {
        let mut engine = seeded_engine();
        let Ok(_) = engine.exchange(bob(), 0, 1, Amount::new(10_000 * ONE_18), Amount::ZERO, t(0))
        else {
            panic!("swap accepted");
        };
        let Ok(_) = engine.exchange(bob(), 1, 2, Amount::new(5_000 * ONE_6), Amount::ZERO, t(0))
        else {
            panic!("swap accepted");
        };
        let Ok(_) = engine.add_liquidity(
            bob(),
            [Amount::new(777 * ONE_18), Amount::ZERO, Amount::ZERO],
            Shares::ZERO,
            t(0),
        ) else {
            panic!("deposit accepted");
        };
        for i in 0..N_ASSETS {
            let custody = engine.ledger().balance_of(basket().asset(i), pool_acct());
            assert!(
                custody >= engine.balances()[i],
                "asset {i}: custody {custody} below book {}",
                engine.balances()[i]
            );
        }
    }

    #[test]
    fn virtual_price_never_decreases() {
        let mut engine = seeded_engine();
        let Ok(mut vp) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };

        let Ok(_) = engine.exchange(bob(), 0, 1, Amount::new(20_000 * ONE_18), Amount::ZERO, t(0))
        else {
            panic!("swap accepted");
        };
        let Ok(vp_after_swap) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert!(vp_after_swap >= vp);
        vp = vp_after_swap;

        let Ok(_) = engine.add_liquidity(
            bob(),
            [Amount::new(5_000 * ONE_18), Amount::ZERO, Amount::ZERO],
            Shares::ZERO,
            t(0),
        ) else {
            panic!("deposit accepted");
        };
        let Ok(vp_after_deposit) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert!(vp_after_deposit >= vp);
        vp = vp_after_deposit;

        let supply = engine.ledger().share_supply();
        let Ok(_) = engine.remove_liquidity(
            alice(),
            Shares::new(supply.get() / 3),
            [Amount::ZERO; N_ASSETS],
        ) else {
            panic!("withdraw accepted");
        };
        let Ok(vp_after_withdraw) = engine.virtual_price(t(0)) else {
            panic!("expected Ok");
        };
        assert!(vp_after_withdraw >= vp);
    }

    #[test]
    fn zero_fee_round_trip_returns_deposits() {
        let mut engine = make_engine(2_000, 0, 0);
        let Ok(_) = engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)) else {
            panic!("seed accepted");
        };
        // A proportional deposit followed by a full redemption of the
        // minted shares returns the deposit, up to a unit per asset.
        let deposit = [
            Amount::new(500 * ONE_18),
            Amount::new(500 * ONE_6),
            Amount::new(500 * ONE_6),
        ];
        let Ok(bob_minted) = engine.add_liquidity(bob(), deposit, Shares::ZERO, t(0)) else {
            panic!("deposit accepted");
        };
        let Ok(returned) = engine.remove_liquidity(bob(), bob_minted, [Amount::ZERO; N_ASSETS])
        else {
            panic!("withdraw accepted");
        };
        for (i, got) in returned.iter().enumerate() {
            assert!(
                got.get() <= deposit[i].get(),
                "asset {i}: round trip must not create value"
            );
            assert!(
                deposit[i].get() - got.get() <= N_ASSETS as u128,
                "asset {i}: lost more than rounding: {} vs {}",
                got.get(),
                deposit[i].get()
            );
        }
    }

    // -- quote_shares -------------------------------------------------------------

    #[test]
    fn quote_shares_bounds_actual_mint() {
        let mut engine = seeded_engine();
        let amounts = [Amount::new(10_000 * ONE_18), Amount::ZERO, Amount::ZERO];
        let Ok(estimate) = engine.quote_shares(amounts, true, t(0)) else {
            panic!("expected Ok");
        };
        let Ok(minted) = engine.add_liquidity(bob(), amounts, Shares::ZERO, t(0)) else {
            panic!("deposit accepted");
        };
        // The estimate ignores the imbalance fee, so it upper-bounds the
        // actual mint.
        assert!(estimate >= minted, "estimate {estimate} below mint {minted}");
    }

    #[test]
    fn quote_shares_withdrawal_estimate() {
        let engine = seeded_engine();
        let amounts = [
            Amount::new(10_000 * ONE_18),
            Amount::new(10_000 * ONE_6),
            Amount::new(10_000 * ONE_6),
        ];
        let Ok(estimate) = engine.quote_shares(amounts, false, t(0)) else {
            panic!("expected Ok");
        };
        // A balanced 10% withdrawal burns ~10% of supply.
        let supply = engine.ledger().share_supply();
        let expected = supply.get() / 10;
        assert!(
            estimate.get().abs_diff(expected) <= expected / 1_000,
            "estimate {estimate} far from {expected}"
        );
    }

    #[test]
    fn quote_shares_withdrawal_beyond_balances_rejected() {
        let engine = seeded_engine();
        let amounts = [Amount::new(200_000 * ONE_18), Amount::ZERO, Amount::ZERO];
        assert_eq!(
            engine.quote_shares(amounts, false, t(0)),
            Err(PoolError::InsufficientBalance)
        );
    }

    // -- re-entrancy ---------------------------------------------------------------

    #[test]
    fn busy_flag_rejects_nested_entry() {
        let mut engine = seeded_engine();
        engine.busy = true;
        assert_eq!(
            engine.exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0)),
            Err(PoolError::Reentrancy)
        );
        assert_eq!(
            engine.add_liquidity(alice(), seed_amounts(), Shares::ZERO, t(0)),
            Err(PoolError::Reentrancy)
        );
        assert_eq!(
            engine.remove_liquidity(alice(), Shares::new(1), [Amount::ZERO; N_ASSETS]),
            Err(PoolError::Reentrancy)
        );
        assert_eq!(engine.kill(owner()), Err(PoolError::Reentrancy));

        // Clearing the flag restores normal operation.
        engine.busy = false;
        assert!(engine
            .exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0))
            .is_ok());
    }

    #[test]
    fn failed_operation_clears_busy_flag() {
        let mut engine = seeded_engine();
        assert_eq!(
            engine.exchange(bob(), 0, 0, Amount::new(1), Amount::ZERO, t(0)),
            Err(PoolError::SameCoin)
        );
        // The guard must not stay latched after an error.
        assert!(engine
            .exchange(bob(), 0, 1, Amount::new(ONE_18), Amount::ZERO, t(0))
            .is_ok());
    }

    // -- events ---------------------------------------------------------------------

    #[test]
    fn events_record_operations_in_order() {
        let mut engine = seeded_engine();
        engine.take_events();

        let Ok(dy) = engine.exchange(bob(), 0, 1, Amount::new(1_000 * ONE_18), Amount::ZERO, t(0))
        else {
            panic!("swap accepted");
        };
        let Ok(()) = engine.kill(owner()) else {
            panic!("kill accepted");
        };

        let events = engine.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            PoolEvent::TokenExchange {
                buyer: bob(),
                sold_id: 0,
                tokens_sold: Amount::new(1_000 * ONE_18),
                bought_id: 1,
                tokens_bought: dy,
            }
        );
        assert_eq!(events[1], PoolEvent::Kill);
        // Drained: nothing left.
        assert!(engine.take_events().is_empty());
    }
}
