//! Event records emitted by pool operations.

use primitive_types::U256;

use crate::constants::N_ASSETS;
use crate::domain::{AccountId, Amount, Amp, FeeRate, Shares, Timestamp};

/// A record of one observable state transition.
///
/// The engine appends an event for every successful mutating operation;
/// consumers drain them with
/// [`take_events`](crate::pool::PoolEngine::take_events) and forward
/// them to whatever observability layer hosts the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A swap completed.
    TokenExchange {
        /// Trader account.
        buyer: AccountId,
        /// Index of the asset sold to the pool.
        sold_id: usize,
        /// Native amount sold.
        tokens_sold: Amount,
        /// Index of the asset bought from the pool.
        bought_id: usize,
        /// Native amount bought (net of fees).
        tokens_bought: Amount,
    },
    /// Liquidity was deposited.
    AddLiquidity {
        /// Depositing account.
        provider: AccountId,
        /// Native amounts deposited per asset.
        amounts: [Amount; N_ASSETS],
        /// Imbalance fees charged per asset, native units.
        fees: [Amount; N_ASSETS],
        /// Invariant after the deposit, before fees.
        invariant: U256,
        /// Share supply after the mint.
        share_supply: Shares,
    },
    /// Liquidity was withdrawn proportionally.
    RemoveLiquidity {
        /// Withdrawing account.
        provider: AccountId,
        /// Native amounts paid out per asset.
        amounts: [Amount; N_ASSETS],
        /// Fees charged per asset; always zero for proportional exit.
        fees: [Amount; N_ASSETS],
        /// Share supply after the burn.
        share_supply: Shares,
    },
    /// An amplification ramp started.
    RampA {
        /// Effective coefficient the ramp starts from.
        old_a: Amp,
        /// Target coefficient.
        new_a: Amp,
        /// Ramp start time.
        initial_time: Timestamp,
        /// Ramp completion time.
        future_time: Timestamp,
    },
    /// A running amplification ramp was halted.
    StopRampA {
        /// Coefficient the schedule is now pinned at.
        a: Amp,
        /// When the ramp stopped.
        time: Timestamp,
    },
    /// A fee change was committed behind the timelock.
    CommitNewFee {
        /// Earliest time the change can be applied.
        deadline: Timestamp,
        /// Pending trading fee.
        fee: FeeRate,
        /// Pending admin fee.
        admin_fee: FeeRate,
    },
    /// A committed fee change became active.
    NewFee {
        /// Active trading fee.
        fee: FeeRate,
        /// Active admin fee.
        admin_fee: FeeRate,
    },
    /// The pool entered the killed state.
    Kill,
    /// The pool returned to the active state.
    Unkill,
    /// Accrued admin fees were swept to the owner.
    WithdrawAdminFees {
        /// Native amounts swept per asset.
        amounts: [Amount; N_ASSETS],
    },
}
