//! Time-locked fee governance.

use crate::constants::ADMIN_ACTIONS_DELAY;
use crate::domain::{FeeRate, Timestamp};
use crate::error::{PoolError, Result};

/// Two-phase commit for fee changes.
///
/// A fee change is first committed, which arms a deadline
/// [`ADMIN_ACTIONS_DELAY`] seconds in the future, and only becomes
/// active when applied at or after that deadline. While a change is
/// pending no further commit is accepted; there is no revocation
/// primitive, so the only way out of a pending change is to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GovernanceSchedule {
    deadline: Option<Timestamp>,
    pending_fee: FeeRate,
    pending_admin_fee: FeeRate,
}

impl GovernanceSchedule {
    /// Creates a schedule with no pending action.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadline: None,
            pending_fee: FeeRate::ZERO,
            pending_admin_fee: FeeRate::ZERO,
        }
    }

    /// Commits a fee change, arming the timelock. Returns the deadline
    /// after which [`apply`](Self::apply) will succeed.
    ///
    /// # Errors
    ///
    /// - [`PoolError::PendingActionExists`] if a change is already pending.
    /// - [`PoolError::InvalidConfig`] if either rate exceeds its cap.
    pub fn commit(&mut self, fee: FeeRate, admin_fee: FeeRate, now: Timestamp) -> Result<Timestamp> {
        if self.deadline.is_some() {
            return Err(PoolError::PendingActionExists);
        }
        fee.ensure_trading_cap()?;
        admin_fee.ensure_admin_cap()?;

        let deadline = now.saturating_add(ADMIN_ACTIONS_DELAY);
        self.deadline = Some(deadline);
        self.pending_fee = fee;
        self.pending_admin_fee = admin_fee;
        Ok(deadline)
    }

    /// Applies the pending fee change, clearing the timelock. Returns
    /// the `(fee, admin_fee)` pair to activate.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NoPendingAction`] if nothing is pending.
    /// - [`PoolError::DelayNotMet`] if `now` is before the deadline.
    pub fn apply(&mut self, now: Timestamp) -> Result<(FeeRate, FeeRate)> {
        let deadline = self.deadline.ok_or(PoolError::NoPendingAction)?;
        if now < deadline {
            return Err(PoolError::DelayNotMet);
        }
        self.deadline = None;
        Ok((self.pending_fee, self.pending_admin_fee))
    }

    /// The pending change, if any: `(deadline, fee, admin_fee)`.
    #[must_use]
    pub const fn pending(&self) -> Option<(Timestamp, FeeRate, FeeRate)> {
        match self.deadline {
            Some(deadline) => Some((deadline, self.pending_fee, self.pending_admin_fee)),
            None => None,
        }
    }
}
