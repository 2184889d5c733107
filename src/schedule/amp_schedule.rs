//! Time-ramped amplification coefficient.

use crate::constants::{MAX_A_CHANGE, MIN_RAMP_TIME};
use crate::domain::{Amp, Timestamp};
use crate::error::{PoolError, Result};

/// Linear ramp of the amplification coefficient over a time window.
///
/// At any instant the effective `A` is the floor-interpolated value
/// between `initial_a` at `initial_time` and `future_a` at
/// `future_time`; outside the window it is pinned to the nearer
/// endpoint. When no ramp is active both coefficients and both times
/// coincide.
///
/// Ramps are rate-limited two ways: a new ramp may start no sooner than
/// [`MIN_RAMP_TIME`] after the previous one began, must run for at least
/// [`MIN_RAMP_TIME`], and may move `A` by at most a factor of
/// [`MAX_A_CHANGE`] in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmpSchedule {
    initial_a: Amp,
    future_a: Amp,
    initial_time: Timestamp,
    future_time: Timestamp,
}

impl AmpSchedule {
    /// Creates a flat schedule pinned at `initial_a`.
    #[must_use]
    pub const fn new(initial_a: Amp, now: Timestamp) -> Self {
        Self {
            initial_a,
            future_a: initial_a,
            initial_time: now,
            future_time: now,
        }
    }

    /// The effective amplification at `now`.
    ///
    /// Interpolates with floor division while a ramp is running; returns
    /// `future_a` once `now` reaches `future_time`. The result is always
    /// bounded by the two endpoint coefficients, so it stays in range.
    #[must_use]
    pub fn effective(&self, now: Timestamp) -> Amp {
        if now >= self.future_time {
            return self.future_a;
        }
        let a0 = u128::from(self.initial_a.get());
        let a1 = u128::from(self.future_a.get());
        let elapsed = u128::from(now.saturating_since(self.initial_time));
        let window = u128::from(self.future_time.saturating_since(self.initial_time));
        if window == 0 {
            return self.future_a;
        }
        let value = if a1 > a0 {
            a0 + (a1 - a0) * elapsed / window
        } else {
            a0 - (a0 - a1) * elapsed / window
        };
        // Bounded by a0 and a1, both validated at construction.
        Amp::from_raw(value as u64)
    }

    /// Starts a ramp towards `new_a`, finishing at `future_time`.
    ///
    /// Re-bases the schedule on the current effective coefficient, so an
    /// in-flight ramp is smoothly redirected rather than restarted.
    /// Returns the effective coefficient the ramp starts from.
    ///
    /// # Errors
    ///
    /// - [`PoolError::RampTooSoon`] if less than [`MIN_RAMP_TIME`] has
    ///   passed since the previous ramp began, or the requested window is
    ///   shorter than [`MIN_RAMP_TIME`].
    /// - [`PoolError::RampTooFast`] if `new_a` differs from the current
    ///   effective coefficient by more than a factor of [`MAX_A_CHANGE`]
    ///   in either direction.
    pub fn ramp_to(&mut self, new_a: Amp, future_time: Timestamp, now: Timestamp) -> Result<Amp> {
        if now < self.initial_time.saturating_add(MIN_RAMP_TIME) {
            return Err(PoolError::RampTooSoon("previous ramp began too recently"));
        }
        if future_time < now.saturating_add(MIN_RAMP_TIME) {
            return Err(PoolError::RampTooSoon("ramp window shorter than minimum"));
        }

        let current = self.effective(now);
        let cur = u128::from(current.get());
        let target = u128::from(new_a.get());
        let factor = u128::from(MAX_A_CHANGE);
        if target > cur * factor || cur > target * factor {
            return Err(PoolError::RampTooFast);
        }

        self.initial_a = current;
        self.future_a = new_a;
        self.initial_time = now;
        self.future_time = future_time;
        Ok(current)
    }

    /// Halts any running ramp, pinning the schedule at the current
    /// effective coefficient. Returns that coefficient.
    pub fn stop(&mut self, now: Timestamp) -> Amp {
        let current = self.effective(now);
        self.initial_a = current;
        self.future_a = current;
        self.initial_time = now;
        self.future_time = now;
        current
    }

    /// The coefficient the active ramp started from.
    #[must_use]
    pub const fn initial_a(&self) -> Amp {
        self.initial_a
    }

    /// The coefficient the active ramp is heading towards.
    #[must_use]
    pub const fn future_a(&self) -> Amp {
        self.future_a
    }

    /// When the active ramp began.
    #[must_use]
    pub const fn initial_time(&self) -> Timestamp {
        self.initial_time
    }

    /// When the active ramp completes.
    #[must_use]
    pub const fn future_time(&self) -> Timestamp {
        self.future_time
    }
}
