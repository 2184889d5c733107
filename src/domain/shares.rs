//! Pool-share units with checked arithmetic.

use core::fmt;

use primitive_types::U256;

/// A quantity of pool-share units.
///
/// Shares are an 18-decimal quantity: the very first deposit mints the
/// invariant `D` itself, so one share at inception is worth exactly one
/// canonical unit of pool value. The supply lives in the external share
/// ledger; this type only carries quantities through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Shares(u128);

impl Shares {
    /// Zero shares.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Shares` quantity from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `self * numerator / denominator` with a 256-bit
    /// intermediate product and floor division.
    ///
    /// Returns `None` if `denominator` is zero or the result exceeds
    /// `u128`.
    #[must_use]
    pub fn mul_div_floor(&self, numerator: U256, denominator: U256) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let wide = U256::from(self.0).checked_mul(numerator)? / denominator;
        if wide > U256::from(u128::MAX) {
            return None;
        }
        Some(Self(wide.as_u128()))
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_and_get() {
        assert_eq!(Shares::new(7).get(), 7);
    }

    #[test]
    fn zero_constant() {
        assert!(Shares::ZERO.is_zero());
        assert!(!Shares::new(1).is_zero());
    }

    #[test]
    fn add_and_sub() {
        let a = Shares::new(10);
        let b = Shares::new(4);
        assert_eq!(a.checked_add(&b), Some(Shares::new(14)));
        assert_eq!(a.checked_sub(&b), Some(Shares::new(6)));
        assert_eq!(b.checked_sub(&a), None);
    }

    #[test]
    fn add_overflow() {
        assert_eq!(Shares::new(u128::MAX).checked_add(&Shares::new(1)), None);
    }

    // -- mul_div_floor ------------------------------------------------------

    #[test]
    fn mul_div_proportional() {
        // supply * (d2 - d0) / d0 shape
        let supply = Shares::new(300);
        let minted = supply.mul_div_floor(U256::from(10u64), U256::from(300u64));
        assert_eq!(minted, Some(Shares::new(10)));
    }

    #[test]
    fn mul_div_floors() {
        let s = Shares::new(10);
        assert_eq!(
            s.mul_div_floor(U256::from(1u64), U256::from(3u64)),
            Some(Shares::new(3))
        );
    }

    #[test]
    fn mul_div_zero_denominator() {
        assert_eq!(Shares::new(1).mul_div_floor(U256::one(), U256::zero()), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Shares::new(12)), "12");
    }
}
