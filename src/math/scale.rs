//! Scaling between native asset units and the canonical 18-decimal
//! representation.
//!
//! Every asset carries an immutable precision multiplier
//! `10^(18 - decimals)`; the canonical balance of asset `i` is
//! `xp[i] = balance[i] · mul[i]`. All pool math runs on the canonical
//! side, and results are floor-divided back into native units at the
//! boundary.

use primitive_types::U256;

use crate::constants::N_ASSETS;
use crate::domain::{Amount, Basket};
use crate::error::{PoolError, Result};

/// Scales a full native balance vector into canonical units.
///
/// The multiply widens to 256 bits, so it cannot overflow for any
/// `u128` balance.
#[must_use]
pub fn to_canonical(balances: &[Amount; N_ASSETS], basket: &Basket) -> [U256; N_ASSETS] {
    let mut xp = [U256::zero(); N_ASSETS];
    for (i, balance) in balances.iter().enumerate() {
        xp[i] = canonical_amount(*balance, basket.precision_multiplier(i));
    }
    xp
}

/// Scales one native amount into canonical units.
#[must_use]
pub fn canonical_amount(amount: Amount, multiplier: u128) -> U256 {
    U256::from(amount.get()) * U256::from(multiplier)
}

/// Converts a canonical value back to native units, flooring.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if the native result exceeds `u128`,
/// which cannot happen for values that entered through
/// [`canonical_amount`].
pub fn from_canonical(value: U256, multiplier: u128) -> Result<Amount> {
    let native = value / U256::from(multiplier);
    if native > U256::from(u128::MAX) {
        return Err(PoolError::Overflow("canonical value exceeds native range"));
    }
    Ok(Amount::new(native.as_u128()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, Decimals};

    fn basket() -> Basket {
        let Ok(d18) = Decimals::new(18) else {
            panic!("valid decimals");
        };
        let Ok(d6) = Decimals::new(6) else {
            panic!("valid decimals");
        };
        let Ok(b) = Basket::new(
            [
                AssetId::from_bytes([1u8; 32]),
                AssetId::from_bytes([2u8; 32]),
                AssetId::from_bytes([3u8; 32]),
            ],
            [d18, d6, d6],
        ) else {
            panic!("valid basket");
        };
        b
    }

    #[test]
    fn canonical_balances_align_across_precisions() {
        // 100 units of the 18-dec asset and 100 units of a 6-dec asset
        // land on the same canonical value.
        let balances = [
            Amount::new(100_000_000_000_000_000_000), // 100 @ 18 dec
            Amount::new(100_000_000),                 // 100 @ 6 dec
            Amount::new(100_000_000),
        ];
        let xp = to_canonical(&balances, &basket());
        assert_eq!(xp[0], xp[1]);
        assert_eq!(xp[1], xp[2]);
        assert_eq!(xp[0], U256::from(100_000_000_000_000_000_000u128));
    }

    #[test]
    fn canonical_amount_widens() {
        // u128::MAX * 10^12 overflows u128 but not U256.
        let wide = canonical_amount(Amount::MAX, 1_000_000_000_000);
        assert_eq!(
            wide,
            U256::from(u128::MAX) * U256::from(1_000_000_000_000u64)
        );
    }

    #[test]
    fn from_canonical_floors() {
        let Ok(native) = from_canonical(U256::from(1_999_999u64), 1_000_000) else {
            panic!("expected Ok");
        };
        assert_eq!(native, Amount::new(1));
    }

    #[test]
    fn from_canonical_rejects_oversized() {
        let too_big = U256::from(u128::MAX) + U256::one();
        assert!(from_canonical(too_big, 1).is_err());
    }

    #[test]
    fn round_trip_is_identity_for_exact_multiples() {
        let amount = Amount::new(123_456_789);
        let mul = 1_000_000_000_000u128;
        let Ok(back) = from_canonical(canonical_amount(amount, mul), mul) else {
            panic!("expected Ok");
        };
        assert_eq!(back, amount);
    }
}
