//! Property-based tests using `proptest` for pool invariant validation.
//!
//! Covers the crate's universal properties:
//!
//! 1. **Solver convergence** — `compute_d` / `compute_y` terminate for
//!    the whole supported balance and amplification domain.
//! 2. **Invariant preservation** — a solved swap leaves `D` unchanged
//!    up to truncation noise.
//! 3. **Monotone virtual price** — no operation sequence lowers the
//!    value of a share.
//! 4. **Zero-fee round trip** — deposit then redeem loses at most
//!    rounding.
//! 5. **Ramp bounds** — the effective amplification stays between its
//!    endpoints and moves monotonically.

#![allow(clippy::panic)]

use primitive_types::U256;
use proptest::prelude::*;

use crate::config::PoolConfig;
use crate::constants::{MAX_A, MIN_RAMP_TIME, N_ASSETS};
use crate::domain::{
    AccountId, Amount, Amp, AssetId, Basket, Decimals, FeeRate, Shares, Timestamp,
};
use crate::ledger::InMemoryLedger;
use crate::math::{compute_d, compute_y};
use crate::pool::PoolEngine;
use crate::schedule::AmpSchedule;

const ONE_18: u128 = 1_000_000_000_000_000_000;
const ONE_6: u128 = 1_000_000;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn owner() -> AccountId {
    AccountId::from_bytes([0xEE; 32])
}

fn pool_acct() -> AccountId {
    AccountId::from_bytes([0xAA; 32])
}

fn trader() -> AccountId {
    AccountId::from_bytes([1u8; 32])
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

fn amp(value: u64) -> Amp {
    let Ok(a) = Amp::new(value) else {
        panic!("valid amp");
    };
    a
}

/// Engine seeded with a balanced 100k/100k/100k deposit.
fn seeded_engine(fee: u64, admin_fee: u64) -> PoolEngine<InMemoryLedger> {
    let Ok(config) = PoolConfig::new(
        owner(),
        pool_acct(),
        basket(),
        amp(2_000),
        FeeRate::new(fee),
        FeeRate::new(admin_fee),
    ) else {
        panic!("valid config");
    };
    let mut ledger = InMemoryLedger::new(pool_acct());
    ledger.credit(basket().asset(0), trader(), Amount::new(100_000_000 * ONE_18));
    ledger.credit(basket().asset(1), trader(), Amount::new(100_000_000 * ONE_6));
    ledger.credit(basket().asset(2), trader(), Amount::new(100_000_000 * ONE_6));
    let Ok(mut engine) = PoolEngine::new(config, ledger, Timestamp::ZERO) else {
        panic!("valid engine");
    };
    let seed = [
        Amount::new(100_000 * ONE_18),
        Amount::new(100_000 * ONE_6),
        Amount::new(100_000 * ONE_6),
    ];
    let Ok(_) = engine.add_liquidity(trader(), seed, Shares::ZERO, Timestamp::ZERO) else {
        panic!("seed accepted");
    };
    engine
}

fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

// ---------------------------------------------------------------------------
// Property 1: solver convergence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn balanced_invariant_is_exact(
        x in 1u128..(1u128 << 100),
        a in 1u64..MAX_A,
    ) {
        let xp = [U256::from(x); N_ASSETS];
        let Ok(d) = compute_d(&xp, amp(a)) else {
            panic!("solver must converge");
        };
        prop_assert_eq!(d, U256::from(x) * U256::from(N_ASSETS as u64));
    }

    #[test]
    fn imbalanced_invariant_converges_below_sum(
        x0 in ONE_18..(100_000_000 * ONE_18),
        x1 in ONE_18..(100_000_000 * ONE_18),
        x2 in ONE_18..(100_000_000 * ONE_18),
        a in 1u64..MAX_A,
    ) {
        let xp = [U256::from(x0), U256::from(x1), U256::from(x2)];
        let s = xp[0] + xp[1] + xp[2];
        let Ok(d) = compute_d(&xp, amp(a)) else {
            panic!("solver must converge");
        };
        prop_assert!(d > U256::zero());
        prop_assert!(d <= s, "D {} above sum {}", d, s);
    }

    // -----------------------------------------------------------------------
    // Property 2: a solved swap preserves the invariant
    // -----------------------------------------------------------------------

    #[test]
    fn solved_swap_preserves_invariant(
        x0 in ONE_18..(100_000_000 * ONE_18),
        x1 in ONE_18..(100_000_000 * ONE_18),
        x2 in ONE_18..(100_000_000 * ONE_18),
        dx_ppm in 1u128..1_000_000u128,
        a in 1u64..MAX_A,
    ) {
        let xp = [U256::from(x0), U256::from(x1), U256::from(x2)];
        let coefficient = amp(a);
        let Ok(d_before) = compute_d(&xp, coefficient) else {
            panic!("solver must converge");
        };
        // Trade up to 100% of the input-side balance.
        let dx = U256::from(x0) * U256::from(dx_ppm) / U256::from(1_000_000u64);
        prop_assume!(!dx.is_zero());
        let Ok(y) = compute_y(0, 1, xp[0] + dx, &xp, coefficient) else {
            panic!("solver must converge");
        };
        prop_assert!(y <= xp[1] + U256::from(2u64), "output balance grew");

        let post = [xp[0] + dx, y, xp[2]];
        let Ok(d_after) = compute_d(&post, coefficient) else {
            panic!("solver must converge");
        };
        // Truncation noise only: the unit-level error in y amplified by
        // the local curve sensitivity stays far inside one part in 10^5.
        let tolerance = d_before / U256::from(100_000u64) + U256::from(1_000u64);
        prop_assert!(
            abs_diff(d_after, d_before) <= tolerance,
            "D moved {} -> {}", d_before, d_after
        );
    }

    // -----------------------------------------------------------------------
    // Property 3: monotone virtual price
    // -----------------------------------------------------------------------

    #[test]
    fn virtual_price_monotone_under_swaps(
        swaps in prop::collection::vec((0usize..N_ASSETS, 0usize..N_ASSETS, 1u128..50_000), 1..8),
    ) {
        let mut engine = seeded_engine(4_000_000, 5_000_000_000);
        let Ok(mut vp) = engine.virtual_price(Timestamp::ZERO) else {
            panic!("virtual price");
        };
        for (i, j, units) in swaps {
            if i == j {
                continue;
            }
            let scale = if i == 0 { ONE_18 } else { ONE_6 };
            let dx = Amount::new(units * scale);
            let Ok(_) = engine.exchange(trader(), i, j, dx, Amount::ZERO, Timestamp::ZERO) else {
                panic!("swap within pool bounds must succeed");
            };
            let Ok(vp_next) = engine.virtual_price(Timestamp::ZERO) else {
                panic!("virtual price");
            };
            prop_assert!(
                vp_next >= vp,
                "virtual price dropped: {} -> {}", vp, vp_next
            );
            vp = vp_next;
        }
    }

    // -----------------------------------------------------------------------
    // Property 4: zero-fee round trip
    // -----------------------------------------------------------------------

    #[test]
    fn zero_fee_proportional_round_trip(units in 1u128..50_000) {
        let mut engine = seeded_engine(0, 0);
        let deposit = [
            Amount::new(units * ONE_18),
            Amount::new(units * ONE_6),
            Amount::new(units * ONE_6),
        ];
        let Ok(minted) = engine.add_liquidity(trader(), deposit, Shares::ZERO, Timestamp::ZERO)
        else {
            panic!("deposit accepted");
        };
        let Ok(returned) = engine.remove_liquidity(trader(), minted, [Amount::ZERO; N_ASSETS])
        else {
            panic!("withdraw accepted");
        };
        for i in 0..N_ASSETS {
            prop_assert!(returned[i] <= deposit[i]);
            prop_assert!(
                deposit[i].get() - returned[i].get() <= N_ASSETS as u128,
                "asset {}: {} -> {}", i, deposit[i], returned[i]
            );
        }
    }

    // -----------------------------------------------------------------------
    // Property 5: ramp bounds
    // -----------------------------------------------------------------------

    #[test]
    fn ramp_effective_bounded_and_monotone(
        a0 in 1u64..(MAX_A / 10),
        factor_pct in 11u64..1_000,
        window in MIN_RAMP_TIME..(30 * 86_400),
        probes in prop::collection::vec(0u64..(40 * 86_400), 4),
    ) {
        // Target within the allowed 10x band, in either direction.
        let a1 = (a0 * factor_pct / 100).clamp(1, MAX_A - 1);
        let mut schedule = AmpSchedule::new(amp(a0), Timestamp::ZERO);
        let start = Timestamp::new(MIN_RAMP_TIME);
        let end = start.saturating_add(window);
        let Ok(_) = schedule.ramp_to(amp(a1), end, start) else {
            panic!("ramp within bounds accepted");
        };

        let lo = a0.min(a1);
        let hi = a0.max(a1);
        let mut sorted = probes;
        sorted.sort_unstable();
        let mut prev: Option<u64> = None;
        for offset in sorted {
            let value = schedule.effective(start.saturating_add(offset)).get();
            prop_assert!((lo..=hi).contains(&value), "A {} left [{}, {}]", value, lo, hi);
            if let Some(p) = prev {
                if a1 >= a0 {
                    prop_assert!(value >= p, "rising ramp went backwards");
                } else {
                    prop_assert!(value <= p, "falling ramp went backwards");
                }
            }
            prev = Some(value);
        }
        prop_assert_eq!(schedule.effective(end).get(), a1);
    }
}
