//! Newton-Raphson solvers for the StableSwap invariant.
//!
//! The invariant equation for `n` assets with amplification `A` is
//!
//! ```text
//! A·n·S + D = A·n·D + D^(n+1) / (n^n · Πx_i)
//! ```
//!
//! where `S = Σx_i` over the canonical balances. [`compute_d`] solves it
//! for `D` given the balances; [`compute_y`] solves it for one balance
//! given `D` fixed by the others.
//!
//! Both solvers operate on unsigned 256-bit integers with truncating
//! division. The multiplication-before-division ordering inside the
//! iterations is part of the rounding contract: reassociating terms
//! changes where truncation lands and can round in the pool's disfavour.
//! Every multiplication is checked: for canonical balances below `2^112`
//! at the balance ratios a pegged-asset pool can reach, no intermediate
//! product exceeds 256 bits, and pathological inputs fail with a clean
//! overflow error instead of a panic.

use primitive_types::U256;

use crate::constants::{MAX_ITERATIONS, N_ASSETS};
use crate::domain::Amp;
use crate::error::{PoolError, Result};

/// Absolute difference of two `U256` values.
fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Computes the StableSwap invariant `D` for the given canonical
/// balances via Newton-Raphson iteration.
///
/// Starting from `D = S`, each step evaluates
///
/// ```text
/// D_P    = D^(n+1) / (n^n · Πx_i)          (incrementally, per asset)
/// D_next = (A·n·S + n·D_P) · D / ((A·n − 1)·D + (n + 1)·D_P)
/// ```
///
/// and terminates once consecutive iterates differ by at most one unit.
/// Returns 0 for an empty pool (`S == 0`).
///
/// # Errors
///
/// - [`PoolError::DivisionByZero`] if one balance is zero while others
///   are not (an empty pool short-circuits before the loop).
/// - [`PoolError::Overflow`] if an intermediate product exceeds 256 bits,
///   which cannot happen for balances below `2^112`.
/// - [`PoolError::SolverDidNotConverge`] if the iteration has not
///   settled after [`MAX_ITERATIONS`] steps.
pub fn compute_d(xp: &[U256; N_ASSETS], amp: Amp) -> Result<U256> {
    let n = U256::from(N_ASSETS as u64);

    let mut s = U256::zero();
    for x in xp {
        s = s
            .checked_add(*x)
            .ok_or(PoolError::Overflow("invariant: balance sum"))?;
    }
    if s.is_zero() {
        return Ok(U256::zero());
    }

    let ann = U256::from(amp.get()) * n;
    let ann_sub_one = ann - U256::one();
    let n_add_one = n + U256::one();

    let mut d = s;
    for _ in 0..MAX_ITERATIONS {
        // d_p = D^(n+1) / (n^n · Πx_i), folded one asset at a time so no
        // intermediate exceeds D · D.
        let mut d_p = d;
        for x in xp {
            let denom = x
                .checked_mul(n)
                .ok_or(PoolError::Overflow("invariant: x·n"))?;
            if denom.is_zero() {
                return Err(PoolError::DivisionByZero);
            }
            d_p = d_p
                .checked_mul(d)
                .ok_or(PoolError::Overflow("invariant: d_p·d"))?
                / denom;
        }

        let numerator = ann
            .checked_mul(s)
            .ok_or(PoolError::Overflow("invariant: ann·s"))?
            .checked_add(
                d_p.checked_mul(n)
                    .ok_or(PoolError::Overflow("invariant: d_p·n"))?,
            )
            .ok_or(PoolError::Overflow("invariant: numerator sum"))?
            .checked_mul(d)
            .ok_or(PoolError::Overflow("invariant: numerator·d"))?;
        let denominator = ann_sub_one
            .checked_mul(d)
            .ok_or(PoolError::Overflow("invariant: (ann-1)·d"))?
            .checked_add(
                n_add_one
                    .checked_mul(d_p)
                    .ok_or(PoolError::Overflow("invariant: (n+1)·d_p"))?,
            )
            .ok_or(PoolError::Overflow("invariant: denominator sum"))?;
        if denominator.is_zero() {
            return Err(PoolError::DivisionByZero);
        }

        let d_next = numerator / denominator;
        if abs_diff(d_next, d) <= U256::one() {
            return Ok(d_next);
        }
        d = d_next;
    }

    Err(PoolError::SolverDidNotConverge("invariant D"))
}

/// Solves for the new canonical balance of asset `j` that preserves the
/// invariant after the balance of asset `i` has moved to `x_new`, with
/// all remaining balances fixed at `xp`.
///
/// Reduces the invariant to the quadratic `y² + b·y = c` in the unknown
/// balance and iterates
///
/// ```text
/// y_next = (y² + c) / (2y + b − D)
/// ```
///
/// from `y = D`, terminating once consecutive iterates differ by at most
/// one unit. The iteration converges from above, so the result never
/// understates what the pool must retain.
///
/// # Errors
///
/// - [`PoolError::SameCoin`] if `i == j`.
/// - [`PoolError::InvalidIndex`] if either index is out of range.
/// - [`PoolError::DivisionByZero`] if a participating balance is zero.
/// - [`PoolError::SolverDidNotConverge`] if the iteration has not
///   settled after [`MAX_ITERATIONS`] steps.
pub fn compute_y(
    i: usize,
    j: usize,
    x_new: U256,
    xp: &[U256; N_ASSETS],
    amp: Amp,
) -> Result<U256> {
    if i == j {
        return Err(PoolError::SameCoin);
    }
    if i >= N_ASSETS || j >= N_ASSETS {
        return Err(PoolError::InvalidIndex);
    }

    let n = U256::from(N_ASSETS as u64);
    let d = compute_d(xp, amp)?;
    let ann = U256::from(amp.get()) * n;

    let mut s_ = U256::zero();
    let mut c = d;
    for (k, x) in xp.iter().enumerate() {
        if k == j {
            continue;
        }
        let x_k = if k == i { x_new } else { *x };
        s_ = s_
            .checked_add(x_k)
            .ok_or(PoolError::Overflow("output: balance sum"))?;
        let denom = x_k
            .checked_mul(n)
            .ok_or(PoolError::Overflow("output: x·n"))?;
        if denom.is_zero() {
            return Err(PoolError::DivisionByZero);
        }
        c = c
            .checked_mul(d)
            .ok_or(PoolError::Overflow("output: c·d"))?
            / denom;
    }
    let ann_n = ann
        .checked_mul(n)
        .ok_or(PoolError::Overflow("output: ann·n"))?;
    c = c
        .checked_mul(d)
        .ok_or(PoolError::Overflow("output: c·d final"))?
        / ann_n;
    let b = s_
        .checked_add(d / ann)
        .ok_or(PoolError::Overflow("output: b"))?;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let numerator = y
            .checked_mul(y)
            .ok_or(PoolError::Overflow("output: y²"))?
            .checked_add(c)
            .ok_or(PoolError::Overflow("output: y² + c"))?;
        let denominator = y
            .checked_mul(U256::from(2u64))
            .ok_or(PoolError::Overflow("output: 2y"))?
            .checked_add(b)
            .ok_or(PoolError::Overflow("output: 2y + b"))?
            .checked_sub(d)
            .ok_or(PoolError::Underflow("output: 2y + b - d"))?;
        if denominator.is_zero() {
            return Err(PoolError::DivisionByZero);
        }

        let y_next = numerator / denominator;
        if abs_diff(y_next, y) <= U256::one() {
            return Ok(y_next);
        }
        y = y_next;
    }

    Err(PoolError::SolverDidNotConverge("output balance y"))
}
