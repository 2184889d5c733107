//! Fixed-point pool mathematics.
//!
//! Three layers, all pure functions:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`invariant`] | Newton-Raphson solvers for `D` and the output balance `y` |
//! | [`scale`] | Native ↔ canonical 18-decimal conversions |
//! | [`fees`] | Swap-fee split and the liquidity-imbalance rate |
//!
//! Everything operates on unsigned 256-bit integers with truncating
//! division; rounding direction is chosen so value can only accrue to
//! the pool, never leak from it.

pub mod fees;
pub mod invariant;
pub mod scale;

pub use fees::{imbalance_fee_rate, split_swap_fee, SwapFeeSplit};
pub use invariant::{compute_d, compute_y};
pub use scale::{canonical_amount, from_canonical, to_canonical};
