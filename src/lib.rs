//! # Tripool AMM
//!
//! StableSwap invariant engine for a fixed basket of three pegged assets
//! with heterogeneous precisions: one 18-decimal asset and two 6-decimal
//! assets.
//!
//! The crate is the numerical and state-machine core of the pool. Token
//! custody, share minting and the clock all live outside it: custody is
//! abstracted behind the [`AssetLedger`](traits::AssetLedger) trait, and
//! every time-dependent operation takes an explicit
//! [`Timestamp`](domain::Timestamp), which keeps the engine fully
//! deterministic.
//!
//! # Quick Start
//!
//! ```rust
//! use tripool_amm::config::PoolConfig;
//! use tripool_amm::domain::{
//!     AccountId, Amount, Amp, AssetId, Basket, Decimals, FeeRate, Shares, Timestamp,
//! };
//! use tripool_amm::ledger::InMemoryLedger;
//! use tripool_amm::pool::PoolEngine;
//!
//! // 1. Describe the basket: one 18-decimal and two 6-decimal assets.
//! let basket = Basket::new(
//!     [
//!         AssetId::from_bytes([1u8; 32]),
//!         AssetId::from_bytes([2u8; 32]),
//!         AssetId::from_bytes([3u8; 32]),
//!     ],
//!     [
//!         Decimals::new(18).expect("valid decimals"),
//!         Decimals::new(6).expect("valid decimals"),
//!         Decimals::new(6).expect("valid decimals"),
//!     ],
//! )
//! .expect("valid basket");
//!
//! // 2. Configure and create the pool.
//! let owner = AccountId::from_bytes([0xEE; 32]);
//! let custody = AccountId::from_bytes([0xAA; 32]);
//! let config = PoolConfig::new(
//!     owner,
//!     custody,
//!     basket,
//!     Amp::new(2_000).expect("valid amp"),
//!     FeeRate::new(4_000_000),       // 0.04% trading fee
//!     FeeRate::new(5_000_000_000),   // half of it to the owner
//! )
//! .expect("valid config");
//!
//! let mut ledger = InMemoryLedger::new(custody);
//! let alice = AccountId::from_bytes([7u8; 32]);
//! ledger.credit(basket.asset(0), alice, Amount::new(200_000_000_000_000_000_000));
//! ledger.credit(basket.asset(1), alice, Amount::new(200_000_000));
//! ledger.credit(basket.asset(2), alice, Amount::new(200_000_000));
//!
//! let mut pool = PoolEngine::new(config, ledger, Timestamp::ZERO).expect("pool created");
//!
//! // 3. Seed liquidity and trade.
//! let deposit = [
//!     Amount::new(100_000_000_000_000_000_000), // 100 of the 18-dec asset
//!     Amount::new(100_000_000),                 // 100 of each 6-dec asset
//!     Amount::new(100_000_000),
//! ];
//! let minted = pool
//!     .add_liquidity(alice, deposit, Shares::ZERO, Timestamp::ZERO)
//!     .expect("deposit accepted");
//! assert!(!minted.is_zero());
//!
//! let dy = pool
//!     .exchange(alice, 0, 1, Amount::new(1_000_000_000_000_000_000), Amount::ZERO, Timestamp::ZERO)
//!     .expect("swap accepted");
//! assert!(dy.get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  builds PoolConfig, drives PoolEngine
//! └──────┬───────┘
//!        │ operations + explicit Timestamp
//!        ▼
//! ┌──────────────┐     ┌─────────────────┐
//! │  PoolEngine   │────▶│   AssetLedger    │  external custody & shares
//! └──────┬───────┘     └─────────────────┘
//!        │ reads schedules, solves invariant
//!        ▼
//! ┌──────────────┐
//! │ math / sched  │  compute_d, compute_y, AmpSchedule, GovernanceSchedule
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    Domain     │  Amount, Shares, FeeRate, Amp, Basket, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`Basket`](domain::Basket), etc. |
//! | [`math`] | `U256` Newton solvers, canonical scaling, fee arithmetic |
//! | [`schedule`] | [`AmpSchedule`](schedule::AmpSchedule) ramps and [`GovernanceSchedule`](schedule::GovernanceSchedule) timelocks |
//! | [`traits`] | The [`AssetLedger`](traits::AssetLedger) custody seam |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) reference implementation |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) validated constructor parameters |
//! | [`pool`] | [`PoolEngine`](pool::PoolEngine), [`PoolState`](pool::PoolState), [`PoolEvent`](pool::PoolEvent) |
//! | [`error`] | [`PoolError`](error::PoolError) unified error enum |
//! | [`constants`] | Protocol constants (fees caps, ramp timing, iteration bound) |
//! | [`prelude`] | Convenience re-exports for common types |

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod schedule;
pub mod traits;
