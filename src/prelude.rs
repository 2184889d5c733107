//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use tripool_amm::prelude::*;
//! ```
//!
//! This re-exports the domain types, the ledger trait and reference
//! implementation, the configuration and pool types, and the error
//! types, so that consumers don't need to import from individual
//! submodules.

// Re-export domain types
pub use crate::domain::{
    AccountId, Amount, Amp, AssetId, Basket, Decimals, FeeRate, Shares, Timestamp,
};

// Re-export the custody seam and its reference implementation
pub use crate::ledger::InMemoryLedger;
pub use crate::traits::AssetLedger;

// Re-export math entry points
pub use crate::math::{compute_d, compute_y};

// Re-export schedules
pub use crate::schedule::{AmpSchedule, GovernanceSchedule};

// Re-export configuration and pool
pub use crate::config::PoolConfig;
pub use crate::pool::{PoolEngine, PoolEvent, PoolState};

// Re-export error types
pub use crate::error::{PoolError, Result};
