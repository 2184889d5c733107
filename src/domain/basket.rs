//! The fixed three-asset basket.

use crate::constants::N_ASSETS;
use crate::error::{PoolError, Result};

use super::{AssetId, Decimals};

/// The immutable set of three pegged assets a pool trades.
///
/// Each entry pairs an opaque [`AssetId`] with its [`Decimals`], from
/// which the canonical precision multiplier is derived. Validation
/// requires all ids to be non-zero and pairwise distinct.
///
/// Assets are addressed by index `0..3` everywhere in the engine;
/// [`ensure_index`](Self::ensure_index) is the single place that turns a
/// caller-supplied index into an [`PoolError::InvalidIndex`] failure.
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::{AssetId, Basket, Decimals};
///
/// let basket = Basket::new(
///     [
///         AssetId::from_bytes([1u8; 32]),
///         AssetId::from_bytes([2u8; 32]),
///         AssetId::from_bytes([3u8; 32]),
///     ],
///     [
///         Decimals::new(18).expect("valid"),
///         Decimals::new(6).expect("valid"),
///         Decimals::new(6).expect("valid"),
///     ],
/// )
/// .expect("valid basket");
/// assert_eq!(basket.precision_multiplier(1), 1_000_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basket {
    assets: [AssetId; N_ASSETS],
    decimals: [Decimals; N_ASSETS],
}

impl Basket {
    /// Creates a basket after validating the asset set.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if any id is zero or two ids
    /// coincide.
    pub fn new(assets: [AssetId; N_ASSETS], decimals: [Decimals; N_ASSETS]) -> Result<Self> {
        for asset in &assets {
            if asset.is_zero() {
                return Err(PoolError::InvalidConfig("zero asset id in basket"));
            }
        }
        for i in 0..N_ASSETS {
            for j in (i + 1)..N_ASSETS {
                if assets[i] == assets[j] {
                    return Err(PoolError::InvalidConfig("duplicate asset id in basket"));
                }
            }
        }
        Ok(Self { assets, decimals })
    }

    /// Returns the asset id at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`; call [`ensure_index`](Self::ensure_index)
    /// on caller-supplied indices first.
    #[must_use]
    pub const fn asset(&self, index: usize) -> AssetId {
        self.assets[index]
    }

    /// Returns all three asset ids in basket order.
    #[must_use]
    pub const fn assets(&self) -> [AssetId; N_ASSETS] {
        self.assets
    }

    /// Returns the precision multiplier `10^(18 - decimals)` for the
    /// asset at `index`.
    #[must_use]
    pub const fn precision_multiplier(&self, index: usize) -> u128 {
        self.decimals[index].precision_multiplier()
    }

    /// Validates a caller-supplied asset index.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidIndex`] if `index >= 3`.
    pub const fn ensure_index(&self, index: usize) -> Result<()> {
        if index >= N_ASSETS {
            return Err(PoolError::InvalidIndex);
        }
        Ok(())
    }
}
