//! Router Oracle Interface
//!
//! Pathfinding and delta simulation live outside the relayer. The oracle
//! answers two questions: the route for a single token pair, and the vault
//! deltas of a full batch swap.

use alloy::primitives::{Address, I256, U256};
use async_trait::async_trait;
use relayer_core::{BatchSwapStep, RouterError, SwapKind};
use serde::{Deserialize, Serialize};

/// Route for one (token in, token out) pair.
///
/// Step indices point into `token_addresses`, which is local to this route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub swaps: Vec<BatchSwapStep>,
    pub token_addresses: Vec<Address>,
}

impl SwapInfo {
    /// No route was found for the pair
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }
}

/// External swap router
#[async_trait]
pub trait RouterOracle: Send + Sync {
    /// Best route for a single pair.
    ///
    /// An empty [`SwapInfo`] means no route exists; errors are reserved for
    /// failures of the oracle itself.
    async fn swap_info(
        &self,
        token_in: Address,
        token_out: Address,
        kind: SwapKind,
        amount: U256,
    ) -> Result<SwapInfo, RouterError>;

    /// Simulated vault deltas for a batch swap, one per asset.
    ///
    /// Positive values flow into the vault, negative values flow out.
    async fn query_batch_swap(
        &self,
        kind: SwapKind,
        swaps: &[BatchSwapStep],
        assets: &[Address],
    ) -> Result<Vec<I256>, RouterError>;
}
