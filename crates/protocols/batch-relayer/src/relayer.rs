//! Batch Relayer Handle
//!
//! [`Relayer`] owns the network configuration, the pool source, the router
//! oracle and the pool index cache. The high-level operations are implemented
//! on it in their own modules.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use pool_client::{PoolDataSource, PoolIndex, PoolIndexCache, RouterOracle};
use relayer_core::{FetchPoolsInput, NetworkConfig, Pool, RelayerConfig, Result};
use vault_tx::{check_literal_amount, WrapperProtocol};

use crate::calculator::parse_fixed;
use crate::routing::{query_routes_and_amounts, RouteQuery, RouteQueryOutput};

/// Builds relayer batches against one network
pub struct Relayer {
    network: NetworkConfig,
    fetch: FetchPoolsInput,
    source: Arc<dyn PoolDataSource>,
    oracle: Arc<dyn RouterOracle>,
    index_cache: PoolIndexCache,
}

impl Relayer {
    pub fn new(
        config: &RelayerConfig,
        source: Arc<dyn PoolDataSource>,
        oracle: Arc<dyn RouterOracle>,
    ) -> Self {
        Self::with_network_config(config.network_config(), config.fetch, source, oracle)
    }

    pub fn with_network_config(
        network: NetworkConfig,
        fetch: FetchPoolsInput,
        source: Arc<dyn PoolDataSource>,
        oracle: Arc<dyn RouterOracle>,
    ) -> Self {
        tracing::info!(
            chain_id = network.chain_id,
            batch_relayer = ?network.contracts.batch_relayer,
            "batch relayer initialized"
        );
        Self {
            network,
            fetch,
            source,
            oracle,
            index_cache: PoolIndexCache::new(),
        }
    }

    pub fn network_config(&self) -> &NetworkConfig {
        &self.network
    }

    /// Refresh the pool source using the configured fetch behaviour
    pub async fn fetch_pools(&self) -> bool {
        let ok = self.source.fetch_pools(self.fetch.fetch_on_chain).await;
        if !ok {
            tracing::warn!(on_chain = self.fetch.fetch_on_chain, "pool refresh failed");
        }
        ok
    }

    /// Current pool snapshot
    pub fn pools(&self) -> Arc<[Pool]> {
        self.source.pools()
    }

    /// Lookup index for the current snapshot
    pub async fn pool_index(&self) -> Arc<PoolIndex> {
        self.index_cache.get(self.source.as_ref()).await
    }

    pub fn batch_relayer_address(&self) -> Result<Address> {
        self.network.batch_relayer()
    }

    /// Wrapper protocol declared for a linear pool through its factory
    pub(crate) fn wrapper_protocol(&self, linear: &Pool) -> Result<WrapperProtocol> {
        let tag = self.network.linear_pool_type(linear.factory);
        Ok(WrapperProtocol::resolve(&tag, linear.address)?)
    }

    /// Decimal string scaled by the token's decimals in the snapshot
    pub(crate) fn scaled_amount(&self, index: &PoolIndex, token: Address, amount: &str) -> Result<U256> {
        let decimals = index.token_decimals(&token)?;
        check_literal_amount(parse_fixed(amount, decimals)?)
    }

    pub(crate) async fn query_routes(&self, query: &RouteQuery) -> Result<RouteQueryOutput> {
        query_routes_and_amounts(self.source.as_ref(), self.oracle.as_ref(), query).await
    }
}
