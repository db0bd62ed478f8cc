//! Configuration types for the batch relayer

use std::collections::HashMap;

use alloy::primitives::{address, b256, Address, B256};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::{FetchPoolsInput, LinearPoolType, Network};

/// Deployed contract addresses for a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub vault: Address,
    pub multicall: Address,
    /// Relay contract receiving the multicall batch (not deployed everywhere)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_relayer: Option<Address>,
}

/// Token addresses with special handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAddresses {
    pub wrapped_native_asset: Address,
}

/// Well-known pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReference {
    pub id: B256,
    pub address: Address,
}

/// Staking bar that mints a share token from pool BPT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareTokenProtocol {
    FBeetsBar,
    XSonarBar,
}

/// Share token minted from a pool's BPT and staked in a farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTokenConfig {
    pub protocol: ShareTokenProtocol,
    /// Share token address (what gets staked after minting)
    pub address: Address,
    /// Farm id of the share token in the MasterChef
    pub farm_id: u64,
    /// Pool whose BPT the bar accepts
    pub pool_id: B256,
}

/// Per-network configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub contracts: ContractAddresses,
    pub tokens: TokenAddresses,

    /// Linear pool factory → wrapper protocol tag
    #[serde(default)]
    pub linear_factories: HashMap<Address, LinearPoolType>,

    #[serde(default)]
    pub subgraph_url: String,

    /// Named pools, e.g. "staBal3Pool"
    #[serde(default)]
    pub pools: HashMap<String, PoolReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<ShareTokenConfig>,
}

const VAULT: Address = address!("BA12222222228d8Ba445958a75a0704d566BF2C8");

impl NetworkConfig {
    /// Built-in configuration for a network
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::base(
                network,
                VAULT,
                address!("eefba1e63905ef1d7acba5a8513c70307c1ce441"),
                address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-v2",
            )
            .with_linear_factory(
                address!("d7fad3bd59d6477cbe1be7f646f7f1ba25b230f8"),
                LinearPoolType::Aave,
            )
            .with_pool(
                "staBal3Pool",
                b256!("7b50775383d3d6f0215a8f290f2c9e2eebbeceb20000000000000000000000fe"),
                address!("7b50775383d3d6f0215a8f290f2c9e2eebbeceb2"),
            ),
            Network::Polygon => Self::base(
                network,
                VAULT,
                address!("a1B2b503959aedD81512C37e9dce48164ec6a94d"),
                address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-polygon-v2",
            ),
            Network::Arbitrum => Self::base(
                network,
                VAULT,
                address!("269ff446d9892c9e19082564df3f5e8741e190a1"),
                address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-arbitrum-v2",
            ),
            Network::Kovan => Self::base(
                network,
                VAULT,
                address!("2cc8688C5f75E365aaEEb4ea8D6a480405A48D2A"),
                address!("dFCeA9088c8A88A76FF74892C1457C17dfeef9C1"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-kovan-v2",
            )
            .with_pool(
                "staBal3Pool",
                b256!("8fd162f338b770f7e879030830cde9173367f3010000000000000000000004d8"),
                address!("8fd162f338b770f7e879030830cde9173367f301"),
            )
            .with_pool(
                "wethStaBal3",
                b256!("6be79a54f119dbf9e8ebd9ded8c5bd49205bc62d00020000000000000000033c"),
                address!("6be79a54f119dbf9e8ebd9ded8c5bd49205bc62d"),
            ),
            Network::Ropsten => Self::base(
                network,
                VAULT,
                address!("53c43764255c17bd724f74c4ef150724ac50a3ed"),
                address!("dFCeA9088c8A88A76FF74892C1457C17dfeef9C1"),
                "",
            ),
            Network::Rinkeby => Self::base(
                network,
                VAULT,
                address!("42ad527de7d4e9d9d011ac45b31d8551f8fe9821"),
                address!("dFCeA9088c8A88A76FF74892C1457C17dfeef9C1"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-rinkeby-v2",
            ),
            Network::Goerli => Self::base(
                network,
                address!("65748E8287Ce4B9E6D83EE853431958851550311"),
                address!("42ad527de7d4e9d9d011ac45b31d8551f8fe9821"),
                address!("9A1000D492d40bfccbc03f413A48F5B6516Ec0Fd"),
                "https://api.thegraph.com/subgraphs/name/balancer-labs/balancer-goerli-v2",
            ),
        }
    }

    fn base(
        network: Network,
        vault: Address,
        multicall: Address,
        wrapped_native_asset: Address,
        subgraph_url: &str,
    ) -> Self {
        Self {
            chain_id: network.chain_id(),
            contracts: ContractAddresses {
                vault,
                multicall,
                batch_relayer: None,
            },
            tokens: TokenAddresses {
                wrapped_native_asset,
            },
            linear_factories: HashMap::new(),
            subgraph_url: subgraph_url.to_string(),
            pools: HashMap::new(),
            share_token: None,
        }
    }

    pub fn with_linear_factory(mut self, factory: Address, tag: LinearPoolType) -> Self {
        self.linear_factories.insert(factory, tag);
        self
    }

    pub fn with_pool(mut self, name: &str, id: B256, address: Address) -> Self {
        self.pools
            .insert(name.to_string(), PoolReference { id, address });
        self
    }

    pub fn with_batch_relayer(mut self, batch_relayer: Address) -> Self {
        self.contracts.batch_relayer = Some(batch_relayer);
        self
    }

    pub fn with_share_token(mut self, share_token: ShareTokenConfig) -> Self {
        self.share_token = Some(share_token);
        self
    }

    /// Relay contract address, required for any chained batch
    pub fn batch_relayer(&self) -> Result<Address> {
        self.contracts.batch_relayer.ok_or_else(|| {
            Error::Config(format!(
                "no batch relayer configured for chain {}",
                self.chain_id
            ))
        })
    }

    pub fn wrapped_native_asset(&self) -> Address {
        self.tokens.wrapped_native_asset
    }

    /// Wrapper protocol tag for a linear pool created by `factory`.
    ///
    /// Pools from unregistered factories fall back to the default tag.
    pub fn linear_pool_type(&self, factory: Option<Address>) -> LinearPoolType {
        factory
            .and_then(|f| self.linear_factories.get(&f))
            .cloned()
            .unwrap_or_default()
    }

    pub fn network(&self) -> Option<Network> {
        Network::from_chain_id(self.chain_id)
    }
}

/// Relayer configuration: a network plus optional overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayerConfig {
    pub network: Network,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_relayer: Option<Address>,

    /// Extra factory tags merged over the built-in table
    #[serde(default)]
    pub linear_factories: HashMap<Address, LinearPoolType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<ShareTokenConfig>,

    /// Pool refresh behaviour for routing queries
    #[serde(default)]
    pub fetch: FetchPoolsInput,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            batch_relayer: None,
            linear_factories: HashMap::new(),
            share_token: None,
            fetch: FetchPoolsInput::default(),
        }
    }
}

impl RelayerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Built-in network table with this config's overrides applied
    pub fn network_config(&self) -> NetworkConfig {
        let mut config = NetworkConfig::for_network(self.network);
        if let Some(relayer) = self.batch_relayer {
            config.contracts.batch_relayer = Some(relayer);
        }
        for (factory, tag) in &self.linear_factories {
            config.linear_factories.insert(*factory, tag.clone());
        }
        if let Some(share_token) = &self.share_token {
            config.share_token = Some(share_token.clone());
        }
        config
    }
}
