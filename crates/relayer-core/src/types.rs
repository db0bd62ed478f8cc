//! Core type definitions for the batch relayer

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Error, Result};

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Kovan,
    Polygon,
    Arbitrum,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Ropsten => "ropsten",
            Self::Rinkeby => "rinkeby",
            Self::Goerli => "goerli",
            Self::Kovan => "kovan",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Ropsten => 3,
            Self::Rinkeby => 4,
            Self::Goerli => 5,
            Self::Kovan => 42,
            Self::Polygon => 137,
            Self::Arbitrum => 42161,
        }
    }

    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(Self::Mainnet),
            3 => Some(Self::Ropsten),
            4 => Some(Self::Rinkeby),
            5 => Some(Self::Goerli),
            42 => Some(Self::Kovan),
            137 => Some(Self::Polygon),
            42161 => Some(Self::Arbitrum),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Batch swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapKind {
    /// Amounts are exact inputs, outputs carry the slippage
    ExactIn,
    /// Amounts are exact outputs, inputs carry the slippage
    ExactOut,
}

impl SwapKind {
    /// Vault ABI value
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::ExactIn => 0,
            Self::ExactOut => 1,
        }
    }
}

/// Where the vault pulls funds from and sends them to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundManagement {
    pub sender: Address,
    pub from_internal_balance: bool,
    pub recipient: Address,
    pub to_internal_balance: bool,
}

/// One hop of a vault batch swap, indexing into a shared asset array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSwapStep {
    pub pool_id: B256,
    pub asset_in_index: usize,
    pub asset_out_index: usize,
    /// Literal amount, a chained reference, or zero for "use previous hop output"
    pub amount: U256,
    #[serde(default)]
    pub user_data: Bytes,
}

/// Pool refresh behaviour requested from the pool data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPoolsInput {
    pub fetch_pools: bool,
    pub fetch_on_chain: bool,
}

impl Default for FetchPoolsInput {
    fn default() -> Self {
        Self {
            fetch_pools: true,
            fetch_on_chain: false,
        }
    }
}

impl FetchPoolsInput {
    /// Fresh pools with on-chain balances
    pub fn on_chain() -> Self {
        Self {
            fetch_pools: true,
            fetch_on_chain: true,
        }
    }

    /// Use the current snapshot as-is
    pub fn cached() -> Self {
        Self {
            fetch_pools: false,
            fetch_on_chain: false,
        }
    }
}

/// Pool type tag as reported by the pool data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoolType {
    Weighted,
    Stable,
    MetaStable,
    StablePhantom,
    Linear,
    LiquidityBootstrapping,
    Investment,
    Other(String),
}

impl From<String> for PoolType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Weighted" => Self::Weighted,
            "Stable" => Self::Stable,
            "MetaStable" => Self::MetaStable,
            "StablePhantom" => Self::StablePhantom,
            "Linear" => Self::Linear,
            "LiquidityBootstrapping" => Self::LiquidityBootstrapping,
            "Investment" => Self::Investment,
            _ => Self::Other(tag),
        }
    }
}

impl From<PoolType> for String {
    fn from(pool_type: PoolType) -> Self {
        match pool_type {
            PoolType::Weighted => "Weighted".into(),
            PoolType::Stable => "Stable".into(),
            PoolType::MetaStable => "MetaStable".into(),
            PoolType::StablePhantom => "StablePhantom".into(),
            PoolType::Linear => "Linear".into(),
            PoolType::LiquidityBootstrapping => "LiquidityBootstrapping".into(),
            PoolType::Investment => "Investment".into(),
            PoolType::Other(tag) => tag,
        }
    }
}

/// Wrapper protocol tag declared for a linear pool factory
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinearPoolType {
    #[default]
    Aave,
    Yearn,
    Boo,
    /// Declared but not understood; rejected when a wrapper is resolved
    Unknown(String),
}

impl From<String> for LinearPoolType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "aave" => Self::Aave,
            "yearn" => Self::Yearn,
            "boo" => Self::Boo,
            _ => Self::Unknown(tag),
        }
    }
}

impl From<LinearPoolType> for String {
    fn from(tag: LinearPoolType) -> Self {
        match tag {
            LinearPoolType::Aave => "aave".into(),
            LinearPoolType::Yearn => "yearn".into(),
            LinearPoolType::Boo => "boo".into(),
            LinearPoolType::Unknown(tag) => tag,
        }
    }
}

/// Token entry of a pool snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolToken {
    pub address: Address,
    pub decimals: u8,
    /// Decimal string, e.g. "1.0213"; only meaningful for wrapped tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_rate: Option<String>,
}

/// Pool snapshot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: B256,
    pub address: Address,
    pub pool_type: PoolType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<Address>,
    pub tokens_list: Vec<Address>,
    pub tokens: Vec<PoolToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_index: Option<usize>,
}

impl Pool {
    pub fn is_weighted(&self) -> bool {
        self.pool_type == PoolType::Weighted
    }

    pub fn is_linear(&self) -> bool {
        self.pool_type == PoolType::Linear
    }

    pub fn is_stable_phantom(&self) -> bool {
        self.pool_type == PoolType::StablePhantom
    }

    /// Main (underlying) token of a linear pool. Index defaults to 0.
    pub fn main_token(&self) -> Option<Address> {
        self.tokens_list.get(self.main_index.unwrap_or(0)).copied()
    }

    /// Wrapped (yield-bearing) token of a linear pool. Index defaults to 0.
    pub fn wrapped_token(&self) -> Option<Address> {
        self.tokens_list.get(self.wrapped_index.unwrap_or(0)).copied()
    }

    /// Token metadata for the wrapped index
    pub fn wrapped_token_info(&self) -> Option<&PoolToken> {
        self.tokens.get(self.wrapped_index.unwrap_or(0))
    }

    pub fn contains_token(&self, token: Address) -> bool {
        self.tokens_list.contains(&token)
    }
}

/// Slippage tolerance as a fraction scaled by 1e18 (5% = 5e16)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "U256", into = "U256")]
pub struct Slippage(U256);

impl Slippage {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Rejects tolerances above 100%
    pub fn new(scaled: U256) -> Result<Self> {
        if scaled > constants::ONE {
            return Err(Error::invalid_request(format!(
                "slippage {} exceeds 1e18 (100%)",
                scaled
            )));
        }
        Ok(Self(scaled))
    }

    /// Basis points helper: 50 bps = 0.5%
    pub fn from_bps(bps: u16) -> Result<Self> {
        Self::new(U256::from(bps) * U256::from(100_000_000_000_000u64))
    }

    pub fn get(&self) -> U256 {
        self.0
    }

    /// `1e18 + slippage`
    pub fn up_factor(&self) -> U256 {
        constants::ONE + self.0
    }

    /// `1e18 - slippage`
    pub fn down_factor(&self) -> U256 {
        constants::ONE - self.0
    }
}

impl TryFrom<U256> for Slippage {
    type Error = Error;

    fn try_from(value: U256) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Slippage> for U256 {
    fn from(value: Slippage) -> Self {
        value.0
    }
}

/// Compare assets treating the native sentinel and the wrapped native token as equal
pub fn same_asset(a: Address, b: Address, wrapped_native: Address) -> bool {
    let canonical = |asset: Address| {
        if asset == constants::NATIVE_ASSET {
            wrapped_native
        } else {
            asset
        }
    };
    canonical(a) == canonical(b)
}

/// Constants
pub mod constants {
    use alloy::primitives::{Address, U256};

    /// 1e18, the fixed-point unit for slippage and rates
    pub const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Native coin sentinel
    pub const NATIVE_ASSET: Address = Address::ZERO;

    /// Decimals of the native coin
    pub const NATIVE_DECIMALS: u8 = 18;

    /// Deadline used for relayer batch swaps (no expiry)
    pub const MAX_DEADLINE: U256 = U256::MAX;
}
