//! Batch Relayer State Types
//!
//! Request types for the high-level operations and the batch plan they produce.

use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes, B256, U256};
use relayer_core::{FetchPoolsInput, FundManagement, Pool, Slippage};
use serde::{Deserialize, Serialize};
use vault_tx::{encode_multicall, EncodedCall, OutputReference};

use crate::constants::outputs;

/// One token received from a pool exit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitItem {
    pub exit_token: Address,
    pub expected_amount_out: U256,
    /// Swap the exited token into this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_swap_token_out: Option<Address>,
}

/// Exit a pool and swap some of the exited tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitAndBatchSwapInput {
    pub exiter: Address,
    pub swap_recipient: Address,
    pub pool_id: B256,
    /// Same length and order as the pool's tokens
    pub exits: Vec<ExitItem>,
    /// Encoded exit user data
    pub user_data: Bytes,
    pub slippage: Slippage,
    #[serde(default)]
    pub fetch_pools: FetchPoolsInput,
    /// Unwrap any wrapped linear-pool tokens the swap produces
    #[serde(default)]
    pub unwrap: bool,
}

/// Human-readable token amount, scaled by the token's decimals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinToken {
    pub address: Address,
    /// Decimal string, e.g. "12.5"
    pub amount: String,
}

/// Join a pool, routing through nested linear pools where needed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPoolInput {
    pub pool_id: B256,
    pub tokens: Vec<JoinToken>,
    pub bpt_out: U256,
    pub slippage: Slippage,
    pub funds: FundManagement,
    #[serde(default)]
    pub fetch_pools: FetchPoolsInput,
    /// Stake the resulting BPT (or share token) in this farm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<u64>,
    /// Mint the network's share token from the joined BPT
    #[serde(default)]
    pub mint_share_token: bool,
}

/// Swap into wrapped tokens and unwrap them.
///
/// For exact-in `amounts` are amounts of `tokens_in`; for exact-out they are
/// the desired amounts of unwrapped tokens. `rates` convert wrapped amounts
/// to unwrapped amounts (1e18 scaled).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapUnwrapInput {
    pub tokens_in: Vec<Address>,
    pub wrapped_tokens: Vec<Address>,
    pub amounts: Vec<U256>,
    pub rates: Vec<U256>,
    /// Recipient should be the relay contract, sender the caller
    pub funds: FundManagement,
    pub slippage: Slippage,
    #[serde(default)]
    pub fetch_pools: FetchPoolsInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhantomExitItem {
    pub bpt_amount_in: U256,
    pub token_out: Address,
    #[serde(default)]
    pub unwrap: bool,
}

/// Exit a stable phantom pool by swapping its BPT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitStablePhantomInput {
    pub account: Address,
    pub pool_id: B256,
    pub exits: Vec<PhantomExitItem>,
    pub slippage: Slippage,
}

/// Linear pool reachable from a target pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedLinearPool {
    pub pool: Pool,
    pub main_token: Address,
    pub wrapped_token: Address,
    /// Token swapped into: the linear BPT, or the phantom BPT that holds it
    pub pool_token_address: Address,
}

/// Unwrap calls plus the swap output references that feed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapCalls {
    pub calls: Vec<EncodedCall>,
    pub output_references: Vec<OutputReference>,
}

/// Contract entry point a plan is submitted through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTarget {
    #[default]
    Multicall,
}

/// Ordered relayer calls plus projected amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub target: PlanTarget,
    pub calls: Vec<EncodedCall>,
    pub outputs: BTreeMap<String, Vec<U256>>,
}

impl BatchPlan {
    pub fn new(calls: Vec<EncodedCall>) -> Self {
        Self {
            target: PlanTarget::Multicall,
            calls,
            outputs: BTreeMap::new(),
        }
    }

    pub fn with_output(mut self, name: &str, amounts: Vec<U256>) -> Self {
        self.outputs.insert(name.to_string(), amounts);
        self
    }

    pub fn amounts_out(&self) -> Option<&[U256]> {
        self.outputs.get(outputs::AMOUNTS_OUT).map(Vec::as_slice)
    }

    pub fn amounts_in(&self) -> Option<&[U256]> {
        self.outputs.get(outputs::AMOUNTS_IN).map(Vec::as_slice)
    }

    /// Calldata for the relay's `multicall`
    pub fn multicall(&self) -> EncodedCall {
        encode_multicall(&self.calls)
    }
}
