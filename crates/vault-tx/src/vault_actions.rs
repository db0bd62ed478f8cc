//! Vault Action Encoders
//!
//! Batch swap, pool join and pool exit calls for the relayer library.

use alloy::primitives::{Address, Bytes, B256, I256, U256};
use relayer_core::{BatchSwapStep, FundManagement, SwapKind};
use serde::{Deserialize, Serialize};

use crate::abi::{self, IVaultActions};
use crate::call::EncodedCall;
use crate::chained::OutputReference;

/// Arguments of a relayer `batchSwap`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSwapParams {
    pub kind: SwapKind,
    pub swaps: Vec<BatchSwapStep>,
    pub assets: Vec<Address>,
    pub funds: FundManagement,
    /// Positive = max sent, negative = min received
    pub limits: Vec<I256>,
    pub deadline: U256,
    pub value: U256,
    pub output_references: Vec<OutputReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPoolRequest {
    pub assets: Vec<Address>,
    pub min_amounts_out: Vec<U256>,
    pub user_data: Bytes,
    pub to_internal_balance: bool,
}

/// Arguments of a relayer `exitPool`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPoolParams {
    pub pool_id: B256,
    pub pool_kind: u8,
    pub sender: Address,
    pub recipient: Address,
    pub exit_pool_request: ExitPoolRequest,
    pub output_references: Vec<OutputReference>,
}

/// Flattened exit: request fields and call fields side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPoolData {
    pub pool_id: B256,
    pub pool_kind: u8,
    pub sender: Address,
    pub recipient: Address,
    pub output_references: Vec<OutputReference>,
    pub assets: Vec<Address>,
    pub min_amounts_out: Vec<U256>,
    pub user_data: Bytes,
    pub to_internal_balance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPoolRequest {
    pub assets: Vec<Address>,
    /// Literal amounts or chained references
    pub max_amounts_in: Vec<U256>,
    pub user_data: Bytes,
    pub from_internal_balance: bool,
}

/// Arguments of a relayer `joinPool`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPoolParams {
    pub pool_id: B256,
    pub pool_kind: u8,
    pub sender: Address,
    pub recipient: Address,
    pub join_pool_request: JoinPoolRequest,
    pub value: U256,
    /// Zero or a chained reference for the minted BPT
    pub output_reference: U256,
}

fn output_references(references: &[OutputReference]) -> Vec<abi::OutputReference> {
    references
        .iter()
        .map(|r| abi::OutputReference {
            index: U256::from(r.index),
            key: r.key.value(),
        })
        .collect()
}

fn swap_steps(swaps: &[BatchSwapStep]) -> Vec<abi::BatchSwapStep> {
    swaps
        .iter()
        .map(|s| abi::BatchSwapStep {
            poolId: s.pool_id,
            assetInIndex: U256::from(s.asset_in_index),
            assetOutIndex: U256::from(s.asset_out_index),
            amount: s.amount,
            userData: s.user_data.clone(),
        })
        .collect()
}

fn funds(funds: &FundManagement) -> abi::FundManagement {
    abi::FundManagement {
        sender: funds.sender,
        fromInternalBalance: funds.from_internal_balance,
        recipient: funds.recipient,
        toInternalBalance: funds.to_internal_balance,
    }
}

pub fn encode_batch_swap(params: &BatchSwapParams) -> EncodedCall {
    EncodedCall::from_call(&IVaultActions::batchSwapCall {
        kind: params.kind.as_u8(),
        swaps: swap_steps(&params.swaps),
        assets: params.assets.clone(),
        funds: funds(&params.funds),
        limits: params.limits.clone(),
        deadline: params.deadline,
        value: params.value,
        outputReferences: output_references(&params.output_references),
    })
}

pub fn encode_exit_pool(params: &ExitPoolParams) -> EncodedCall {
    let request = &params.exit_pool_request;
    EncodedCall::from_call(&IVaultActions::exitPoolCall {
        poolId: params.pool_id,
        kind: params.pool_kind,
        sender: params.sender,
        recipient: params.recipient,
        request: abi::ExitPoolRequest {
            assets: request.assets.clone(),
            minAmountsOut: request.min_amounts_out.clone(),
            userData: request.user_data.clone(),
            toInternalBalance: request.to_internal_balance,
        },
        outputReferences: output_references(&params.output_references),
    })
}

pub fn encode_join_pool(params: &JoinPoolParams) -> EncodedCall {
    let request = &params.join_pool_request;
    EncodedCall::from_call(&IVaultActions::joinPoolCall {
        poolId: params.pool_id,
        kind: params.pool_kind,
        sender: params.sender,
        recipient: params.recipient,
        request: abi::JoinPoolRequest {
            assets: request.assets.clone(),
            maxAmountsIn: request.max_amounts_in.clone(),
            userData: request.user_data.clone(),
            fromInternalBalance: request.from_internal_balance,
        },
        value: params.value,
        outputReference: params.output_reference,
    })
}

/// Split flat exit data into request + call and encode it
pub fn construct_exit_call(data: &ExitPoolData) -> EncodedCall {
    encode_exit_pool(&ExitPoolParams {
        pool_id: data.pool_id,
        pool_kind: data.pool_kind,
        sender: data.sender,
        recipient: data.recipient,
        exit_pool_request: ExitPoolRequest {
            assets: data.assets.clone(),
            min_amounts_out: data.min_amounts_out.clone(),
            user_data: data.user_data.clone(),
            to_internal_balance: data.to_internal_balance,
        },
        output_references: data.output_references.clone(),
    })
}
