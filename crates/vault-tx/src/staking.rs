//! Staking Encoders
//!
//! Share-token bars (fBeets, xSonar) and MasterChef farm deposits.

use alloy::primitives::{Address, U256};
use relayer_core::ShareTokenProtocol;
use serde::{Deserialize, Serialize};

use crate::abi::IStakingActions;
use crate::call::EncodedCall;
use crate::wrapping::ChainedTransfer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterChefDeposit {
    pub sender: Address,
    pub recipient: Address,
    pub token: Address,
    pub pid: u64,
    pub amount: U256,
    pub output_reference: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterChefWithdraw {
    pub recipient: Address,
    pub pid: u64,
    pub amount: U256,
    pub output_reference: U256,
}

pub fn encode_fbeets_bar_enter(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::fBeetsBarEnterCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_fbeets_bar_leave(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::fBeetsBarLeaveCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_xsonar_bar_enter(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::xSonarBarEnterCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_xsonar_bar_leave(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::xSonarBarLeaveCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

/// Mint the configured share token from pool BPT
pub fn encode_share_token_enter(
    protocol: ShareTokenProtocol,
    params: &ChainedTransfer,
) -> EncodedCall {
    match protocol {
        ShareTokenProtocol::FBeetsBar => encode_fbeets_bar_enter(params),
        ShareTokenProtocol::XSonarBar => encode_xsonar_bar_enter(params),
    }
}

/// Burn the configured share token back into pool BPT
pub fn encode_share_token_leave(
    protocol: ShareTokenProtocol,
    params: &ChainedTransfer,
) -> EncodedCall {
    match protocol {
        ShareTokenProtocol::FBeetsBar => encode_fbeets_bar_leave(params),
        ShareTokenProtocol::XSonarBar => encode_xsonar_bar_leave(params),
    }
}

pub fn encode_masterchef_deposit(params: &MasterChefDeposit) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::masterChefDepositCall {
        sender: params.sender,
        recipient: params.recipient,
        token: params.token,
        pid: U256::from(params.pid),
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_masterchef_withdraw(params: &MasterChefWithdraw) -> EncodedCall {
    EncodedCall::from_call(&IStakingActions::masterChefWithdrawCall {
        recipient: params.recipient,
        pid: U256::from(params.pid),
        amount: params.amount,
        outputReference: params.output_reference,
    })
}
