//! Weighted Pool User Data
//!
//! `userData` payloads for weighted pool joins and exits. The first word is
//! always the join or exit kind.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolValue;

/// Weighted pool join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WeightedPoolJoinKind {
    Init = 0,
    ExactTokensInForBptOut = 1,
    TokenInForExactBptOut = 2,
    AllTokensInForExactBptOut = 3,
}

/// Weighted pool exit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WeightedPoolExitKind {
    ExactBptInForOneTokenOut = 0,
    ExactBptInForTokensOut = 1,
    BptInForExactTokensOut = 2,
    ManagementFeeTokensOut = 3,
}

impl WeightedPoolJoinKind {
    fn word(self) -> U256 {
        U256::from(self as u8)
    }
}

impl WeightedPoolExitKind {
    fn word(self) -> U256 {
        U256::from(self as u8)
    }
}

pub struct WeightedPoolEncoder;

impl WeightedPoolEncoder {
    /// Initial join, sets the pool's starting balances
    pub fn join_init(amounts_in: &[U256]) -> Bytes {
        (WeightedPoolJoinKind::Init.word(), amounts_in.to_vec())
            .abi_encode_params()
            .into()
    }

    /// Join with exact token amounts; amounts may be chained references
    pub fn join_exact_tokens_in_for_bpt_out(amounts_in: &[U256], minimum_bpt: U256) -> Bytes {
        (
            WeightedPoolJoinKind::ExactTokensInForBptOut.word(),
            amounts_in.to_vec(),
            minimum_bpt,
        )
            .abi_encode_params()
            .into()
    }

    pub fn join_token_in_for_exact_bpt_out(bpt_amount_out: U256, enter_token_index: usize) -> Bytes {
        (
            WeightedPoolJoinKind::TokenInForExactBptOut.word(),
            bpt_amount_out,
            U256::from(enter_token_index),
        )
            .abi_encode_params()
            .into()
    }

    pub fn join_all_tokens_in_for_exact_bpt_out(bpt_amount_out: U256) -> Bytes {
        (
            WeightedPoolJoinKind::AllTokensInForExactBptOut.word(),
            bpt_amount_out,
        )
            .abi_encode_params()
            .into()
    }

    pub fn exit_exact_bpt_in_for_one_token_out(bpt_amount_in: U256, exit_token_index: usize) -> Bytes {
        (
            WeightedPoolExitKind::ExactBptInForOneTokenOut.word(),
            bpt_amount_in,
            U256::from(exit_token_index),
        )
            .abi_encode_params()
            .into()
    }

    pub fn exit_exact_bpt_in_for_tokens_out(bpt_amount_in: U256) -> Bytes {
        (WeightedPoolExitKind::ExactBptInForTokensOut.word(), bpt_amount_in)
            .abi_encode_params()
            .into()
    }

    pub fn exit_bpt_in_for_exact_tokens_out(amounts_out: &[U256], max_bpt_amount_in: U256) -> Bytes {
        (
            WeightedPoolExitKind::BptInForExactTokensOut.word(),
            amounts_out.to_vec(),
            max_bpt_amount_in,
        )
            .abi_encode_params()
            .into()
    }

    /// Managed pool management fee collection
    pub fn exit_for_management_fees() -> Bytes {
        (WeightedPoolExitKind::ManagementFeeTokensOut.word(),)
            .abi_encode_params()
            .into()
    }
}
