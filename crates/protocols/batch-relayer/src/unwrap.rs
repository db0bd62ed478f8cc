//! Swap Output Unwrapping
//!
//! Wrapped linear-pool tokens received from a batch swap are left for their
//! underlying asset in follow-up calls. The swap stores each wrapped output
//! under a chained reference that the matching unwrap call consumes.

use alloy::primitives::{Address, I256, U256};
use pool_client::PoolIndex;
use relayer_core::constants::MAX_DEADLINE;
use relayer_core::{BatchSwapStep, FundManagement, Result, SwapKind};
use vault_tx::{
    encode_batch_swap, to_chained_reference, BatchSwapParams, ChainedTransfer, EncodedCall,
    OutputReference,
};

use crate::relayer::Relayer;
use crate::state::UnwrapCalls;

impl Relayer {
    /// Unwrap calls for `wrapped_tokens`, reading the current pool snapshot
    pub async fn encode_unwrap_calls(
        &self,
        wrapped_tokens: &[Address],
        assets: &[Address],
        funds: &FundManagement,
    ) -> Result<UnwrapCalls> {
        let index = self.pool_index().await;
        self.unwrap_calls(&index, wrapped_tokens, assets, funds)
    }

    /// Batch swap into `wrapped_tokens` followed by their unwrap calls.
    ///
    /// `funds.recipient` should be the relay contract so it holds the wrapped
    /// tokens it unwraps.
    pub async fn encode_swap_unwrap(
        &self,
        wrapped_tokens: &[Address],
        kind: SwapKind,
        swaps: Vec<BatchSwapStep>,
        assets: Vec<Address>,
        funds: &FundManagement,
        limits: Vec<I256>,
    ) -> Result<Vec<EncodedCall>> {
        let index = self.pool_index().await;
        self.swap_unwrap_calls(&index, wrapped_tokens, kind, swaps, assets, funds, limits)
    }

    /// Wrapped token `i` is keyed to slot `i`. Tokens missing from `assets`
    /// had no route and are skipped without an error.
    pub(crate) fn unwrap_calls(
        &self,
        index: &PoolIndex,
        wrapped_tokens: &[Address],
        assets: &[Address],
        funds: &FundManagement,
    ) -> Result<UnwrapCalls> {
        let mut unwrap = UnwrapCalls::default();

        for (i, wrapped_token) in wrapped_tokens.iter().enumerate() {
            let linear = index.required_linear_pool_for_wrapped(wrapped_token)?;
            let protocol = self.wrapper_protocol(linear)?;

            let Some(asset_index) = assets.iter().position(|a| a == wrapped_token) else {
                tracing::debug!(%wrapped_token, "wrapped token not in swap assets, skipping unwrap");
                continue;
            };

            let key = to_chained_reference(i as u64);
            unwrap
                .output_references
                .push(OutputReference::new(asset_index, key));
            unwrap.calls.push(protocol.encode_unwrap(
                *wrapped_token,
                &ChainedTransfer {
                    sender: funds.recipient,
                    recipient: funds.sender,
                    amount: key.value(),
                    output_reference: U256::ZERO,
                },
            ));
        }

        Ok(unwrap)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn swap_unwrap_calls(
        &self,
        index: &PoolIndex,
        wrapped_tokens: &[Address],
        kind: SwapKind,
        swaps: Vec<BatchSwapStep>,
        assets: Vec<Address>,
        funds: &FundManagement,
        limits: Vec<I256>,
    ) -> Result<Vec<EncodedCall>> {
        let unwrap = self.unwrap_calls(index, wrapped_tokens, &assets, funds)?;

        let swap = encode_batch_swap(&BatchSwapParams {
            kind,
            swaps,
            assets,
            funds: *funds,
            limits,
            deadline: MAX_DEADLINE,
            value: U256::ZERO,
            output_references: unwrap.output_references,
        });

        let mut calls = Vec::with_capacity(unwrap.calls.len() + 1);
        calls.push(swap);
        calls.extend(unwrap.calls);
        Ok(calls)
    }
}
