//! Stable Phantom Exit
//!
//! A stable phantom pool's BPT is itself a pool token, so exiting is a batch
//! swap out of the BPT. Outputs that should end up as underlying assets are
//! swapped into the linear pool's wrapped token and unwrapped afterwards.

use alloy::primitives::{Address, U256};
use relayer_core::constants::MAX_DEADLINE;
use relayer_core::{Error, FetchPoolsInput, FundManagement, Result, SwapKind};
use vault_tx::{check_literal_amount, encode_batch_swap, BatchSwapParams};

use crate::calculator::{apply_price_rate, compute_limits};
use crate::constants::outputs;
use crate::nested::resolve_nested_linear_pools;
use crate::relayer::Relayer;
use crate::routing::RouteQuery;
use crate::state::{BatchPlan, ExitStablePhantomInput};

/// Price rates are always read at 18 decimals here
const PHANTOM_RATE_DECIMALS: u8 = 18;

impl Relayer {
    /// Swap phantom BPT out into each exit's token, unwrapping where asked.
    ///
    /// Routing always refreshes pools with on-chain balances.
    pub async fn swap_and_unwrap_stable_phantom_pool(
        &self,
        input: &ExitStablePhantomInput,
    ) -> Result<BatchPlan> {
        let index = self.pool_index().await;
        let pool = index.required_pool(&input.pool_id)?;
        if input.exits.is_empty() {
            return Err(Error::invalid_request("exit list is empty"));
        }
        let nested = resolve_nested_linear_pools(pool, &index);

        let tokens_out: Vec<Address> = input
            .exits
            .iter()
            .map(|exit| {
                if !exit.unwrap {
                    return exit.token_out;
                }
                nested
                    .iter()
                    .find(|n| n.main_token == exit.token_out)
                    .map(|n| n.wrapped_token)
                    .unwrap_or(exit.token_out)
            })
            .collect();

        let query = RouteQuery {
            tokens_in: vec![pool.address; input.exits.len()],
            tokens_out,
            kind: SwapKind::ExactIn,
            amounts: input
                .exits
                .iter()
                .map(|exit| check_literal_amount(exit.bpt_amount_in))
                .collect::<Result<Vec<U256>>>()?,
            fetch_pools: FetchPoolsInput::on_chain(),
        };
        let routed = self.query_routes(&query).await?;
        routed.ensure_routed(&query)?;

        let limits = compute_limits(
            &query.tokens_in,
            &query.tokens_out,
            SwapKind::ExactIn,
            &routed.deltas,
            &routed.assets,
            input.slippage,
        );

        let wrapped_tokens: Vec<Address> = query
            .tokens_out
            .iter()
            .filter(|token| nested.iter().any(|n| n.wrapped_token == **token))
            .copied()
            .collect();

        // the relay only needs to hold the outputs when it unwraps all of them
        let recipient = if wrapped_tokens.len() == query.tokens_out.len() {
            self.batch_relayer_address()?
        } else {
            input.account
        };
        let funds = FundManagement {
            sender: input.account,
            from_internal_balance: false,
            recipient,
            to_internal_balance: false,
        };

        let fresh = self.pool_index().await;
        let unwrap = self.unwrap_calls(&fresh, &wrapped_tokens, &routed.assets, &funds)?;

        let amounts_out = routed
            .return_magnitudes()
            .into_iter()
            .zip(&query.tokens_out)
            .map(|(amount, token)| {
                let rate = nested
                    .iter()
                    .find(|n| n.wrapped_token == *token)
                    .and_then(|n| n.pool.wrapped_token_info());
                match rate {
                    Some(info) => apply_price_rate(amount, info.price_rate.as_deref(), PHANTOM_RATE_DECIMALS),
                    None => Ok(amount),
                }
            })
            .collect::<Result<Vec<U256>>>()?;

        let swap_call = encode_batch_swap(&BatchSwapParams {
            kind: SwapKind::ExactIn,
            swaps: routed.swaps,
            assets: routed.assets,
            funds,
            limits,
            deadline: MAX_DEADLINE,
            value: U256::ZERO,
            output_references: unwrap.output_references,
        });

        let mut calls = vec![swap_call];
        calls.extend(unwrap.calls);

        tracing::debug!(
            pool_id = %pool.id,
            exits = input.exits.len(),
            unwrapped = wrapped_tokens.len(),
            "built phantom exit plan"
        );

        Ok(BatchPlan::new(calls).with_output(outputs::AMOUNTS_OUT, amounts_out))
    }
}
