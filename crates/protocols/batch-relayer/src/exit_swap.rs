//! Exit and Batch Swap
//!
//! Exits a pool and swaps some of the exited tokens in the same batch. The
//! exit writes every token amount to a chained slot and the swap reads its
//! inputs from those slots.
//!
//! Two amount tracks are kept side by side. The wiring track holds the worst
//! case (`expected * (1 - s)`): it is the exit minimum and the amount the
//! router is asked to route. The limit track holds the expected case with
//! headroom (`expected * (1 + s)`) and only feeds the swap limits.

use alloy::primitives::{Address, U256};
use relayer_core::constants::MAX_DEADLINE;
use relayer_core::{Error, FundManagement, Result, Slippage, SwapKind};
use vault_tx::{
    check_literal_amount, construct_exit_call, encode_batch_swap, to_chained_reference,
    BatchSwapParams, ExitPoolData, OutputReference,
};

use crate::calculator::{add_slippage, apply_price_rate, compute_limits, subtract_slippage, to_signed};
use crate::constants::{outputs, POOL_KIND};
use crate::relayer::Relayer;
use crate::routing::RouteQuery;
use crate::state::{BatchPlan, ExitAndBatchSwapInput, UnwrapCalls};

impl Relayer {
    /// Exit `input.pool_id`, then swap every exit that names a
    /// `batch_swap_token_out`.
    ///
    /// `amountsOut` has one entry per exit: the expected amount for exits that
    /// are not swapped, the swap return re-inflated by `(1 + s)` otherwise.
    pub async fn exit_pool_and_batch_swap(&self, input: &ExitAndBatchSwapInput) -> Result<BatchPlan> {
        let index = self.pool_index().await;
        let pool = index.required_pool(&input.pool_id)?;
        if input.exits.is_empty() {
            return Err(Error::invalid_request("exit list is empty"));
        }

        let slippage = input.slippage;
        let expected = input
            .exits
            .iter()
            .map(|exit| check_literal_amount(exit.expected_amount_out))
            .collect::<Result<Vec<U256>>>()?;
        let min_amounts_out: Vec<U256> = expected
            .iter()
            .map(|amount| subtract_slippage(*amount, slippage))
            .collect();

        let exit_references: Vec<OutputReference> = (0..input.exits.len())
            .map(|i| OutputReference::new(i, to_chained_reference(i as u64)))
            .collect();

        // (exit position, token out) for every swapped exit
        let swapped: Vec<(usize, Address)> = input
            .exits
            .iter()
            .enumerate()
            .filter_map(|(i, exit)| exit.batch_swap_token_out.map(|out| (i, out)))
            .collect();
        let all_swapped = swapped.len() == input.exits.len();
        let exit_tokens: Vec<Address> = input.exits.iter().map(|e| e.exit_token).collect();

        let exit_call = construct_exit_call(&ExitPoolData {
            pool_id: pool.id,
            pool_kind: POOL_KIND,
            sender: input.exiter,
            recipient: input.exiter,
            output_references: exit_references.clone(),
            assets: exit_tokens.clone(),
            min_amounts_out: min_amounts_out.clone(),
            user_data: input.user_data.clone(),
            // swaps can read straight from internal balance
            to_internal_balance: all_swapped,
        });

        if swapped.is_empty() {
            tracing::debug!(pool_id = %pool.id, exits = input.exits.len(), "exit without swaps");
            return Ok(BatchPlan::new(vec![exit_call]).with_output(outputs::AMOUNTS_OUT, expected));
        }

        let query = RouteQuery {
            tokens_in: swapped.iter().map(|(i, _)| exit_tokens[*i]).collect(),
            tokens_out: swapped.iter().map(|(_, out)| *out).collect(),
            kind: SwapKind::ExactIn,
            amounts: swapped.iter().map(|(i, _)| min_amounts_out[*i]).collect(),
            fetch_pools: input.fetch_pools,
        };
        let routed = self.query_routes(&query).await?;
        routed.ensure_routed(&query)?;

        // only the first hop out of a swapped exit token reads its slot; a
        // hop continuing from the previous step keeps spending that output
        let mut swaps = routed.swaps.clone();
        for j in 0..swaps.len() {
            let continues = j > 0 && swaps[j - 1].asset_out_index == swaps[j].asset_in_index;
            if continues {
                continue;
            }
            let step = &mut swaps[j];
            let token_in = routed.assets[step.asset_in_index];
            if let Some((i, _)) = swapped.iter().find(|(i, _)| exit_tokens[*i] == token_in) {
                step.amount = exit_references[*i].key.value();
            }
        }

        // swap outputs keep their routed deltas, even when they are exit
        // tokens too
        let mut limit_deltas = routed.deltas.clone();
        for (i, _) in &swapped {
            if let Some(a) = routed.asset_index(&exit_tokens[*i]) {
                limit_deltas[a] = to_signed(add_slippage(expected[*i], slippage))?;
            }
        }
        // the worst case is already in the routed amounts
        let limits = compute_limits(
            &query.tokens_in,
            &query.tokens_out,
            SwapKind::ExactIn,
            &limit_deltas,
            &routed.assets,
            Slippage::ZERO,
        );

        let funds = FundManagement {
            sender: input.exiter,
            from_internal_balance: all_swapped,
            recipient: input.swap_recipient,
            to_internal_balance: false,
        };

        let mut returns = routed.return_magnitudes();
        let unwrap = if input.unwrap {
            let index = self.pool_index().await;
            let wrapped_tokens: Vec<Address> = routed
                .assets
                .iter()
                .filter(|asset| index.is_wrapped_token(asset))
                .copied()
                .collect();

            for (amount, token) in returns.iter_mut().zip(&query.tokens_out) {
                let Some(info) = index
                    .linear_pool_for_wrapped(token)
                    .and_then(|linear| linear.wrapped_token_info())
                else {
                    continue;
                };
                *amount = apply_price_rate(*amount, info.price_rate.as_deref(), info.decimals)?;
            }

            self.unwrap_calls(&index, &wrapped_tokens, &routed.assets, &funds)?
        } else {
            UnwrapCalls::default()
        };

        let swap_call = encode_batch_swap(&BatchSwapParams {
            kind: SwapKind::ExactIn,
            swaps,
            assets: routed.assets,
            funds,
            limits,
            deadline: MAX_DEADLINE,
            value: U256::ZERO,
            output_references: unwrap.output_references,
        });

        let mut amounts_out = expected;
        for (j, (i, _)) in swapped.iter().enumerate() {
            amounts_out[*i] = add_slippage(returns[j], slippage);
        }

        let mut calls = vec![exit_call, swap_call];
        calls.extend(unwrap.calls);

        tracing::debug!(
            pool_id = %pool.id,
            exits = input.exits.len(),
            swapped = swapped.len(),
            calls = calls.len(),
            "built exit and batch swap plan"
        );

        Ok(BatchPlan::new(calls).with_output(outputs::AMOUNTS_OUT, amounts_out))
    }
}
