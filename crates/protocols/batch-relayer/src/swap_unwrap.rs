//! Swap and Unwrap
//!
//! Swaps into wrapped linear-pool tokens and leaves them for their underlying
//! asset in the same batch. `rates` convert wrapped amounts into underlying
//! amounts (1e18 scaled).

use alloy::primitives::U256;
use relayer_core::{Error, Result, SwapKind};
use vault_tx::{check_literal_amount, EncodedCall};

use crate::calculator::{compute_limits, div_down, mul_down};
use crate::constants::outputs;
use crate::relayer::Relayer;
use crate::routing::{RouteQuery, RouteQueryOutput};
use crate::state::{BatchPlan, SwapUnwrapInput};

fn check_lengths(input: &SwapUnwrapInput) -> Result<()> {
    let n = input.tokens_in.len();
    if input.wrapped_tokens.len() != n || input.amounts.len() != n || input.rates.len() != n {
        return Err(Error::invalid_request(format!(
            "swap unwrap arrays differ in length: {} in, {} wrapped, {} amounts, {} rates",
            n,
            input.wrapped_tokens.len(),
            input.amounts.len(),
            input.rates.len()
        )));
    }
    if n == 0 {
        return Err(Error::invalid_request("no tokens to swap"));
    }
    Ok(())
}

impl Relayer {
    /// Swap exact `amounts` of `tokens_in` into wrapped tokens and unwrap them.
    ///
    /// `amountsOut` is each swap return converted at its rate.
    pub async fn swap_unwrap_exact_in(&self, input: &SwapUnwrapInput) -> Result<BatchPlan> {
        check_lengths(input)?;
        let amounts = input
            .amounts
            .iter()
            .map(|amount| check_literal_amount(*amount))
            .collect::<Result<Vec<U256>>>()?;

        let (routed, calls) = self.swap_and_unwrap(input, SwapKind::ExactIn, amounts).await?;

        let amounts_out = routed
            .return_magnitudes()
            .into_iter()
            .zip(&input.rates)
            .map(|(amount, rate)| mul_down(amount, *rate))
            .collect();

        Ok(BatchPlan::new(calls).with_output(outputs::AMOUNTS_OUT, amounts_out))
    }

    /// Swap for exact underlying `amounts`, converted to wrapped amounts at
    /// `rates` before routing.
    ///
    /// `amountsIn` echoes the router's input amounts.
    pub async fn swap_unwrap_exact_out(&self, input: &SwapUnwrapInput) -> Result<BatchPlan> {
        check_lengths(input)?;
        let amounts_wrapped = input
            .amounts
            .iter()
            .zip(&input.rates)
            .map(|(amount, rate)| check_literal_amount(div_down(*amount, *rate)?))
            .collect::<Result<Vec<U256>>>()?;

        let (routed, calls) = self
            .swap_and_unwrap(input, SwapKind::ExactOut, amounts_wrapped)
            .await?;

        Ok(BatchPlan::new(calls).with_output(outputs::AMOUNTS_IN, routed.return_magnitudes()))
    }

    async fn swap_and_unwrap(
        &self,
        input: &SwapUnwrapInput,
        kind: SwapKind,
        amounts: Vec<U256>,
    ) -> Result<(RouteQueryOutput, Vec<EncodedCall>)> {
        let query = RouteQuery {
            tokens_in: input.tokens_in.clone(),
            tokens_out: input.wrapped_tokens.clone(),
            kind,
            amounts,
            fetch_pools: input.fetch_pools,
        };
        let routed = self.query_routes(&query).await?;
        routed.ensure_routed(&query)?;

        let limits = compute_limits(
            &query.tokens_in,
            &query.tokens_out,
            kind,
            &routed.deltas,
            &routed.assets,
            input.slippage,
        );

        let index = self.pool_index().await;
        let calls = self.swap_unwrap_calls(
            &index,
            &input.wrapped_tokens,
            kind,
            routed.swaps.clone(),
            routed.assets.clone(),
            &input.funds,
            limits,
        )?;

        tracing::debug!(
            ?kind,
            pairs = query.tokens_in.len(),
            calls = calls.len(),
            "built swap and unwrap plan"
        );

        Ok((routed, calls))
    }
}
