//! Nested Join
//!
//! Joins a pool whose tokens include linear or phantom BPTs. Main tokens are
//! first swapped into the nested BPTs, then the join spends those BPTs by
//! chained reference. The joined BPT can be minted into the network's share
//! token and staked in a farm within the same batch.

use alloy::primitives::{Address, U256};
use relayer_core::constants::{MAX_DEADLINE, NATIVE_ASSET, NATIVE_DECIMALS};
use relayer_core::{Error, FundManagement, Result, SwapKind};
use vault_tx::{
    check_literal_amount, encode_batch_swap, encode_join_pool, encode_masterchef_deposit,
    encode_share_token_enter, to_chained_reference, BatchSwapParams, ChainedTransfer,
    JoinPoolParams, JoinPoolRequest, MasterChefDeposit, OutputReference, WeightedPoolEncoder,
};

use crate::calculator::{compute_limits, parse_fixed};
use crate::constants::POOL_KIND;
use crate::nested::resolve_nested_linear_pools;
use crate::relayer::Relayer;
use crate::routing::{RouteQuery, RouteQueryOutput};
use crate::state::{BatchPlan, JoinPoolInput};

/// Join amount for a nested BPT: the swap's chained output, or a literal zero
/// when the swap produced nothing for it
fn nested_join_amount(routed: Option<&RouteQueryOutput>, token: &Address) -> U256 {
    let Some(routed) = routed else {
        return U256::ZERO;
    };
    match routed.asset_index(token) {
        Some(i) if routed.deltas.get(i).is_some_and(|delta| !delta.is_zero()) => {
            to_chained_reference(i as u64).value()
        }
        _ => U256::ZERO,
    }
}

impl Relayer {
    /// Join `input.pool_id`, swapping main tokens into nested BPTs first.
    ///
    /// The plan has no projected outputs.
    pub async fn join_pool(&self, input: &JoinPoolInput) -> Result<BatchPlan> {
        let index = self.pool_index().await;
        let pool = index.required_pool(&input.pool_id)?;
        let nested = resolve_nested_linear_pools(pool, &index);
        let wrapped_native = self.network_config().wrapped_native_asset();

        let stake = input.farm_id.is_some();
        let share_token = if input.mint_share_token {
            let share_token = self.network_config().share_token.clone().ok_or_else(|| {
                Error::Config(format!(
                    "no share token configured for chain {}",
                    self.network_config().chain_id
                ))
            })?;
            Some(share_token)
        } else {
            None
        };
        // mint and stake spend the joined BPT, which only a weighted join
        // writes to the relay
        if (stake || share_token.is_some()) && !pool.is_weighted() {
            return Err(Error::invalid_request(format!(
                "pool {} has no join call to stake or mint from",
                pool.id
            )));
        }
        let relayer = if stake || share_token.is_some() {
            Some(self.batch_relayer_address()?)
        } else {
            None
        };

        let native = input.tokens.iter().find(|t| t.address == NATIVE_ASSET);
        let native_value = match native {
            Some(token) => check_literal_amount(parse_fixed(&token.amount, NATIVE_DECIMALS)?)?,
            None => U256::ZERO,
        };

        let mut calls = Vec::new();
        let mut routed = None;

        if !nested.is_empty() {
            let tokens_in: Vec<Address> = nested
                .iter()
                .map(|n| {
                    if native.is_some() && n.main_token == wrapped_native {
                        NATIVE_ASSET
                    } else {
                        n.main_token
                    }
                })
                .collect();
            let tokens_out: Vec<Address> = nested.iter().map(|n| n.pool_token_address).collect();
            let amounts = tokens_in
                .iter()
                .map(|token| {
                    if *token == NATIVE_ASSET {
                        return Ok(native_value);
                    }
                    let amount = input
                        .tokens
                        .iter()
                        .find(|t| t.address == *token)
                        .map(|t| t.amount.as_str())
                        .unwrap_or("0");
                    self.scaled_amount(&index, *token, amount)
                })
                .collect::<Result<Vec<U256>>>()?;

            let query = RouteQuery {
                tokens_in,
                tokens_out,
                kind: SwapKind::ExactIn,
                amounts,
                fetch_pools: input.fetch_pools,
            };
            let output = self.query_routes(&query).await?;

            if output.swaps.is_empty() {
                tracing::warn!(
                    pool_id = %pool.id,
                    nested = nested.len(),
                    "no route into nested pools, joining without a swap"
                );
            } else {
                let limits = compute_limits(
                    &query.tokens_in,
                    &query.tokens_out,
                    SwapKind::ExactIn,
                    &output.deltas,
                    &output.assets,
                    input.slippage,
                );
                // every asset is stored so the join can pick its BPTs
                let output_references = (0..output.assets.len())
                    .map(|i| OutputReference::new(i, to_chained_reference(i as u64)))
                    .collect();

                calls.push(encode_batch_swap(&BatchSwapParams {
                    kind: SwapKind::ExactIn,
                    swaps: output.swaps.clone(),
                    assets: output.assets.clone(),
                    funds: FundManagement {
                        to_internal_balance: pool.is_weighted() || input.funds.to_internal_balance,
                        ..input.funds
                    },
                    limits,
                    deadline: MAX_DEADLINE,
                    value: native_value,
                    output_references,
                }));
            }
            routed = Some(output);
        }

        let bpt_reference = to_chained_reference(0).value();

        if pool.is_weighted() {
            let join_has_native = pool.contains_token(wrapped_native) && !native_value.is_zero();

            let amounts_in = pool
                .tokens_list
                .iter()
                .map(|token| {
                    let supplied = input.tokens.iter().find(|t| {
                        t.address == *token
                            || (t.address == NATIVE_ASSET && *token == wrapped_native)
                    });
                    match supplied {
                        Some(t) => self.scaled_amount(&index, *token, &t.amount),
                        None => Ok(nested_join_amount(routed.as_ref(), token)),
                    }
                })
                .collect::<Result<Vec<U256>>>()?;

            let assets = if join_has_native {
                pool.tokens_list
                    .iter()
                    .map(|t| if *t == wrapped_native { NATIVE_ASSET } else { *t })
                    .collect()
            } else {
                pool.tokens_list.clone()
            };

            calls.push(encode_join_pool(&JoinPoolParams {
                pool_id: pool.id,
                pool_kind: POOL_KIND,
                sender: input.funds.sender,
                recipient: relayer.unwrap_or(input.funds.recipient),
                join_pool_request: JoinPoolRequest {
                    assets,
                    user_data: WeightedPoolEncoder::join_exact_tokens_in_for_bpt_out(
                        &amounts_in,
                        input.bpt_out,
                    ),
                    max_amounts_in: amounts_in,
                    from_internal_balance: !nested.is_empty() || input.funds.from_internal_balance,
                },
                value: if join_has_native { native_value } else { U256::ZERO },
                output_reference: if relayer.is_some() {
                    bpt_reference
                } else {
                    U256::ZERO
                },
            }));
        }

        if let (Some(share_token), Some(relayer)) = (&share_token, relayer) {
            calls.push(encode_share_token_enter(
                share_token.protocol,
                &ChainedTransfer {
                    sender: relayer,
                    recipient: if stake { relayer } else { input.funds.recipient },
                    amount: bpt_reference,
                    output_reference: bpt_reference,
                },
            ));
        }

        if let (Some(farm_id), Some(relayer)) = (input.farm_id, relayer) {
            let (token, pid) = match &share_token {
                Some(share_token) => (share_token.address, share_token.farm_id),
                None => (pool.address, farm_id),
            };
            calls.push(encode_masterchef_deposit(&MasterChefDeposit {
                sender: relayer,
                recipient: input.funds.recipient,
                token,
                pid,
                amount: bpt_reference,
                output_reference: U256::ZERO,
            }));
        }

        if calls.is_empty() {
            return Err(Error::invalid_request(format!(
                "pool {} is not weighted and has no nested linear pools",
                pool.id
            )));
        }

        tracing::debug!(
            pool_id = %pool.id,
            nested = nested.len(),
            calls = calls.len(),
            stake,
            mint = share_token.is_some(),
            "built join plan"
        );

        Ok(BatchPlan::new(calls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::JoinToken;
    use crate::testing::{fixtures, Fixture};
    use alloy::primitives::{B256, I256};
    use alloy::sol_types::SolValue;
    use relayer_core::constants::ONE;
    use relayer_core::{FetchPoolsInput, Slippage};
    use vault_tx::abi::{IStakingActions, IVaultActions};

    fn join_input(tokens: Vec<JoinToken>) -> JoinPoolInput {
        JoinPoolInput {
            pool_id: fixtures::WEIGHTED_ID,
            tokens,
            bpt_out: U256::from(1),
            slippage: Slippage::from_bps(100).unwrap(),
            funds: FundManagement {
                sender: fixtures::USER,
                from_internal_balance: false,
                recipient: fixtures::USER,
                to_internal_balance: false,
            },
            fetch_pools: FetchPoolsInput::cached(),
            farm_id: None,
            mint_share_token: false,
        }
    }

    fn join_token(address: Address, amount: &str) -> JoinToken {
        JoinToken {
            address,
            amount: amount.to_string(),
        }
    }

    fn stable_routes(fx: &mut Fixture) {
        fx.route(&[fixtures::DAI, fixtures::LINEAR_DAI, fixtures::PHANTOM], 1, 1);
        fx.route(&[fixtures::USDC, fixtures::LINEAR_USDC, fixtures::PHANTOM], 1, 1);
    }

    #[tokio::test]
    async fn test_nested_join_wires_phantom_bpt() {
        let mut fx = Fixture::new();
        stable_routes(&mut fx);
        let h = fx.harness();

        let input = join_input(vec![
            join_token(fixtures::DAI, "10"),
            join_token(fixtures::USDC, "5"),
            join_token(fixtures::WETH, "1"),
        ]);
        let plan = h.relayer.join_pool(&input).await.unwrap();
        assert!(plan.outputs.is_empty());
        assert_eq!(plan.calls.len(), 2);

        let queries = h.oracle.swap_queries();
        assert_eq!(queries[0].amount, U256::from(10) * ONE);
        assert_eq!(queries[1].amount, U256::from(5_000_000));

        let swap: IVaultActions::batchSwapCall = plan.calls[0].decode().unwrap();
        assert_eq!(
            swap.assets,
            vec![
                fixtures::DAI,
                fixtures::LINEAR_DAI,
                fixtures::PHANTOM,
                fixtures::USDC,
                fixtures::LINEAR_USDC
            ]
        );
        assert!(swap.funds.toInternalBalance);
        assert_eq!(swap.outputReferences.len(), 5);
        assert_eq!(swap.value, U256::ZERO);

        let join: IVaultActions::joinPoolCall = plan.calls[1].decode().unwrap();
        assert_eq!(join.recipient, fixtures::USER);
        assert!(join.request.fromInternalBalance);
        assert_eq!(join.outputReference, U256::ZERO);
        // WETH literal, phantom BPT from the swap's slot for asset 2
        assert_eq!(
            join.request.maxAmountsIn,
            vec![ONE, to_chained_reference(2).value()]
        );

        let (kind, amounts, bpt_out) =
            <(U256, Vec<U256>, U256)>::abi_decode_params(&join.request.userData).unwrap();
        assert_eq!(kind, U256::from(1));
        assert_eq!(amounts, join.request.maxAmountsIn);
        assert_eq!(bpt_out, U256::from(1));
    }

    #[tokio::test]
    async fn test_zero_delta_joins_literal_zero() {
        let mut fx = Fixture::new();
        // routed, but the phantom BPT comes out at zero
        fx.route(&[fixtures::DAI, fixtures::PHANTOM], 0, 1);
        let h = fx.harness();

        let input = join_input(vec![join_token(fixtures::DAI, "1")]);
        let plan = h.relayer.join_pool(&input).await.unwrap();
        assert_eq!(plan.calls.len(), 2);

        let swap: IVaultActions::batchSwapCall = plan.calls[0].decode().unwrap();
        assert_eq!(swap.assets, vec![fixtures::DAI, fixtures::PHANTOM]);

        let join: IVaultActions::joinPoolCall = plan.calls[1].decode().unwrap();
        assert_eq!(join.request.maxAmountsIn, vec![U256::ZERO, U256::ZERO]);
    }

    #[test]
    fn test_nested_join_amount() {
        let routed = RouteQueryOutput {
            swaps: vec![],
            assets: vec![fixtures::DAI, fixtures::PHANTOM, fixtures::USDC],
            deltas: vec![
                I256::try_from(5).unwrap(),
                I256::ZERO,
                I256::try_from(-3).unwrap(),
            ],
            return_amounts: vec![],
        };
        // asset index 0 is a valid slot
        assert_eq!(
            nested_join_amount(Some(&routed), &fixtures::DAI),
            to_chained_reference(0).value()
        );
        assert_eq!(nested_join_amount(Some(&routed), &fixtures::PHANTOM), U256::ZERO);
        assert_eq!(
            nested_join_amount(Some(&routed), &fixtures::USDC),
            to_chained_reference(2).value()
        );
        assert_eq!(nested_join_amount(Some(&routed), &fixtures::WETH), U256::ZERO);
        assert_eq!(nested_join_amount(None, &fixtures::PHANTOM), U256::ZERO);
    }

    #[tokio::test]
    async fn test_native_join_routes_value() {
        let mut fx = Fixture::new();
        stable_routes(&mut fx);
        let h = fx.harness();

        let input = join_input(vec![
            join_token(fixtures::DAI, "1"),
            join_token(NATIVE_ASSET, "2"),
        ]);
        let plan = h.relayer.join_pool(&input).await.unwrap();

        let join: IVaultActions::joinPoolCall = plan.calls[1].decode().unwrap();
        assert_eq!(join.request.assets, vec![NATIVE_ASSET, fixtures::PHANTOM]);
        assert_eq!(join.value, U256::from(2) * ONE);
        assert_eq!(join.request.maxAmountsIn[0], U256::from(2) * ONE);
    }

    #[tokio::test]
    async fn test_join_mint_and_stake() {
        let mut fx = Fixture::new();
        stable_routes(&mut fx);
        let h = fx.harness();

        let mut input = join_input(vec![join_token(fixtures::DAI, "1")]);
        input.farm_id = Some(7);
        input.mint_share_token = true;
        let plan = h.relayer.join_pool(&input).await.unwrap();
        assert_eq!(plan.calls.len(), 4);

        let join: IVaultActions::joinPoolCall = plan.calls[1].decode().unwrap();
        assert_eq!(join.recipient, fixtures::RELAYER);
        assert_eq!(join.outputReference, to_chained_reference(0).value());

        let mint: IStakingActions::fBeetsBarEnterCall = plan.calls[2].decode().unwrap();
        assert_eq!(mint.sender, fixtures::RELAYER);
        assert_eq!(mint.recipient, fixtures::RELAYER);
        assert_eq!(mint.amount, to_chained_reference(0).value());

        let deposit: IStakingActions::masterChefDepositCall = plan.calls[3].decode().unwrap();
        assert_eq!(deposit.token, fixtures::SHARE_TOKEN);
        assert_eq!(deposit.pid, U256::from(fixtures::SHARE_FARM_ID));
        assert_eq!(deposit.recipient, fixtures::USER);
        assert_eq!(deposit.amount, to_chained_reference(0).value());
    }

    #[tokio::test]
    async fn test_join_stake_pool_bpt() {
        let mut fx = Fixture::new();
        stable_routes(&mut fx);
        let h = fx.harness();

        let mut input = join_input(vec![join_token(fixtures::DAI, "1")]);
        input.farm_id = Some(7);
        let plan = h.relayer.join_pool(&input).await.unwrap();
        assert_eq!(plan.calls.len(), 3);

        let deposit: IStakingActions::masterChefDepositCall = plan.calls[2].decode().unwrap();
        assert_eq!(deposit.token, fixtures::WEIGHTED);
        assert_eq!(deposit.pid, U256::from(7));
    }

    #[tokio::test]
    async fn test_join_errors() {
        let mut fx = Fixture::new();
        stable_routes(&mut fx);
        fx.config.share_token = None;
        let h = fx.harness();

        let mut input = join_input(vec![join_token(fixtures::DAI, "1")]);
        input.mint_share_token = true;
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "config_error");

        let mut input = join_input(vec![join_token(fixtures::DAI, "1.5.0")]);
        input.pool_id = fixtures::WEIGHTED_ID;
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_request");

        let mut input = join_input(vec![]);
        input.pool_id = B256::repeat_byte(0x42);
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "pool_not_found");

        // linear pool: not weighted and nothing nested below it
        let mut input = join_input(vec![join_token(fixtures::DAI, "1")]);
        input.pool_id = fixtures::LINEAR_DAI_ID;
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_request");
    }

    #[tokio::test]
    async fn test_stake_or_mint_needs_weighted_join() {
        let mut fx = Fixture::new();
        fx.route(&[fixtures::DAI, fixtures::LINEAR_DAI], 1, 1);
        let h = fx.harness();

        let mut input = join_input(vec![join_token(fixtures::DAI, "1")]);
        input.pool_id = fixtures::PHANTOM_ID;
        input.farm_id = Some(7);
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_request");

        input.farm_id = None;
        input.mint_share_token = true;
        let err = h.relayer.join_pool(&input).await.unwrap_err();
        assert_eq!(err.error_code(), "invalid_request");
        // rejected before any routing
        assert!(h.oracle.swap_queries().is_empty());

        // the plain nested swap into the phantom pool is still allowed
        input.mint_share_token = false;
        let plan = h.relayer.join_pool(&input).await.unwrap();
        assert_eq!(plan.calls.len(), 1);
    }
}
