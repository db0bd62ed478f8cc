//! Router Query Merge
//!
//! Each (token in, token out) pair is routed separately by the oracle with
//! its own asset array. The pairs are merged into one batch swap over a
//! single deduplicated asset array before the vault deltas are queried.

use alloy::primitives::{Address, I256, U256};
use pool_client::{PoolDataSource, RouterOracle, SwapInfo};
use relayer_core::{BatchSwapStep, Error, FetchPoolsInput, Result, RouterError, SwapKind};

/// Parallel per-pair inputs for a routed batch swap
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub tokens_in: Vec<Address>,
    pub tokens_out: Vec<Address>,
    pub kind: SwapKind,
    pub amounts: Vec<U256>,
    pub fetch_pools: FetchPoolsInput,
}

/// Merged routes with their simulated deltas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQueryOutput {
    pub swaps: Vec<BatchSwapStep>,
    pub assets: Vec<Address>,
    /// One per asset; empty when no pair had a route
    pub deltas: Vec<I256>,
    /// Raw deltas of the return tokens (tokens out for exact-in, tokens in
    /// for exact-out), zero where the token never made it into `assets`
    pub return_amounts: Vec<I256>,
}

impl RouteQueryOutput {
    pub fn asset_index(&self, asset: &Address) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    /// Delta for `asset`, zero if absent
    pub fn delta_of(&self, asset: &Address) -> I256 {
        self.asset_index(asset)
            .and_then(|i| self.deltas.get(i).copied())
            .unwrap_or(I256::ZERO)
    }

    /// Absolute return amounts
    pub fn return_magnitudes(&self) -> Vec<U256> {
        self.return_amounts.iter().map(|a| a.unsigned_abs()).collect()
    }

    /// Fail with [`RouterError::NoRoute`] when nothing was routed
    pub fn ensure_routed(&self, query: &RouteQuery) -> Result<()> {
        if self.swaps.is_empty() {
            return Err(RouterError::NoRoute {
                token_in: query.tokens_in.first().copied().unwrap_or_default(),
                token_out: query.tokens_out.first().copied().unwrap_or_default(),
            }
            .into());
        }
        Ok(())
    }
}

/// Merge per-pair routes into one step list over a deduplicated asset array.
///
/// Assets keep first-seen order; every step's indices are remapped.
pub fn merge_routes(routes: &[SwapInfo]) -> Result<(Vec<BatchSwapStep>, Vec<Address>)> {
    let mut assets: Vec<Address> = Vec::new();
    for route in routes {
        for token in &route.token_addresses {
            if !assets.contains(token) {
                assets.push(*token);
            }
        }
    }

    let mut swaps = Vec::new();
    for route in routes {
        let remap = |local: usize| -> Result<usize> {
            let token = route.token_addresses.get(local).ok_or_else(|| {
                Error::from(RouterError::Malformed {
                    message: format!(
                        "step index {local} outside route of {} assets",
                        route.token_addresses.len()
                    ),
                })
            })?;
            Ok(assets.iter().position(|a| a == token).unwrap_or_default())
        };

        for step in &route.swaps {
            swaps.push(BatchSwapStep {
                asset_in_index: remap(step.asset_in_index)?,
                asset_out_index: remap(step.asset_out_index)?,
                ..step.clone()
            });
        }
    }

    Ok((swaps, assets))
}

/// Route every pair, merge, and simulate the merged batch swap
pub async fn query_routes_and_amounts(
    source: &dyn PoolDataSource,
    oracle: &dyn RouterOracle,
    query: &RouteQuery,
) -> Result<RouteQueryOutput> {
    if query.tokens_in.len() != query.tokens_out.len() || query.tokens_in.len() != query.amounts.len() {
        return Err(Error::invalid_request(format!(
            "route query arrays differ in length: {} in, {} out, {} amounts",
            query.tokens_in.len(),
            query.tokens_out.len(),
            query.amounts.len()
        )));
    }

    if query.fetch_pools.fetch_pools && !source.fetch_pools(query.fetch_pools.fetch_on_chain).await {
        tracing::warn!(
            on_chain = query.fetch_pools.fetch_on_chain,
            "pool refresh failed, routing on the previous snapshot"
        );
    }

    let mut routes = Vec::with_capacity(query.tokens_in.len());
    for ((token_in, token_out), amount) in query
        .tokens_in
        .iter()
        .zip(&query.tokens_out)
        .zip(&query.amounts)
    {
        let route = oracle
            .swap_info(*token_in, *token_out, query.kind, *amount)
            .await?;
        if route.is_empty() {
            tracing::debug!(%token_in, %token_out, %amount, "no route for pair");
        }
        routes.push(route);
    }

    let (swaps, assets) = merge_routes(&routes)?;

    let return_tokens = match query.kind {
        SwapKind::ExactIn => &query.tokens_out,
        SwapKind::ExactOut => &query.tokens_in,
    };

    if swaps.is_empty() {
        return Ok(RouteQueryOutput {
            swaps,
            assets,
            deltas: Vec::new(),
            return_amounts: vec![I256::ZERO; return_tokens.len()],
        });
    }

    let deltas = oracle.query_batch_swap(query.kind, &swaps, &assets).await?;
    if deltas.len() != assets.len() {
        return Err(RouterError::Malformed {
            message: format!("{} deltas for {} assets", deltas.len(), assets.len()),
        }
        .into());
    }

    let return_amounts = return_tokens
        .iter()
        .map(|token| {
            assets
                .iter()
                .position(|a| a == token)
                .map(|i| deltas[i])
                .unwrap_or(I256::ZERO)
        })
        .collect();

    tracing::debug!(
        pairs = query.tokens_in.len(),
        swaps = swaps.len(),
        assets = assets.len(),
        "merged routes"
    );

    Ok(RouteQueryOutput {
        swaps,
        assets,
        deltas,
        return_amounts,
    })
}
