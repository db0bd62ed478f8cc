//! Nested Linear Pool Resolution
//!
//! Finds the linear pools a target pool routes through, either held directly
//! as tokens or one level down inside a stable phantom pool. Deeper nesting
//! is not followed; the relayer contracts only support one phantom level.

use alloy::primitives::Address;
use pool_client::PoolIndex;
use relayer_core::Pool;

use crate::state::NestedLinearPool;

fn nested_entry(linear: &Pool, pool_token_address: Address) -> Option<NestedLinearPool> {
    Some(NestedLinearPool {
        pool: linear.clone(),
        main_token: linear.main_token()?,
        wrapped_token: linear.wrapped_token()?,
        pool_token_address,
    })
}

/// Linear pools reachable from `pool`, in token order.
///
/// Tokens that are neither linear nor phantom BPTs are skipped; an empty
/// result means the pool has no wrapping support.
pub fn resolve_nested_linear_pools(pool: &Pool, index: &PoolIndex) -> Vec<NestedLinearPool> {
    let mut nested = Vec::new();

    // linear and phantom pools list their own BPT among their tokens
    for token in pool.tokens_list.iter().filter(|t| **t != pool.address) {
        if let Some(linear) = index.linear_pool(token) {
            nested.extend(nested_entry(linear, linear.address));
        } else if let Some(phantom) = index.phantom_pool(token) {
            for phantom_token in phantom.tokens_list.iter().filter(|t| **t != phantom.address) {
                if let Some(linear) = index.linear_pool(phantom_token) {
                    // Swaps target the phantom BPT, not the linear BPT
                    nested.extend(nested_entry(linear, phantom.address));
                }
            }
        }
    }

    nested
}
