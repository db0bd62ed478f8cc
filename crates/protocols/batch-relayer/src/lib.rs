//! Batch Relayer Orchestration
//!
//! This crate composes vault actions into chained-reference multicall
//! batches: pool exits followed by swaps, nested joins with optional
//! staking, swaps into wrapped tokens that are unwrapped in the same batch,
//! and stable phantom pool exits.

pub mod calculator;
pub mod constants;
pub mod exit_swap;
pub mod join;
pub mod nested;
pub mod phantom_exit;
pub mod relayer;
pub mod routing;
pub mod state;
pub mod swap_unwrap;
pub mod unwrap;

#[cfg(test)]
mod testing;

// Re-exports
pub use calculator::{
    add_slippage, apply_price_rate, compute_limits, div_down, mul_down, parse_fixed,
    subtract_slippage,
};
pub use constants::{outputs, POOL_KIND};
pub use nested::resolve_nested_linear_pools;
pub use relayer::Relayer;
pub use routing::{merge_routes, query_routes_and_amounts, RouteQuery, RouteQueryOutput};
pub use state::{
    BatchPlan, ExitAndBatchSwapInput, ExitItem, ExitStablePhantomInput, JoinPoolInput, JoinToken,
    NestedLinearPool, PhantomExitItem, PlanTarget, SwapUnwrapInput, UnwrapCalls,
};
