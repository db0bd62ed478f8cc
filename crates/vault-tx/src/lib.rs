//! vault-tx: Call encoding for the vault batch relayer
//!
//! Provides the chained-reference codec, ABI bindings for the relayer
//! library, and stateless encoders for vault actions, wrapper protocols,
//! staking contracts and the multicall envelope.

pub mod abi;
pub mod call;
pub mod chained;
pub mod pool_encoder;
pub mod staking;
pub mod vault_actions;
pub mod wrapping;

pub use call::{encode_multicall, EncodedCall};
pub use chained::{
    check_literal_amount, is_chained_reference, to_chained_reference, ChainedReference,
    OutputReference, CHAINED_REFERENCE_PREFIX,
};
pub use pool_encoder::{WeightedPoolEncoder, WeightedPoolExitKind, WeightedPoolJoinKind};
pub use staking::{
    encode_fbeets_bar_enter, encode_fbeets_bar_leave, encode_masterchef_deposit,
    encode_masterchef_withdraw, encode_share_token_enter, encode_share_token_leave,
    encode_xsonar_bar_enter, encode_xsonar_bar_leave, MasterChefDeposit, MasterChefWithdraw,
};
pub use vault_actions::{
    construct_exit_call, encode_batch_swap, encode_exit_pool, encode_join_pool, BatchSwapParams,
    ExitPoolData, ExitPoolParams, ExitPoolRequest, JoinPoolParams, JoinPoolRequest,
};
pub use wrapping::{
    encode_boo_mirror_world_enter, encode_boo_mirror_world_leave, encode_unwrap_aave_static_token,
    encode_unwrap_yearn_vault_token, encode_wrap_aave_dynamic_token, encode_wrap_yearn_vault_token,
    AaveStaticToken, ChainedTransfer, WrapperProtocol, YearnVaultToken,
};
