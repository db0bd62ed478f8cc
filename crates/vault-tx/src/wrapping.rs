//! Wrapper Protocol Encoders
//!
//! Yield-bearing tokens held by linear pools are entered and left through
//! protocol-specific relayer calls. [`WrapperProtocol`] is the closed set of
//! protocols the relayer library supports.

use alloy::primitives::{Address, U256};
use relayer_core::{LinearPoolType, LookupError};
use serde::{Deserialize, Serialize};

use crate::abi::IWrapperActions;
use crate::call::EncodedCall;

/// Shared shape of wrapper and staking calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainedTransfer {
    pub sender: Address,
    pub recipient: Address,
    /// Literal amount or chained reference
    pub amount: U256,
    /// Zero or the chained slot receiving the call's output
    pub output_reference: U256,
}

/// Aave static aToken wrap/unwrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AaveStaticToken {
    pub static_token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: U256,
    /// Wrap from / unwrap to the underlying asset instead of the aToken
    pub underlying: bool,
    pub output_reference: U256,
}

/// Yearn vault token wrap/unwrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearnVaultToken {
    pub vault_token: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: U256,
    pub output_reference: U256,
}

pub fn encode_wrap_aave_dynamic_token(params: &AaveStaticToken) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::wrapAaveDynamicTokenCall {
        staticToken: params.static_token,
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        fromUnderlying: params.underlying,
        outputReference: params.output_reference,
    })
}

pub fn encode_unwrap_aave_static_token(params: &AaveStaticToken) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::unwrapAaveStaticTokenCall {
        staticToken: params.static_token,
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        toUnderlying: params.underlying,
        outputReference: params.output_reference,
    })
}

pub fn encode_wrap_yearn_vault_token(params: &YearnVaultToken) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::wrapYearnVaultTokenCall {
        vaultToken: params.vault_token,
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_unwrap_yearn_vault_token(params: &YearnVaultToken) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::unwrapYearnVaultTokenCall {
        vaultToken: params.vault_token,
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_boo_mirror_world_enter(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::booMirrorWorldEnterCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

pub fn encode_boo_mirror_world_leave(params: &ChainedTransfer) -> EncodedCall {
    EncodedCall::from_call(&IWrapperActions::booMirrorWorldLeaveCall {
        sender: params.sender,
        recipient: params.recipient,
        amount: params.amount,
        outputReference: params.output_reference,
    })
}

/// Wrapper protocols the relayer library can enter and leave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapperProtocol {
    Aave,
    Yearn,
    Boo,
}

impl WrapperProtocol {
    /// Resolve a linear pool's declared tag. Unknown tags are rejected.
    pub fn resolve(tag: &LinearPoolType, pool: Address) -> Result<Self, LookupError> {
        match tag {
            LinearPoolType::Aave => Ok(Self::Aave),
            LinearPoolType::Yearn => Ok(Self::Yearn),
            LinearPoolType::Boo => Ok(Self::Boo),
            LinearPoolType::Unknown(tag) => Err(LookupError::UnknownWrapperProtocol {
                pool,
                tag: tag.clone(),
            }),
        }
    }

    /// Leave `wrapped_token` for its underlying asset
    pub fn encode_unwrap(&self, wrapped_token: Address, transfer: &ChainedTransfer) -> EncodedCall {
        match self {
            Self::Aave => encode_unwrap_aave_static_token(&AaveStaticToken {
                static_token: wrapped_token,
                sender: transfer.sender,
                recipient: transfer.recipient,
                amount: transfer.amount,
                underlying: true,
                output_reference: transfer.output_reference,
            }),
            Self::Yearn => encode_unwrap_yearn_vault_token(&YearnVaultToken {
                vault_token: wrapped_token,
                sender: transfer.sender,
                recipient: transfer.recipient,
                amount: transfer.amount,
                output_reference: transfer.output_reference,
            }),
            // Mirror world has a single staking contract, no token argument
            Self::Boo => encode_boo_mirror_world_leave(transfer),
        }
    }

    /// Enter `wrapped_token` from its underlying asset
    pub fn encode_wrap(&self, wrapped_token: Address, transfer: &ChainedTransfer) -> EncodedCall {
        match self {
            Self::Aave => encode_wrap_aave_dynamic_token(&AaveStaticToken {
                static_token: wrapped_token,
                sender: transfer.sender,
                recipient: transfer.recipient,
                amount: transfer.amount,
                underlying: true,
                output_reference: transfer.output_reference,
            }),
            Self::Yearn => encode_wrap_yearn_vault_token(&YearnVaultToken {
                vault_token: wrapped_token,
                sender: transfer.sender,
                recipient: transfer.recipient,
                amount: transfer.amount,
                output_reference: transfer.output_reference,
            }),
            Self::Boo => encode_boo_mirror_world_enter(transfer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chained::to_chained_reference;
    use alloy::sol_types::SolCall;

    fn transfer() -> ChainedTransfer {
        ChainedTransfer {
            sender: Address::repeat_byte(0xee),
            recipient: Address::repeat_byte(0x01),
            amount: to_chained_reference(2).value(),
            output_reference: U256::ZERO,
        }
    }

    #[test]
    fn test_resolve_protocol_tags() {
        let pool = Address::repeat_byte(0x10);
        assert_eq!(
            WrapperProtocol::resolve(&LinearPoolType::default(), pool).unwrap(),
            WrapperProtocol::Aave
        );
        assert_eq!(
            WrapperProtocol::resolve(&LinearPoolType::Boo, pool).unwrap(),
            WrapperProtocol::Boo
        );

        let err = WrapperProtocol::resolve(&LinearPoolType::Unknown("euler".into()), pool)
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::UnknownWrapperProtocol { pool: p, ref tag } if p == pool && tag == "euler"
        ));
    }

    #[test]
    fn test_aave_unwrap_goes_to_underlying() {
        let token = Address::repeat_byte(0x02);
        let call = WrapperProtocol::Aave.encode_unwrap(token, &transfer());
        let decoded = call
            .decode::<IWrapperActions::unwrapAaveStaticTokenCall>()
            .unwrap();

        assert_eq!(decoded.staticToken, token);
        assert_eq!(decoded.sender, Address::repeat_byte(0xee));
        assert_eq!(decoded.recipient, Address::repeat_byte(0x01));
        assert_eq!(decoded.amount, to_chained_reference(2).value());
        assert!(decoded.toUnderlying);
        assert_eq!(decoded.outputReference, U256::ZERO);
    }

    #[test]
    fn test_dispatch_selects_protocol_call() {
        let token = Address::repeat_byte(0x03);

        let yearn = WrapperProtocol::Yearn.encode_unwrap(token, &transfer());
        assert_eq!(
            yearn.selector(),
            IWrapperActions::unwrapYearnVaultTokenCall::SELECTOR
        );
        let decoded = yearn
            .decode::<IWrapperActions::unwrapYearnVaultTokenCall>()
            .unwrap();
        assert_eq!(decoded.vaultToken, token);

        let boo = WrapperProtocol::Boo.encode_unwrap(token, &transfer());
        assert_eq!(
            boo.selector(),
            IWrapperActions::booMirrorWorldLeaveCall::SELECTOR
        );

        let wrap = WrapperProtocol::Aave.encode_wrap(token, &transfer());
        let decoded = wrap
            .decode::<IWrapperActions::wrapAaveDynamicTokenCall>()
            .unwrap();
        assert!(decoded.fromUnderlying);
        assert_eq!(
            WrapperProtocol::Boo.encode_wrap(token, &transfer()).selector(),
            IWrapperActions::booMirrorWorldEnterCall::SELECTOR
        );
        assert_eq!(
            WrapperProtocol::Yearn.encode_wrap(token, &transfer()).selector(),
            IWrapperActions::wrapYearnVaultTokenCall::SELECTOR
        );
    }

    #[test]
    fn test_aave_static_token_flag() {
        let params = AaveStaticToken {
            static_token: Address::repeat_byte(0x04),
            sender: Address::repeat_byte(0xee),
            recipient: Address::repeat_byte(0x01),
            amount: U256::from(1_000),
            underlying: false,
            output_reference: to_chained_reference(0).value(),
        };
        let decoded = encode_unwrap_aave_static_token(&params)
            .decode::<IWrapperActions::unwrapAaveStaticTokenCall>()
            .unwrap();
        assert!(!decoded.toUnderlying);
        assert_eq!(decoded.outputReference, to_chained_reference(0).value());
    }
}
