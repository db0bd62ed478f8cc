//! Encoded calls and the multicall envelope

use std::fmt;

use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::abi::IBatchRelayer;

/// ABI payload (selector + arguments) for one relayer library call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedCall(Bytes);

impl EncodedCall {
    pub fn from_call<C: SolCall>(call: &C) -> Self {
        Self(call.abi_encode().into())
    }

    pub fn selector(&self) -> [u8; 4] {
        let mut selector = [0u8; 4];
        let len = self.0.len().min(4);
        selector[..len].copy_from_slice(&self.0[..len]);
        selector
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// 0x-prefixed hex calldata
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Decode back into the typed call `C`
    pub fn decode<C: SolCall>(&self) -> Option<C> {
        C::abi_decode(&self.0).ok()
    }
}

impl From<Bytes> for EncodedCall {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for EncodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Wrap an ordered call list into the relay's `multicall(bytes[])`
pub fn encode_multicall(calls: &[EncodedCall]) -> EncodedCall {
    EncodedCall::from_call(&IBatchRelayer::multicallCall {
        data: calls.iter().map(|call| call.0.clone()).collect(),
    })
}
