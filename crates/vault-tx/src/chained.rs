//! Chained References
//!
//! A chained reference is an amount placeholder the relay contract resolves
//! at execution time to the output stored by an earlier call in the batch.
//! The tag `0xba10` occupies the top 16 bits of the 32-byte word and the
//! slot key sits in the low bits.

use std::fmt;

use alloy::primitives::U256;
use relayer_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// `0xba10` followed by 60 zero nibbles
pub const CHAINED_REFERENCE_PREFIX: U256 = U256::from_limbs([0, 0, 0, 0xba10 << 48]);

/// Placeholder amount read from output slot `key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "U256", try_from = "U256")]
pub struct ChainedReference(U256);

impl ChainedReference {
    pub fn new(key: u64) -> Self {
        Self(CHAINED_REFERENCE_PREFIX + U256::from(key))
    }

    /// Slot key. Diagnostic only; the contract does the real decoding.
    pub fn key(&self) -> U256 {
        self.0 - CHAINED_REFERENCE_PREFIX
    }

    pub fn value(&self) -> U256 {
        self.0
    }
}

impl From<ChainedReference> for U256 {
    fn from(reference: ChainedReference) -> Self {
        reference.0
    }
}

impl TryFrom<U256> for ChainedReference {
    type Error = Error;

    fn try_from(value: U256) -> Result<Self> {
        if !is_chained_reference(value) {
            return Err(Error::invalid_request(format!(
                "0x{value:x} is not a chained reference"
            )));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for ChainedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Reference for output slot `key`
pub fn to_chained_reference(key: u64) -> ChainedReference {
    ChainedReference::new(key)
}

/// Whether `value` carries the chained-reference tag in its top 16 bits
pub fn is_chained_reference(value: U256) -> bool {
    (value >> 240usize) == U256::from(0xba10u64)
}

/// Reject literal amounts that the relay contract would read as references.
///
/// Literals must stay below [`CHAINED_REFERENCE_PREFIX`].
pub fn check_literal_amount(amount: U256) -> Result<U256> {
    if amount >= CHAINED_REFERENCE_PREFIX {
        return Err(Error::invalid_request(format!(
            "literal amount {amount} collides with the chained reference range"
        )));
    }
    Ok(amount)
}

/// Write the amount produced for `assets[index]` into slot `key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReference {
    pub index: usize,
    pub key: ChainedReference,
}

impl OutputReference {
    pub fn new(index: usize, key: ChainedReference) -> Self {
        Self { index, key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_layout() {
        let hex = format!("{:x}", CHAINED_REFERENCE_PREFIX);
        assert_eq!(hex.len(), 64);
        assert_eq!(&hex[..4], "ba10");
        assert!(hex[4..].chars().all(|c| c == '0'));
    }

    #[test]
    fn test_chained_reference_determinism() {
        for (k1, k2) in [(0u64, 1u64), (1, 2), (7, 255), (0, u64::MAX)] {
            let r1 = to_chained_reference(k1);
            let r2 = to_chained_reference(k2);
            assert_ne!(r1, r2);
            assert_eq!(r1, to_chained_reference(k1));
            assert!(is_chained_reference(r1.value()));
            assert!(is_chained_reference(r2.value()));
            assert_eq!(r1.value() >> 240usize, r2.value() >> 240usize);
            assert_eq!(r1.key(), U256::from(k1));
            assert_eq!(r2.key(), U256::from(k2));
        }
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(
            to_chained_reference(0).to_string(),
            "0xba10000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            to_chained_reference(3).to_string(),
            "0xba10000000000000000000000000000000000000000000000000000000000003"
        );
    }

    #[test]
    fn test_literal_amounts() {
        let amount = U256::from(10u64).pow(U256::from(30u64));
        assert!(!is_chained_reference(amount));
        assert_eq!(check_literal_amount(amount).unwrap(), amount);
        assert!(check_literal_amount(to_chained_reference(1).value()).is_err());
        assert!(check_literal_amount(U256::MAX).is_err());

        assert!(ChainedReference::try_from(amount).is_err());
        let reference = ChainedReference::try_from(to_chained_reference(9).value()).unwrap();
        assert_eq!(reference.key(), U256::from(9));
    }

    #[test]
    fn test_output_reference_json() {
        let output = OutputReference::new(2, to_chained_reference(2));
        let json = serde_json::to_string(&output).unwrap();
        let parsed: OutputReference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, output);
    }
}
