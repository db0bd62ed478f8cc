//! Batch Relayer Calculator
//!
//! Limit and slippage math on 1e18 fixed-point values. Deltas follow the
//! vault convention: positive flows into the vault (max to send), negative
//! flows out (min to receive).

use alloy::primitives::utils::parse_units;
use alloy::primitives::{Address, I256, U256};
use relayer_core::constants::ONE;
use relayer_core::{Error, Result, Slippage, SwapKind};

/// `amount * factor / 1e18`, rounding down
pub fn mul_down(amount: U256, factor: U256) -> U256 {
    match amount.checked_mul(factor) {
        Some(product) => product / ONE,
        // Only reachable for amounts far above any token supply
        None => (amount / ONE).saturating_mul(factor),
    }
}

/// `amount * 1e18 / divisor`, rounding down
pub fn div_down(amount: U256, divisor: U256) -> Result<U256> {
    if divisor.is_zero() {
        return Err(Error::invalid_request("rate must be non-zero"));
    }
    match amount.checked_mul(ONE) {
        Some(product) => Ok(product / divisor),
        None => Ok((amount / divisor).saturating_mul(ONE)),
    }
}

/// Scale a signed delta by a 1e18 factor, truncating toward zero
fn scale_delta(delta: I256, factor: U256) -> I256 {
    let (sign, abs) = delta.into_sign_and_abs();
    let scaled = mul_down(abs, factor);
    I256::checked_from_sign_and_abs(sign, scaled).unwrap_or(if sign.is_negative() {
        I256::MIN
    } else {
        I256::MAX
    })
}

/// Worst-case amount after slippage: `amount * (1 - s)`
pub fn subtract_slippage(amount: U256, slippage: Slippage) -> U256 {
    mul_down(amount, slippage.down_factor())
}

/// Amount with slippage headroom: `amount * (1 + s)`
pub fn add_slippage(amount: U256, slippage: Slippage) -> U256 {
    mul_down(amount, slippage.up_factor())
}

/// Per-asset batch swap limits.
///
/// Tokens in carry the slippage for exact-out swaps, tokens out for exact-in
/// swaps. Intermediate hop assets get a zero limit.
pub fn compute_limits(
    tokens_in: &[Address],
    tokens_out: &[Address],
    kind: SwapKind,
    deltas: &[I256],
    assets: &[Address],
    slippage: Slippage,
) -> Vec<I256> {
    assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let delta = deltas.get(i).copied().unwrap_or(I256::ZERO);
            let mut limit = I256::ZERO;

            if tokens_in.contains(asset) {
                limit += match kind {
                    SwapKind::ExactOut => scale_delta(delta, slippage.up_factor()),
                    SwapKind::ExactIn => delta,
                };
            }
            if tokens_out.contains(asset) {
                limit += match kind {
                    SwapKind::ExactIn => scale_delta(delta, slippage.down_factor()),
                    SwapKind::ExactOut => delta,
                };
            }

            limit
        })
        .collect()
}

/// Parse a decimal string into a fixed-point integer with `decimals` places.
///
/// `"1.5"` at 6 decimals is `1_500_000`. More fractional digits than
/// `decimals` is an error rather than a silent truncation.
pub fn parse_fixed(value: &str, decimals: u8) -> Result<U256> {
    let value = value.trim();
    let invalid = |reason: &dyn std::fmt::Display| {
        Error::invalid_request(format!("invalid decimal amount '{value}': {reason}"))
    };

    if !value.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || !value.bytes().any(|b| b.is_ascii_digit())
    {
        return Err(invalid(&"expected an unsigned decimal"));
    }

    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(Error::invalid_request(format!(
            "amount '{value}' has more than {decimals} fractional digits"
        )));
    }
    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    parse_units(&normalized, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| invalid(&e))
}

/// Convert a wrapped amount to main-token terms using a price rate string
/// expressed with `decimals` places. A missing rate counts as 1.
pub fn apply_price_rate(amount: U256, price_rate: Option<&str>, decimals: u8) -> Result<U256> {
    let Some(rate) = price_rate else {
        return Ok(amount);
    };
    let rate = parse_fixed(rate, decimals)?;
    let scale = U256::from(10u64).pow(U256::from(decimals));
    Ok(amount.saturating_mul(rate) / scale)
}

pub fn to_signed(amount: U256) -> Result<I256> {
    I256::try_from(amount)
        .map_err(|_| Error::invalid_request(format!("amount {amount} does not fit a signed delta")))
}
