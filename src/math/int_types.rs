//! Explicit, fallible conversions between the fixed-width integer types
//! the pool contract works with (`SafeCast` semantics).

use crate::U160_MAX;
use crate::error::MathError;
use alloy_primitives::{I256, U256};

/// Reinterprets an unsigned word as signed, failing with
/// `MathError::ExceedsRange` if it is above `I256::MAX`.
#[inline]
pub fn to_int256(value: U256) -> Result<I256, MathError> {
    let signed = I256::from_raw(value);
    if signed.is_negative() {
        return Err(MathError::ExceedsRange);
    }
    Ok(signed)
}

/// Reinterprets a signed word as unsigned, failing with
/// `MathError::ExceedsRange` for negative input instead of wrapping.
#[inline]
pub fn to_uint256(value: I256) -> Result<U256, MathError> {
    if value.is_negative() {
        return Err(MathError::ExceedsRange);
    }
    Ok(value.into_raw())
}

/// Ensures a price-like value fits 160 bits.
#[inline]
pub fn to_uint160(value: U256) -> Result<U256, MathError> {
    if value > U160_MAX {
        return Err(MathError::Overflow);
    }
    Ok(value)
}

#[inline]
pub fn to_uint128(value: U256) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow)
}
