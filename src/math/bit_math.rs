use crate::error::MathError;
use alloy_primitives::U256;

/// Index (0-255) of the highest set bit, `MathError::ZeroValue` for zero.
#[inline]
pub fn most_significant_bit(x: U256) -> Result<usize, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(255 - x.leading_zeros())
}

/// Index (0-255) of the lowest set bit, `MathError::ZeroValue` for zero.
#[inline]
pub fn least_significant_bit(x: U256) -> Result<usize, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(x.trailing_zeros())
}
