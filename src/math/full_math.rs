use crate::error::MathError;
use crate::math::big_int::U512;
use alloy_primitives::U256;

#[inline]
fn mul_div_rem(a: U256, b: U256, denominator: U256) -> Result<(U256, U256), MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let product = U512::full_mul(a, b);
    if product.fits_u256() {
        return Ok(product.lo().div_rem(denominator));
    }

    let (quotient, remainder) = product.div_rem(denominator)?;
    Ok((quotient.try_into_u256()?, remainder))
}

/// Computes `floor(a * b / denominator)` over the full 512-bit product,
/// returning `MathError::Overflow` if the quotient does not fit 256 bits.
///
/// This mirrors the Solidity `FullMath.mulDiv` behavior and underpins
/// many of the higher-level swap and liquidity calculations.
#[inline]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    mul_div_rem(a, b, denominator).map(|(quotient, _)| quotient)
}

/// Like [`mul_div`], but rounds the result up when there is a
/// non-zero remainder, returning an overflow error if the result
/// would exceed `U256::MAX`.
#[inline]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let (quotient, remainder) = mul_div_rem(a, b, denominator)?;

    if remainder.is_zero() {
        return Ok(quotient);
    }
    quotient.checked_add(U256::ONE).ok_or(MathError::Overflow)
}

/// Divides `a` by `b`, rounding the result up to the next integer
/// when there is a non-zero remainder.
#[inline]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    // ceil(a / b) <= a for b >= 1, so the increment cannot wrap
    Ok(if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    })
}
