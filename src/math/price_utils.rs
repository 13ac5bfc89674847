use crate::error::{Error, MathError, TickError};
use crate::math::bit_math::most_significant_bit;
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use alloy_primitives::U256;

/// Returns `floor(sqrt(amount1 / amount0) * 2^96)`, the Q64.96 sqrt price
/// of a reserve ratio.
///
/// `amount1` is shifted left by 192 bits, so it must fit 64 bits.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U256, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if amount1.bit_len() > 64 {
        return Err(MathError::Overflow);
    }
    let ratio_x192: U256 = (amount1 << 192) / amount0;
    Ok(sqrt(ratio_x192))
}

/// Integer square root (floor) by Newton iteration, starting above the
/// root so the sequence decreases monotonically.
fn sqrt(x: U256) -> U256 {
    let Ok(msb) = most_significant_bit(x) else {
        return U256::ZERO;
    };
    let mut z = U256::ONE << (msb / 2 + 1);
    loop {
        let y: U256 = (z + x / z) >> 1;
        if y >= z {
            return z;
        }
        z = y;
    }
}

/// Rounds `tick` to the nearest multiple of `tick_spacing` (halves toward
/// positive infinity), staying inside `[MIN_TICK, MAX_TICK]`.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, Error> {
    if tick_spacing <= 0 {
        return Err(TickError::InvalidTickSpacing(tick_spacing).into());
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(TickError::TickOutOfBounds(tick).into());
    }

    let spacing = tick_spacing as i64;
    let rounded = (2 * tick as i64 + spacing).div_euclid(2 * spacing) * spacing;

    let usable = if rounded < MIN_TICK as i64 {
        rounded + spacing
    } else if rounded > MAX_TICK as i64 {
        rounded - spacing
    } else {
        rounded
    };
    Ok(usable as i32)
}
