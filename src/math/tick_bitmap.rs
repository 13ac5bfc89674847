//! Word-packed bitmap of initialized ticks, laid out as in the pool
//! contract: compressed tick `t / spacing` lives at bit `t & 0xff` of word
//! `t >> 8`.

use crate::FastMap;
use crate::error::{MathError, TickError};
use crate::math::bit_math::{least_significant_bit, most_significant_bit};
use alloy_primitives::U256;

/// `(word, bit)` coordinates of a compressed tick.
#[inline]
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, (compressed & 0xff) as u8)
}

#[inline]
pub fn get_word(bitmap: &FastMap<i16, U256>, word: i16) -> U256 {
    bitmap.get(&word).copied().unwrap_or(U256::ZERO)
}

/// Toggles the initialized flag of `tick`; empty words are dropped.
pub fn flip_tick(
    bitmap: &mut FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
) -> Result<(), TickError> {
    if tick % tick_spacing != 0 {
        return Err(TickError::TickMisaligned {
            tick,
            spacing: tick_spacing,
        });
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let word = get_word(bitmap, word_pos) ^ (U256::ONE << bit_pos);
    if word.is_zero() {
        bitmap.remove(&word_pos);
    } else {
        bitmap.insert(word_pos, word);
    }
    Ok(())
}

/// Compressed tick, rounding toward negative infinity.
#[inline]
fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Next initialized tick within the 256-tick word holding `tick`
/// (searching `<= tick` when `lte`, else `> tick`).
///
/// If nothing is initialized in the word, the word boundary is returned with
/// `false`, so callers advance one word per step exactly like the contract.
pub fn next_initialized_tick_within_one_word(
    bitmap: &FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Result<(i32, bool), MathError> {
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);
        // all bits at or below bit_pos
        let mask = (U256::ONE << bit_pos) - U256::ONE + (U256::ONE << bit_pos);
        let masked = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            compressed - (bit_pos as i32 - most_significant_bit(masked)? as i32)
        } else {
            compressed - bit_pos as i32
        };
        Ok((next * tick_spacing, initialized))
    } else {
        let (word_pos, bit_pos) = position(compressed + 1);
        // all bits at or above bit_pos
        let mask = !((U256::ONE << bit_pos) - U256::ONE);
        let masked = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            compressed + 1 + (least_significant_bit(masked)? as i32 - bit_pos as i32)
        } else {
            compressed + 1 + (255 - bit_pos as i32)
        };
        Ok((next * tick_spacing, initialized))
    }
}
