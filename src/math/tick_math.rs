use crate::error::StateError;
use alloy_primitives::{I256, U256};

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_ratio_at_tick(MIN_TICK)`
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// `get_sqrt_ratio_at_tick(MAX_TICK)`
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

// log_sqrt(1.0001)(2) in Q128.128 and the error bounds of the approximation
const SQRT_10001: I256 = I256::from_raw(U256::from_limbs([11745905768312294533, 13863, 0, 0]));
const TICK_LOW: I256 = I256::from_raw(U256::from_limbs([
    6552757943157144234,
    184476617836266586,
    0,
    0,
]));
const TICK_HIGH: I256 = I256::from_raw(U256::from_limbs([
    4998474450511881007,
    15793544031827761793,
    0,
    0,
]));

/// Returns the sqrt price (Q64.96) at `tick`, i.e. `sqrt(1.0001^tick) * 2^96`,
/// or `StateError::TickOutOfBounds` outside `[MIN_TICK, MAX_TICK]`.
///
/// The value is built as a product of precomputed `1 / sqrt(1.0001^(2^i))`
/// factors in Q128.128, inverted for positive ticks and rounded up into
/// Q64.96, matching the contract bit for bit.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfBounds);
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $l0:expr, $l1:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from_limbs([$l0, $l1, 0, 0])) >> 128;
            }
        };
    }

    apply_multiplier!(0x2, 6459403834229662010, 18444899583751176498);
    apply_multiplier!(0x4, 17226890335427755468, 18443055278223354162);
    apply_multiplier!(0x8, 2032852871939366096, 18439367220385604838);
    apply_multiplier!(0x10, 14545316742740207172, 18431993317065449817);
    apply_multiplier!(0x20, 5129152022828963008, 18417254355718160513);
    apply_multiplier!(0x40, 4894419605888772193, 18387811781193591352);
    apply_multiplier!(0x80, 1280255884321894483, 18329067761203520168);
    apply_multiplier!(0x100, 15924666964335305636, 18212142134806087854);
    apply_multiplier!(0x200, 8010504389359918676, 17980523815641551639);
    apply_multiplier!(0x400, 10668036004952895731, 17526086738831147013);
    apply_multiplier!(0x800, 4878133418470705625, 16651378430235024244);
    apply_multiplier!(0x1000, 9537173718739605541, 15030750278693429944);
    apply_multiplier!(0x2000, 9972618978014552549, 12247334978882834399);
    apply_multiplier!(0x4000, 10428997489610666743, 8131365268884726200);
    apply_multiplier!(0x8000, 9305304367709015974, 3584323654723342297);
    apply_multiplier!(0x10000, 14301143598189091785, 696457651847595233);
    apply_multiplier!(0x20000, 7393154844743099908, 26294789957452057);
    apply_multiplier!(0x40000, 2209338891292245656, 37481735321082);
    apply_multiplier!(0x80000, 10518117631919034274, 76158723);

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let round_up = ratio.as_limbs()[0] & 0xFFFF_FFFF != 0;
    Ok((ratio >> 32) + U256::from(round_up as u8))
}

/// Returns the greatest tick whose sqrt ratio is at most `sqrt_price_x96`.
///
/// Fails with `StateError::InvalidSqrtRatio` outside
/// `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`. The binary logarithm is
/// approximated with 14 fractional bits, which leaves at most two candidate
/// ticks; the higher one wins if its exact ratio does not exceed the input.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, StateError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(StateError::InvalidSqrtRatio);
    }

    let ratio: U256 = sqrt_price_x96 << 32;
    let msb = 255 - ratio.leading_zeros();

    let mut r: U256 = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // integer part of log2 in Q64.64, two's complement
    let mut log_2: U256 = U256::from(msb).wrapping_sub(U256::from(128u8)) << 64;

    macro_rules! log2_step {
        ($shift:expr) => {{
            r = r.wrapping_mul(r) >> 127;
            let f: U256 = r >> 128;
            log_2 |= f << $shift;
            r >>= f.as_limbs()[0] as usize;
        }};
    }

    log2_step!(63);
    log2_step!(62);
    log2_step!(61);
    log2_step!(60);
    log2_step!(59);
    log2_step!(58);
    log2_step!(57);
    log2_step!(56);
    log2_step!(55);
    log2_step!(54);
    log2_step!(53);
    log2_step!(52);
    log2_step!(51);
    log2_step!(50);

    let log_sqrt10001 = I256::from_raw(log_2).wrapping_mul(SQRT_10001);
    let tick_low = log_sqrt10001.wrapping_sub(TICK_LOW).asr(128).low_i32();
    let tick_high = log_sqrt10001.wrapping_add(TICK_HIGH).asr(128).low_i32();

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}
