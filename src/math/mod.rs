pub mod big_int;
pub mod full_math;
pub mod int_types;
pub mod price_utils;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_bitmap;
pub mod tick_math;

pub mod bit_math;

pub mod liquidity_math;
