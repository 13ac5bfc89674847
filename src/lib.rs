//! Deterministic, off-chain simulation of concentrated-liquidity (Uniswap
//! V3–style) swaps in pure Rust, reproducing the pool contract's 256-bit
//! rounding bit for bit.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`): 512-bit `mulDiv`, tick ↔ price
//!   conversion, token deltas between prices and the single swap step.
//! - Tick sources (`tick::*`): the sorted [`TickLedger`] and the word-bitmap
//!   [`BitmapTickSource`], both behind the [`TickDataProvider`] trait.
//! - An in‑memory [`Pool`] running the full swap loop, quotes and
//!   mint/burn events.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use clmm_swap_engine::{math::tick_math, RESOLUTION, U256};
//!
//! let sqrt_price = tick_math::get_sqrt_ratio_at_tick(0).unwrap();
//! assert_eq!(sqrt_price, U256::ONE << RESOLUTION);
//! ```
//!
//! ## Simulating a swap in an in‑memory pool
//! ```no_run
//! use clmm_swap_engine::{
//!     math::price_utils::encode_sqrt_ratio_x96,
//!     pool::swap::SwapParams,
//!     Address, Pool, Tick, TickLedger, I256, U256,
//! };
//!
//! let liquidity = 100_000_000_000_000_000_000u128; // 100e18
//! let ticks = TickLedger::from_ticks(
//!     vec![
//!         Tick::new(-10, liquidity, liquidity as i128),
//!         Tick::new(10, liquidity, -(liquidity as i128)),
//!     ],
//!     1,
//! )
//! .unwrap();
//! let sqrt_price = encode_sqrt_ratio_x96(U256::ONE, U256::ONE).unwrap();
//! let mut pool = Pool::new(
//!     Address::with_last_byte(1),
//!     Address::with_last_byte(2),
//!     3000,
//!     sqrt_price,
//!     liquidity,
//!     0,
//!     ticks,
//! )
//! .unwrap();
//!
//! // exact input of 1e16 token0, default price limit
//! let params = SwapParams::exact_input(true, U256::from(10_000_000_000_000_000u64)).unwrap();
//! let result = pool.apply_swap(params).unwrap();
//! assert!(result.amount_calculated < I256::ZERO);
//! println!("amount0: {}, amount1: {}", result.amount0, result.amount1);
//! ```

pub use alloy_primitives::{Address, I256, U256};

pub mod config;
pub mod error;
mod hash;
pub mod math;
pub mod pool;
pub mod tick;

pub use config::EngineConfig;
pub use error::Error;
pub use hash::FastMap;
pub use pool::v3_pool::Pool;
pub use tick::{BitmapTickSource, Tick, TickDataProvider, TickLedger, TickSearch};

const U160_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0xFFFF_FFFF, 0]);
const U256_E4: U256 = U256::from_limbs([10000, 0, 0, 0]);
const U256_E6: U256 = U256::from_limbs([1000000, 0, 0, 0]);

/// Fee denominator: fees are expressed in hundredths of a bip.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
