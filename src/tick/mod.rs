//! Tick records and the sources the swap engine reads them from.
//!
//! The engine only needs two questions answered: "what is stored at this
//! tick" and "where is the next initialized tick in this direction". Any
//! type implementing [`TickDataProvider`] can back a [`crate::Pool`]: the
//! sorted [`TickLedger`] for simulations that follow mint/burn events, or
//! the word-bitmap [`BitmapTickSource`] that walks ticks exactly like the
//! pool contract does.

pub mod bitmap_source;
pub mod ledger;

pub use bitmap_source::BitmapTickSource;
pub use ledger::TickLedger;

use crate::error::{Error, TickError};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use serde::{Deserialize, Serialize};

/// Liquidity referencing a single tick boundary.
///
/// Liquidity fields are (de)serialized as decimal strings, since formats
/// like TOML stop at 64-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub index: i32,
    /// Total liquidity of all positions using this tick as a boundary.
    #[serde(with = "decimal_str")]
    pub liquidity_gross: u128,
    /// Liquidity added to the active range when the price crosses this tick
    /// upward (subtracted when crossing downward).
    #[serde(with = "decimal_str")]
    pub liquidity_net: i128,
}

mod decimal_str {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl Tick {
    pub const fn new(index: i32, liquidity_gross: u128, liquidity_net: i128) -> Self {
        Self {
            index,
            liquidity_gross,
            liquidity_net,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.liquidity_gross == 0 && self.liquidity_net == 0
    }
}

/// Result of a next-initialized-tick query.
///
/// Running off either end of a ledger is a regular outcome, not a failure:
/// the engine maps it onto the global tick bounds with [`TickSearch::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSearch {
    Found { tick: i32, initialized: bool },
    /// Searching down from below the smallest record.
    BelowSmallest,
    /// Searching up from at or above the largest record.
    AtOrAboveLargest,
}

impl TickSearch {
    /// `(tick, initialized)` with sentinels and out-of-range ticks mapped
    /// onto `[MIN_TICK, MAX_TICK]`.
    pub fn clamped(self) -> (i32, bool) {
        match self {
            TickSearch::Found { tick, initialized } => (tick.clamp(MIN_TICK, MAX_TICK), initialized),
            TickSearch::BelowSmallest => (MIN_TICK, false),
            TickSearch::AtOrAboveLargest => (MAX_TICK, false),
        }
    }
}

/// Read access to tick data during a swap.
pub trait TickDataProvider {
    fn tick_spacing(&self) -> i32;

    /// The record stored at `tick`, `TickError::NotFound` if uninitialized.
    fn get_tick(&self, tick: i32) -> Result<Tick, TickError>;

    /// Next initialized tick at or below `tick` when `lte`, strictly above
    /// it otherwise. Providers may return an uninitialized stopping point
    /// (`initialized == false`), the engine then steps to it and searches
    /// again.
    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<TickSearch, Error>;
}

impl<P: TickDataProvider + ?Sized> TickDataProvider for &P {
    fn tick_spacing(&self) -> i32 {
        (**self).tick_spacing()
    }

    fn get_tick(&self, tick: i32) -> Result<Tick, TickError> {
        (**self).get_tick(tick)
    }

    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<TickSearch, Error> {
        (**self).next_initialized_tick(tick, lte)
    }
}

/// Checks that `tick` is inside the global range and on the spacing grid.
pub(crate) fn check_tick(tick: i32, tick_spacing: i32) -> Result<(), TickError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(TickError::TickOutOfBounds(tick));
    }
    if tick % tick_spacing != 0 {
        return Err(TickError::TickMisaligned {
            tick,
            spacing: tick_spacing,
        });
    }
    Ok(())
}

pub(crate) fn check_spacing(tick_spacing: i32) -> Result<(), TickError> {
    if tick_spacing <= 0 {
        return Err(TickError::InvalidTickSpacing(tick_spacing));
    }
    Ok(())
}
