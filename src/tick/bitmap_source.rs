use super::{Tick, TickDataProvider, TickLedger, TickSearch, check_spacing, check_tick};
use crate::FastMap;
use crate::error::{Error, TickError};
use crate::math::tick_bitmap::{flip_tick, next_initialized_tick_within_one_word};
use alloy_primitives::U256;

/// Tick source shaped like the pool contract's storage: a sparse map of
/// 256-bit bitmap words plus the per-tick records.
///
/// Searches never leave the word holding the current tick, so a swap run
/// against this source takes the same steps the contract takes, including
/// the uninitialized stops at word boundaries.
#[derive(Debug, Clone)]
pub struct BitmapTickSource {
    pub bitmap: FastMap<i16, U256>,
    pub ticks: FastMap<i32, Tick>,
    tick_spacing: i32,
}

impl BitmapTickSource {
    pub fn new(tick_spacing: i32) -> Result<Self, TickError> {
        check_spacing(tick_spacing)?;
        Ok(Self {
            bitmap: FastMap::default(),
            ticks: FastMap::default(),
            tick_spacing,
        })
    }

    /// Rebuilds the bitmap from a validated ledger.
    pub fn from_ledger(ledger: &TickLedger) -> Result<Self, TickError> {
        let mut source = Self::new(ledger.tick_spacing())?;
        for tick in ledger.ticks() {
            source.insert_tick(*tick)?;
        }
        Ok(source)
    }

    /// Adopts bitmap words and tick records as read from chain. Records are
    /// validated, the words are taken as given.
    pub fn from_parts(
        bitmap: FastMap<i16, U256>,
        ticks: impl IntoIterator<Item = Tick>,
        tick_spacing: i32,
    ) -> Result<Self, TickError> {
        check_spacing(tick_spacing)?;
        let mut records = FastMap::default();
        for tick in ticks {
            check_tick(tick.index, tick_spacing)?;
            records.insert(tick.index, tick);
        }
        Ok(Self {
            bitmap,
            ticks: records,
            tick_spacing,
        })
    }

    /// Stores `tick` and marks it initialized. Replacing an existing record
    /// keeps its bit set.
    pub fn insert_tick(&mut self, tick: Tick) -> Result<(), TickError> {
        check_tick(tick.index, self.tick_spacing)?;
        if tick.is_empty() {
            return Err(TickError::EmptyRecord(tick.index));
        }
        if self.ticks.insert(tick.index, tick).is_none() {
            flip_tick(&mut self.bitmap, tick.index, self.tick_spacing)?;
        }
        Ok(())
    }

    /// Drops the record at `tick` and clears its bit.
    pub fn remove_tick(&mut self, tick: i32) -> Result<Tick, TickError> {
        let removed = self.ticks.remove(&tick).ok_or(TickError::NotFound(tick))?;
        flip_tick(&mut self.bitmap, tick, self.tick_spacing)?;
        Ok(removed)
    }
}

impl TickDataProvider for BitmapTickSource {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn get_tick(&self, tick: i32) -> Result<Tick, TickError> {
        self.ticks.get(&tick).copied().ok_or(TickError::NotFound(tick))
    }

    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<TickSearch, Error> {
        let (tick, initialized) =
            next_initialized_tick_within_one_word(&self.bitmap, tick, self.tick_spacing, lte)?;
        Ok(TickSearch::Found { tick, initialized })
    }
}
