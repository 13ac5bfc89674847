use super::{Tick, TickDataProvider, TickSearch, check_spacing, check_tick};
use crate::error::{Error, MathError, StateError, TickError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sparse, index-sorted list of initialized ticks.
///
/// Lookups are binary searches. Mint and burn events insert or remove
/// records with an O(n) shift, which is fine since touched ticks are few
/// compared to the tick range. A ledger is plain data: clone it before
/// mutating when several simulations share the same base state.
///
/// Deserialized snapshots go through [`TickLedger::from_ticks`] and are
/// rejected on the same grounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LedgerSnapshot")]
pub struct TickLedger {
    tick_spacing: i32,
    ticks: Vec<Tick>,
}

#[derive(Deserialize)]
struct LedgerSnapshot {
    tick_spacing: i32,
    #[serde(default)]
    ticks: Vec<Tick>,
}

impl TryFrom<LedgerSnapshot> for TickLedger {
    type Error = TickError;

    fn try_from(snapshot: LedgerSnapshot) -> Result<Self, Self::Error> {
        Self::from_ticks(snapshot.ticks, snapshot.tick_spacing)
    }
}

impl TickLedger {
    pub fn new(tick_spacing: i32) -> Result<Self, TickError> {
        check_spacing(tick_spacing)?;
        Ok(Self {
            ticks: Vec::new(),
            tick_spacing,
        })
    }

    /// Builds a ledger from a snapshot, validating that records are
    /// strictly sorted, on the spacing grid, non-empty and that their
    /// net liquidity sums to zero.
    pub fn from_ticks(ticks: Vec<Tick>, tick_spacing: i32) -> Result<Self, TickError> {
        check_spacing(tick_spacing)?;

        let mut net_sum: i128 = 0;
        for (i, tick) in ticks.iter().enumerate() {
            check_tick(tick.index, tick_spacing)?;
            if tick.is_empty() {
                return Err(TickError::EmptyRecord(tick.index));
            }
            if i > 0 && ticks[i - 1].index >= tick.index {
                return Err(TickError::NotSorted);
            }
            net_sum = net_sum
                .checked_add(tick.liquidity_net)
                .ok_or(TickError::ZeroNet)?;
        }
        if net_sum != 0 {
            return Err(TickError::ZeroNet);
        }

        Ok(Self {
            ticks,
            tick_spacing,
        })
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn smallest(&self) -> Option<i32> {
        self.ticks.first().map(|t| t.index)
    }

    pub fn largest(&self) -> Option<i32> {
        self.ticks.last().map(|t| t.index)
    }

    fn search(&self, tick: i32) -> Result<usize, usize> {
        self.ticks.binary_search_by_key(&tick, |t| t.index)
    }

    pub fn get(&self, tick: i32) -> Result<&Tick, TickError> {
        self.search(tick)
            .map(|i| &self.ticks[i])
            .map_err(|_| TickError::NotFound(tick))
    }

    /// Largest record `<= tick` when `lte`, smallest record `> tick`
    /// otherwise.
    pub fn next_initialized(&self, tick: i32, lte: bool) -> TickSearch {
        let found = |t: &Tick| TickSearch::Found {
            tick: t.index,
            initialized: t.is_initialized(),
        };

        let (Some(first), Some(last)) = (self.ticks.first(), self.ticks.last()) else {
            return if lte {
                TickSearch::BelowSmallest
            } else {
                TickSearch::AtOrAboveLargest
            };
        };

        // number of records at or below `tick`
        let at_or_below = self.ticks.partition_point(|t| t.index <= tick);

        if lte {
            if tick < first.index {
                return TickSearch::BelowSmallest;
            }
            found(&self.ticks[at_or_below - 1])
        } else {
            if tick >= last.index {
                return TickSearch::AtOrAboveLargest;
            }
            found(&self.ticks[at_or_below])
        }
    }

    /// Records a position of `liquidity` over `[lower, upper)`: both
    /// boundaries gain gross liquidity, `lower` gains net and `upper` loses
    /// it. Either both records change or neither does.
    pub fn apply_mint(&mut self, lower: i32, upper: i32, liquidity: u128) -> Result<(), Error> {
        let delta = self.check_event(lower, upper, liquidity)?;

        let mut lower_tick = self.get(lower).copied().unwrap_or(Tick::new(lower, 0, 0));
        let mut upper_tick = self.get(upper).copied().unwrap_or(Tick::new(upper, 0, 0));

        lower_tick.liquidity_gross = lower_tick
            .liquidity_gross
            .checked_add(liquidity)
            .ok_or(MathError::Overflow)?;
        lower_tick.liquidity_net = lower_tick
            .liquidity_net
            .checked_add(delta)
            .ok_or(MathError::Overflow)?;
        upper_tick.liquidity_gross = upper_tick
            .liquidity_gross
            .checked_add(liquidity)
            .ok_or(MathError::Overflow)?;
        upper_tick.liquidity_net = upper_tick
            .liquidity_net
            .checked_sub(delta)
            .ok_or(MathError::Underflow)?;

        self.store(lower_tick);
        self.store(upper_tick);
        debug!(lower, upper, liquidity, ticks = self.ticks.len(), "applied mint");
        Ok(())
    }

    /// Inverse of [`Self::apply_mint`]. Records left with no liquidity are
    /// removed.
    pub fn apply_burn(&mut self, lower: i32, upper: i32, liquidity: u128) -> Result<(), Error> {
        let delta = self.check_event(lower, upper, liquidity)?;

        let mut lower_tick = *self.get(lower)?;
        let mut upper_tick = *self.get(upper)?;

        lower_tick.liquidity_gross = lower_tick
            .liquidity_gross
            .checked_sub(liquidity)
            .ok_or(MathError::Underflow)?;
        lower_tick.liquidity_net = lower_tick
            .liquidity_net
            .checked_sub(delta)
            .ok_or(MathError::Underflow)?;
        upper_tick.liquidity_gross = upper_tick
            .liquidity_gross
            .checked_sub(liquidity)
            .ok_or(MathError::Underflow)?;
        upper_tick.liquidity_net = upper_tick
            .liquidity_net
            .checked_add(delta)
            .ok_or(MathError::Overflow)?;

        self.store(lower_tick);
        self.store(upper_tick);
        debug!(lower, upper, liquidity, ticks = self.ticks.len(), "applied burn");
        Ok(())
    }

    fn check_event(&self, lower: i32, upper: i32, liquidity: u128) -> Result<i128, Error> {
        if lower >= upper {
            return Err(TickError::InvalidRange { lower, upper }.into());
        }
        check_tick(lower, self.tick_spacing)?;
        check_tick(upper, self.tick_spacing)?;
        if liquidity == 0 {
            return Err(StateError::InvalidLiquidity.into());
        }
        Ok(i128::try_from(liquidity).map_err(|_| MathError::Overflow)?)
    }

    /// Inserts, replaces or (when empty) removes the record at `tick.index`.
    fn store(&mut self, tick: Tick) {
        match (self.search(tick.index), tick.is_empty()) {
            (Ok(i), true) => {
                self.ticks.remove(i);
                debug!(tick = tick.index, "removed empty tick");
            }
            (Ok(i), false) => self.ticks[i] = tick,
            (Err(i), false) => self.ticks.insert(i, tick),
            (Err(_), true) => {}
        }
    }
}

impl TickDataProvider for TickLedger {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn get_tick(&self, tick: i32) -> Result<Tick, TickError> {
        self.get(tick).copied()
    }

    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Result<TickSearch, Error> {
        Ok(self.next_initialized(tick, lte))
    }
}
