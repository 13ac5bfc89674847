use crate::config::EngineConfig;
use crate::error::{Error, MathError, StateError, SwapError, TickError};
use crate::math::tick_math::get_sqrt_ratio_at_tick;
use crate::tick::{TickDataProvider, TickLedger, check_spacing};
use crate::FEE_DENOMINATOR;
use alloy_primitives::{Address, U160, U256};
use tracing::debug;

/// Price and tick the pool currently sits at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Converts an `Address` into its `U160` numeric representation.
///
/// This is mainly used to compare or sort addresses by value.
#[inline(always)]
pub fn address_to_u160(address: Address) -> U160 {
    address.into()
}

/// Returns the token pair sorted by numeric address, as used by Uniswap V3.
///
/// This is helpful when you want a canonical `(token0, token1)` ordering
/// regardless of input order.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if address_to_u160(token_a) < address_to_u160(token_b) {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// In-memory snapshot of a concentrated-liquidity pool.
///
/// The snapshot only changes through [`Pool::apply_swap`] (after the whole
/// swap succeeded) and through mint/burn events; [`Pool::swap`] and the
/// quote helpers simulate against it without touching it.
///
/// `P` is where tick data comes from. The default [`TickLedger`] supports
/// mint/burn; a [`crate::BitmapTickSource`] replays the contract's
/// word-by-word search instead.
#[derive(Clone, Debug)]
pub struct Pool<P = TickLedger> {
    pub token0: Address,
    pub token1: Address,
    pub fee_pips: u32,
    pub slot0: Slot0,
    /// Liquidity active at the current price.
    pub liquidity: u128,
    pub ticks: P,
    pub config: EngineConfig,
}

impl<P: TickDataProvider> Pool<P> {
    /// Builds a pool from a persisted snapshot.
    ///
    /// The tokens are stored in canonical order. Fails with
    /// [`SwapError::FeeTooHigh`] if `fee_pips >= 1_000_000`, with
    /// [`TickError::InvalidTickSpacing`] if the provider reports a spacing
    /// below 1 and with [`StateError::InvalidSqrtRatioForTick`] if
    /// `sqrt_price_x96` lies outside `[sqrt_ratio(tick), sqrt_ratio(tick + 1)]`.
    pub fn new(
        token_a: Address,
        token_b: Address,
        fee_pips: u32,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
        ticks: P,
    ) -> Result<Self, Error> {
        if fee_pips >= FEE_DENOMINATOR {
            return Err(SwapError::FeeTooHigh(fee_pips).into());
        }
        check_spacing(ticks.tick_spacing())?;

        let tick_sqrt_ratio = get_sqrt_ratio_at_tick(tick)?;
        let next_tick_sqrt_ratio = get_sqrt_ratio_at_tick(tick + 1)?;
        if sqrt_price_x96 < tick_sqrt_ratio || sqrt_price_x96 > next_tick_sqrt_ratio {
            return Err(StateError::InvalidSqrtRatioForTick.into());
        }

        let (token0, token1) = sort_tokens(token_a, token_b);

        Ok(Self {
            token0,
            token1,
            fee_pips,
            slot0: Slot0 {
                sqrt_price_x96,
                tick,
            },
            liquidity,
            ticks,
            config: EngineConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.ticks.tick_spacing()
    }

    /// Returns the net liquidity delta at a given tick.
    ///
    /// This is used during swaps to update in‑range liquidity when
    /// crossing initialized ticks.
    pub fn get_liquidity_net(&self, tick: i32) -> Result<i128, TickError> {
        Ok(self.ticks.get_tick(tick)?.liquidity_net)
    }

    #[inline]
    fn in_range(&self, lower: i32, upper: i32) -> bool {
        lower <= self.slot0.tick && self.slot0.tick < upper
    }
}

impl Pool<TickLedger> {
    /// Adds a position of `liquidity` over `[lower, upper)`. Active
    /// liquidity grows when the current tick is inside the range.
    pub fn mint(&mut self, lower: i32, upper: i32, liquidity: u128) -> Result<(), Error> {
        let active = if self.in_range(lower, upper) {
            self.liquidity
                .checked_add(liquidity)
                .ok_or(MathError::Overflow)?
        } else {
            self.liquidity
        };

        self.ticks.apply_mint(lower, upper, liquidity)?;
        self.liquidity = active;
        debug!(lower, upper, liquidity, active, "pool mint");
        Ok(())
    }

    /// Removes `liquidity` from the position over `[lower, upper)`.
    pub fn burn(&mut self, lower: i32, upper: i32, liquidity: u128) -> Result<(), Error> {
        let active = if self.in_range(lower, upper) {
            self.liquidity
                .checked_sub(liquidity)
                .ok_or(MathError::Underflow)?
        } else {
            self.liquidity
        };

        self.ticks.apply_burn(lower, upper, liquidity)?;
        self.liquidity = active;
        debug!(lower, upper, liquidity, active, "pool burn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tick;
    use crate::tick::TickSearch;
    use crate::math::price_utils::encode_sqrt_ratio_x96;
    use crate::math::tick_math::MAX_TICK;
    use alloy_primitives::address;

    const L: u128 = 100_000_000_000_000_000_000;

    fn ledger() -> TickLedger {
        TickLedger::from_ticks(vec![Tick::new(-10, L, L as i128), Tick::new(10, L, -(L as i128))], 1)
            .unwrap()
    }

    fn pool_at(sqrt_price_x96: U256, tick: i32) -> Result<Pool, Error> {
        Pool::new(
            address!("0x0000000000000000000000000000000000000002"),
            address!("0x0000000000000000000000000000000000000001"),
            3000,
            sqrt_price_x96,
            L,
            tick,
            ledger(),
        )
    }

    #[test]
    fn sort_tokens_orders_by_address() {
        let a = address!("0x0000000000000000000000000000000000000001");
        let b = address!("0x0000000000000000000000000000000000000002");
        assert_eq!(sort_tokens(b, a), (a, b));
        assert_eq!(sort_tokens(a, b), (a, b));
    }

    #[test]
    fn new_sorts_tokens_and_keeps_snapshot() {
        let price = encode_sqrt_ratio_x96(U256::ONE, U256::ONE).unwrap();
        let pool = pool_at(price, 0).unwrap();
        assert_eq!(pool.token0, address!("0x0000000000000000000000000000000000000001"));
        assert_eq!(pool.slot0, Slot0 { sqrt_price_x96: price, tick: 0 });
        assert_eq!(pool.tick_spacing(), 1);
        assert_eq!(pool.get_liquidity_net(10).unwrap(), -(L as i128));
        assert!(matches!(pool.get_liquidity_net(3), Err(TickError::NotFound(3))));
    }

    #[test]
    fn new_rejects_fee_at_denominator() {
        let price = get_sqrt_ratio_at_tick(0).unwrap();
        let err = Pool::new(Address::ZERO, Address::ZERO, 1_000_000, price, 0, 0, ledger())
            .unwrap_err();
        assert_eq!(err, Error::SwapError(SwapError::FeeTooHigh(1_000_000)));
    }

    // a provider that never went through a validating constructor
    #[derive(Debug)]
    struct UncheckedSpacing(i32);

    impl TickDataProvider for UncheckedSpacing {
        fn tick_spacing(&self) -> i32 {
            self.0
        }

        fn get_tick(&self, tick: i32) -> Result<Tick, TickError> {
            Err(TickError::NotFound(tick))
        }

        fn next_initialized_tick(&self, _tick: i32, lte: bool) -> Result<TickSearch, Error> {
            Ok(if lte {
                TickSearch::BelowSmallest
            } else {
                TickSearch::AtOrAboveLargest
            })
        }
    }

    #[test]
    fn new_rejects_non_positive_spacing() {
        let price = get_sqrt_ratio_at_tick(0).unwrap();
        for spacing in [0, -60] {
            let err = Pool::new(Address::ZERO, Address::ZERO, 3000, price, L, 0, UncheckedSpacing(spacing))
                .unwrap_err();
            assert_eq!(err, Error::TickError(TickError::InvalidTickSpacing(spacing)));
        }
        assert!(Pool::new(Address::ZERO, Address::ZERO, 3000, price, L, 0, UncheckedSpacing(1)).is_ok());
    }

    #[test]
    fn new_rejects_price_outside_tick() {
        let price = get_sqrt_ratio_at_tick(0).unwrap();
        assert!(matches!(
            pool_at(price, 1),
            Err(Error::StateError(StateError::InvalidSqrtRatioForTick))
        ));
        assert!(matches!(
            pool_at(price - U256::ONE, 0),
            Err(Error::StateError(StateError::InvalidSqrtRatioForTick))
        ));
        // the upper boundary still belongs to the tick below it
        assert!(pool_at(get_sqrt_ratio_at_tick(1).unwrap(), 0).is_ok());
        assert!(matches!(
            pool_at(price, MAX_TICK),
            Err(Error::StateError(StateError::TickOutOfBounds))
        ));
    }

    #[test]
    fn mint_in_range_updates_active_liquidity() {
        let mut pool = pool_at(get_sqrt_ratio_at_tick(0).unwrap(), 0).unwrap();
        pool.mint(-5, 5, 1_000).unwrap();
        assert_eq!(pool.liquidity, L + 1_000);
        assert_eq!(pool.ticks.get(-5).unwrap(), &Tick::new(-5, 1_000, 1_000));

        pool.burn(-5, 5, 1_000).unwrap();
        assert_eq!(pool.liquidity, L);
        assert_eq!(pool.ticks, ledger());
    }

    #[test]
    fn mint_out_of_range_leaves_active_liquidity() {
        let mut pool = pool_at(get_sqrt_ratio_at_tick(0).unwrap(), 0).unwrap();
        // upper bound is exclusive
        pool.mint(-20, 0, 1_000).unwrap();
        pool.mint(20, 40, 1_000).unwrap();
        assert_eq!(pool.liquidity, L);
        assert_eq!(pool.ticks.len(), 6);
    }

    #[test]
    fn failed_burn_changes_nothing() {
        let mut pool = pool_at(get_sqrt_ratio_at_tick(0).unwrap(), 0).unwrap();
        let before = pool.ticks.clone();
        assert!(pool.burn(-10, 10, L + 1).is_err());
        assert_eq!(pool.liquidity, L);
        assert_eq!(pool.ticks, before);
    }
}
