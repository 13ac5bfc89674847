use crate::error::{Error, MathError, SwapError};
use crate::math::full_math::{mul_div, mul_div_rounding_up};
use crate::math::int_types::{to_int256, to_uint256};
use crate::math::liquidity_math::add_delta;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_math::{
    MAX_SQRT_RATIO, MIN_SQRT_RATIO, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio,
};
use crate::pool::v3_pool::{Pool, Slot0};
use crate::tick::TickDataProvider;
use crate::{U256_E4, U256_E6};
use alloy_primitives::{I256, U256};
use tracing::{debug, trace, warn};

/// Default limit for a zero-for-one swap: one unit above the lowest price.
pub const MIN_SQRT_PRICE_LIMIT: U256 = U256::from_limbs([4295128740, 0, 0, 0]);
/// Default limit for a one-for-zero swap: one unit below the highest price.
pub const MAX_SQRT_PRICE_LIMIT: U256 =
    U256::from_limbs([6743328256752651557, 17280870778742802505, 4294805859, 0]);

/// Derives a sqrt-price limit from a slippage tolerance in basis points.
///
/// This is handy when building user‑facing APIs: you can derive a
/// `sqrt_price_limit_x96` from a human‑friendly tolerance. The tolerance
/// applies to the square-root price and the result is clamped strictly
/// inside `(MIN_SQRT_RATIO, MAX_SQRT_RATIO)`, so it always passes the
/// swap's limit check as long as it differs from the current price.
pub fn sqrt_price_limit_with_slippage(
    sqrt_price_x96: U256,
    zero_for_one: bool,
    slippage_bps: u32,
) -> Result<U256, MathError> {
    let slippage = U256::from(slippage_bps);

    let limit = if zero_for_one {
        mul_div(sqrt_price_x96, U256_E4.saturating_sub(slippage), U256_E4)?
    } else {
        mul_div(sqrt_price_x96, U256_E4 + slippage, U256_E4)?
    };

    Ok(limit.clamp(MIN_SQRT_PRICE_LIMIT, MAX_SQRT_PRICE_LIMIT))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Swap direction: `true` for token0 → token1, `false` for token1 → token0.
    pub zero_for_one: bool,
    /// Signed amount being swapped. Positive means “exact in”, negative means “exact out”.
    pub amount_specified: I256,
    /// Sqrt‑price limit in Q96 that bounds how far the price is allowed to move.
    /// `None` lets the price run to the edge of the valid range.
    ///
    /// Use [`sqrt_price_limit_with_slippage`] to derive this from a tolerance.
    pub sqrt_price_limit_x96: Option<U256>,
}

impl SwapParams {
    /// Creates new swap parameters for a given direction, signed amount,
    /// and explicit sqrt‑price limit.
    #[inline]
    pub fn new(zero_for_one: bool, amount_specified: I256, sqrt_price_limit_x96: U256) -> Self {
        Self {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96: Some(sqrt_price_limit_x96),
        }
    }

    /// Exact-input swap of `amount_in` with the default price limit.
    /// Fails with `MathError::ExceedsRange` above `I256::MAX`.
    pub fn exact_input(zero_for_one: bool, amount_in: U256) -> Result<Self, MathError> {
        Ok(Self {
            zero_for_one,
            amount_specified: to_int256(amount_in)?,
            sqrt_price_limit_x96: None,
        })
    }

    /// Exact-output swap of `amount_out` with the default price limit.
    pub fn exact_output(zero_for_one: bool, amount_out: U256) -> Result<Self, MathError> {
        Ok(Self {
            zero_for_one,
            amount_specified: -to_int256(amount_out)?,
            sqrt_price_limit_x96: None,
        })
    }

    pub fn with_limit(mut self, sqrt_price_limit_x96: U256) -> Self {
        self.sqrt_price_limit_x96 = Some(sqrt_price_limit_x96);
        self
    }

    #[inline]
    pub fn is_exact_input(&self) -> bool {
        !self.amount_specified.is_negative()
    }

    fn resolved_limit(&self) -> U256 {
        self.sqrt_price_limit_x96.unwrap_or(if self.zero_for_one {
            MIN_SQRT_PRICE_LIMIT
        } else {
            MAX_SQRT_PRICE_LIMIT
        })
    }
}

/// Fee charged by one step of the swap loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepFee {
    /// Tick the step started from.
    pub tick: i32,
    pub amount_in: U256,
    pub fee_amount: U256,
    /// Liquidity the step traded against.
    pub liquidity: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    /// Output still owed to the caller (negative, exact input) or input the
    /// caller has to pay including fees (positive, exact output).
    pub amount_calculated: I256,
    /// Part of `amount_specified` that could not be swapped before the price
    /// limit was reached.
    pub amount_remaining: I256,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    /// Initialized ticks crossed, uninitialized word boundaries excluded.
    pub crossed_ticks: u32,
    /// Pool balance change of token0 (positive: the pool received it).
    pub amount0: I256,
    /// Pool balance change of token1.
    pub amount1: I256,
    pub fees_paid: U256,
    /// Per-step breakdown, empty unless `EngineConfig::record_steps` is set.
    pub steps: Vec<StepFee>,
}

/// Summary of a quote, all amounts unsigned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    /// Output received (exact input) or input required (exact output).
    pub amount: U256,
    /// Input left unspent, or output left unfilled, at the price limit.
    pub amount_remaining: U256,
    pub sqrt_price_x96_after: U256,
    pub tick_after: i32,
    pub crossed_ticks: u32,
}

// the top level state of the swap, published to the pool only on success
#[derive(Default)]
struct SwapState {
    // the amount remaining to be swapped in/out of the input/output asset
    amount_specified_remaining: I256,
    // the amount already swapped out/in of the output/input asset
    amount_calculated: I256,
    // current sqrt(price)
    sqrt_price_x96: U256,
    // the tick associated with the current price
    tick: i32,
    // the current liquidity in range
    liquidity: u128,
    // accumulated swap fees
    swap_fee: U256,
    crossed_ticks: u32,
}

#[derive(Default)]
struct StepComputations {
    // the price at the beginning of the step
    sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    tick_next: i32,
    // whether tick_next is initialized or not
    initialized: bool,
    // sqrt(price) for the next tick (1/0)
    sqrt_price_next_x96: U256,
    // how much is being swapped in this step
    amount_in: U256,
    // how much is being swapped out
    amount_out: U256,
    // how much fee is being paid in
    fee_amount: U256,
}

impl<P: TickDataProvider> Pool<P> {
    /// Executes a Uniswap V3‑style swap against the in‑memory pool state
    /// using the provided `SwapParams`, without modifying the pool.
    ///
    /// Fails with [`SwapError::PriceLimitTooHigh`] or
    /// [`SwapError::PriceLimitTooLow`] unless the limit lies strictly
    /// between the current price and the bound in the swap direction, and
    /// with [`SwapError::TickCrossingLimitExceeded`] once more initialized
    /// ticks are crossed than `EngineConfig::max_crossed_ticks` allows.
    /// A zero `amount_specified` returns the current state unchanged.
    pub fn swap(&self, params: SwapParams) -> Result<SwapResult, Error> {
        let zero_for_one = params.zero_for_one;
        let amount_specified = params.amount_specified;
        let sqrt_price_limit_x96 = params.resolved_limit();

        if zero_for_one {
            if sqrt_price_limit_x96 >= self.slot0.sqrt_price_x96 {
                return Err(SwapError::PriceLimitTooHigh.into());
            }
            if sqrt_price_limit_x96 <= MIN_SQRT_RATIO {
                return Err(SwapError::PriceLimitTooLow.into());
            }
        } else {
            if sqrt_price_limit_x96 <= self.slot0.sqrt_price_x96 {
                return Err(SwapError::PriceLimitTooLow.into());
            }
            if sqrt_price_limit_x96 >= MAX_SQRT_RATIO {
                return Err(SwapError::PriceLimitTooHigh.into());
            }
        }

        let exact_input = params.is_exact_input();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
            ..Default::default()
        };
        let mut steps = Vec::new();

        while !state.amount_specified_remaining.is_zero()
            && state.sqrt_price_x96 != sqrt_price_limit_x96
        {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..Default::default()
            };

            (step.tick_next, step.initialized) = self
                .ticks
                .next_initialized_tick(state.tick, zero_for_one)?
                .clamped();

            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            let target = if zero_for_one {
                step.sqrt_price_next_x96.max(sqrt_price_limit_x96)
            } else {
                step.sqrt_price_next_x96.min(sqrt_price_limit_x96)
            };

            (
                state.sqrt_price_x96,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price_x96,
                target,
                state.liquidity,
                state.amount_specified_remaining,
                self.fee_pips,
            )?;

            trace!(
                tick = state.tick,
                tick_next = step.tick_next,
                initialized = step.initialized,
                sqrt_price = %state.sqrt_price_x96,
                amount_in = %step.amount_in,
                amount_out = %step.amount_out,
                fee = %step.fee_amount,
                "swap step"
            );

            if self.config.record_steps {
                steps.push(StepFee {
                    tick: state.tick,
                    amount_in: step.amount_in,
                    fee_amount: step.fee_amount,
                    liquidity: state.liquidity,
                });
            }

            state.swap_fee = state
                .swap_fee
                .checked_add(step.fee_amount)
                .ok_or(MathError::Overflow)?;

            let amount_in_plus_fee = to_int256(
                step.amount_in
                    .checked_add(step.fee_amount)
                    .ok_or(MathError::Overflow)?,
            )?;
            let amount_out = to_int256(step.amount_out)?;

            if exact_input {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_sub(amount_in_plus_fee)
                    .ok_or(MathError::Underflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_sub(amount_out)
                    .ok_or(MathError::Underflow)?;
            } else {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_add(amount_out)
                    .ok_or(MathError::Overflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_add(amount_in_plus_fee)
                    .ok_or(MathError::Overflow)?;
            }

            if state.sqrt_price_x96 == step.sqrt_price_next_x96 {
                if step.initialized {
                    let mut liquidity_net = self.get_liquidity_net(step.tick_next)?;
                    // moving leftward, the net applies with the opposite sign
                    if zero_for_one {
                        liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;

                    state.crossed_ticks += 1;
                    if let Some(limit) = self.config.max_crossed_ticks {
                        if state.crossed_ticks > limit {
                            warn!(limit, tick = step.tick_next, "tick crossing limit exceeded");
                            return Err(SwapError::TickCrossingLimitExceeded { limit }.into());
                        }
                    }
                }
                state.tick = if zero_for_one {
                    step.tick_next - 1
                } else {
                    step.tick_next
                };
            } else if state.sqrt_price_x96 != step.sqrt_price_start_x96 {
                // recompute unless we're on a lower tick boundary and haven't moved
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        let amount_used = amount_specified
            .checked_sub(state.amount_specified_remaining)
            .ok_or(MathError::Underflow)?;
        let (amount0, amount1) = if zero_for_one == exact_input {
            (amount_used, state.amount_calculated)
        } else {
            (state.amount_calculated, amount_used)
        };

        debug!(
            zero_for_one,
            exact_input,
            amount_calculated = %state.amount_calculated,
            amount_remaining = %state.amount_specified_remaining,
            sqrt_price = %state.sqrt_price_x96,
            tick = state.tick,
            liquidity = state.liquidity,
            crossed_ticks = state.crossed_ticks,
            steps = steps.len(),
            "swap simulated"
        );

        Ok(SwapResult {
            amount_calculated: state.amount_calculated,
            amount_remaining: state.amount_specified_remaining,
            sqrt_price_x96: state.sqrt_price_x96,
            tick: state.tick,
            liquidity: state.liquidity,
            crossed_ticks: state.crossed_ticks,
            amount0,
            amount1,
            fees_paid: state.swap_fee,
            steps,
        })
    }

    /// Runs [`Self::swap`] and, if it succeeds, moves the pool to the
    /// resulting price, tick and liquidity.
    pub fn apply_swap(&mut self, params: SwapParams) -> Result<SwapResult, Error> {
        let result = self.swap(params)?;
        self.slot0 = Slot0 {
            sqrt_price_x96: result.sqrt_price_x96,
            tick: result.tick,
        };
        self.liquidity = result.liquidity;
        Ok(result)
    }

    /// Output obtained for exactly `amount_in` of the input token.
    pub fn quote_exact_input(
        &self,
        amount_in: U256,
        zero_for_one: bool,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<Quote, Error> {
        let result = self.swap(SwapParams {
            sqrt_price_limit_x96,
            ..SwapParams::exact_input(zero_for_one, amount_in)?
        })?;

        Ok(Quote {
            amount: result.amount_calculated.unsigned_abs(),
            amount_remaining: to_uint256(result.amount_remaining)?,
            sqrt_price_x96_after: result.sqrt_price_x96,
            tick_after: result.tick,
            crossed_ticks: result.crossed_ticks,
        })
    }

    /// Input (fees included) required to receive exactly `amount_out` of the
    /// output token.
    pub fn quote_exact_output(
        &self,
        amount_out: U256,
        zero_for_one: bool,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<Quote, Error> {
        let result = self.swap(SwapParams {
            sqrt_price_limit_x96,
            ..SwapParams::exact_output(zero_for_one, amount_out)?
        })?;

        Ok(Quote {
            amount: to_uint256(result.amount_calculated)?,
            amount_remaining: result.amount_remaining.unsigned_abs(),
            sqrt_price_x96_after: result.sqrt_price_x96,
            tick_after: result.tick,
            crossed_ticks: result.crossed_ticks,
        })
    }

    /// Returns the input amount, fees included, that a swap in the given
    /// direction consumes before it reaches the default price limit, i.e.
    /// the most the pool can absorb without running out of liquidity.
    ///
    /// This is useful for algorithms that require an upper bound on swap
    /// size (e.g., binary search for optimal input).
    ///
    /// Steps are taken exactly as in [`Self::swap`] and each step's fee is
    /// rounded up the same way, so an exact-input swap of the returned
    /// amount leaves nothing unspent. Saturates at `U256::MAX`.
    pub fn max_input_amount(&self, zero_for_one: bool) -> Result<U256, Error> {
        let sqrt_price_limit_x96 = if zero_for_one {
            MIN_SQRT_PRICE_LIMIT
        } else {
            MAX_SQRT_PRICE_LIMIT
        };
        let mut state = SwapState {
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
            ..Default::default()
        };

        let mut max_token_amount = U256::ZERO;
        let fee_pips = U256::from(self.fee_pips);

        while state.sqrt_price_x96 != sqrt_price_limit_x96 {
            let mut step = StepComputations::default();

            (step.tick_next, step.initialized) = self
                .ticks
                .next_initialized_tick(state.tick, zero_for_one)?
                .clamped();

            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            let target = if zero_for_one {
                step.sqrt_price_next_x96.max(sqrt_price_limit_x96)
            } else {
                step.sqrt_price_next_x96.min(sqrt_price_limit_x96)
            };

            // empty ranges are walked through, liquidity may resume past them
            if state.liquidity != 0 {
                step.amount_in = if zero_for_one {
                    get_amount_0_delta(target, state.sqrt_price_x96, state.liquidity, true)?
                } else {
                    get_amount_1_delta(state.sqrt_price_x96, target, state.liquidity, true)?
                };
                step.fee_amount =
                    mul_div_rounding_up(step.amount_in, fee_pips, U256_E6.saturating_sub(fee_pips))
                        .unwrap_or(U256::MAX);
                max_token_amount = max_token_amount
                    .saturating_add(step.amount_in)
                    .saturating_add(step.fee_amount);
            }

            state.sqrt_price_x96 = target;

            if target == step.sqrt_price_next_x96 {
                if step.initialized {
                    let mut liquidity_net = self.get_liquidity_net(step.tick_next)?;
                    if zero_for_one {
                        liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                }
                state.tick = if zero_for_one {
                    step.tick_next - 1
                } else {
                    step.tick_next
                };
            }
        }

        Ok(max_token_amount)
    }
}
