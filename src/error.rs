use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
    #[error("Math error - value exceeds representable range")]
    ExceedsRange,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("State error - sqrt ratio outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)")]
    InvalidSqrtRatio,
    #[error("State error - tick out of bounds")]
    TickOutOfBounds,
    #[error("State error - sqrtPrice is 0")]
    InvalidPrice,
    #[error("State error - liquidity is 0")]
    InvalidLiquidity,
    /// The requested output is at or beyond the virtual reserves.
    #[error("State error - price invariant violated")]
    Invariant,
    #[error("State error - sqrtPrice does not belong to the current tick")]
    InvalidSqrtRatioForTick,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    #[error("Tick error - tick {0} not found")]
    NotFound(i32),
    #[error("Tick error - tick {tick} is not a multiple of spacing {spacing}")]
    TickMisaligned { tick: i32, spacing: i32 },
    #[error("Tick error - tick {0} out of bounds")]
    TickOutOfBounds(i32),
    #[error("Tick error - invalid range [{lower}, {upper})")]
    InvalidRange { lower: i32, upper: i32 },
    #[error("Tick error - ticks are not strictly sorted")]
    NotSorted,
    #[error("Tick error - liquidity net does not sum to zero")]
    ZeroNet,
    #[error("Tick error - tick {0} carries no liquidity")]
    EmptyRecord(i32),
    #[error("Tick error - invalid tick spacing {0}")]
    InvalidTickSpacing(i32),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    #[error("Swap error - sqrt price limit too low")]
    PriceLimitTooLow,
    #[error("Swap error - sqrt price limit too high")]
    PriceLimitTooHigh,
    #[error("Swap error - fee {0} pips must be below 1000000")]
    FeeTooHigh(u32),
    #[error("Swap error - crossed more than {limit} initialized ticks")]
    TickCrossingLimitExceeded { limit: u32 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    TickError(#[from] crate::error::TickError),

    #[error(transparent)]
    SwapError(#[from] crate::error::SwapError),
}

/// Configuration loading failures. Kept apart from [`Error`] since it wraps
/// a non-`Copy` parser error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error - {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config error - io: {0}")]
    Io(#[from] std::io::Error),
}
