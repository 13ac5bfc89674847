use crate::math::full_math::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::math::int_types::{to_int256, to_uint160};
use crate::{
    Q96, RESOLUTION, U160_MAX,
    error::{Error, MathError, StateError},
};
use alloy_primitives::{I256, U256};

fn check_state(sqrt_p_x96: U256, liquidity: u128) -> Result<(), StateError> {
    if sqrt_p_x96.is_zero() {
        return Err(StateError::InvalidPrice);
    }
    if liquidity == 0 {
        return Err(StateError::InvalidLiquidity);
    }
    Ok(())
}

/// Next sqrt price after adding (`add = true`) or removing `amount` of token0,
/// always rounded up so the pool never undercharges.
///
/// Solves `L * p / (L + amount * p)` (add) or `L * p / (L - amount * p)`
/// (remove). The fast path multiplies in 256 bits and re-derives the factor
/// to detect a silent wrap; on wrap the add path falls back to the
/// algebraically equal `L / (L / p + amount)`.
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    check_state(sqrt_p_x96, liquidity)?;
    if amount.is_zero() {
        return Ok(sqrt_p_x96);
    }

    let numerator1: U256 = U256::from(liquidity) << RESOLUTION;
    let product: U256 = amount.wrapping_mul(sqrt_p_x96);
    let product_exact = product / amount == sqrt_p_x96;

    if add {
        if product_exact {
            let denominator = numerator1.wrapping_add(product);
            if denominator >= numerator1 {
                return Ok(mul_div_rounding_up(numerator1, sqrt_p_x96, denominator)?);
            }
        }
        let denominator = (numerator1 / sqrt_p_x96)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        Ok(div_rounding_up(numerator1, denominator)?)
    } else {
        // the output must stay strictly below the virtual token0 reserves
        if !product_exact || numerator1 <= product {
            return Err(StateError::Invariant.into());
        }
        let denominator = numerator1 - product;
        Ok(to_uint160(mul_div_rounding_up(
            numerator1,
            sqrt_p_x96,
            denominator,
        )?)?)
    }
}

/// Next sqrt price after adding or removing `amount` of token1, rounded
/// down so the pool never undercharges.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    check_state(sqrt_p_x96, liquidity)?;
    let liquidity = U256::from(liquidity);
    if add {
        let quotient: U256 = if amount <= U160_MAX {
            (amount << RESOLUTION) / liquidity
        } else {
            mul_div(amount, Q96, liquidity)?
        };

        let next = sqrt_p_x96
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?;
        Ok(to_uint160(next)?)
    } else {
        let quotient: U256 = if amount <= U160_MAX {
            div_rounding_up(amount << RESOLUTION, liquidity)?
        } else {
            mul_div_rounding_up(amount, Q96, liquidity)?
        };

        if sqrt_p_x96 <= quotient {
            return Err(StateError::Invariant.into());
        }
        Ok(sqrt_p_x96 - quotient)
    }
}

/// Amount of token0 between two sqrt prices for `liquidity`:
/// `L * 2^96 * (pB - pA) / (pA * pB)`, order independent.
pub fn get_amount_0_delta(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    if sqrt_ratio_a_x96.is_zero() {
        return Err(StateError::InvalidPrice.into());
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_ratio_b_x96 - sqrt_ratio_a_x96;

    if round_up {
        Ok(div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_b_x96)?,
            sqrt_ratio_a_x96,
        )?)
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_b_x96)? / sqrt_ratio_a_x96)
    }
}

/// Amount of token1 between two sqrt prices for `liquidity`:
/// `L * (pB - pA) / 2^96`.
pub fn get_amount_1_delta(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    }
}

/// Signed token0 delta for a signed liquidity change: owed amounts
/// (positive liquidity) round up, returned amounts round down.
pub fn get_amount_0_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, Error> {
    let magnitude = liquidity.unsigned_abs();
    if liquidity < 0 {
        let amount = get_amount_0_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, magnitude, false)?;
        Ok(to_int256(amount)?.wrapping_neg())
    } else {
        let amount = get_amount_0_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, magnitude, true)?;
        Ok(to_int256(amount)?)
    }
}

/// Signed token1 delta for a signed liquidity change.
pub fn get_amount_1_delta_signed(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, MathError> {
    let magnitude = liquidity.unsigned_abs();
    if liquidity < 0 {
        let amount = get_amount_1_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, magnitude, false)?;
        Ok(to_int256(amount)?.wrapping_neg())
    } else {
        let amount = get_amount_1_delta(sqrt_ratio_a_x96, sqrt_ratio_b_x96, magnitude, true)?;
        to_int256(amount)
    }
}

/// Computes the next sqrt price when swapping *into* the pool
/// (`amount_in`), choosing the correct branch for token0/token1
/// depending on `zero_for_one`.
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x96, liquidity, amount_in, true)
    }
}

/// Computes the next sqrt price when swapping *out of* the pool
/// (`amount_out`), choosing the correct branch for token0/token1
/// depending on `zero_for_one`.
pub fn get_next_sqrt_price_from_output(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x96, liquidity, amount_out, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn u(s: &str) -> U256 {
        U256::from_str(s).unwrap()
    }

    const PRICE_1: &str = "79228162514264337593543950336";
    const PRICE_121_100: &str = "87150978765690771352898345369";
    const PRICE_2_POW_104: &str = "20282409603651670423947251286016";

    #[test]
    fn next_price_from_input_rejects_bad_state() {
        let result = get_next_sqrt_price_from_input(U256::ZERO, 0, u("100000000000000000"), false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InvalidPrice))
        ));

        let result = get_next_sqrt_price_from_input(U256::ONE, 0, u("100000000000000000"), true);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InvalidLiquidity))
        ));
    }

    #[test]
    fn next_price_helpers_reject_zero_liquidity() {
        for add in [true, false] {
            assert!(matches!(
                get_next_sqrt_price_from_amount_1_rounding_down(u(PRICE_1), 0, U256::ONE, add),
                Err(Error::StateError(StateError::InvalidLiquidity))
            ));
            assert!(matches!(
                get_next_sqrt_price_from_amount_0_rounding_up(U256::ZERO, 0, U256::ONE, add),
                Err(Error::StateError(StateError::InvalidPrice))
            ));
        }
    }

    #[test]
    fn next_price_from_input_overflowing_price_fails() {
        let result = get_next_sqrt_price_from_input(U160_MAX, 1024, U256::from(1024), false);
        assert!(matches!(result, Err(Error::MathError(MathError::Overflow))));
    }

    #[test]
    fn next_price_from_input_cannot_underflow() {
        let result = get_next_sqrt_price_from_input(U256::ONE, 1, U256::ONE << 255, true);
        assert_eq!(result.unwrap(), U256::ONE);
    }

    #[test]
    fn next_price_from_input_zero_amount_is_identity() {
        for zero_for_one in [true, false] {
            let result =
                get_next_sqrt_price_from_input(u(PRICE_1), 1e17 as u128, U256::ZERO, zero_for_one);
            assert_eq!(result.unwrap(), u(PRICE_1));
        }
    }

    #[test]
    fn next_price_from_input_max_amount_hits_minimum_price() {
        let sqrt_price = U160_MAX;
        let liquidity = u128::MAX;
        let max_amount_no_overflow = U256::MAX - ((U256::from(liquidity) << 96) / sqrt_price);
        let result =
            get_next_sqrt_price_from_input(sqrt_price, liquidity, max_amount_no_overflow, true);
        assert_eq!(result.unwrap(), U256::ONE);
    }

    #[test]
    fn next_price_from_input_vectors() {
        // 0.1 token1 in
        let result =
            get_next_sqrt_price_from_input(u(PRICE_1), 1e18 as u128, u("100000000000000000"), false);
        assert_eq!(result.unwrap(), u(PRICE_121_100));

        // 0.1 token0 in
        let result =
            get_next_sqrt_price_from_input(u(PRICE_1), 1e18 as u128, u("100000000000000000"), true);
        assert_eq!(result.unwrap(), u("72025602285694852357767227579"));

        // amountIn > type(uint96).max
        let result = get_next_sqrt_price_from_input(
            u(PRICE_1),
            1e19 as u128,
            u("1267650600228229401496703205376"),
            true,
        );
        assert_eq!(result.unwrap(), u("624999999995069620"));

        // enough token0 drives the price to 1
        let result = get_next_sqrt_price_from_input(u(PRICE_1), 1, U256::MAX / U256::from(2u8), true);
        assert_eq!(result.unwrap(), U256::ONE);
    }

    #[test]
    fn next_price_from_output_rejects_bad_state() {
        let result = get_next_sqrt_price_from_output(U256::ZERO, 0, U256::from(1000000000), false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InvalidPrice))
        ));

        let result = get_next_sqrt_price_from_output(U256::ONE, 0, U256::from(1000000000), false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InvalidLiquidity))
        ));
    }

    #[test]
    fn next_price_from_output_at_or_beyond_reserves_fails() {
        // token0 reserves are exactly 4, token1 reserves exactly 262144
        for (amount, zero_for_one) in [(4u64, false), (5, false), (262144, true), (262145, true)] {
            let result = get_next_sqrt_price_from_output(
                u(PRICE_2_POW_104),
                1024,
                U256::from(amount),
                zero_for_one,
            );
            assert!(
                matches!(result, Err(Error::StateError(StateError::Invariant))),
                "amount {amount} zero_for_one {zero_for_one}"
            );
        }
    }

    #[test]
    fn next_price_from_output_just_below_reserves() {
        let result =
            get_next_sqrt_price_from_output(u(PRICE_2_POW_104), 1024, U256::from(262143), true);
        assert_eq!(result.unwrap(), u("77371252455336267181195264"));
    }

    #[test]
    fn next_price_from_output_vectors() {
        for zero_for_one in [true, false] {
            let result =
                get_next_sqrt_price_from_output(u(PRICE_1), 1e17 as u128, U256::ZERO, zero_for_one);
            assert_eq!(result.unwrap(), u(PRICE_1));
        }

        // 0.1 token0 out
        let result = get_next_sqrt_price_from_output(
            u(PRICE_1),
            1e18 as u128,
            U256::from(1e17 as u128),
            false,
        );
        assert_eq!(result.unwrap(), u("88031291682515930659493278152"));

        // 0.1 token1 out
        let result = get_next_sqrt_price_from_output(
            u(PRICE_1),
            1e18 as u128,
            U256::from(1e17 as u128),
            true,
        );
        assert_eq!(result.unwrap(), u("71305346262837903834189555302"));
    }

    #[test]
    fn next_price_from_output_impossible_amounts() {
        let result = get_next_sqrt_price_from_output(u(PRICE_1), 1, U256::MAX, true);
        assert!(matches!(result, Err(Error::MathError(MathError::Overflow))));

        let result = get_next_sqrt_price_from_output(u(PRICE_1), 1, U256::MAX, false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::Invariant))
        ));
    }

    #[test]
    fn amount_0_delta_values() {
        assert_eq!(
            get_amount_0_delta(u(PRICE_1), u(PRICE_1), 0, true).unwrap(),
            U256::ZERO
        );
        assert_eq!(
            get_amount_0_delta(u(PRICE_1), u(PRICE_121_100), 0, true).unwrap(),
            U256::ZERO
        );

        let up = get_amount_0_delta(u(PRICE_1), u(PRICE_121_100), 1e18 as u128, true).unwrap();
        assert_eq!(up, u("90909090909090910"));
        let down = get_amount_0_delta(u(PRICE_1), u(PRICE_121_100), 1e18 as u128, false).unwrap();
        assert_eq!(down, up - U256::ONE);

        // argument order does not matter
        let swapped = get_amount_0_delta(u(PRICE_121_100), u(PRICE_1), 1e18 as u128, true).unwrap();
        assert_eq!(swapped, up);
    }

    #[test]
    fn amount_0_delta_for_prices_that_overflow() {
        let a = u("2787593149816327892691964784081045188247552");
        let b = u("22300745198530623141535718272648361505980416");
        let up = get_amount_0_delta(a, b, 1e18 as u128, true).unwrap();
        let down = get_amount_0_delta(a, b, 1e18 as u128, false).unwrap();
        assert_eq!(up, down + U256::ONE);
    }

    #[test]
    fn amount_0_delta_rejects_zero_price() {
        let result = get_amount_0_delta(U256::ZERO, u(PRICE_1), 1, true);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::InvalidPrice))
        ));
    }

    #[test]
    fn amount_1_delta_values() {
        assert_eq!(
            get_amount_1_delta(u(PRICE_1), u(PRICE_121_100), 0, true).unwrap(),
            U256::ZERO
        );

        let up = get_amount_1_delta(u(PRICE_1), u(PRICE_121_100), 1e18 as u128, true).unwrap();
        assert_eq!(up, u("100000000000000000"));
        let down = get_amount_1_delta(u(PRICE_1), u(PRICE_121_100), 1e18 as u128, false).unwrap();
        assert_eq!(down, up - U256::ONE);
    }

    #[test]
    fn signed_deltas_follow_liquidity_sign() {
        let owed = get_amount_1_delta_signed(u(PRICE_1), u(PRICE_121_100), 1e18 as i128).unwrap();
        assert_eq!(owed, I256::from_raw(u("100000000000000000")));

        let returned =
            get_amount_1_delta_signed(u(PRICE_1), u(PRICE_121_100), -(1e18 as i128)).unwrap();
        assert_eq!(returned, -I256::from_raw(u("99999999999999999")));

        let owed = get_amount_0_delta_signed(u(PRICE_1), u(PRICE_121_100), 1e18 as i128).unwrap();
        assert_eq!(owed, I256::from_raw(u("90909090909090910")));

        let returned =
            get_amount_0_delta_signed(u(PRICE_1), u(PRICE_121_100), -(1e18 as i128)).unwrap();
        assert_eq!(returned, -I256::from_raw(u("90909090909090909")));
    }

    #[test]
    fn swap_computation_round_trips_input() {
        let sqrt_price = u("1025574284609383690408304870162715216695788925244");
        let liquidity = 50015962439936049619261659728067971248;
        let amount_in = U256::from(406);

        let sqrt_q = get_next_sqrt_price_from_input(sqrt_price, liquidity, amount_in, true).unwrap();
        assert_eq!(
            sqrt_q,
            u("1025574284609383582644711336373707553698163132913")
        );

        let amount_0_delta = get_amount_0_delta(sqrt_q, sqrt_price, liquidity, true).unwrap();
        assert_eq!(amount_0_delta, U256::from(406));
    }
}
