#![allow(dead_code)]

use clmm_swap_engine::math::bit_math::{least_significant_bit, most_significant_bit};
use clmm_swap_engine::math::full_math::{mul_div, mul_div_rounding_up};
use clmm_swap_engine::math::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use clmm_swap_engine::math::swap_math::compute_swap_step;
use clmm_swap_engine::math::tick_bitmap::{flip_tick, next_initialized_tick_within_one_word};
use clmm_swap_engine::math::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use clmm_swap_engine::pool::swap::SwapParams;
use clmm_swap_engine::{FastMap, I256, Pool, Q96, Tick, TickLedger, U256};
use criterion::Criterion;
use std::hint::black_box;

const LIQUIDITY: u128 = 100_000_000_000_000_000_000;

pub fn bench_tick_math(c: &mut Criterion) {
    c.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| get_sqrt_ratio_at_tick(black_box(-224701)))
    });

    let price = U256::from(1046706758115479018135889u128);
    c.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| get_tick_at_sqrt_ratio(black_box(price)))
    });
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let lower = get_sqrt_ratio_at_tick(-60).unwrap();
    let upper = get_sqrt_ratio_at_tick(60).unwrap();

    c.bench_function("get_amount_0_delta", |b| {
        b.iter(|| get_amount_0_delta(black_box(lower), black_box(upper), LIQUIDITY, true))
    });
    c.bench_function("get_amount_1_delta", |b| {
        b.iter(|| get_amount_1_delta(black_box(lower), black_box(upper), LIQUIDITY, true))
    });

    let amount = U256::from(1_000_000_000_000_000u64);
    c.bench_function("get_next_sqrt_price_from_input", |b| {
        b.iter(|| get_next_sqrt_price_from_input(black_box(Q96), LIQUIDITY, black_box(amount), true))
    });
    c.bench_function("get_next_sqrt_price_from_output", |b| {
        b.iter(|| {
            get_next_sqrt_price_from_output(black_box(Q96), LIQUIDITY, black_box(amount), false)
        })
    });
}

pub fn bench_swap_math(c: &mut Criterion) {
    let target = get_sqrt_ratio_at_tick(-10).unwrap();
    let amount = I256::try_from(10_000_000_000_000_000i128).unwrap();

    c.bench_function("compute_swap_step", |b| {
        b.iter(|| compute_swap_step(black_box(Q96), black_box(target), LIQUIDITY, amount, 3000))
    });
}

pub fn bench_full_math(c: &mut Criterion) {
    let a = U256::MAX / U256::from(3u8);
    let d = U256::MAX / U256::from(7u8);

    c.bench_function("mul_div", |b| {
        b.iter(|| mul_div(black_box(a), black_box(Q96), black_box(d)))
    });
    c.bench_function("mul_div_rounding_up", |b| {
        b.iter(|| mul_div_rounding_up(black_box(a), black_box(Q96), black_box(d)))
    });
}

pub fn bench_tick_bitmap(c: &mut Criterion) {
    let mut bitmap = FastMap::default();
    for tick in [-224760, -224700, -223200, 887220] {
        flip_tick(&mut bitmap, tick, 60).unwrap();
    }

    c.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| next_initialized_tick_within_one_word(&bitmap, black_box(-224701), 60, false))
    });
}

pub fn bench_bit_math(c: &mut Criterion) {
    let x = U256::from(1u8) << 133;
    c.bench_function("most_significant_bit", |b| {
        b.iter(|| most_significant_bit(black_box(x)))
    });
    c.bench_function("least_significant_bit", |b| {
        b.iter(|| least_significant_bit(black_box(x)))
    });
}

/// Pool at tick 0 with `ranges` stacked positions of spacing 60.
pub fn dense_pool(ranges: i32) -> Pool {
    let mut ledger = TickLedger::new(60).unwrap();
    for i in 1..=ranges {
        ledger.apply_mint(-60 * i, 60 * i, LIQUIDITY).unwrap();
    }
    let liquidity = LIQUIDITY * ranges as u128;
    Pool::new(
        clmm_swap_engine::Address::with_last_byte(1),
        clmm_swap_engine::Address::with_last_byte(2),
        3000,
        Q96,
        liquidity,
        0,
        ledger,
    )
    .unwrap()
}

pub fn bench_swap(c: &mut Criterion) {
    let single = Pool::new(
        clmm_swap_engine::Address::with_last_byte(1),
        clmm_swap_engine::Address::with_last_byte(2),
        3000,
        Q96,
        LIQUIDITY,
        0,
        TickLedger::from_ticks(
            vec![
                Tick::new(-10, LIQUIDITY, LIQUIDITY as i128),
                Tick::new(10, LIQUIDITY, -(LIQUIDITY as i128)),
            ],
            1,
        )
        .unwrap(),
    )
    .unwrap();
    let small = SwapParams::exact_input(true, U256::from(10_000_000_000_000_000u64)).unwrap();
    c.bench_function("swap_within_range", |b| {
        b.iter(|| single.swap(black_box(small)))
    });

    let dense = dense_pool(100);
    let large = SwapParams::exact_input(true, U256::from(u128::MAX)).unwrap();
    c.bench_function("swap_crossing_100_ticks", |b| {
        b.iter(|| dense.swap(black_box(large)))
    });

    c.bench_function("max_input_amount", |b| {
        b.iter(|| dense.max_input_amount(black_box(false)))
    });
}
