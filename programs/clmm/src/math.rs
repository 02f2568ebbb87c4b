/// Fixed-point price math for the CLMM core.
///
/// This module implements the conversions between tick indices and Q64.96
/// square-root prices, the token-amount formulas for a liquidity range, and
/// the exact-input swap step. All arithmetic is integer fixed point; U256 is
/// used for intermediate products that can exceed a u128, and every narrowing
/// is checked.
use crate::constants::*;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Narrows a U256 intermediate back to u128, failing with `MathOverflow`
/// instead of truncating.
#[inline(always)]
fn u256_to_u128(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return err!(ErrorCode::MathOverflow);
    }
    Ok(value.as_u128())
}

/// Narrows a u128 token amount to the u64 the token program works in.
#[inline(always)]
pub(crate) fn to_token_amount(amount: u128) -> Result<u64> {
    amount
        .try_into()
        .map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Converts a tick index to its sqrt price in Q64.96.
///
/// Computes `sqrt(1.0001)^tick * 2^96` by decomposing `|tick|` into bits and
/// multiplying the precomputed `sqrt(1.0001)^(-2^k)` factors selected by the
/// set bits; positive ticks take the reciprocal of the product. The result is
/// monotonically increasing in `tick`.
///
/// # Arguments
/// * `tick` - The tick index, in `[MIN_TICK, MAX_TICK]`.
///
/// # Returns
/// * `Result<u128>` - The sqrt price in Q64.96 format.
pub fn tick_to_sqrt_price_x96(tick: i32) -> Result<u128> {
    let abs_tick = tick.unsigned_abs();
    require!(abs_tick <= MAX_TICK as u32, ErrorCode::TickOutOfBounds);

    // Product of the selected factors, in Q64.64. Each factor is below 2^64
    // and the running ratio never exceeds 2^64, so the product fits a u128.
    let mut ratio_x64: u128 = 1u128 << 64;
    for (bit, factor) in SQRT_PRICE_FACTORS_X64.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            ratio_x64 = (ratio_x64 * factor) >> 64;
        }
    }

    if tick > 0 {
        ratio_x64 = u128::MAX / ratio_x64;
    }

    Ok(ratio_x64 << 32)
}

/// Converts a Q64.96 sqrt price to the tick whose price interval contains it.
///
/// Uses a fixed-point base-2 logarithm (16 fractional bits) divided by
/// `log2(sqrt(1.0001))`, then corrects the approximation against
/// `tick_to_sqrt_price_x96` so the result is the greatest tick whose price
/// does not exceed the input (floor semantics):
/// `tick_to_sqrt_price_x96(sqrt_price_x96_to_tick(p)) <= p`.
///
/// # Arguments
/// * `sqrt_price_x96` - A sqrt price in `[MIN_SQRT_PRICE_X96, MAX_SQRT_PRICE_X96)`.
///
/// # Returns
/// * `Result<i32>` - The floor tick index.
pub fn sqrt_price_x96_to_tick(sqrt_price_x96: u128) -> Result<i32> {
    require!(
        sqrt_price_x96 >= MIN_SQRT_PRICE_X96 && sqrt_price_x96 < MAX_SQRT_PRICE_X96,
        ErrorCode::SqrtPriceOutOfRange
    );

    let sqrt_price_x64 = sqrt_price_x96 >> 32;

    // Integer part of log2, relative to the Q64.64 one.
    let msb: u32 = 127 - sqrt_price_x64.leading_zeros();
    let log2_integer_x64: i128 = ((msb as i128) - 64) << 64;

    // Normalize into [1, 2) with 63 fractional bits, then square out the
    // fractional log2 bits one at a time.
    let mut r: u128 = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    let mut log2_fraction_x64: i128 = 0;
    let mut bit: i128 = 1i128 << 63;
    for _ in 0..LOG2_BIT_PRECISION {
        r = (r * r) >> 63;
        let overflowed = (r >> 64) as u32;
        r >>= overflowed;
        log2_fraction_x64 |= bit * overflowed as i128;
        bit >>= 1;
    }

    let log2_x64 = log2_integer_x64 + log2_fraction_x64;
    let tick_approx = (log2_x64 / LOG2_TICK_BASE_X64) as i32;

    // The truncated logarithm lands within two ticks below and one above the
    // exact answer; pick the greatest candidate whose price is <= the input.
    let mut tick = (tick_approx.saturating_sub(2)).clamp(MIN_TICK, MAX_TICK);
    for candidate in [tick_approx - 1, tick_approx, tick_approx + 1] {
        let candidate = candidate.clamp(MIN_TICK, MAX_TICK);
        if tick_to_sqrt_price_x96(candidate)? <= sqrt_price_x96 {
            tick = tick.max(candidate);
        }
    }

    Ok(tick)
}

/// Amount of token0 held across a sqrt-price range at the given liquidity.
///
/// Formula: `amount0 = L * (1/sqrt_P_lower - 1/sqrt_P_upper)`, evaluated as
/// `floor(L * Q96 / lower) - floor(L * Q96 / upper)`, the same reciprocal
/// form the swap step uses for its token0 side.
pub fn get_amount_0_delta(
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    liquidity: u128,
) -> Result<u128> {
    require!(
        sqrt_price_lower_x96 > 0 && sqrt_price_lower_x96 <= sqrt_price_upper_x96,
        ErrorCode::SqrtPriceOutOfRange
    );

    let liquidity_x96 = U256::from(liquidity) << 96;
    let inv_lower = liquidity_x96 / U256::from(sqrt_price_lower_x96);
    let inv_upper = liquidity_x96 / U256::from(sqrt_price_upper_x96);
    u256_to_u128(inv_lower - inv_upper)
}

/// Amount of token1 held across a sqrt-price range at the given liquidity.
///
/// Formula: `amount1 = L * (sqrt_P_upper - sqrt_P_lower) / Q96`, floor
/// rounding.
pub fn get_amount_1_delta(
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    liquidity: u128,
) -> Result<u128> {
    require!(
        sqrt_price_lower_x96 <= sqrt_price_upper_x96,
        ErrorCode::SqrtPriceOutOfRange
    );

    let diff = sqrt_price_upper_x96 - sqrt_price_lower_x96;
    let amount = U256::from(liquidity)
        .checked_mul(U256::from(diff))
        .ok_or(ErrorCode::MathOverflow)?
        >> 96;
    u256_to_u128(amount)
}

/// Token amounts owed for `liquidity` committed to `[lower, upper)` at the
/// current price.
///
/// Three cases: current price below the range holds token0 only, above the
/// range holds token1 only, inside the range holds both (token0 from the
/// current price up to the upper bound, token1 from the lower bound up to
/// the current price).
///
/// # Returns
/// * `Result<(u64, u64)>` - `(amount_0, amount_1)` in token units.
pub fn get_amounts_for_liquidity(
    sqrt_price_current_x96: u128,
    sqrt_price_lower_x96: u128,
    sqrt_price_upper_x96: u128,
    liquidity: u128,
) -> Result<(u64, u64)> {
    let (amount_0, amount_1) = if sqrt_price_current_x96 <= sqrt_price_lower_x96 {
        (
            get_amount_0_delta(sqrt_price_lower_x96, sqrt_price_upper_x96, liquidity)?,
            0,
        )
    } else if sqrt_price_current_x96 >= sqrt_price_upper_x96 {
        (
            0,
            get_amount_1_delta(sqrt_price_lower_x96, sqrt_price_upper_x96, liquidity)?,
        )
    } else {
        (
            get_amount_0_delta(sqrt_price_current_x96, sqrt_price_upper_x96, liquidity)?,
            get_amount_1_delta(sqrt_price_lower_x96, sqrt_price_current_x96, liquidity)?,
        )
    };

    Ok((to_token_amount(amount_0)?, to_token_amount(amount_1)?))
}

/// Computes one exact-input swap step against constant liquidity.
///
/// Given the current and target sqrt prices, the active liquidity and the
/// input amount still to be filled, returns the price after the step, the
/// input consumed and the output produced. The price never moves past
/// `target`: if the remaining input cannot reach it, the step is partial and
/// consumes the whole remainder.
///
/// When swapping token0 for token1 the price falls and the math works in the
/// reciprocal form `L * Q96 / sqrt_P` to preserve precision; the opposite
/// direction works directly on sqrt-price differences.
///
/// # Arguments
/// * `sqrt_price_current_x96` - The price the step starts from.
/// * `sqrt_price_target_x96` - The boundary price the step may not pass.
/// * `liquidity` - Active liquidity for the step; must be nonzero.
/// * `amount_remaining` - Input amount still to be filled.
/// * `zero_for_one` - True when selling token0 (price moves down).
///
/// # Returns
/// * `Result<(u128, u128, u128)>` - `(next_sqrt_price_x96, amount_in, amount_out)`.
pub fn compute_swap_step(
    sqrt_price_current_x96: u128,
    sqrt_price_target_x96: u128,
    liquidity: u128,
    amount_remaining: u128,
    zero_for_one: bool,
) -> Result<(u128, u128, u128)> {
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    let liquidity_x96 = U256::from(liquidity) << 96;

    if zero_for_one {
        require!(
            sqrt_price_target_x96 <= sqrt_price_current_x96 && sqrt_price_target_x96 > 0,
            ErrorCode::SqrtPriceOutOfRange
        );

        // required_in = L * (1/sqrt_P_target - 1/sqrt_P_current)
        let inv_target = liquidity_x96 / U256::from(sqrt_price_target_x96);
        let inv_current = liquidity_x96 / U256::from(sqrt_price_current_x96);
        let required_in = u256_to_u128(inv_target - inv_current)?;

        let (next_sqrt_price_x96, amount_in) = if amount_remaining >= required_in {
            (sqrt_price_target_x96, required_in)
        } else {
            // Partial step: 1/sqrt_P_next = 1/sqrt_P_current + amount / (L * Q96)
            let denominator = inv_current + U256::from(amount_remaining);
            (u256_to_u128(liquidity_x96 / denominator)?, amount_remaining)
        };

        // amount_out = L * (sqrt_P_current - sqrt_P_next) / Q96
        let amount_out = u256_to_u128(
            U256::from(liquidity) * U256::from(sqrt_price_current_x96 - next_sqrt_price_x96) >> 96,
        )?;

        Ok((next_sqrt_price_x96, amount_in, amount_out))
    } else {
        require!(
            sqrt_price_target_x96 >= sqrt_price_current_x96,
            ErrorCode::SqrtPriceOutOfRange
        );

        // required_in = L * (sqrt_P_target - sqrt_P_current) / Q96
        let required_in = u256_to_u128(
            U256::from(liquidity)
                * U256::from(sqrt_price_target_x96 - sqrt_price_current_x96)
                >> 96,
        )?;

        let (next_sqrt_price_x96, amount_in) = if amount_remaining >= required_in {
            (sqrt_price_target_x96, required_in)
        } else {
            // Partial step: sqrt_P_next = sqrt_P_current + amount * Q96 / L
            let delta = u256_to_u128((U256::from(amount_remaining) << 96) / U256::from(liquidity))?;
            (
                sqrt_price_current_x96
                    .checked_add(delta)
                    .ok_or(ErrorCode::MathOverflow)?,
                amount_remaining,
            )
        };

        // amount_out = floor(L * (1/sqrt_P_current - 1/sqrt_P_next)). The
        // reciprocals are kept with their remainders and the difference is
        // floored as a whole, never rounding in the taker's favor.
        let (inv_current, rem_current) = liquidity_x96.div_mod(U256::from(sqrt_price_current_x96));
        let (inv_next, rem_next) = liquidity_x96.div_mod(U256::from(next_sqrt_price_x96));
        let floored = inv_current - inv_next;
        let amount_out = if rem_current * U256::from(next_sqrt_price_x96)
            < rem_next * U256::from(sqrt_price_current_x96)
        {
            floored - U256::one()
        } else {
            floored
        };

        Ok((next_sqrt_price_x96, amount_in, u256_to_u128(amount_out)?))
    }
}
