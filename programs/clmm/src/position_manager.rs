/// Shared liquidity bookkeeping for opening, increasing and decreasing
/// positions.
///
/// All three paths funnel through [`apply_liquidity_change`], so the tick
/// updates, the active-liquidity update and the token-amount computation
/// cannot drift apart between instructions.
use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::ErrorCode;
use crate::math;
use crate::state::Pool;
use crate::tick::TickArrayState;
use anchor_lang::prelude::*;

/// Validates a position's tick range against the pool's tick spacing.
///
/// Boundaries must satisfy `lower < upper`, both multiples of the tick
/// spacing, and both inside the supported tick domain.
pub fn validate_tick_range(lower_tick: i32, upper_tick: i32, tick_spacing: i32) -> Result<()> {
    require!(lower_tick < upper_tick, ErrorCode::InvalidTickRange);
    require!(
        lower_tick.rem_euclid(tick_spacing) == 0 && upper_tick.rem_euclid(tick_spacing) == 0,
        ErrorCode::InvalidTickRange
    );
    require!(
        lower_tick >= MIN_TICK && upper_tick <= MAX_TICK,
        ErrorCode::InvalidTickRange
    );
    Ok(())
}

/// Applies a signed liquidity change over `[lower_tick, upper_tick)` to the
/// tick ledger and the pool, and returns the token amounts the change is
/// worth at the current price.
///
/// The boundary ticks are updated with opposite net signs so that crossing
/// them while swapping activates and deactivates exactly this liquidity.
/// When the current tick lies inside the range the pool's active liquidity
/// is adjusted as well.
///
/// `upper_array` is `None` when both boundaries fall in the same page; the
/// upper tick is then resolved through `lower_array`.
///
/// # Returns
/// * `Result<(u64, u64)>` - `(amount_0, amount_1)` owed for (or released by)
///   the change.
pub fn apply_liquidity_change(
    pool: &mut Pool,
    lower_tick: i32,
    upper_tick: i32,
    liquidity_delta: i128,
    lower_array: &mut TickArrayState,
    upper_array: Option<&mut TickArrayState>,
) -> Result<(u64, u64)> {
    validate_tick_range(lower_tick, upper_tick, pool.tick_spacing)?;
    require!(liquidity_delta != 0, ErrorCode::ZeroLiquidity);

    lower_array
        .get_tick_mut(lower_tick, pool.tick_spacing)?
        .update(liquidity_delta, false)?;

    match upper_array {
        Some(array) => array
            .get_tick_mut(upper_tick, pool.tick_spacing)?
            .update(liquidity_delta, true)?,
        None => lower_array
            .get_tick_mut(upper_tick, pool.tick_spacing)?
            .update(liquidity_delta, true)?,
    }

    if pool.is_in_range(lower_tick, upper_tick) {
        let abs_delta = liquidity_delta.unsigned_abs();
        pool.global_liquidity = if liquidity_delta >= 0 {
            pool.global_liquidity
                .checked_add(abs_delta)
                .ok_or(ErrorCode::MathOverflow)?
        } else {
            pool.global_liquidity
                .checked_sub(abs_delta)
                .ok_or(ErrorCode::LiquidityUnderflow)?
        };
    }

    let sqrt_price_lower_x96 = math::tick_to_sqrt_price_x96(lower_tick)?;
    let sqrt_price_upper_x96 = math::tick_to_sqrt_price_x96(upper_tick)?;
    math::get_amounts_for_liquidity(
        pool.sqrt_price_x96,
        sqrt_price_lower_x96,
        sqrt_price_upper_x96,
        liquidity_delta.unsigned_abs(),
    )
}
