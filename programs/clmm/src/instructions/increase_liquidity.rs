use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::shared::{load_tick_array_mut, transfer_to_vault};
use crate::position_manager;
use crate::tick::TickArrayState;
use crate::IncreaseLiquidity;

/// Adds liquidity to an existing position.
///
/// The tick bounds must match the position exactly; deposits accumulate into
/// the same boundary ticks the position was opened with, so the pages already
/// exist.
pub fn increase_liquidity(
    ctx: Context<IncreaseLiquidity>,
    liquidity_amount: u128,
    upper_tick: i32,
    lower_tick: i32,
    tick_array_lower_start_index: i32,
    tick_array_upper_start_index: i32,
) -> Result<()> {
    require!(liquidity_amount > 0, ErrorCode::ZeroAmount);
    let liquidity_delta =
        i128::try_from(liquidity_amount).map_err(|_| error!(ErrorCode::MathOverflow))?;

    let pool_key = ctx.accounts.pool.key();

    let (amount_0, amount_1) = {
        let pool = &mut ctx.accounts.pool;
        let position = &mut ctx.accounts.position;

        require!(
            lower_tick == position.lower_tick && upper_tick == position.upper_tick,
            ErrorCode::InvalidPositionRange
        );
        require!(
            tick_array_lower_start_index
                == TickArrayState::start_tick_index_for(lower_tick, pool.tick_spacing)
                && tick_array_upper_start_index
                    == TickArrayState::start_tick_index_for(upper_tick, pool.tick_spacing),
            ErrorCode::InvalidTickArrayAccount
        );

        position.liquidity = position
            .liquidity
            .checked_add(liquidity_amount)
            .ok_or(ErrorCode::MathOverflow)?;

        let mut lower_array = load_tick_array_mut(
            &ctx.accounts.lower_tick_array,
            &pool_key,
            tick_array_lower_start_index,
        )?;

        if tick_array_lower_start_index == tick_array_upper_start_index {
            position_manager::apply_liquidity_change(
                pool,
                lower_tick,
                upper_tick,
                liquidity_delta,
                &mut lower_array,
                None,
            )?
        } else {
            let mut upper_array = load_tick_array_mut(
                &ctx.accounts.upper_tick_array,
                &pool_key,
                tick_array_upper_start_index,
            )?;
            position_manager::apply_liquidity_change(
                pool,
                lower_tick,
                upper_tick,
                liquidity_delta,
                &mut lower_array,
                Some(&mut upper_array),
            )?
        }
    };

    if amount_0 > 0 {
        transfer_to_vault(
            &ctx.accounts.user_0,
            &ctx.accounts.pool_vault_0,
            amount_0,
            &ctx.accounts.token_0,
            &ctx.accounts.signer,
            &ctx.accounts.token_program,
        )?;
    }
    if amount_1 > 0 {
        transfer_to_vault(
            &ctx.accounts.user_1,
            &ctx.accounts.pool_vault_1,
            amount_1,
            &ctx.accounts.token_1,
            &ctx.accounts.signer,
            &ctx.accounts.token_program,
        )?;
    }

    msg!(
        "Liquidity increased: range=[{}, {}), delta={}, amount_0={}, amount_1={}",
        lower_tick,
        upper_tick,
        liquidity_amount,
        amount_0,
        amount_1
    );

    Ok(())
}
