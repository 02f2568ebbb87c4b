use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::shared::{load_tick_array_mut, transfer_from_vault};
use crate::position_manager;
use crate::tick::TickArrayState;
use crate::DecreaseLiquidity;

/// Removes liquidity from an existing position and pays out the released
/// token amounts from the pool vaults.
///
/// The position account itself stays open, even at zero liquidity, until it
/// is explicitly closed.
pub fn decrease_liquidity(
    ctx: Context<DecreaseLiquidity>,
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
            position.liquidity >= liquidity_amount,
            ErrorCode::InsufficientLiquidity
        );
        require!(
            tick_array_lower_start_index
                == TickArrayState::start_tick_index_for(lower_tick, pool.tick_spacing)
                && tick_array_upper_start_index
                    == TickArrayState::start_tick_index_for(upper_tick, pool.tick_spacing),
            ErrorCode::InvalidTickArrayAccount
        );

        position.liquidity -= liquidity_amount;

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
                -liquidity_delta,
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
                -liquidity_delta,
                &mut lower_array,
                Some(&mut upper_array),
            )?
        }
    };

    if amount_0 > 0 {
        transfer_from_vault(
            &ctx.accounts.pool_vault_0,
            &ctx.accounts.user_0,
            amount_0,
            &ctx.accounts.token_0,
            &ctx.accounts.token_program,
            &ctx.accounts.pool,
        )?;
    }
    if amount_1 > 0 {
        transfer_from_vault(
            &ctx.accounts.pool_vault_1,
            &ctx.accounts.user_1,
            amount_1,
            &ctx.accounts.token_1,
            &ctx.accounts.token_program,
            &ctx.accounts.pool,
        )?;
    }

    msg!(
        "Liquidity decreased: range=[{}, {}), delta={}, amount_0={}, amount_1={}",
        lower_tick,
        upper_tick,
        liquidity_amount,
        amount_0,
        amount_1
    );

    Ok(())
}
