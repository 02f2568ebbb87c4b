use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::shared::{load_or_init_tick_array, transfer_to_vault};
use crate::position::PositionData;
use crate::position_manager;
use crate::tick::TickArrayState;
use crate::OpenPosition;

/// Opens a new position over `[lower_tick, upper_tick)` with the given
/// liquidity.
///
/// Tick-array pages covering the boundaries are created on demand. When both
/// boundaries fall in the same page the caller omits the upper tick-array
/// account and the page is borrowed once.
///
/// Returns the token amounts deposited into the pool vaults.
pub fn open_position(
    ctx: Context<OpenPosition>,
    upper_tick: i32,
    lower_tick: i32,
    tick_array_lower_start_index: i32,
    tick_array_upper_start_index: i32,
    liquidity_amount: u128,
) -> Result<(u64, u64)> {
    require!(liquidity_amount > 0, ErrorCode::ZeroLiquidity);
    let liquidity_delta =
        i128::try_from(liquidity_amount).map_err(|_| error!(ErrorCode::MathOverflow))?;

    let pool_key = ctx.accounts.pool.key();

    let (amount_0, amount_1) = {
        let pool = &mut ctx.accounts.pool;

        require!(
            tick_array_lower_start_index
                == TickArrayState::start_tick_index_for(lower_tick, pool.tick_spacing)
                && tick_array_upper_start_index
                    == TickArrayState::start_tick_index_for(upper_tick, pool.tick_spacing),
            ErrorCode::InvalidTickArrayAccount
        );

        let mut lower_array = load_or_init_tick_array(
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
            let upper_loader = ctx
                .accounts
                .upper_tick_array
                .as_ref()
                .ok_or(ErrorCode::TickArrayNotProvided)?;
            let mut upper_array = load_or_init_tick_array(
                upper_loader,
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

    let position = &mut ctx.accounts.position;
    position.set_inner(PositionData {
        liquidity: liquidity_amount,
        lower_tick,
        upper_tick,
        owner: ctx.accounts.signer.key(),
        pool: pool_key,
        bump: ctx.bumps.position,
    });

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
        "Position opened: range=[{}, {}), liquidity={}, amount_0={}, amount_1={}",
        lower_tick,
        upper_tick,
        liquidity_amount,
        amount_0,
        amount_1
    );

    Ok((amount_0, amount_1))
}
