use std::cell::Ref;

use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::shared::{transfer_from_vault, transfer_to_vault};
use crate::tick::TickArrayState;
use crate::Swap;

/// Exact-input swap against the pool.
///
/// The caller supplies up to three tick-array pages in the direction of
/// travel, starting with the page covering the current tick. The pool's swap
/// loop sweeps through them, crossing initialized ticks as it goes; if the
/// input would carry the price past the last supplied page the instruction
/// fails and nothing is transferred.
///
/// Input the pool could not fill (liquidity exhausted) stays with the user:
/// only the consumed input is pulled into the vault.
pub fn swap(
    ctx: Context<Swap>,
    amount_in: u64,
    zero_for_one: bool,
    min_amount_out: u64,
) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();

    let (amount_in_used, amount_out, new_tick) = {
        let pool = &mut ctx.accounts.pool;

        let mut guards: Vec<Ref<TickArrayState>> = Vec::with_capacity(3);
        guards.push(ctx.accounts.tick_array_0.load()?);
        if let Some(loader) = &ctx.accounts.tick_array_1 {
            guards.push(loader.load()?);
        }
        if let Some(loader) = &ctx.accounts.tick_array_2 {
            guards.push(loader.load()?);
        }
        for guard in &guards {
            require!(guard.pool == pool_key, ErrorCode::InvalidTickArrayAccount);
        }

        let tick_arrays: Vec<&TickArrayState> = guards.iter().map(|guard| &**guard).collect();
        let (amount_in_used, amount_out) =
            pool.swap(zero_for_one, amount_in, min_amount_out, &tick_arrays)?;

        (amount_in_used, amount_out, pool.current_tick)
    };

    if zero_for_one {
        if amount_in_used > 0 {
            transfer_to_vault(
                &ctx.accounts.user_0,
                &ctx.accounts.pool_vault_0,
                amount_in_used,
                &ctx.accounts.token_0,
                &ctx.accounts.signer,
                &ctx.accounts.token_program,
            )?;
        }
        if amount_out > 0 {
            transfer_from_vault(
                &ctx.accounts.pool_vault_1,
                &ctx.accounts.user_1,
                amount_out,
                &ctx.accounts.token_1,
                &ctx.accounts.token_program,
                &ctx.accounts.pool,
            )?;
        }
    } else {
        if amount_in_used > 0 {
            transfer_to_vault(
                &ctx.accounts.user_1,
                &ctx.accounts.pool_vault_1,
                amount_in_used,
                &ctx.accounts.token_1,
                &ctx.accounts.signer,
                &ctx.accounts.token_program,
            )?;
        }
        if amount_out > 0 {
            transfer_from_vault(
                &ctx.accounts.pool_vault_0,
                &ctx.accounts.user_0,
                amount_out,
                &ctx.accounts.token_0,
                &ctx.accounts.token_program,
                &ctx.accounts.pool,
            )?;
        }
    }

    msg!(
        "Swap: zero_for_one={}, in={}, out={}, new_tick={}",
        zero_for_one,
        amount_in_used,
        amount_out,
        new_tick
    );

    Ok(())
}
