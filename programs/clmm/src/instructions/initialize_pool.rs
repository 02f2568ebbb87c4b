use anchor_lang::prelude::*;

use crate::InitializePool;

/// Creates a pool for an ordered token pair at a fixed tick spacing and
/// starting price.
///
/// The starting sqrt price is taken at face value; the pool's current tick
/// is derived from it. Liquidity starts at zero, so the pool cannot be
/// swapped against until a position is opened.
pub fn initialize_pool(
    ctx: Context<InitializePool>,
    tick_spacing: i32,
    initial_sqrt_price_x96: u128,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.initialize(
        ctx.bumps.pool,
        ctx.accounts.token_0_mint.key(),
        ctx.accounts.token_1_mint.key(),
        ctx.accounts.token_0_vault.key(),
        ctx.accounts.token_1_vault.key(),
        tick_spacing,
        initial_sqrt_price_x96,
    )?;

    msg!(
        "Pool initialized: spacing={}, sqrt_price={}, tick={}",
        tick_spacing,
        pool.sqrt_price_x96,
        pool.current_tick
    );

    Ok(())
}
