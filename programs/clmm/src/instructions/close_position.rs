use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::ClosePosition;

/// Closes an emptied position account and refunds its rent to the owner.
///
/// Closing never moves liquidity: the position must first be drained with
/// `decrease_liquidity`, so the tick ledger and the pool are untouched here
/// and no tick-array accounts are needed.
pub fn close_position(
    ctx: Context<ClosePosition>,
    upper_tick: i32,
    lower_tick: i32,
) -> Result<()> {
    let position = &ctx.accounts.position;

    require!(
        lower_tick == position.lower_tick && upper_tick == position.upper_tick,
        ErrorCode::InvalidPositionRange
    );
    position.ensure_drained()?;

    msg!("Position closed: range=[{}, {})", lower_tick, upper_tick);

    Ok(())
}
