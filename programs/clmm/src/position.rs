use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

/// A single owner's liquidity over one tick range of one pool.
///
/// The account is addressed by a PDA over `(pool, owner, lower_tick,
/// upper_tick)`, so one owner holds at most one position per range and
/// repeated deposits into the same range accumulate here.
#[account]
#[derive(Default, Debug)]
pub struct PositionData {
    /// Liquidity currently provided by this position.
    pub liquidity: u128,
    /// Lower tick boundary, inclusive.
    pub lower_tick: i32,
    /// Upper tick boundary, exclusive.
    pub upper_tick: i32,
    /// Authority allowed to modify or close the position.
    pub owner: Pubkey,
    /// Pool this position provides liquidity to.
    pub pool: Pubkey,
    /// PDA bump.
    pub bump: u8,
}

impl PositionData {
    pub const LEN: usize = 8 // discriminator
        + 16 // liquidity
        + 4 // lower_tick
        + 4 // upper_tick
        + 32 // owner
        + 32 // pool
        + 1; // bump

    /// A position can be closed only after its liquidity is fully withdrawn.
    pub fn ensure_drained(&self) -> Result<()> {
        require!(self.liquidity == 0, ErrorCode::PositionNotEmpty);
        Ok(())
    }
}
