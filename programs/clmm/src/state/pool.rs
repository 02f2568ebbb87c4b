/// Pool account state and the exact-input swap engine.
use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::ErrorCode;
use crate::math;
use crate::tick::TickArrayState;
use anchor_lang::prelude::*;

/// A concentrated-liquidity pool for one ordered token pair at one tick
/// spacing.
///
/// `sqrt_price_x96` is the authoritative price; `current_tick` is the floor
/// tick of that price and is kept in lockstep with it by every swap.
/// `global_liquidity` is the liquidity active at the current tick, the sum of
/// all in-range positions.
#[account]
#[derive(Default, Debug)]
pub struct Pool {
    /// PDA bump.
    pub bump: u8,
    /// Mint of token0, the smaller mint under canonical byte ordering.
    pub token_0: Pubkey,
    /// Mint of token1.
    pub token_1: Pubkey,
    /// Pool-owned vault holding token0 deposits.
    pub token_vault_0: Pubkey,
    /// Pool-owned vault holding token1 deposits.
    pub token_vault_1: Pubkey,
    /// Distance between usable tick boundaries; immutable after creation.
    pub tick_spacing: i32,
    /// Current sqrt price in Q64.96.
    pub sqrt_price_x96: u128,
    /// Floor tick of the current sqrt price.
    pub current_tick: i32,
    /// Liquidity active at the current tick.
    pub global_liquidity: u128,
}

impl Pool {
    pub const LEN: usize = 8 // discriminator
        + 1 // bump
        + 32 * 4 // token mints and vaults
        + 4 // tick_spacing
        + 16 // sqrt_price_x96
        + 4 // current_tick
        + 16; // global_liquidity

    /// Sets up a freshly created pool at the given starting price.
    pub fn initialize(
        &mut self,
        bump: u8,
        token_0: Pubkey,
        token_1: Pubkey,
        token_vault_0: Pubkey,
        token_vault_1: Pubkey,
        tick_spacing: i32,
        sqrt_price_x96: u128,
    ) -> Result<()> {
        require!(token_0 < token_1, ErrorCode::InvalidTokenOrder);
        require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);

        // Also validates the price against the representable Q64.96 domain.
        let current_tick = math::sqrt_price_x96_to_tick(sqrt_price_x96)?;

        self.bump = bump;
        self.token_0 = token_0;
        self.token_1 = token_1;
        self.token_vault_0 = token_vault_0;
        self.token_vault_1 = token_vault_1;
        self.tick_spacing = tick_spacing;
        self.sqrt_price_x96 = sqrt_price_x96;
        self.current_tick = current_tick;
        self.global_liquidity = 0;

        Ok(())
    }

    /// Whether the current tick lies inside `[lower_tick, upper_tick)`.
    ///
    /// Membership is judged on ticks, not prices, so it stays consistent
    /// with the crossing bookkeeping when the price sits exactly on a
    /// boundary.
    pub fn is_in_range(&self, lower_tick: i32, upper_tick: i32) -> bool {
        lower_tick <= self.current_tick && self.current_tick < upper_tick
    }

    /// Applies a tick's net liquidity to the active liquidity when the
    /// price crosses it. Moving down the net is subtracted, moving up it is
    /// added.
    fn cross_liquidity(&mut self, liquidity_net: i128, moving_down: bool) -> Result<()> {
        let signed_net = if moving_down {
            liquidity_net.checked_neg().ok_or(ErrorCode::MathOverflow)?
        } else {
            liquidity_net
        };

        self.global_liquidity = if signed_net >= 0 {
            self.global_liquidity
                .checked_add(signed_net.unsigned_abs())
                .ok_or(ErrorCode::MathOverflow)?
        } else {
            self.global_liquidity
                .checked_sub(signed_net.unsigned_abs())
                .ok_or(ErrorCode::LiquidityUnderflow)?
        };

        Ok(())
    }

    /// Executes an exact-input swap against the pool.
    ///
    /// The caller supplies the tick-array pages the swap may sweep, ordered
    /// in the direction of travel starting with the page covering the
    /// current tick. The swap steps from the current price toward the next
    /// initialized tick (or page edge), consuming input against the active
    /// liquidity, crossing ticks as it reaches them, until the input is
    /// exhausted or liquidity runs out. Sweeping past the last supplied page
    /// with input remaining fails with `TickArrayNotProvided`.
    ///
    /// # Arguments
    /// * `zero_for_one` - True to sell token0 for token1 (price moves down).
    /// * `amount_in` - Exact input amount; must be nonzero.
    /// * `amount_out_minimum` - Slippage floor on the output amount.
    /// * `tick_arrays` - Pages in traversal order.
    ///
    /// # Returns
    /// * `Result<(u64, u64)>` - `(amount_in_used, amount_out)`. The input
    ///   used can be less than `amount_in` when liquidity is exhausted.
    pub fn swap(
        &mut self,
        zero_for_one: bool,
        amount_in: u64,
        amount_out_minimum: u64,
        tick_arrays: &[&TickArrayState],
    ) -> Result<(u64, u64)> {
        require!(amount_in > 0, ErrorCode::ZeroAmount);
        require!(self.global_liquidity > 0, ErrorCode::InsufficientLiquidity);

        let span = TickArrayState::tick_span(self.tick_spacing);
        let mut remaining = amount_in as u128;
        let mut total_out: u128 = 0;
        let mut array_idx = 0usize;

        while remaining > 0 && self.global_liquidity > 0 {
            let array = *tick_arrays
                .get(array_idx)
                .ok_or(ErrorCode::TickArrayNotProvided)?;

            // Skip pages the price has already moved past.
            if zero_for_one {
                if self.current_tick < array.start_tick_index {
                    array_idx += 1;
                    continue;
                }
            } else if self.current_tick >= array.start_tick_index + span {
                array_idx += 1;
                continue;
            }

            // The step target is the nearest initialized tick in the travel
            // direction, or the page edge when the page holds none.
            let (target_tick, target_initialized) =
                match array.next_initialized_tick(self.current_tick, self.tick_spacing, zero_for_one)
                {
                    Some(tick) => (tick, true),
                    None if zero_for_one => (array.start_tick_index, false),
                    None => (array.start_tick_index + span, false),
                };
            // Edge targets in the outermost pages can point past the tick
            // domain.
            let target_tick = target_tick.clamp(MIN_TICK, MAX_TICK);

            let sqrt_price_target_x96 = math::tick_to_sqrt_price_x96(target_tick)?;
            let (next_sqrt_price_x96, step_in, step_out) = math::compute_swap_step(
                self.sqrt_price_x96,
                sqrt_price_target_x96,
                self.global_liquidity,
                remaining,
                zero_for_one,
            )?;

            remaining = remaining
                .checked_sub(step_in)
                .ok_or(ErrorCode::MathOverflow)?;
            total_out = total_out
                .checked_add(step_out)
                .ok_or(ErrorCode::MathOverflow)?;
            self.sqrt_price_x96 = next_sqrt_price_x96;

            if next_sqrt_price_x96 == sqrt_price_target_x96 {
                if target_initialized {
                    // The boundary was reached; cross it and land on the far
                    // side.
                    let liquidity_net = array
                        .get_tick(target_tick, self.tick_spacing)?
                        .liquidity_net;
                    self.cross_liquidity(liquidity_net, zero_for_one)?;
                    self.current_tick = if zero_for_one {
                        target_tick - 1
                    } else {
                        target_tick
                    };
                } else {
                    // Page edge. The edge tick itself belongs to the next
                    // page, where it may be initialized; land just below it
                    // so the next page's scan starts at its first slot.
                    self.current_tick = target_tick - 1;
                    array_idx += 1;
                }
            } else {
                // Partial step: the input ran out between boundaries.
                self.current_tick = math::sqrt_price_x96_to_tick(next_sqrt_price_x96)?;
            }
        }

        let amount_in_used = amount_in - math::to_token_amount(remaining)?;
        let amount_out = math::to_token_amount(total_out)?;
        require!(amount_out >= amount_out_minimum, ErrorCode::SlippageExceeded);

        Ok((amount_in_used, amount_out))
    }
}
