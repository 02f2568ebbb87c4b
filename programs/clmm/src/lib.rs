#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use errors::ErrorCode;
use position::PositionData;
use state::pool::Pool;
use tick::TickArrayState;

declare_id!("HvVeBmuPRReNPaMXXVWsz8UmtMSbUXnkGoDNN57brQcH");

// Modules for constants, errors, core math, and state definitions
pub mod constants;
pub mod errors;
pub mod math;
pub mod position; // Defines PositionData
pub mod position_manager;
pub mod state; // Defines Pool state (state::pool::Pool)
pub mod tick; // Defines TickState and TickArrayState

// Module for instruction handlers
pub mod instructions;

#[cfg(test)]
pub mod unit_test;


use instructions::*;

#[program]
pub mod clmm {
    use super::*;

    /// Initializes a new pool for an ordered token pair at a fixed tick
    /// spacing.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The context containing all necessary accounts.
    /// * `tick_spacing` - The spacing between usable ticks; immutable for
    ///   the life of the pool.
    /// * `initial_sqrt_price_x96` - The starting sqrt(price) in Q64.96.
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        tick_spacing: i32,
        initial_sqrt_price_x96: u128,
    ) -> Result<()> {
        instructions::initialize_pool::initialize_pool(ctx, tick_spacing, initial_sqrt_price_x96)
    }

    /// Opens a new position over a tick range, creating the covering
    /// tick-array pages on demand, and deposits the corresponding token
    /// amounts.
    ///
    /// When both boundaries fall in the same page, `upper_tick_array` is
    /// omitted.
    pub fn open_position(
        ctx: Context<OpenPosition>,
        upper_tick: i32,
        lower_tick: i32,
        tick_array_lower_start_index: i32,
        tick_array_upper_start_index: i32,
        liquidity_amount: u128,
    ) -> Result<(u64, u64)> {
        instructions::open_position::open_position(
            ctx,
            upper_tick,
            lower_tick,
            tick_array_lower_start_index,
            tick_array_upper_start_index,
            liquidity_amount,
        )
    }

    /// Swaps an exact amount of the input token against the pool.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The context containing all necessary accounts, including
    ///   the tick-array pages the swap may sweep in traversal order.
    /// * `amount_in` - The exact input amount.
    /// * `zero_for_one` - True to sell token0 for token1 (price moves down).
    /// * `min_amount_out` - Slippage floor on the output amount.
    pub fn swap(
        ctx: Context<Swap>,
        amount_in: u64,
        zero_for_one: bool,
        min_amount_out: u64,
    ) -> Result<()> {
        instructions::swap::swap(ctx, amount_in, zero_for_one, min_amount_out)
    }

    /// Adds liquidity to an existing position and deposits the
    /// corresponding token amounts.
    pub fn increase_liquidity(
        ctx: Context<IncreaseLiquidity>,
        liquidity_amount: u128,
        upper_tick: i32,
        lower_tick: i32,
        tick_array_lower_start_index: i32,
        tick_array_upper_start_index: i32,
    ) -> Result<()> {
        instructions::increase_liquidity::increase_liquidity(
            ctx,
            liquidity_amount,
            upper_tick,
            lower_tick,
            tick_array_lower_start_index,
            tick_array_upper_start_index,
        )
    }

    /// Removes liquidity from an existing position and pays out the
    /// released token amounts.
    pub fn decrease_liquidity(
        ctx: Context<DecreaseLiquidity>,
        liquidity_amount: u128,
        upper_tick: i32,
        lower_tick: i32,
        tick_array_lower_start_index: i32,
        tick_array_upper_start_index: i32,
    ) -> Result<()> {
        instructions::decrease_liquidity::decrease_liquidity(
            ctx,
            liquidity_amount,
            upper_tick,
            lower_tick,
            tick_array_lower_start_index,
            tick_array_upper_start_index,
        )
    }

    /// Closes an emptied position account and refunds its rent.
    pub fn close_position(
        ctx: Context<ClosePosition>,
        upper_tick: i32,
        lower_tick: i32,
    ) -> Result<()> {
        instructions::close_position::close_position(ctx, upper_tick, lower_tick)
    }
}

#[derive(Accounts)]
#[instruction(tick_spacing: i32)]
pub struct InitializePool<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    pub token_0_mint: InterfaceAccount<'info, Mint>,
    pub token_1_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = signer,
        space = Pool::LEN,
        seeds = [
            b"pool".as_ref(),
            token_0_mint.key().as_ref(),
            token_1_mint.key().as_ref(),
            tick_spacing.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init,
        payer = signer,
        token::mint = token_0_mint,
        token::authority = pool
    )]
    pub token_0_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = signer,
        token::mint = token_1_mint,
        token::authority = pool
    )]
    pub token_1_vault: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(
    upper_tick: i32,
    lower_tick: i32,
    tick_array_lower_start_index: i32,
    tick_array_upper_start_index: i32
)]
pub struct OpenPosition<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        has_one = token_0,
        has_one = token_1
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub token_0: Box<InterfaceAccount<'info, Mint>>,
    pub token_1: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = signer,
        space = TickArrayState::LEN,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_lower_start_index.to_le_bytes()
        ],
        bump
    )]
    pub lower_tick_array: AccountLoader<'info, TickArrayState>,

    /// Omitted when both boundaries fall in the same page.
    #[account(
        init_if_needed,
        payer = signer,
        space = TickArrayState::LEN,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_upper_start_index.to_le_bytes()
        ],
        bump
    )]
    pub upper_tick_array: Option<AccountLoader<'info, TickArrayState>>,

    #[account(
        init,
        payer = signer,
        space = PositionData::LEN,
        seeds = [
            b"position",
            pool.key().as_ref(),
            signer.key().as_ref(),
            lower_tick.to_le_bytes().as_ref(),
            upper_tick.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub position: Box<Account<'info, PositionData>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = signer
    )]
    pub user_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = signer
    )]
    pub user_1: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = pool
    )]
    pub pool_vault_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = pool
    )]
    pub pool_vault_1: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(
    liquidity_amount: u128,
    upper_tick: i32,
    lower_tick: i32,
    tick_array_lower_start_index: i32,
    tick_array_upper_start_index: i32
)]
pub struct IncreaseLiquidity<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        has_one = token_0,
        has_one = token_1
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub token_0: Box<InterfaceAccount<'info, Mint>>,
    pub token_1: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_lower_start_index.to_le_bytes()
        ],
        bump
    )]
    pub lower_tick_array: AccountLoader<'info, TickArrayState>,

    /// Same account as `lower_tick_array` when both boundaries fall in the
    /// same page; it is then borrowed only once.
    #[account(
        mut,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_upper_start_index.to_le_bytes()
        ],
        bump
    )]
    pub upper_tick_array: AccountLoader<'info, TickArrayState>,

    #[account(
        mut,
        constraint = position.pool == pool.key() @ ErrorCode::InvalidPoolReference,
        constraint = position.owner == signer.key() @ ErrorCode::InvalidPositionOwner,
    )]
    pub position: Box<Account<'info, PositionData>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = signer
    )]
    pub user_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = signer
    )]
    pub user_1: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = pool
    )]
    pub pool_vault_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = pool
    )]
    pub pool_vault_1: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(
    liquidity_amount: u128,
    upper_tick: i32,
    lower_tick: i32,
    tick_array_lower_start_index: i32,
    tick_array_upper_start_index: i32
)]
pub struct DecreaseLiquidity<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        has_one = token_0,
        has_one = token_1
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub token_0: Box<InterfaceAccount<'info, Mint>>,
    pub token_1: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_lower_start_index.to_le_bytes()
        ],
        bump
    )]
    pub lower_tick_array: AccountLoader<'info, TickArrayState>,

    /// Same account as `lower_tick_array` when both boundaries fall in the
    /// same page; it is then borrowed only once.
    #[account(
        mut,
        seeds = [
            b"tick_array",
            pool.key().as_ref(),
            &tick_array_upper_start_index.to_le_bytes()
        ],
        bump
    )]
    pub upper_tick_array: AccountLoader<'info, TickArrayState>,

    #[account(
        mut,
        constraint = position.pool == pool.key() @ ErrorCode::InvalidPoolReference,
        constraint = position.owner == signer.key() @ ErrorCode::InvalidPositionOwner,
    )]
    pub position: Box<Account<'info, PositionData>>,

    #[account(mut, token::mint = token_0)]
    pub user_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(mut, token::mint = token_1)]
    pub user_1: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = pool
    )]
    pub pool_vault_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = pool
    )]
    pub pool_vault_1: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(upper_tick: i32, lower_tick: i32)]
pub struct ClosePosition<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        close = signer,
        seeds = [
            b"position",
            pool.key().as_ref(),
            signer.key().as_ref(),
            lower_tick.to_le_bytes().as_ref(),
            upper_tick.to_le_bytes().as_ref()
        ],
        bump = position.bump
    )]
    pub position: Box<Account<'info, PositionData>>,
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        mut,
        has_one = token_0,
        has_one = token_1
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// The page covering the pool's current tick.
    pub tick_array_0: AccountLoader<'info, TickArrayState>,
    /// Further pages in the direction of travel, outermost last.
    pub tick_array_1: Option<AccountLoader<'info, TickArrayState>>,
    pub tick_array_2: Option<AccountLoader<'info, TickArrayState>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = signer
    )]
    pub user_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = signer
    )]
    pub user_1: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = token_0,
        token::authority = pool
    )]
    pub pool_vault_0: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = token_1,
        token::authority = pool
    )]
    pub pool_vault_1: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_0: Box<InterfaceAccount<'info, Mint>>,
    pub token_1: Box<InterfaceAccount<'info, Mint>>,

    pub token_program: Interface<'info, TokenInterface>,
}
