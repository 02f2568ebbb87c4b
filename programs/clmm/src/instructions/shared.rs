/// Helpers shared by the instruction handlers: token transfers in and out of
/// the pool vaults, and tick-array page loading.
use std::cell::RefMut;

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::errors::ErrorCode;
use crate::state::Pool;
use crate::tick::TickArrayState;

/// Transfers tokens from a user account into a pool vault, signed by the
/// user.
pub fn transfer_to_vault<'info>(
    from: &InterfaceAccount<'info, TokenAccount>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    authority: &Signer<'info>,
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    let cpi_accounts = TransferChecked {
        from: from.to_account_info(),
        mint: mint.to_account_info(),
        to: vault.to_account_info(),
        authority: authority.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(token_program.to_account_info(), cpi_accounts);
    transfer_checked(cpi_ctx, amount, mint.decimals)
}

/// Transfers tokens out of a pool vault to a user account, signed with the
/// pool PDA seeds.
pub fn transfer_from_vault<'info>(
    vault: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    token_program: &Interface<'info, TokenInterface>,
    pool: &Account<'info, Pool>,
) -> Result<()> {
    let cpi_accounts = TransferChecked {
        from: vault.to_account_info(),
        mint: mint.to_account_info(),
        to: to.to_account_info(),
        authority: pool.to_account_info(),
    };

    let seeds: &[&[u8]] = &[
        b"pool",
        pool.token_0.as_ref(),
        pool.token_1.as_ref(),
        &pool.tick_spacing.to_le_bytes(),
        &[pool.bump],
    ];
    let signer_seeds = &[seeds];

    let cpi_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    transfer_checked(cpi_ctx, amount, mint.decimals)
}

/// Loads a tick-array page for mutation, initializing it on first use.
///
/// The PDA seeds already pin the account to `(pool, start)`; a fresh account
/// (created by `init_if_needed` in this instruction) is recognized by its
/// zeroed pool field and stamped with its identity here.
pub fn load_or_init_tick_array<'a, 'info>(
    loader: &'a AccountLoader<'info, TickArrayState>,
    pool_key: &Pubkey,
    start_tick_index: i32,
) -> Result<RefMut<'a, TickArrayState>> {
    let mut array = match loader.load_init() {
        Ok(array) => array,
        Err(_) => loader.load_mut()?,
    };
    if array.pool == Pubkey::default() {
        array.initialize(*pool_key, start_tick_index);
    }
    require!(
        array.pool == *pool_key && array.start_tick_index == start_tick_index,
        ErrorCode::InvalidTickArrayAccount
    );
    Ok(array)
}

/// Loads an existing tick-array page for mutation and checks it belongs to
/// the pool at the expected page start.
pub fn load_tick_array_mut<'a, 'info>(
    loader: &'a AccountLoader<'info, TickArrayState>,
    pool_key: &Pubkey,
    start_tick_index: i32,
) -> Result<RefMut<'a, TickArrayState>> {
    let array = loader.load_mut()?;
    require!(
        array.pool == *pool_key && array.start_tick_index == start_tick_index,
        ErrorCode::InvalidTickArrayAccount
    );
    Ok(array)
}
